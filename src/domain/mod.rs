//! Domain model of the onboarding wizard: phone validation, providers,
//! selections, steps, and the gateway port.

pub mod artifact;
pub mod phone;
pub mod ports;
pub mod provider;
pub mod selection;
pub mod step;
