//! Adapters implementing the domain ports.

pub mod stub_gateway;
