//! Application layer driving an onboarding session.
//!
//! This module defines the `OnboardingWizard`, the step controller that owns a
//! session's state and routes every user action through its transition rules.
//! Gateway calls are awaited under the session's cancellation token so that a
//! session which has ended never observes a late completion.

pub mod action;
pub mod wizard;
