use crate::domain::step::Step;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OnboardingError>;

#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid script record: {0}")]
    ScriptError(String),
    #[error("Please enter a valid Bangladesh phone number")]
    InvalidPhone,
    #[error("{action} is not available at step {step}: {reason}")]
    TransitionBlocked {
        action: &'static str,
        step: Step,
        reason: &'static str,
    },
    #[error("Unknown account {account} for provider {provider}")]
    UnknownAccount { provider: String, account: String },
    #[error("Onboarding session has ended")]
    SessionEnded,
    #[error("Gateway error: {0}")]
    GatewayError(String),
}
