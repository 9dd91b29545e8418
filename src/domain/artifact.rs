use super::selection::Selection;
use serde::Serialize;

/// The scannable payment-acceptance token produced once selections are confirmed.
///
/// The token is opaque to the wizard; only the gateway knows how to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub token: String,
    pub selections: Vec<Selection>,
}

impl Artifact {
    pub fn new(token: impl Into<String>, selections: Vec<Selection>) -> Self {
        Self {
            token: token.into(),
            selections,
        }
    }
}
