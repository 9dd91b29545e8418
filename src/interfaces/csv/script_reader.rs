use crate::application::action::SessionAction;
use crate::error::{OnboardingError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Phone,
    Continue,
    Toggle,
    Generate,
    End,
}

/// One row of a session script: `action, phone, provider, account`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ScriptRecord {
    pub action: ActionType,
    pub phone: Option<String>,
    pub provider: Option<String>,
    pub account: Option<String>,
}

fn required(field: Option<String>, name: &str, action: &str) -> Result<String> {
    field.ok_or_else(|| OnboardingError::ScriptError(format!("{action} requires {name}")))
}

impl TryFrom<ScriptRecord> for SessionAction {
    type Error = OnboardingError;

    fn try_from(record: ScriptRecord) -> Result<Self> {
        match record.action {
            ActionType::Phone => Ok(SessionAction::EnterPhone {
                // An empty phone field clears the input.
                raw: record.phone.unwrap_or_default(),
            }),
            ActionType::Continue => Ok(SessionAction::Continue),
            ActionType::Toggle => Ok(SessionAction::ToggleSelection {
                provider: required(record.provider, "provider", "toggle")?,
                account: required(record.account, "account", "toggle")?,
            }),
            ActionType::Generate => Ok(SessionAction::GenerateArtifact),
            ActionType::End => Ok(SessionAction::EndSession),
        }
    }
}

/// Reads a scripted onboarding session from a CSV source.
///
/// Whitespace around fields is trimmed and rows may omit trailing empty fields.
pub struct ScriptReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ScriptReader<R> {
    /// Creates a new `ScriptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads actions, one `Result` per row.
    pub fn actions(self) -> impl Iterator<Item = Result<SessionAction>> {
        self.reader
            .into_deserialize::<ScriptRecord>()
            .map(|result| {
                result
                    .map_err(OnboardingError::from)
                    .and_then(SessionAction::try_from)
            })
    }
}
