use super::wizard::OnboardingWizard;
use crate::error::Result;

/// A user action routed through the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    EnterPhone { raw: String },
    Continue,
    ToggleSelection { provider: String, account: String },
    GenerateArtifact,
    EndSession,
}

impl SessionAction {
    pub fn description(&self) -> &'static str {
        match self {
            SessionAction::EnterPhone { .. } => "Entering phone number",
            SessionAction::Continue => "Fetching linked accounts",
            SessionAction::ToggleSelection { .. } => "Toggling account selection",
            SessionAction::GenerateArtifact => "Generating QR code",
            SessionAction::EndSession => "Ending session",
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(
            self,
            SessionAction::Continue | SessionAction::GenerateArtifact
        )
    }
}

impl OnboardingWizard {
    /// Dispatches `action` to the matching wizard operation.
    pub async fn apply(&mut self, action: SessionAction) -> Result<()> {
        tracing::debug!(
            action = action.description(),
            is_async = action.is_async(),
            "applying session action"
        );
        match action {
            SessionAction::EnterPhone { raw } => {
                self.enter_phone(&raw)?;
            }
            SessionAction::Continue => self.continue_to_accounts().await?,
            SessionAction::ToggleSelection { provider, account } => {
                self.toggle_selection(&provider, &account)?;
            }
            SessionAction::GenerateArtifact => {
                self.generate_artifact().await?;
            }
            SessionAction::EndSession => self.end_session(),
        }
        Ok(())
    }
}
