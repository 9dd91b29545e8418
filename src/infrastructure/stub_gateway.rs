use crate::domain::artifact::Artifact;
use crate::domain::phone::PhoneNumber;
use crate::domain::ports::OnboardingGateway;
use crate::domain::provider::Provider;
use crate::domain::selection::Selection;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Providers every phone number is linked to in the stub backend.
pub fn mock_providers() -> Vec<Provider> {
    vec![
        Provider::new("bKash", "💰", ["01712345678", "01787654321"]),
        Provider::new("Nagad", "💳", ["01712345678"]),
        Provider::new("Rocket", "🚀", ["01787654321"]),
        Provider::new("Bank", "🏦", ["1234567890"]),
    ]
}

/// A gateway that answers every request with canned data after a fixed delay.
///
/// Stands in for the real onboarding backend. It never fails.
#[derive(Debug, Clone)]
pub struct StubGateway {
    delay: Duration,
    providers: Vec<Provider>,
}

impl StubGateway {
    /// Creates a stub serving [`mock_providers`] after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            providers: mock_providers(),
        }
    }

    /// Replaces the canned provider list.
    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl OnboardingGateway for StubGateway {
    async fn fetch_linked_accounts(&self, phone: &PhoneNumber) -> Result<Vec<Provider>> {
        tracing::debug!(
            phone = phone.national(),
            delay_ms = self.delay.as_millis() as u64,
            "stub: fetching linked accounts"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.providers.clone())
    }

    async fn generate_artifact(&self, selections: &[Selection]) -> Result<Artifact> {
        tracing::debug!(count = selections.len(), "stub: generating artifact");
        tokio::time::sleep(self.delay).await;
        let pairs: Vec<String> = selections
            .iter()
            .map(|s| format!("{}={}", s.provider, s.account))
            .collect();
        Ok(Artifact::new(
            format!("QR:{}", pairs.join(";")),
            selections.to_vec(),
        ))
    }
}
