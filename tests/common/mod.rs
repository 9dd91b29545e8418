#![allow(dead_code)]

use async_trait::async_trait;
use merchant_onboarding::application::wizard::OnboardingWizard;
use merchant_onboarding::domain::artifact::Artifact;
use merchant_onboarding::domain::phone::PhoneNumber;
use merchant_onboarding::domain::ports::OnboardingGateway;
use merchant_onboarding::domain::provider::Provider;
use merchant_onboarding::domain::selection::Selection;
use merchant_onboarding::error::{OnboardingError, Result};
use merchant_onboarding::infrastructure::stub_gateway::StubGateway;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const SCRIPT_HEADER: &str = "action, phone, provider, account";

/// Wizard backed by a stub gateway that answers after `delay`.
pub fn wizard_with_delay(delay: Duration) -> OnboardingWizard {
    OnboardingWizard::new(Box::new(StubGateway::new(delay)))
}

/// Writes a session script with the standard header followed by `rows`.
pub fn write_script(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{SCRIPT_HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Gateway whose first calls to each operation fail, delegating to a
/// zero-delay stub afterwards.
pub struct FlakyGateway {
    fetch_failures: usize,
    generate_failures: usize,
    fetch_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    inner: StubGateway,
}

impl FlakyGateway {
    pub fn new(fetch_failures: usize, generate_failures: usize) -> Self {
        Self {
            fetch_failures,
            generate_failures,
            fetch_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            inner: StubGateway::new(Duration::ZERO),
        }
    }

    /// Delegates successful calls to a stub answering after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inner = StubGateway::new(delay);
        self
    }
}

fn unavailable() -> OnboardingError {
    OnboardingError::GatewayError("backend unavailable".to_string())
}

#[async_trait]
impl OnboardingGateway for FlakyGateway {
    async fn fetch_linked_accounts(&self, phone: &PhoneNumber) -> Result<Vec<Provider>> {
        if self.fetch_calls.fetch_add(1, Ordering::SeqCst) < self.fetch_failures {
            return Err(unavailable());
        }
        self.inner.fetch_linked_accounts(phone).await
    }

    async fn generate_artifact(&self, selections: &[Selection]) -> Result<Artifact> {
        if self.generate_calls.fetch_add(1, Ordering::SeqCst) < self.generate_failures {
            return Err(unavailable());
        }
        self.inner.generate_artifact(selections).await
    }
}
