use super::artifact::Artifact;
use super::phone::PhoneNumber;
use super::provider::Provider;
use super::selection::Selection;
use crate::error::Result;
use async_trait::async_trait;

/// Boundary to the onboarding backend.
///
/// Given a verified phone number the backend returns the providers and
/// accounts linked to it; given the merchant's selections it returns the
/// payment-acceptance artifact.
#[async_trait]
pub trait OnboardingGateway: Send + Sync {
    async fn fetch_linked_accounts(&self, phone: &PhoneNumber) -> Result<Vec<Provider>>;
    async fn generate_artifact(&self, selections: &[Selection]) -> Result<Artifact>;
}

pub type OnboardingGatewayBox = Box<dyn OnboardingGateway>;
