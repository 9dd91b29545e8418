use crate::domain::artifact::Artifact;
use crate::domain::phone::{self, PhoneNumber, PhoneStatus};
use crate::domain::ports::OnboardingGatewayBox;
use crate::domain::provider::{self, Provider};
use crate::domain::selection::SelectionSet;
use crate::domain::step::Step;
use crate::error::{OnboardingError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const REQUEST_IN_FLIGHT: &str = "a request is already in flight";

/// Gateway request currently awaited by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    FetchingAccounts,
    GeneratingArtifact,
}

/// Read-only view of a session, published to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub step: Step,
    pub title: &'static str,
    pub phone: String,
    pub phone_status: PhoneStatus,
    pub validation_error: Option<&'static str>,
    pub providers: Vec<Provider>,
    pub selections: SelectionSet,
    pub artifact: Option<Artifact>,
    pub pending: Option<PendingOperation>,
    pub gateway_error: Option<String>,
    pub can_continue: bool,
    pub can_generate: bool,
    pub ended: bool,
}

#[derive(Debug, Default)]
struct WizardState {
    step: Step,
    phone_input: String,
    phone_status: PhoneStatus,
    providers: Vec<Provider>,
    selections: SelectionSet,
    artifact: Option<Artifact>,
    pending: Option<PendingOperation>,
    gateway_error: Option<String>,
}

impl WizardState {
    fn continue_blocker(&self) -> Option<&'static str> {
        if self.step != Step::PhoneEntry {
            return Some("phone number has already been verified");
        }
        if self.pending.is_some() {
            return Some(REQUEST_IN_FLIGHT);
        }
        match self.phone_status {
            PhoneStatus::Valid => None,
            PhoneStatus::Incomplete => Some("phone number is incomplete"),
            PhoneStatus::Invalid => Some(phone::INVALID_PHONE_MESSAGE),
        }
    }

    fn generate_blocker(&self) -> Option<&'static str> {
        if self.step.is_terminal() {
            return Some("QR code has already been generated");
        }
        if self.step != Step::AccountSelection {
            return Some("linked accounts have not been fetched");
        }
        if self.pending.is_some() {
            return Some(REQUEST_IN_FLIGHT);
        }
        if self.selections.is_empty() {
            return Some("no payment method selected");
        }
        None
    }

    fn snapshot(&self, ended: bool) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            title: self.step.title(),
            phone: self.phone_input.clone(),
            phone_status: self.phone_status,
            validation_error: self.phone_status.error_message(),
            providers: self.providers.clone(),
            selections: self.selections.clone(),
            artifact: self.artifact.clone(),
            pending: self.pending,
            gateway_error: self.gateway_error.clone(),
            can_continue: !ended && self.continue_blocker().is_none(),
            can_generate: !ended && self.generate_blocker().is_none(),
            ended,
        }
    }
}

/// Marks a gateway request as in flight for as long as it is alive.
///
/// Dropping it clears the marker and publishes a snapshot. A request that was
/// never completed (its future dropped, or the session ended) also restores
/// the gateway error that was shown before it started.
struct InFlight<'a> {
    state: &'a mut WizardState,
    notifier: &'a watch::Sender<WizardSnapshot>,
    session: &'a CancellationToken,
    previous_error: Option<String>,
    completed: bool,
}

impl<'a> InFlight<'a> {
    fn begin(
        state: &'a mut WizardState,
        notifier: &'a watch::Sender<WizardSnapshot>,
        session: &'a CancellationToken,
        operation: PendingOperation,
    ) -> Self {
        let previous_error = state.gateway_error.take();
        state.pending = Some(operation);
        notifier.send_replace(state.snapshot(session.is_cancelled()));
        Self {
            state,
            notifier,
            session,
            previous_error,
            completed: false,
        }
    }

    /// Records the gateway's answer and hands back the state to apply it to.
    fn complete(&mut self, gateway_error: Option<String>) -> &mut WizardState {
        self.completed = true;
        self.state.gateway_error = gateway_error;
        &mut *self.state
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.pending = None;
        if !self.completed {
            self.state.gateway_error = self.previous_error.take();
        }
        self.notifier
            .send_replace(self.state.snapshot(self.session.is_cancelled()));
    }
}

/// Step controller for a single onboarding session.
///
/// The wizard moves forward only: `PhoneEntry` to `AccountSelection` once the
/// phone number is valid and the linked accounts are fetched, then to
/// `QrReady` once at least one account is selected and the artifact is
/// generated. Operations take `&mut self`, so at most one gateway request is
/// in flight per session.
pub struct OnboardingWizard {
    gateway: OnboardingGatewayBox,
    state: WizardState,
    session: CancellationToken,
    notifier: Arc<watch::Sender<WizardSnapshot>>,
}

impl OnboardingWizard {
    /// Creates a new session at `PhoneEntry`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The backend used to fetch accounts and generate the artifact.
    pub fn new(gateway: OnboardingGatewayBox) -> Self {
        Self::with_cancellation(gateway, CancellationToken::new())
    }

    /// Creates a new session that ends when `session` is cancelled.
    ///
    /// Pass a child of a wider token (e.g. a server shutdown token) to tie the
    /// session's lifetime to it. When called inside a tokio runtime,
    /// subscribers are told about the end of the session however it happens.
    pub fn with_cancellation(gateway: OnboardingGatewayBox, session: CancellationToken) -> Self {
        let state = WizardState::default();
        let (notifier, _) = watch::channel(state.snapshot(session.is_cancelled()));
        let notifier = Arc::new(notifier);
        watch_for_end(&session, &notifier);
        Self {
            gateway,
            state,
            session,
            notifier,
        }
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn phone(&self) -> &str {
        &self.state.phone_input
    }

    pub fn phone_status(&self) -> PhoneStatus {
        self.state.phone_status
    }

    /// Inline message to show under the phone input, if any.
    pub fn validation_error(&self) -> Option<&'static str> {
        self.state.phone_status.error_message()
    }

    pub fn providers(&self) -> &[Provider] {
        &self.state.providers
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.state.selections
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.state.artifact.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.session.is_cancelled()
    }

    /// Whether "Continue" is enabled.
    pub fn can_continue(&self) -> bool {
        !self.is_ended() && self.state.continue_blocker().is_none()
    }

    /// Whether "Generate QR Code" is enabled.
    pub fn can_generate(&self) -> bool {
        !self.is_ended() && self.state.generate_blocker().is_none()
    }

    /// Progress indicator: entry `i` is `true` once step `i + 1` has been reached.
    pub fn progress(&self) -> [bool; 3] {
        Step::ALL.map(|step| self.state.step >= step)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        self.state.snapshot(self.is_ended())
    }

    /// Returns a receiver that observes a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.notifier.subscribe()
    }

    /// Token that ends this session when cancelled.
    ///
    /// Hand a clone to whatever owns the session's lifetime; cancelling it
    /// discards any gateway response still in flight.
    pub fn session_token(&self) -> CancellationToken {
        self.session.clone()
    }

    /// Ends the session. Pending and subsequent operations fail with
    /// [`OnboardingError::SessionEnded`] and leave the state untouched.
    pub fn end_session(&self) {
        if !self.session.is_cancelled() {
            tracing::info!(step = %self.state.step, "onboarding session ended");
            self.session.cancel();
            self.notify();
        }
    }

    /// Records the phone input and re-checks it.
    ///
    /// Input shorter than 11 characters is not validated and shows no error.
    /// A malformed number is reported through the returned status and
    /// [`validation_error`](Self::validation_error), not as an `Err`.
    pub fn enter_phone(&mut self, raw: &str) -> Result<PhoneStatus> {
        self.ensure_alive()?;
        if self.state.step != Step::PhoneEntry {
            return Err(self.blocked(
                "Phone entry",
                "phone number can only be changed before continuing",
            ));
        }

        let status = phone::check(raw);
        self.state.phone_input = raw.to_string();
        self.state.phone_status = status;
        tracing::debug!(?status, "phone input updated");
        self.notify();
        Ok(status)
    }

    /// Fetches the linked accounts and advances to `AccountSelection`.
    pub async fn continue_to_accounts(&mut self) -> Result<()> {
        self.ensure_alive()?;
        if let Some(reason) = self.state.continue_blocker() {
            return Err(self.blocked("Continue", reason));
        }
        let phone = PhoneNumber::parse(&self.state.phone_input)?;

        let mut request = InFlight::begin(
            &mut self.state,
            &self.notifier,
            &self.session,
            PendingOperation::FetchingAccounts,
        );
        let outcome = tokio::select! {
            biased;
            _ = self.session.cancelled() => None,
            result = self.gateway.fetch_linked_accounts(&phone) => Some(result),
        };
        let Some(result) = outcome else {
            tracing::info!("session ended while fetching linked accounts, response discarded");
            return Err(OnboardingError::SessionEnded);
        };

        match result {
            Ok(providers) => {
                tracing::info!(
                    phone = phone.national(),
                    providers = providers.len(),
                    "linked accounts fetched, advancing to account selection"
                );
                let state = request.complete(None);
                state.providers = providers;
                state.step = Step::AccountSelection;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetching linked accounts failed");
                request.complete(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Selects or deselects an account offered by one of the fetched providers.
    ///
    /// Returns whether the pair is selected afterwards.
    pub fn toggle_selection(&mut self, provider: &str, account: &str) -> Result<bool> {
        self.ensure_alive()?;
        match self.state.step {
            Step::AccountSelection => {}
            Step::PhoneEntry => {
                return Err(self.blocked(
                    "Account selection",
                    "linked accounts have not been fetched",
                ));
            }
            Step::QrReady => {
                return Err(self.blocked(
                    "Account selection",
                    "selections are final once the QR code is generated",
                ));
            }
        }
        if !provider::offers(&self.state.providers, provider, account) {
            tracing::warn!(provider, account, "rejected selection of unknown account");
            return Err(OnboardingError::UnknownAccount {
                provider: provider.to_string(),
                account: account.to_string(),
            });
        }

        let selected = self.state.selections.toggle(provider, account);
        tracing::debug!(
            provider,
            account,
            selected,
            count = self.state.selections.count(),
            "selection toggled"
        );
        self.notify();
        Ok(selected)
    }

    /// Generates the payment-acceptance artifact and advances to `QrReady`.
    pub async fn generate_artifact(&mut self) -> Result<Artifact> {
        self.ensure_alive()?;
        if let Some(reason) = self.state.generate_blocker() {
            return Err(self.blocked("Generate QR Code", reason));
        }
        let selections = self.state.selections.as_slice().to_vec();

        let mut request = InFlight::begin(
            &mut self.state,
            &self.notifier,
            &self.session,
            PendingOperation::GeneratingArtifact,
        );
        let outcome = tokio::select! {
            biased;
            _ = self.session.cancelled() => None,
            result = self.gateway.generate_artifact(&selections) => Some(result),
        };
        let Some(result) = outcome else {
            tracing::info!("session ended while generating artifact, response discarded");
            return Err(OnboardingError::SessionEnded);
        };

        match result {
            Ok(artifact) => {
                tracing::info!(
                    selections = selections.len(),
                    "artifact generated, onboarding complete"
                );
                let state = request.complete(None);
                state.artifact = Some(artifact.clone());
                state.step = Step::QrReady;
                Ok(artifact)
            }
            Err(e) => {
                tracing::warn!(error = %e, "generating artifact failed");
                request.complete(Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.session.is_cancelled() {
            Err(OnboardingError::SessionEnded)
        } else {
            Ok(())
        }
    }

    fn blocked(&self, action: &'static str, reason: &'static str) -> OnboardingError {
        tracing::warn!(action, step = %self.state.step, reason, "transition blocked");
        OnboardingError::TransitionBlocked {
            action,
            step: self.state.step,
            reason,
        }
    }

    fn notify(&self) {
        self.notifier.send_replace(self.snapshot());
    }
}

/// Marks the published snapshot as ended once `session` is cancelled, so
/// subscribers learn about cancellations that bypass [`OnboardingWizard::end_session`].
fn watch_for_end(session: &CancellationToken, notifier: &Arc<watch::Sender<WizardSnapshot>>) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::debug!("no tokio runtime, session end is only published by end_session");
        return;
    };
    let session = session.clone();
    let notifier = Arc::clone(notifier);
    runtime.spawn(async move {
        session.cancelled().await;
        notifier.send_if_modified(|snapshot| {
            if snapshot.ended {
                return false;
            }
            snapshot.ended = true;
            snapshot.can_continue = false;
            snapshot.can_generate = false;
            true
        });
    });
}

impl Drop for OnboardingWizard {
    fn drop(&mut self) {
        self.session.cancel();
    }
}
