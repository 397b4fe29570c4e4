use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::display::{format_estimate, FAILURE_MESSAGE};
use super::domain::AttributeRecord;
use super::gateway::{ValuationError, ValuationGateway};
use super::update::{FieldUpdate, InputError};
use super::wire::interpret_response;
use crate::config::DisplayConfig;

/// Result display state observed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    /// Terminal states are the ones that open the result display.
    pub fn shows_result(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        )
    }

    pub fn accepts_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn display_text(&self) -> Option<&str> {
        match self {
            SubmissionState::Succeeded(text) | SubmissionState::Failed(text) => {
                Some(text.as_str())
            }
            SubmissionState::Idle | SubmissionState::Pending => None,
        }
    }
}

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(String),
    Failed(String),
    /// Another submission was already in flight; nothing was sent.
    AlreadyPending,
}

/// Owns the attribute record for one form session and drives its submissions.
///
/// All operations take `&self`; a second `submit` polled while the first is
/// awaiting the gateway observes the pending state and returns immediately.
#[derive(Debug)]
pub struct SubmissionController<G: ?Sized> {
    record: watch::Sender<AttributeRecord>,
    state: watch::Sender<SubmissionState>,
    gateway: Arc<G>,
    display: DisplayConfig,
}

impl<G> SubmissionController<G>
where
    G: ValuationGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>, display: DisplayConfig) -> Self {
        Self::with_record(gateway, display, AttributeRecord::default())
    }

    pub fn with_record(gateway: Arc<G>, display: DisplayConfig, record: AttributeRecord) -> Self {
        let (record, _) = watch::channel(record);
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            record,
            state,
            gateway,
            display,
        }
    }

    pub fn record(&self) -> AttributeRecord {
        *self.record.borrow()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe_record(&self) -> watch::Receiver<AttributeRecord> {
        self.record.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Replaces one field of the held record. The submission state is untouched.
    pub fn set_field(&self, update: FieldUpdate) {
        self.record.send_if_modified(|record| {
            let next = record.apply(update);
            let changed = next != *record;
            *record = next;
            changed
        });
        debug!(field = %update.field(), "attribute updated");
    }

    /// Raw-text variant of [`Self::set_field`] for widget callbacks.
    pub fn set_field_raw(&self, field: &str, raw: &str) -> Result<(), InputError> {
        let update = FieldUpdate::parse(field, raw)?;
        self.set_field(update);
        Ok(())
    }

    /// Clears a shown result. Has no effect while a submission is in flight.
    pub fn dismiss_result(&self) {
        self.state.send_if_modified(|state| match state {
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_) => {
                *state = SubmissionState::Idle;
                true
            }
            SubmissionState::Idle | SubmissionState::Pending => false,
        });
    }

    /// Sends the current record to the valuation service and settles the state.
    ///
    /// Never returns an error: every failure ends in [`SubmissionState::Failed`]
    /// with a generic message, while the cause is logged.
    pub async fn submit(&self) -> SubmitOutcome {
        let entered = self.state.send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                *state = SubmissionState::Pending;
                true
            }
        });
        if !entered {
            debug!("submission already in flight, ignoring submit");
            return SubmitOutcome::AlreadyPending;
        }

        let guard = PendingGuard::new(&self.state);
        let snapshot = self.record();
        debug!(?snapshot, "submitting attributes for valuation");

        let result = self
            .gateway
            .request_valuation(&snapshot)
            .await
            .and_then(|response| interpret_response(&response));

        let (state, outcome) = self.settle(result);
        guard.finish(state);
        outcome
    }

    fn settle(&self, result: Result<f64, ValuationError>) -> (SubmissionState, SubmitOutcome) {
        match result {
            Ok(prediction) => {
                let text = format_estimate(prediction, &self.display);
                info!(prediction, "valuation succeeded");
                (
                    SubmissionState::Succeeded(text.clone()),
                    SubmitOutcome::Succeeded(text),
                )
            }
            Err(err) => {
                warn!(error = %err, "valuation failed");
                (
                    SubmissionState::Failed(FAILURE_MESSAGE.to_string()),
                    SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()),
                )
            }
        }
    }
}

/// Returns the state to idle if a submission future is dropped mid-flight.
struct PendingGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
    settled: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(state: &'a watch::Sender<SubmissionState>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn finish(mut self, next: SubmissionState) {
        self.state.send_replace(next);
        self.settled = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        debug!("submission abandoned before completion");
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }
}
