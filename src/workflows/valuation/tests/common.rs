use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::config::DisplayConfig;
use crate::workflows::valuation::domain::AttributeRecord;
use crate::workflows::valuation::gateway::{ValuationError, ValuationGateway};
use crate::workflows::valuation::wire::GatewayResponse;
use crate::workflows::valuation::SubmissionController;

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, String),
    Unreachable(String),
}

/// Gateway double returning a fixed reply, optionally held until released.
#[derive(Debug)]
pub(super) struct ScriptedGateway {
    reply: Reply,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<AttributeRecord>>,
}

impl ScriptedGateway {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            gate: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn responding(status: u16, body: &str) -> Self {
        Self::with_reply(Reply::Respond(status, body.to_string()))
    }

    pub(super) fn unreachable(detail: &str) -> Self {
        Self::with_reply(Reply::Unreachable(detail.to_string()))
    }

    /// Every request waits for one `notify_one` on `gate` before replying.
    pub(super) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn seen(&self) -> Vec<AttributeRecord> {
        self.seen.lock().expect("seen mutex poisoned").clone()
    }
}

#[async_trait]
impl ValuationGateway for ScriptedGateway {
    async fn request_valuation(
        &self,
        record: &AttributeRecord,
    ) -> Result<GatewayResponse, ValuationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("seen mutex poisoned").push(*record);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.reply {
            Reply::Respond(status, body) => Ok(GatewayResponse::new(*status, body.clone())),
            Reply::Unreachable(detail) => Err(ValuationError::Transport(detail.clone())),
        }
    }
}

pub(super) fn controller(
    gateway: ScriptedGateway,
) -> (SubmissionController<ScriptedGateway>, Arc<ScriptedGateway>) {
    let gateway = Arc::new(gateway);
    let controller = SubmissionController::new(gateway.clone(), DisplayConfig::default());
    (controller, gateway)
}

pub(super) const SAMPLE_PREDICTION: &str = r#"{"prediction": 734213}"#;
