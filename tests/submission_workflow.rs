//! End-to-end submission scenarios: the real HTTP gateway talking to an
//! in-process mock of the valuation service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use url::Url;

use house_valuation::config::{DisplayConfig, ValuationServiceConfig};
use house_valuation::workflows::valuation::{
    AttributeRecord, HttpValuationGateway, SubmissionController, SubmissionState, SubmitOutcome,
    FAILURE_MESSAGE,
};

#[derive(Clone)]
enum MockReply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
}

#[derive(Clone)]
struct MockService {
    reply: MockReply,
    gate: Option<Arc<Notify>>,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    fn new(reply: MockReply) -> Self {
        Self {
            reply,
            gate: None,
            hits: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
            content_types: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().expect("bodies mutex").clone()
    }

    fn content_types(&self) -> Vec<String> {
        self.content_types.lock().expect("content type mutex").clone()
    }
}

async fn predict(
    State(service): State<MockService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    service.hits.fetch_add(1, Ordering::SeqCst);
    service.bodies.lock().expect("bodies mutex").push(body);
    if let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        service
            .content_types
            .lock()
            .expect("content type mutex")
            .push(content_type.to_string());
    }

    if let Some(gate) = &service.gate {
        gate.notified().await;
    }

    match service.reply {
        MockReply::Json(status, payload) => (status, Json(payload)).into_response(),
        MockReply::Text(status, text) => (status, text).into_response(),
    }
}

async fn spawn_mock(service: MockService) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock valuation service");
    let addr = listener.local_addr().expect("mock address");
    let app = Router::new()
        .route("/predict", post(predict))
        .with_state(service);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Url::parse(&format!("http://{addr}/predict")).expect("valid mock url")
}

fn controller_for(
    endpoint: Url,
    timeout: Duration,
) -> SubmissionController<HttpValuationGateway> {
    let gateway = HttpValuationGateway::from_config(&ValuationServiceConfig { endpoint, timeout })
        .expect("http client builds");
    SubmissionController::new(Arc::new(gateway), DisplayConfig::default())
}

#[tokio::test]
async fn default_record_is_posted_as_json_and_estimate_is_rounded() {
    let service = MockService::new(MockReply::Json(
        StatusCode::OK,
        json!({ "prediction": 734213 }),
    ));
    let endpoint = spawn_mock(service.clone()).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded("The estimated price is around 730,000 MAD".to_string())
    );
    assert!(controller.state().shows_result());

    let bodies = service.bodies();
    assert_eq!(bodies.len(), 1);
    let expected = serde_json::to_value(AttributeRecord::default()).expect("record to json");
    assert_eq!(bodies[0], expected);
    assert_eq!(bodies[0]["furnishingstatus"], "semi-furnished");
    assert_eq!(bodies[0]["mainroad"], "yes");
    assert_eq!(
        service.content_types(),
        vec!["application/json".to_string()]
    );
}

#[tokio::test]
async fn server_error_ends_in_failed_state() {
    let service = MockService::new(MockReply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": "model not loaded" }),
    ));
    let endpoint = spawn_mock(service.clone()).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()));
    assert_eq!(
        controller.state(),
        SubmissionState::Failed(FAILURE_MESSAGE.to_string())
    );
    assert_eq!(service.hits(), 1);
}

#[tokio::test]
async fn non_numeric_prediction_ends_in_failed_state() {
    let service = MockService::new(MockReply::Json(
        StatusCode::OK,
        json!({ "prediction": "not-a-number" }),
    ));
    let endpoint = spawn_mock(service).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()));
}

#[tokio::test]
async fn malformed_body_ends_in_failed_state() {
    let service = MockService::new(MockReply::Text(StatusCode::OK, "<html>maintenance</html>"));
    let endpoint = spawn_mock(service).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()));
}

#[tokio::test]
async fn refused_connection_ends_in_failed_state() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("reserve a port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/predict")).expect("valid url");
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()));
    assert!(controller.state().accepts_submit());
}

#[tokio::test]
async fn slow_service_is_cut_off_by_the_timeout() {
    let gate = Arc::new(Notify::new());
    let service = MockService::new(MockReply::Json(
        StatusCode::OK,
        json!({ "prediction": 734213 }),
    ))
    .gated(gate);
    let endpoint = spawn_mock(service).await;
    let controller = controller_for(endpoint, Duration::from_millis(200));

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed(FAILURE_MESSAGE.to_string()));
}

#[tokio::test]
async fn parking_override_is_clamped_before_sending() {
    let service = MockService::new(MockReply::Json(
        StatusCode::OK,
        json!({ "prediction": 1_250_000.0 }),
    ));
    let endpoint = spawn_mock(service.clone()).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    controller
        .set_field_raw("parking", "15")
        .expect("parking accepts numbers");
    assert_eq!(controller.record().parking, 10);

    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded("The estimated price is around 1,250,000 MAD".to_string())
    );
    assert_eq!(service.bodies()[0]["parking"], 10);
}

#[tokio::test]
async fn rapid_double_submit_sends_one_request() {
    let gate = Arc::new(Notify::new());
    let service = MockService::new(MockReply::Json(
        StatusCode::OK,
        json!({ "prediction": 734213 }),
    ))
    .gated(gate.clone());
    let endpoint = spawn_mock(service.clone()).await;
    let controller = controller_for(endpoint, Duration::from_secs(5));

    let (first, second) = tokio::join!(controller.submit(), async {
        let outcome = controller.submit().await;
        gate.notify_one();
        outcome
    });

    assert_eq!(second, SubmitOutcome::AlreadyPending);
    assert!(matches!(first, SubmitOutcome::Succeeded(_)));
    assert_eq!(service.hits(), 1);
}
