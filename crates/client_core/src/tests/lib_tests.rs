use super::*;
use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::{domain::FieldName, protocol::ResultVariant};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    reply: Value,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn handle_predict(
    State(state): State<ServerState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.received.lock().await.push(payload);
    (state.status, Json(state.reply.clone()))
}

async fn handle_root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Credit Card Fraud Detection API is running."
    }))
}

async fn spawn_prediction_server(
    status: StatusCode,
    reply: Value,
) -> Result<(String, Arc<Mutex<Vec<Value>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        reply,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/", get(handle_root))
        .route("/predict", post(handle_predict))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), received))
}

/// Address that refuses connections: bound once, then released.
async fn unreachable_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

fn scenario_controller() -> FormController {
    let mut controller = FormController::default();
    for field in FieldName::all() {
        controller.on_field_change(field, "0");
    }
    controller.on_field_change(FieldName::AMOUNT, "100");
    controller
}

#[test]
fn rejects_unparseable_base_url() {
    let err = HttpPredictionClient::new("not a url").expect_err("must fail");
    assert!(matches!(err, PredictError::InvalidBaseUrl { .. }));
}

#[test]
fn trailing_slash_is_trimmed_from_base_url() {
    let client = HttpPredictionClient::new("http://localhost:8000/").expect("client");
    assert_eq!(client.base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn scenario_not_fraud_renders_not_fraud_result() {
    let (url, received) = spawn_prediction_server(
        StatusCode::OK,
        json!({"prediction": "Not Fraud", "is_fraud": 0, "fraud_probability": "2.30%"}),
    )
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");
    let mut controller = scenario_controller();

    let status = controller.submit_with(&client).await.expect("submit");

    let panel = status.result_panel().expect("result panel");
    assert_eq!(panel.verdict, "Not Fraud");
    assert_eq!(panel.variant, ResultVariant::NotFraud);
    assert_eq!(panel.probability_line, "Probability of Fraud: 2.30%");
    assert!(status.error_panel().is_none());

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    let body = received[0].as_object().expect("object body");
    assert_eq!(body.len(), 30);
    assert_eq!(body["Amount"], json!(100.0));
    assert_eq!(body["Time"], json!(0.0));
    for n in 1..=28 {
        assert_eq!(body[&format!("V{n}")], json!(0.0));
    }
}

#[tokio::test]
async fn scenario_fraud_renders_fraud_result() {
    let (url, _received) = spawn_prediction_server(
        StatusCode::OK,
        json!({"prediction": "Fraud", "is_fraud": 1, "fraud_probability": "98.70%"}),
    )
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");
    let mut controller = scenario_controller();

    let status = controller.submit_with(&client).await.expect("submit");

    let panel = status.result_panel().expect("result panel");
    assert_eq!(panel.verdict, "Fraud");
    assert_eq!(panel.variant, ResultVariant::Fraud);
    assert_eq!(panel.probability_line, "Probability of Fraud: 98.70%");
}

#[tokio::test]
async fn scenario_network_failure_renders_generic_error() {
    let url = unreachable_url().await.expect("reserve port");
    let client = HttpPredictionClient::new(&url).expect("client");
    let mut controller = scenario_controller();

    let status = controller.submit_with(&client).await.expect("submit");

    let panel = status.error_panel().expect("error panel");
    assert_eq!(panel.message, FAILED_SUBMISSION_MESSAGE);
    assert!(status.result_panel().is_none());
    assert!(status.submit_enabled());
}

#[tokio::test]
async fn network_failure_is_a_transport_error() {
    let url = unreachable_url().await.expect("reserve port");
    let client = HttpPredictionClient::new(&url).expect("client");

    let err = client
        .predict(&scenario_controller().form().to_request())
        .await
        .expect_err("must fail");

    assert!(matches!(err, PredictError::Transport(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn non_success_status_fails_submission() {
    let (url, _received) =
        spawn_prediction_server(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"}))
            .await
            .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");

    let err = client
        .predict(&scenario_controller().form().to_request())
        .await
        .expect_err("must fail");
    assert!(matches!(
        err,
        PredictError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));

    let mut controller = scenario_controller();
    let status = controller.submit_with(&client).await.expect("submit");
    assert!(status.error_panel().is_some());
    assert!(status.result_panel().is_none());
}

#[tokio::test]
async fn malformed_body_fails_submission() {
    let (url, _received) =
        spawn_prediction_server(StatusCode::OK, json!({"prediction": "Fraud"}))
            .await
            .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");

    let err = client
        .predict(&scenario_controller().form().to_request())
        .await
        .expect_err("must fail");
    assert!(matches!(err, PredictError::Decode(_)), "unexpected error: {err}");

    let mut controller = scenario_controller();
    let status = controller.submit_with(&client).await.expect("submit");
    assert_eq!(
        status,
        &SubmissionStatus::Failed(FAILED_SUBMISSION_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn model_not_loaded_reply_is_a_service_error() {
    let (url, _received) = spawn_prediction_server(
        StatusCode::OK,
        json!({"error": "Model not loaded. Please train the model first."}),
    )
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");

    let err = client
        .predict(&scenario_controller().form().to_request())
        .await
        .expect_err("must fail");

    assert!(
        matches!(&err, PredictError::Service(message) if message.contains("Model not loaded")),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn empty_and_invalid_fields_are_sent_as_null() {
    let (url, received) = spawn_prediction_server(
        StatusCode::OK,
        json!({"prediction": "Not Fraud", "is_fraud": 0, "fraud_probability": "0.10%"}),
    )
    .await
    .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");
    let mut controller = scenario_controller();
    controller.on_field_change(FieldName::AMOUNT, "");
    controller.on_field_change(FieldName::v(7).expect("v7"), "abc");

    controller.submit_with(&client).await.expect("submit");

    let received = received.lock().await;
    assert_eq!(received[0]["Amount"], Value::Null);
    assert_eq!(received[0]["V7"], Value::Null);
    assert_eq!(received[0]["V8"], json!(0.0));
}

#[tokio::test]
async fn health_reads_service_banner() {
    let (url, _received) = spawn_prediction_server(StatusCode::OK, json!({}))
        .await
        .expect("spawn server");
    let client = HttpPredictionClient::new(&url).expect("client");

    let health = client.health().await.expect("health");

    assert_eq!(health.status, "ok");
    assert!(health.message.contains("running"));
}

#[tokio::test]
async fn health_reports_non_success_status() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route("/", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = HttpPredictionClient::new(&format!("http://{addr}")).expect("client");

    let err = client.health().await.expect_err("unavailable");

    assert!(matches!(
        err,
        PredictError::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE
    ));
}
