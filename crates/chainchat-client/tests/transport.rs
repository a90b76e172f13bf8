//! Transport tests against a local axum server.

use axum::Router;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::{get, post};
use chainchat_client::{ClientConfig, ReqwestTransport};
use chainchat_core::{
    BackendRequest, ChatError, ServiceId, ServiceRegistry, ServiceTransport, normalize,
};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_backend() -> String {
    let app = Router::new()
        .route(
            "/api/v1/ai-chain/chat/answer",
            post(|Json(body): Json<Value>| async move {
                let message = body["message"].as_str().unwrap_or_default().to_string();
                Json(json!({"answer": {"response": format!("echo: {message}")}}))
            }),
        )
        .route(
            "/api/v1/health",
            get(|| async { Json(json!({"status": "UP", "success": true})) }),
        )
        .route(
            "/api/v1/ai-chain/sentiment/analyze",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        )
        .route(
            "/api/v1/ai-chain/embedding/new-store",
            post(|| async { "store created" }),
        )
        .route(
            "/api/v1/ai-chain/image/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"imageUrl": "http://img/late.png"}))
            }),
        )
        .route(
            "/api/v1/ai-chain/chat/answer-with-memory",
            post(|| async { StatusCode::OK }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

fn transport(base: &str) -> ReqwestTransport {
    ReqwestTransport::new(
        &ClientConfig::new()
            .with_base_url(base)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn request(id: ServiceId, body: Value) -> BackendRequest {
    let registry = ServiceRegistry::with_defaults();
    BackendRequest::new(registry.resolve(id).unwrap(), body)
}

#[tokio::test]
async fn post_sends_json_payload() {
    let base = spawn_backend().await;
    let reply = transport(&base)
        .send(request(ServiceId::ChatAnswer, json!({"message": "ping"})))
        .await
        .unwrap();

    assert_eq!(reply, json!({"answer": {"response": "echo: ping"}}));
    assert_eq!(normalize(Some(&reply), "chat-answer").content, "echo: ping");
}

#[tokio::test]
async fn health_check_uses_get() {
    let base = spawn_backend().await;
    let reply = transport(&base)
        .send(request(ServiceId::HealthCheck, json!({})))
        .await
        .unwrap();

    assert_eq!(reply["status"], "UP");
}

#[tokio::test]
async fn error_status_becomes_backend_error() {
    let base = spawn_backend().await;
    let err = transport(&base)
        .send(request(ServiceId::SentimentAnalyze, json!({"text": "x"})))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ChatError::Backend {
            status: 500,
            body: "model crashed".to_string(),
        }
    );
}

#[tokio::test]
async fn unknown_route_is_a_404() {
    let base = spawn_backend().await;
    let err = transport(&base)
        .send(request(ServiceId::ImageRead, json!({"prompt": "bogie"})))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Backend { status: 404, .. }));
}

#[tokio::test]
async fn plain_text_body_is_kept_as_string() {
    let base = spawn_backend().await;
    let reply = transport(&base)
        .send(request(ServiceId::EmbeddingNewStore, json!({"storeName": "bogies"})))
        .await
        .unwrap();

    assert_eq!(reply, Value::String("store created".to_string()));
}

#[tokio::test]
async fn empty_body_is_null() {
    let base = spawn_backend().await;
    let reply = transport(&base)
        .send(request(ServiceId::ChatAnswerMemory, json!({"message": "hi"})))
        .await
        .unwrap();

    assert_eq!(reply, Value::Null);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(&format!("http://{addr}/api/v1"))
        .send(request(ServiceId::HealthCheck, json!({})))
        .await
        .unwrap_err();

    match err {
        ChatError::Transport { message } => assert!(message.contains("could not connect")),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_backend_is_a_timeout() {
    let base = spawn_backend().await;
    let transport = ReqwestTransport::new(
        &ClientConfig::new()
            .with_base_url(base)
            .with_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = transport
        .send(request(ServiceId::ImageGenerate, json!({"prompt": "bogie"})))
        .await
        .unwrap_err();

    match err {
        ChatError::Transport { message } => assert!(message.contains("timed out")),
        other => panic!("expected a timeout, got {other:?}"),
    }
}
