//! Integration tests for the chat HTTP API.
//!
//! The router is wired the way the binary wires it: bundled catalog files,
//! simulated payments and a JSON Lines order log in a temp directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::timeout::TimeoutLayer;

use shoe_concierge::adapters::catalog::JsonCatalog;
use shoe_concierge::adapters::composer::TemplateReplyComposer;
use shoe_concierge::adapters::http::{chat_routes, ChatHandlers};
use shoe_concierge::adapters::orders::{InMemoryOrderRecorder, JsonOrderRecorder};
use shoe_concierge::adapters::payment::{MockPaymentProcessor, SimulatedPaymentProcessor};
use shoe_concierge::adapters::storage::InMemorySessionStore;
use shoe_concierge::application::{ConversationService, ConversationSettings, PlaceOrderHandler};
use shoe_concierge::ports::{CollaboratorError, OrderRecord, OrderRecorder, RecordAck};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

struct Api {
    router: Router,
    recorder: Arc<JsonOrderRecorder>,
    _dir: tempfile::TempDir,
}

fn api(decline_payments: bool) -> Api {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(JsonCatalog::new(
        data_file("products.json"),
        data_file("inventory.json"),
    ));
    let recorder = Arc::new(JsonOrderRecorder::new(dir.path().join("orders.jsonl")));
    let orders = PlaceOrderHandler::new(
        catalog.clone(),
        Arc::new(SimulatedPaymentProcessor::with_decline_all(decline_payments)),
        recorder.clone(),
        "UPI",
        Duration::from_secs(2),
    );
    let service = ConversationService::new(
        Arc::new(InMemorySessionStore::new()),
        catalog,
        Arc::new(TemplateReplyComposer::new()),
        orders,
        ConversationSettings::default(),
    );
    Api {
        router: chat_routes(ChatHandlers::new(Arc::new(service))),
        recorder,
        _dir: dir,
    }
}

/// Records orders only after a fixed delay.
#[derive(Clone)]
struct SlowRecorder {
    inner: InMemoryOrderRecorder,
    delay: Duration,
}

#[async_trait]
impl OrderRecorder for SlowRecorder {
    async fn record_order(&self, order: OrderRecord) -> Result<RecordAck, CollaboratorError> {
        tokio::time::sleep(self.delay).await;
        self.inner.record_order(order).await
    }
}

struct TimedApi {
    router: Router,
    payments: MockPaymentProcessor,
    orders: InMemoryOrderRecorder,
}

/// Router behind a request timeout shorter than the order recorder's delay.
fn timed_api(request_timeout: Duration, record_delay: Duration) -> TimedApi {
    let catalog = Arc::new(JsonCatalog::new(
        data_file("products.json"),
        data_file("inventory.json"),
    ));
    let payments = MockPaymentProcessor::new();
    let orders = InMemoryOrderRecorder::new();
    let recorder = SlowRecorder {
        inner: orders.clone(),
        delay: record_delay,
    };
    let call_timeout = Duration::from_millis(500);
    let handler = PlaceOrderHandler::new(
        catalog.clone(),
        Arc::new(payments.clone()),
        Arc::new(recorder),
        "UPI",
        call_timeout,
    );
    let service = ConversationService::new(
        Arc::new(InMemorySessionStore::new()),
        catalog,
        Arc::new(TemplateReplyComposer::new()),
        handler,
        ConversationSettings {
            page_size: 3,
            call_timeout,
        },
    );
    TimedApi {
        router: chat_routes(ChatHandlers::new(Arc::new(service)))
            .layer(TimeoutLayer::new(request_timeout)),
        payments,
        orders,
    }
}

async fn send_to(router: &Router, chat: &str, text: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/chats/{}/messages", chat))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": text }).to_string()))
        .unwrap();
    call_router(router, request).await
}

async fn session_of(router: &Router, chat: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/api/chats/{}/session", chat))
        .body(Body::empty())
        .unwrap();
    call_router(router, request).await
}

async fn call_router(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

impl Api {
    async fn send(&self, chat: &str, text: &str) -> (StatusCode, Value) {
        send_to(&self.router, chat, text).await
    }

    async fn session(&self, chat: &str) -> (StatusCode, Value) {
        session_of(&self.router, chat).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        call_router(&self.router, request).await
    }
}

fn cards(body: &Value) -> Vec<&Value> {
    body["replies"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["type"] == "productCard")
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_order_over_http() {
    let api = api(false);

    let (status, body) = api.send("web-1", "sports shoes for men").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "showingProducts");
    let shown = cards(&body);
    assert_eq!(shown.len(), 3);
    assert!(shown[1]["caption"].as_str().unwrap().contains("Velocity Runner"));
    assert!(shown[0]["image"].as_str().unwrap().starts_with("https://"));

    let (_, body) = api.send("web-1", "2").await;
    assert_eq!(body["stage"], "getSize");

    let (status, session) = api.session("web-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["selection"]["sku"], "SPT-102");
    assert_eq!(session["shownCount"], 3);

    api.send("web-1", "9").await;
    let (_, body) = api.send("web-1", "12 Park Street, 700016").await;
    assert_eq!(body["stage"], "confirmOrder");

    let (_, body) = api.send("web-1", "yes").await;
    assert_eq!(body["stage"], "footwearType");
    assert!(body["replies"][0]["text"]
        .as_str()
        .unwrap()
        .contains("is confirmed"));

    let (status, _) = api.session("web-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(api.recorder.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn declined_payment_keeps_order_for_retry() {
    let api = api(true);
    for text in ["boots for women", "1", "7", "Rose Villa 122001"] {
        api.send("web-2", text).await;
    }

    let (_, body) = api.send("web-2", "yes").await;
    assert_eq!(body["stage"], "confirmOrder");

    let (status, session) = api.session("web-2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["pincode"], "122001");
    assert!(api.recorder.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_stock_item_resets_chat() {
    let api = api(false);
    // SPT-104 (first on the second page for men) has no stock in the bundled inventory.
    for text in ["sports shoes for men", "more", "1", "8", "Hill Road 400050"] {
        api.send("web-3", text).await;
    }

    let (_, body) = api.send("web-3", "yes").await;
    assert_eq!(body["stage"], "footwearType");
    assert!(body["replies"][0]["text"]
        .as_str()
        .unwrap()
        .contains("out of stock"));
    assert!(api.recorder.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn restart_endpoint_and_command_clear_session() {
    let api = api(false);
    api.send("web-4", "formal shoes").await;
    let (status, _) = api.session("web-4").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = api.send("web-4", "/start").await;
    assert_eq!(body["stage"], "footwearType");
    let (status, _) = api.session("web-4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    api.send("web-4", "formal shoes").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/chats/web-4/restart")
        .body(Body::empty())
        .unwrap();
    let (status, body) = api.call(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "footwearType");
    assert_eq!(api.session("web-4").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let api = api(false);
    let (status, body) = api.send("web-5", "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn timed_out_confirmation_still_completes_the_order_once() {
    let api = timed_api(Duration::from_millis(300), Duration::from_millis(400));
    for text in ["sports shoes for men", "2", "9", "12 Park Street, 700016"] {
        let (status, _) = send_to(&api.router, "web-6", text).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = send_to(&api.router, "web-6", "yes").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    tokio::time::timeout(Duration::from_secs(2), async {
        while api.orders.orders().is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("order recorded after the request timed out");

    assert_eq!(api.payments.call_count(), 1);
    assert_eq!(session_of(&api.router, "web-6").await.0, StatusCode::NOT_FOUND);

    let (status, body) = send_to(&api.router, "web-6", "yes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "footwearType");
    assert_eq!(api.payments.call_count(), 1);
    assert_eq!(api.orders.orders().len(), 1);
}
