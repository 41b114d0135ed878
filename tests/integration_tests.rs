use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use rosterbot::config::AppConfig;
use rosterbot::handlers;
use rosterbot::models::{DeletionCriteria, TimeSlot, User, Weekday};
use rosterbot::services::ai::{LlmProvider, Message};
use rosterbot::services::messaging::MessagingProvider;
use rosterbot::services::scheduling::SchedulingApi;
use rosterbot::state::AppState;

const KNOWN_PLATFORM_ID: &str = "4242";

// ── Mock Providers ──

struct MockScheduling {
    slots: Arc<Mutex<Vec<TimeSlot>>>,
    cleared: Arc<Mutex<bool>>,
}

impl MockScheduling {
    fn new(initial: Vec<TimeSlot>) -> Self {
        Self {
            slots: Arc::new(Mutex::new(initial)),
            cleared: Arc::new(Mutex::new(false)),
        }
    }
}

#[async_trait]
impl SchedulingApi for MockScheduling {
    async fn resolve_user(&self, platform_id: &str) -> anyhow::Result<Option<User>> {
        if platform_id == KNOWN_PLATFORM_ID {
            Ok(Some(User {
                id: "user-1".to_string(),
                display_name: "Jamie".to_string(),
                platform_id: platform_id.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_availability(&self, _user_id: &str) -> anyhow::Result<Vec<TimeSlot>> {
        Ok(self.slots.lock().unwrap().clone())
    }

    async fn add_slots(&self, _user_id: &str, slots: &[TimeSlot]) -> anyhow::Result<()> {
        self.slots.lock().unwrap().extend_from_slice(slots);
        Ok(())
    }

    async fn remove_slots(
        &self,
        _user_id: &str,
        criteria: &DeletionCriteria,
    ) -> anyhow::Result<usize> {
        let mut slots = self.slots.lock().unwrap();
        let before = slots.len();
        slots.retain(|s| !criteria.matches(s));
        Ok(before - slots.len())
    }

    async fn clear_availability(&self, _user_id: &str) -> anyhow::Result<()> {
        *self.cleared.lock().unwrap() = true;
        self.slots.lock().unwrap().clear();
        Ok(())
    }

    async fn cancel_next_session(&self, _user_id: &str) -> anyhow::Result<Option<String>> {
        Ok(Some("Tuesday 10:00 with Alex".to_string()))
    }
}

struct MockMessaging {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockMessaging {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl MessagingProvider for MockMessaging {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

struct MockLlm;

#[async_trait]
impl LlmProvider for MockLlm {
    async fn chat(&self, _system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(format!("chat reply: {last}"))
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        admin_token: "test-token".to_string(),
        telegram_bot_token: "bot-token".to_string(),
        telegram_webhook_secret: "".to_string(), // empty = skip secret validation
        scheduling_api_url: "http://localhost:8000/api".to_string(),
        scheduling_api_token: "api-token".to_string(),
        ollama_url: "http://localhost:11434".to_string(),
        ollama_model: "llama3.2".to_string(),
    }
}

struct TestApp {
    app: Router,
    slots: Arc<Mutex<Vec<TimeSlot>>>,
    cleared: Arc<Mutex<bool>>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

fn test_app_with(config: AppConfig, initial_slots: Vec<TimeSlot>) -> TestApp {
    let scheduling = MockScheduling::new(initial_slots);
    let slots = scheduling.slots.clone();
    let cleared = scheduling.cleared.clone();
    let messaging = MockMessaging::new();
    let sent = messaging.sent.clone();

    let state = Arc::new(AppState {
        config,
        scheduling: Box::new(scheduling),
        messaging: Box::new(messaging),
        llm: Box::new(MockLlm),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/telegram", post(handlers::webhook::telegram_webhook))
        .route(
            "/api/admin/availability/:platform_id",
            get(handlers::admin::get_availability),
        )
        .route("/api/admin/classify", post(handlers::admin::classify_preview))
        .with_state(state);

    TestApp {
        app,
        slots,
        cleared,
        sent,
    }
}

fn test_app(initial_slots: Vec<TimeSlot>) -> TestApp {
    test_app_with(test_config(), initial_slots)
}

fn telegram_update(from_id: &str, text: &str) -> serde_json::Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "from": { "id": from_id.parse::<i64>().unwrap() },
            "chat": { "id": from_id.parse::<i64>().unwrap() },
            "date": 1750000000,
            "text": text,
        }
    })
}

async fn post_update(app: &TestApp, from_id: &str, text: &str) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/telegram")
        .header("content-type", "application/json")
        .body(Body::from(telegram_update(from_id, text).to_string()))
        .unwrap();

    app.app.clone().oneshot(request).await.unwrap().status()
}

fn last_reply(app: &TestApp) -> String {
    app.sent
        .lock()
        .unwrap()
        .last()
        .map(|(_, body)| body.clone())
        .expect("no reply was sent")
}

fn monday_slot() -> TimeSlot {
    TimeSlot::new(Weekday::Monday, 9, 11).unwrap()
}

// ── Webhook flow ──

#[tokio::test]
async fn test_health() {
    let app = test_app(vec![]);
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_message_adds_slots() {
    let app = test_app(vec![]);
    let status = post_update(&app, KNOWN_PLATFORM_ID, "I'm free Monday 9-11am").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.slots.lock().unwrap().as_slice(), &[monday_slot()]);
    assert!(last_reply(&app).contains("Monday: 09:00-11:00"));
}

#[tokio::test]
async fn test_update_with_multiple_slots() {
    let app = test_app(vec![]);
    post_update(
        &app,
        KNOWN_PLATFORM_ID,
        "set my schedule for Monday 9-11am and Wednesday 6-8pm",
    )
    .await;

    let slots = app.slots.lock().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0], monday_slot());
    assert_eq!(slots[1], TimeSlot::new(Weekday::Wednesday, 18, 20).unwrap());
}

#[tokio::test]
async fn test_update_without_parsable_time_asks_for_clarification() {
    let app = test_app(vec![]);
    post_update(&app, KNOWN_PLATFORM_ID, "update my availability").await;

    assert!(app.slots.lock().unwrap().is_empty());
    assert!(last_reply(&app).contains("couldn't work out the day and time"));
}

#[tokio::test]
async fn test_query_returns_formatted_availability() {
    let app = test_app(vec![monday_slot()]);
    post_update(&app, KNOWN_PLATFORM_ID, "what's my availability?").await;

    let reply = last_reply(&app);
    assert!(reply.contains("Your current availability"));
    assert!(reply.contains("Monday: 09:00-11:00"));
}

#[tokio::test]
async fn test_query_with_no_slots() {
    let app = test_app(vec![]);
    post_update(&app, KNOWN_PLATFORM_ID, "show my availability").await;

    assert!(last_reply(&app).contains("no availability set"));
}

#[tokio::test]
async fn test_deletion_with_day_removes_matching_slots() {
    let app = test_app(vec![
        monday_slot(),
        TimeSlot::new(Weekday::Friday, 10, 12).unwrap(),
    ]);
    post_update(&app, KNOWN_PLATFORM_ID, "remove my monday slots").await;

    assert_eq!(app.slots.lock().unwrap().len(), 1);
    assert!(last_reply(&app).contains("Removed 1 slot"));
}

#[tokio::test]
async fn test_deletion_without_criteria_refuses_to_guess() {
    let app = test_app(vec![monday_slot()]);
    post_update(&app, KNOWN_PLATFORM_ID, "clear my schedule").await;

    // Nothing removed, nothing cleared; the bot asks instead.
    assert_eq!(app.slots.lock().unwrap().len(), 1);
    assert!(!*app.cleared.lock().unwrap());
    assert!(last_reply(&app).contains("Which day or time"));
}

#[tokio::test]
async fn test_explicit_full_clear_wipes_availability() {
    let app = test_app(vec![monday_slot()]);
    post_update(&app, KNOWN_PLATFORM_ID, "clear all my availability").await;

    assert!(*app.cleared.lock().unwrap());
    assert!(app.slots.lock().unwrap().is_empty());
    assert!(last_reply(&app).contains("cleared"));
}

#[tokio::test]
async fn test_clear_this_with_no_existing_slots_goes_to_chat() {
    // Contextual pronoun with an empty snapshot is not a deletion.
    let app = test_app(vec![]);
    post_update(&app, KNOWN_PLATFORM_ID, "clear this").await;

    assert!(!*app.cleared.lock().unwrap());
    assert!(last_reply(&app).starts_with("chat reply:"));
}

#[tokio::test]
async fn test_session_cancellation() {
    let app = test_app(vec![]);
    post_update(&app, KNOWN_PLATFORM_ID, "sorry, I can't make our session").await;

    assert!(last_reply(&app).contains("Tuesday 10:00 with Alex"));
}

#[tokio::test]
async fn test_small_talk_goes_to_chat_fallback() {
    let app = test_app(vec![]);
    post_update(&app, KNOWN_PLATFORM_ID, "hello there!").await;

    assert_eq!(last_reply(&app), "chat reply: hello there!");
}

#[tokio::test]
async fn test_unknown_sender_gets_link_prompt() {
    let app = test_app(vec![]);
    post_update(&app, "9999", "what's my availability").await;

    assert!(last_reply(&app).contains("don't recognize this account"));
}

#[tokio::test]
async fn test_non_text_update_is_acknowledged_and_dropped() {
    let app = test_app(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/telegram")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "update_id": 2, "message": { "message_id": 11, "chat": { "id": 1 } } })
                .to_string(),
        ))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_secret_mismatch_is_rejected() {
    let mut config = test_config();
    config.telegram_webhook_secret = "s3cret".to_string();
    let app = test_app_with(config, vec![]);

    let request = Request::builder()
        .method("POST")
        .uri("/webhook/telegram")
        .header("content-type", "application/json")
        .header("x-telegram-bot-api-secret-token", "wrong")
        .body(Body::from(
            telegram_update(KNOWN_PLATFORM_ID, "hi").to_string(),
        ))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.sent.lock().unwrap().is_empty());
}

// ── Admin surface ──

#[tokio::test]
async fn test_admin_classify_preview() {
    let app = test_app(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/classify")
        .header("content-type", "application/json")
        .header("authorization", "Bearer test-token")
        .body(Body::from(
            json!({ "text": "I'm free Monday 9-11am" }).to_string(),
        ))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["intent"]["label"], "availability_update");
    assert_eq!(body["intent"]["confidence"], "high");
    assert_eq!(body["slots"][0]["day"], "monday");
    assert_eq!(body["slots"][0]["start_hour"], 9);
}

#[tokio::test]
async fn test_admin_classify_requires_token() {
    let app = test_app(vec![]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/classify")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "hello" }).to_string()))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_availability_unknown_user_is_404() {
    let app = test_app(vec![]);
    let request = Request::builder()
        .uri("/api/admin/availability/9999")
        .header("authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
