use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::DateTime;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::InboundMessage;
use crate::services::dispatch;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TelegramUpdate {
    pub message: Option<TelegramMessage>,
}

#[derive(Deserialize)]
pub struct TelegramMessage {
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
    pub date: Option<i64>,
}

#[derive(Deserialize)]
pub struct TelegramUser {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<TelegramUpdate>,
) -> Response {
    // Validate the shared webhook secret (skip if unset, dev mode)
    if !state.config.telegram_webhook_secret.is_empty() {
        let token = headers
            .get("x-telegram-bot-api-secret-token")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if token != state.config.telegram_webhook_secret {
            tracing::warn!("webhook secret token mismatch");
            return AppError::Unauthorized.into_response();
        }
    }

    // Non-message updates and non-text messages are acknowledged and dropped.
    let Some(message) = update.message else {
        return StatusCode::OK.into_response();
    };
    let (Some(from), Some(text)) = (message.from, message.text) else {
        return StatusCode::OK.into_response();
    };

    let chat_id = message.chat.id.to_string();
    let mut msg = InboundMessage::new(from.id.to_string(), text);
    msg.timestamp = message.date.and_then(|d| DateTime::from_timestamp(d, 0));

    tracing::info!(from = %msg.sender_id, text = %msg.text, "incoming message");

    match dispatch::process_message(&state, &msg).await {
        Ok(reply) => {
            if let Err(e) = state.messaging.send_message(&chat_id, &reply).await {
                tracing::error!(error = %e, "failed to send reply");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, from = %msg.sender_id, "message processing failed");
            let fallback = "Sorry, I'm having trouble right now. Please try again in a moment.";
            let _ = state.messaging.send_message(&chat_id, fallback).await;
        }
    }

    // Always 200 so the platform does not redeliver the update.
    StatusCode::OK.into_response()
}
