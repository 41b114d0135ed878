use std::sync::Arc;

use crate::models::{AvailabilityContext, IntentLabel, InboundMessage};
use crate::nlu;
use crate::services::ai::Message;
use crate::state::AppState;

const FALLBACK_SYSTEM_PROMPT: &str = "You are a friendly assistant for an availability bot. \
The user manages their weekly availability by texting things like \"I'm free Monday 9-11am\", \
\"what's my availability\" or \"clear my Tuesday slots\". Answer the message conversationally \
and briefly; if they seem to want a scheduling change, tell them how to phrase it. \
Never claim to have changed their schedule yourself.";

/// Route one inbound message: classify, extract, act through the scheduling
/// API, and produce the reply text. All side effects happen here; the
/// understanding core stays pure.
pub async fn process_message(state: &Arc<AppState>, msg: &InboundMessage) -> anyhow::Result<String> {
    let Some(user) = state.scheduling.resolve_user(&msg.sender_id).await? else {
        tracing::info!(sender = %msg.sender_id, "unknown sender");
        return Ok(
            "I don't recognize this account yet. Please link it on the scheduling site first."
                .to_string(),
        );
    };

    let context = AvailabilityContext::new(state.scheduling.get_availability(&user.id).await?);

    let result = nlu::classify(&msg.text, Some(&context));
    tracing::info!(
        user = %user.id,
        intent = result.label.as_str(),
        confidence = ?result.confidence,
        evidence = ?result.evidence,
        "classified message"
    );

    match result.label {
        IntentLabel::AvailabilityQuery => {
            if context.is_empty() {
                Ok("You have no availability set right now.".to_string())
            } else {
                Ok(format!(
                    "Your current availability: {}",
                    context.to_human_readable()
                ))
            }
        }

        IntentLabel::AvailabilityUpdate => {
            let slots = nlu::extract_slots(&msg.text);
            if slots.is_empty() {
                return Ok(
                    "I couldn't work out the day and time. Try something like \"Monday 9-11am\"."
                        .to_string(),
                );
            }

            state.scheduling.add_slots(&user.id, &slots).await?;
            let listing = slots
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Ok(format!("Added to your availability: {listing}"))
        }

        IntentLabel::AvailabilityDeletion => match nlu::extract_deletion_criteria(&msg.text) {
            Some(criteria) => {
                let removed = state.scheduling.remove_slots(&user.id, &criteria).await?;
                if removed == 0 {
                    Ok("Nothing in your availability matched that.".to_string())
                } else {
                    let plural = if removed == 1 { "" } else { "s" };
                    Ok(format!("Removed {removed} slot{plural}."))
                }
            }
            // No recognizable criteria: only a full wipe the user spelled
            // out is allowed to proceed.
            None if nlu::requests_full_clear(&msg.text) => {
                state.scheduling.clear_availability(&user.id).await?;
                Ok("All of your availability has been cleared.".to_string())
            }
            None => Ok(
                "Which day or time should I remove? I won't clear anything without one."
                    .to_string(),
            ),
        },

        IntentLabel::SessionCancellation => {
            match state.scheduling.cancel_next_session(&user.id).await? {
                Some(description) => Ok(format!("Cancelled your session: {description}")),
                None => Ok("I don't see an upcoming session to cancel.".to_string()),
            }
        }

        IntentLabel::GeneralChat => {
            // Distinct marker so the fallback rate is measurable from logs.
            tracing::info!(user = %user.id, "no intent matched, deferring to chat fallback");
            chat_fallback(state, &msg.text).await
        }
    }
}

async fn chat_fallback(state: &Arc<AppState>, text: &str) -> anyhow::Result<String> {
    let messages = vec![Message {
        role: "user".to_string(),
        content: text.to_string(),
    }];

    match state.llm.chat(FALLBACK_SYSTEM_PROMPT, &messages).await {
        Ok(reply) => Ok(reply),
        Err(e) => {
            tracing::error!(error = %e, "chat fallback failed");
            Ok("Sorry, I didn't catch that. You can tell me things like \"I'm free Monday \
                9-11am\" or ask \"what's my availability\"."
                .to_string())
        }
    }
}
