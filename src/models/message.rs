use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbound message as handed over by the transport adapter. Immutable;
/// consumed once by the classifier and discarded after dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub sender_id: String,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            text: text.into(),
            timestamp: None,
        }
    }
}
