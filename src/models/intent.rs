use serde::{Deserialize, Serialize};

/// Closed set of actions the bot knows how to route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    AvailabilityQuery,
    AvailabilityUpdate,
    AvailabilityDeletion,
    SessionCancellation,
    GeneralChat,
}

impl IntentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::AvailabilityQuery => "availability_query",
            IntentLabel::AvailabilityUpdate => "availability_update",
            IntentLabel::AvailabilityDeletion => "availability_deletion",
            IntentLabel::SessionCancellation => "session_cancellation",
            IntentLabel::GeneralChat => "general_chat",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Outcome of classifying one message: the label, how sure we are, and the
/// phrase that triggered the decision (absent for the no-match default).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentResult {
    pub label: IntentLabel,
    pub confidence: Confidence,
    pub evidence: Option<String>,
}

impl IntentResult {
    /// The no-match default: generic chat, low confidence, no evidence.
    pub fn fallback() -> Self {
        Self {
            label: IntentLabel::GeneralChat,
            confidence: Confidence::Low,
            evidence: None,
        }
    }
}
