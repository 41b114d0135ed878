//! Keyword-cascade intent classifier. Rules live in one ordered table and
//! are evaluated first-match-wins, so deletion phrasing always beats update
//! phrasing that happens to share the same text.

use crate::models::{AvailabilityContext, Confidence, IntentLabel, IntentResult};
use crate::nlu::extractor::{first_day_token, has_time_pattern, DAYPARTS};
use crate::nlu::text::{contains_word, normalize};

const DELETION_VERBS: &[&str] = &["clear", "delete", "remove", "cancel", "reset"];

// "session" sits here, not in the booking nouns: a session slot is schedule
// data, so "delete my monday session" is an availability deletion.
const DELETION_SCOPE_NOUNS: &[&str] = &["availability", "schedule", "session", "slot", "slots"];

// Contextual pronouns only count when the user has something to point at.
const CONTEXT_PRONOUNS: &[&str] = &["this", "it", "all", "everything"];

const UPDATE_NOUNS: &[&str] = &["availability", "schedule", "slot", "slots"];

const UPDATE_PHRASES: &[&str] = &[
    "i'm free",
    "im free",
    "i am free",
    "i'm available",
    "im available",
    "i am available",
    "set me available",
    "set my availability",
    "add availability",
    "update my availability",
];

/// Canonical query phrases, matched as substrings of the normalized text.
/// Deliberately enumerable rather than keyword-based so casual mentions of
/// "schedule" in unrelated chat do not trip the query path.
const QUERY_PHRASES: &[&str] = &[
    "what's my availability",
    "whats my availability",
    "show my availability",
    "check my availability",
    "view my availability",
    "see my availability",
    "list my availability",
    "my available times",
    "available this week",
    "when am i available",
    "when am i free",
    "what's my schedule",
    "display my schedule",
    "my schedule",
    "exact dates and times",
    "exact dates",
    "exact times",
];

// Booked-session language that is not schedule data: handled by the session
// cancellation path, after the deletion group has had its chance.
const BOOKING_NOUNS: &[&str] = &["booking", "appointment", "lesson"];

const SESSION_REGRET_PHRASES: &[&str] = &[
    "can't make",
    "cant make",
    "cannot make",
    "won't make",
    "wont make",
    "call off",
];

type Matcher = fn(&str, &AvailabilityContext) -> Option<String>;

struct Rule {
    label: IntentLabel,
    confidence: Confidence,
    matcher: Matcher,
}

// Most specific first; evaluation stops at the first hit.
static RULES: [Rule; 5] = [
    Rule {
        label: IntentLabel::AvailabilityDeletion,
        confidence: Confidence::High,
        matcher: match_deletion,
    },
    Rule {
        label: IntentLabel::AvailabilityUpdate,
        confidence: Confidence::High,
        matcher: match_update,
    },
    Rule {
        label: IntentLabel::AvailabilityQuery,
        confidence: Confidence::High,
        matcher: match_query,
    },
    Rule {
        label: IntentLabel::SessionCancellation,
        confidence: Confidence::High,
        matcher: match_session_cancellation,
    },
    Rule {
        label: IntentLabel::AvailabilityUpdate,
        confidence: Confidence::Medium,
        matcher: match_bare_day,
    },
];

/// Classify one message. Total for any input: empty or unmatchable text
/// falls back to `general_chat` at `low` confidence, never an error.
pub fn classify(text: &str, context: Option<&AvailabilityContext>) -> IntentResult {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return IntentResult::fallback();
    }

    let empty = AvailabilityContext::default();
    let ctx = context.unwrap_or(&empty);

    for rule in &RULES {
        if let Some(evidence) = (rule.matcher)(&normalized, ctx) {
            return IntentResult {
                label: rule.label,
                confidence: rule.confidence,
                evidence: Some(evidence),
            };
        }
    }

    IntentResult::fallback()
}

/// Whether a deletion-intent message explicitly asked for a full wipe.
/// Callers use this to separate "clear everything" from a deletion request
/// whose criteria simply weren't recognized.
pub fn requests_full_clear(text: &str) -> bool {
    let normalized = normalize(text);
    contains_word(&normalized, "everything") || contains_word(&normalized, "all")
}

fn match_deletion(text: &str, ctx: &AvailabilityContext) -> Option<String> {
    let verb = DELETION_VERBS.iter().find(|v| contains_word(text, v))?;

    if let Some(noun) = DELETION_SCOPE_NOUNS.iter().find(|n| contains_word(text, n)) {
        return Some(format!("{verb} {noun}"));
    }

    if !ctx.is_empty() {
        if let Some(pronoun) = CONTEXT_PRONOUNS.iter().find(|p| contains_word(text, p)) {
            return Some(format!("{verb} {pronoun}"));
        }
    }

    None
}

fn match_update(text: &str, _ctx: &AvailabilityContext) -> Option<String> {
    if let Some(phrase) = UPDATE_PHRASES.iter().find(|p| text.contains(*p)) {
        return Some(phrase.to_string());
    }

    let noun = UPDATE_NOUNS.iter().find(|n| contains_word(text, n))?;
    if let Some(day) = first_day_token(text) {
        return Some(format!("{noun} {day}"));
    }
    if has_time_pattern(text) {
        return Some(format!("{noun} + time"));
    }
    if let Some((word, _, _)) = DAYPARTS.iter().find(|(w, _, _)| contains_word(text, w)) {
        return Some(format!("{noun} {word}"));
    }

    None
}

fn match_query(text: &str, _ctx: &AvailabilityContext) -> Option<String> {
    QUERY_PHRASES
        .iter()
        .find(|p| text.contains(*p))
        .map(|p| p.to_string())
}

fn match_session_cancellation(text: &str, _ctx: &AvailabilityContext) -> Option<String> {
    let has_session_word = contains_word(text, "session")
        || BOOKING_NOUNS.iter().any(|n| contains_word(text, n));

    if has_session_word {
        if let Some(phrase) = SESSION_REGRET_PHRASES.iter().find(|p| text.contains(*p)) {
            return Some(phrase.to_string());
        }
    }

    let verb = DELETION_VERBS.iter().find(|v| contains_word(text, v))?;
    let noun = BOOKING_NOUNS.iter().find(|n| contains_word(text, n))?;
    Some(format!("{verb} {noun}"))
}

fn match_bare_day(text: &str, _ctx: &AvailabilityContext) -> Option<String> {
    first_day_token(text).map(|d| d.as_str().to_string())
}
