//! Slot extraction for messages already classified as availability updates
//! or deletions. Text is partitioned into day-scoped segments on weekday
//! tokens; within each segment an ordered set of time matchers runs, numeric
//! ranges before daypart words.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::models::{DeletionCriteria, TimeSlot, Weekday};
use crate::nlu::text::{contains_word, normalize};

/// Daypart words and the fixed hour ranges they map to. Applied only when a
/// segment carries no numeric time at all.
pub(crate) const DAYPARTS: &[(&str, u8, u8)] = &[
    ("morning", 6, 12),
    ("afternoon", 12, 17),
    ("evening", 17, 21),
];

fn re_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:mondays?|tuesdays?|wednesdays?|thursdays?|fridays?|saturdays?|sundays?|tues|thurs|thur|weds|mon|tue|wed|thu|fri|sat|sun)\b",
        )
        .unwrap()
    })
}

// Hour ranges in all the accepted shapes: "9:00am-11:30am", "9-11am",
// "09:00-17:00", "6-9". Minutes are captured but dropped; slots are
// hour-granular.
fn re_time_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*(?:-|–|to|until)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
        )
        .unwrap()
    })
}

// A single clock time ("3pm", "14:30"): a classification signal only,
// never enough to build a slot.
fn re_clock() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}\b|\b\d{1,2}\s*(?:am|pm)\b").unwrap())
}

fn day_from_token(token: &str) -> Option<Weekday> {
    Weekday::parse(token).or_else(|| Weekday::parse(token.strip_suffix('s').unwrap_or(token)))
}

/// `pm` lifts 1-11 by twelve and leaves 12 alone; `am` folds 12 to 0. A
/// meridiem on an hour outside 1-12 invalidates the candidate. Without a
/// meridiem the hour is read as 24-hour and must stay below 24.
fn apply_meridiem(hour: u8, meridiem: Option<&str>) -> Option<u8> {
    match meridiem {
        Some("pm") => match hour {
            12 => Some(12),
            1..=11 => Some(hour + 12),
            _ => None,
        },
        Some("am") => match hour {
            12 => Some(0),
            1..=11 => Some(hour),
            _ => None,
        },
        _ => (hour <= 23).then_some(hour),
    }
}

/// Normalize one regex match into a start/end hour pair, or discard it. A
/// trailing meridiem with none on the start hour is shared ("9-11am" reads
/// as 9am-11am). Candidates that end at or before their start are dropped
/// silently.
fn resolve_range(caps: &Captures) -> Option<(u8, u8)> {
    let start_raw: u8 = caps[1].parse().ok()?;
    let end_raw: u8 = caps[4].parse().ok()?;

    let start_meridiem = caps.get(3).map(|m| m.as_str());
    let end_meridiem = caps.get(6).map(|m| m.as_str());
    let start_meridiem = start_meridiem.or(end_meridiem);

    let start = apply_meridiem(start_raw, start_meridiem)?;
    let end = apply_meridiem(end_raw, end_meridiem)?;

    (end > start).then_some((start, end))
}

/// All valid hour ranges in one day-scoped segment. Numeric matches win over
/// daypart words; dayparts apply only when the segment has no numeric time.
fn time_ranges(segment: &str) -> Vec<(u8, u8)> {
    let numeric: Vec<Captures> = re_time_range().captures_iter(segment).collect();
    if numeric.is_empty() {
        return DAYPARTS
            .iter()
            .filter(|(word, _, _)| contains_word(segment, word))
            .map(|(_, start, end)| (*start, *end))
            .collect();
    }
    numeric.iter().filter_map(resolve_range).collect()
}

/// Extract every (day, start, end) slot from free-form text, in message
/// order. A day token with no recognizable time contributes nothing; an
/// unattributed time with no day token contributes nothing.
pub fn extract_slots(text: &str) -> Vec<TimeSlot> {
    let normalized = normalize(text);

    let days: Vec<(Weekday, usize, usize)> = re_day()
        .find_iter(&normalized)
        .filter_map(|m| day_from_token(m.as_str()).map(|d| (d, m.start(), m.end())))
        .collect();

    let mut slots = Vec::new();
    for (i, (day, _, token_end)) in days.iter().enumerate() {
        let seg_end = days
            .get(i + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(normalized.len());
        let segment = &normalized[*token_end..seg_end];
        for (start, end) in time_ranges(segment) {
            if let Some(slot) = TimeSlot::new(*day, start, end) {
                slots.push(slot);
            }
        }
    }
    slots
}

/// Extract a partial deletion filter: the first day token and/or the first
/// valid time range found anywhere in the text. `None` means neither was
/// found; that is the caller's cue to refuse a destructive reading rather
/// than guess.
pub fn extract_deletion_criteria(text: &str) -> Option<DeletionCriteria> {
    let normalized = normalize(text);

    let day = re_day()
        .find(&normalized)
        .and_then(|m| day_from_token(m.as_str()));

    let numeric: Vec<Captures> = re_time_range().captures_iter(&normalized).collect();
    let range = if numeric.is_empty() {
        DAYPARTS
            .iter()
            .find(|(word, _, _)| contains_word(&normalized, word))
            .map(|(_, start, end)| (*start, *end))
    } else {
        numeric.iter().find_map(resolve_range)
    };

    let (start_hour, end_hour) = match range {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    let criteria = DeletionCriteria {
        day,
        start_hour,
        end_hour,
    };
    (!criteria.is_empty()).then_some(criteria)
}

/// Whether the text carries any time signal at all, a range or a lone
/// clock time. Classification signal only.
pub(crate) fn has_time_pattern(text: &str) -> bool {
    re_time_range().is_match(text) || re_clock().is_match(text)
}

/// First weekday token in the text, if any.
pub(crate) fn first_day_token(text: &str) -> Option<Weekday> {
    re_day()
        .find(text)
        .and_then(|m| day_from_token(m.as_str()))
}
