use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Accepts full names and common abbreviations, case-insensitive.
    pub fn parse(s: &str) -> Option<Weekday> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Some(Weekday::Monday),
            "tuesday" | "tue" | "tues" => Some(Weekday::Tuesday),
            "wednesday" | "wed" | "weds" => Some(Weekday::Wednesday),
            "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thursday),
            "friday" | "fri" => Some(Weekday::Friday),
            "saturday" | "sat" => Some(Weekday::Saturday),
            "sunday" | "sun" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One availability interval. Only constructed through [`TimeSlot::new`],
/// which rejects out-of-range hours and empty/inverted intervals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub day: Weekday,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl TimeSlot {
    pub fn new(day: Weekday, start_hour: u8, end_hour: u8) -> Option<TimeSlot> {
        if start_hour > 23 || end_hour > 23 || end_hour <= start_hour {
            return None;
        }
        Some(TimeSlot {
            day,
            start_hour,
            end_hour,
        })
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:02}:00-{:02}:00",
            self.day.display_name(),
            self.start_hour,
            self.end_hour
        )
    }
}

/// Read-only snapshot of a user's current slots, supplied by the caller per
/// message. Used only to disambiguate contextual phrases like "clear this".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityContext {
    pub slots: Vec<TimeSlot>,
}

impl AvailabilityContext {
    pub fn new(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn to_human_readable(&self) -> String {
        if self.slots.is_empty() {
            return String::new();
        }

        let mut sorted = self.slots.clone();
        sorted.sort_by_key(|s| (s.day, s.start_hour));

        sorted
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Partial filter matching existing slots for removal. At least one field is
/// set on every value the extractor returns; "nothing recognized" is `None`
/// at the call site, never an all-empty criteria.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletionCriteria {
    pub day: Option<Weekday>,
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
}

impl DeletionCriteria {
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.start_hour.is_none() && self.end_hour.is_none()
    }

    /// True when `slot` falls inside this filter. A missing field matches
    /// anything; a time range matches slots fully contained in it.
    pub fn matches(&self, slot: &TimeSlot) -> bool {
        if let Some(day) = self.day {
            if slot.day != day {
                return false;
            }
        }
        if let Some(start) = self.start_hour {
            if slot.start_hour < start {
                return false;
            }
        }
        if let Some(end) = self.end_hour {
            if slot.end_hour > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse_full_names() {
        assert_eq!(Weekday::parse("Monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("sunday"), Some(Weekday::Sunday));
        assert_eq!(Weekday::parse("WEDNESDAY"), Some(Weekday::Wednesday));
    }

    #[test]
    fn test_weekday_parse_abbreviations() {
        assert_eq!(Weekday::parse("mon"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("tues"), Some(Weekday::Tuesday));
        assert_eq!(Weekday::parse("thurs"), Some(Weekday::Thursday));
        assert_eq!(Weekday::parse("Sat"), Some(Weekday::Saturday));
    }

    #[test]
    fn test_weekday_parse_invalid() {
        assert_eq!(Weekday::parse("someday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_slot_new_valid() {
        let slot = TimeSlot::new(Weekday::Monday, 9, 11).unwrap();
        assert_eq!(slot.start_hour, 9);
        assert_eq!(slot.end_hour, 11);
    }

    #[test]
    fn test_slot_new_rejects_inverted() {
        assert!(TimeSlot::new(Weekday::Monday, 11, 9).is_none());
        assert!(TimeSlot::new(Weekday::Monday, 9, 9).is_none());
    }

    #[test]
    fn test_slot_new_rejects_out_of_range() {
        assert!(TimeSlot::new(Weekday::Monday, 9, 24).is_none());
        assert!(TimeSlot::new(Weekday::Monday, 25, 26).is_none());
    }

    #[test]
    fn test_context_human_readable_sorted_by_day() {
        let ctx = AvailabilityContext::new(vec![
            TimeSlot::new(Weekday::Friday, 10, 16).unwrap(),
            TimeSlot::new(Weekday::Monday, 9, 17).unwrap(),
        ]);
        assert_eq!(
            ctx.to_human_readable(),
            "Monday: 09:00-17:00, Friday: 10:00-16:00"
        );
    }

    #[test]
    fn test_context_human_readable_empty() {
        assert_eq!(AvailabilityContext::default().to_human_readable(), "");
    }

    #[test]
    fn test_criteria_matches_day_only() {
        let c = DeletionCriteria {
            day: Some(Weekday::Monday),
            ..Default::default()
        };
        assert!(c.matches(&TimeSlot::new(Weekday::Monday, 6, 9).unwrap()));
        assert!(!c.matches(&TimeSlot::new(Weekday::Tuesday, 6, 9).unwrap()));
    }

    #[test]
    fn test_criteria_matches_time_range() {
        let c = DeletionCriteria {
            day: Some(Weekday::Monday),
            start_hour: Some(6),
            end_hour: Some(9),
        };
        assert!(c.matches(&TimeSlot::new(Weekday::Monday, 6, 9).unwrap()));
        assert!(c.matches(&TimeSlot::new(Weekday::Monday, 7, 8).unwrap()));
        assert!(!c.matches(&TimeSlot::new(Weekday::Monday, 5, 9).unwrap()));
        assert!(!c.matches(&TimeSlot::new(Weekday::Monday, 6, 10).unwrap()));
    }
}
