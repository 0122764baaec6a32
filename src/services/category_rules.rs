//! Static mapping from attendee category to the actions allowed per event day.
//!
//! Categories normalize case-insensitively and through the badge-prefix
//! abbreviations (al, fl, vl, stu, pr, ot) before lookup, so "AL", "Alumni"
//! and "alumni" are the same category. Unknown strings simply map to no
//! permitted actions.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendeeType {
    Alumni,
    Faculty,
    Volunteer,
    Student,
    Press,
    Other,
}

impl AttendeeType {
    pub const ALL: [AttendeeType; 6] = [
        AttendeeType::Alumni,
        AttendeeType::Faculty,
        AttendeeType::Volunteer,
        AttendeeType::Student,
        AttendeeType::Press,
        AttendeeType::Other,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "alumni" | "al" => Some(AttendeeType::Alumni),
            "faculty" | "fl" => Some(AttendeeType::Faculty),
            "volunteer" | "vl" => Some(AttendeeType::Volunteer),
            "student" | "stu" => Some(AttendeeType::Student),
            "press" | "pr" => Some(AttendeeType::Press),
            "other" | "ot" => Some(AttendeeType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeType::Alumni => "alumni",
            AttendeeType::Faculty => "faculty",
            AttendeeType::Volunteer => "volunteer",
            AttendeeType::Student => "student",
            AttendeeType::Press => "press",
            AttendeeType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendeeType::Alumni => "Alumni",
            AttendeeType::Faculty => "Faculty",
            AttendeeType::Volunteer => "Volunteer",
            AttendeeType::Student => "Student",
            AttendeeType::Press => "Press",
            AttendeeType::Other => "Other",
        }
    }

    /// Prefix used for the sequential attendee codes (AL-007 etc).
    pub fn code_prefix(&self) -> &'static str {
        match self {
            AttendeeType::Alumni => "AL",
            AttendeeType::Faculty => "FL",
            AttendeeType::Volunteer => "VL",
            AttendeeType::Student => "STU",
            AttendeeType::Press => "PR",
            AttendeeType::Other => "OT",
        }
    }
}

/// Guess the category from the prefix of a scanned code ("AL-0123" -> alumni).
/// Used only to prefill the registration form for an unknown code.
pub fn type_for_scan_code(code: &str) -> Option<AttendeeType> {
    let prefix = code.split('-').next().unwrap_or_default();
    AttendeeType::parse(prefix)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    Entrance,
    Lunch,
    Dinner,
    Kit,
}

impl EventAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "entrance" => Some(EventAction::Entrance),
            "lunch" => Some(EventAction::Lunch),
            "dinner" => Some(EventAction::Dinner),
            "kit" => Some(EventAction::Kit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Entrance => "entrance",
            EventAction::Lunch => "lunch",
            EventAction::Dinner => "dinner",
            EventAction::Kit => "kit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventAction::Entrance => "Entrance",
            EventAction::Lunch => "Lunch",
            EventAction::Dinner => "Dinner",
            EventAction::Kit => "Kit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventDay {
    Day1,
    Day2,
}

impl EventDay {
    pub fn parse(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(EventDay::Day1),
            2 => Some(EventDay::Day2),
            _ => None,
        }
    }

    pub fn number(&self) -> i64 {
        match self {
            EventDay::Day1 => 1,
            EventDay::Day2 => 2,
        }
    }
}

const FULL_ACCESS_DAY1: &[EventAction] = &[
    EventAction::Entrance,
    EventAction::Lunch,
    EventAction::Kit,
    EventAction::Dinner,
];
const FULL_ACCESS_DAY2: &[EventAction] = &[
    EventAction::Entrance,
    EventAction::Lunch,
    EventAction::Kit,
];
const LIMITED_ACCESS: &[EventAction] = &[EventAction::Entrance, EventAction::Lunch];
const NO_ACCESS: &[EventAction] = &[];

/// The permitted actions for a category on a given day, in display order.
pub fn permitted_actions(attendee_type: AttendeeType, day: EventDay) -> &'static [EventAction] {
    match attendee_type {
        AttendeeType::Alumni | AttendeeType::Faculty => match day {
            EventDay::Day1 => FULL_ACCESS_DAY1,
            EventDay::Day2 => FULL_ACCESS_DAY2,
        },
        AttendeeType::Volunteer | AttendeeType::Student | AttendeeType::Press => LIMITED_ACCESS,
        AttendeeType::Other => NO_ACCESS,
    }
}

pub fn is_permitted(attendee_type: AttendeeType, action: EventAction, day: EventDay) -> bool {
    permitted_actions(attendee_type, day).contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_abbreviations_and_full_names_case_insensitively() {
        assert_eq!(AttendeeType::parse("AL"), Some(AttendeeType::Alumni));
        assert_eq!(AttendeeType::parse("al"), Some(AttendeeType::Alumni));
        assert_eq!(AttendeeType::parse("Alumni"), Some(AttendeeType::Alumni));
        assert_eq!(AttendeeType::parse("fl"), Some(AttendeeType::Faculty));
        assert_eq!(AttendeeType::parse("VL"), Some(AttendeeType::Volunteer));
        assert_eq!(AttendeeType::parse("stu"), Some(AttendeeType::Student));
        assert_eq!(AttendeeType::parse("PR"), Some(AttendeeType::Press));
        assert_eq!(AttendeeType::parse(" ot "), Some(AttendeeType::Other));
        assert_eq!(AttendeeType::parse("guest"), None);
        assert_eq!(AttendeeType::parse(""), None);
    }

    #[test]
    fn scan_code_prefix_hints_the_category() {
        assert_eq!(type_for_scan_code("AL-0042"), Some(AttendeeType::Alumni));
        assert_eq!(type_for_scan_code("stu-17"), Some(AttendeeType::Student));
        assert_eq!(type_for_scan_code("XYZ-1"), None);
        assert_eq!(type_for_scan_code(""), None);
    }

    #[test]
    fn full_access_gets_dinner_on_day_one_only() {
        assert!(is_permitted(
            AttendeeType::Alumni,
            EventAction::Dinner,
            EventDay::Day1
        ));
        assert!(!is_permitted(
            AttendeeType::Alumni,
            EventAction::Dinner,
            EventDay::Day2
        ));
        assert!(is_permitted(
            AttendeeType::Faculty,
            EventAction::Kit,
            EventDay::Day2
        ));
    }

    #[test]
    fn limited_access_never_gets_kit_or_dinner() {
        for t in [
            AttendeeType::Volunteer,
            AttendeeType::Student,
            AttendeeType::Press,
        ] {
            for day in [EventDay::Day1, EventDay::Day2] {
                assert!(is_permitted(t, EventAction::Entrance, day));
                assert!(is_permitted(t, EventAction::Lunch, day));
                assert!(!is_permitted(t, EventAction::Kit, day));
                assert!(!is_permitted(t, EventAction::Dinner, day));
            }
        }
    }

    #[test]
    fn other_category_has_no_actions() {
        assert!(permitted_actions(AttendeeType::Other, EventDay::Day1).is_empty());
        assert!(permitted_actions(AttendeeType::Other, EventDay::Day2).is_empty());
    }
}
