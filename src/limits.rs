//! Bounds and symbolic names for the five crontab time fields.

use std::fmt;

/// Position of a time field on a five-field schedule line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl Field {
    /// All fields in line order.
    pub const ALL: [Field; 5] = [
        Field::Minute,
        Field::Hour,
        Field::DayOfMonth,
        Field::Month,
        Field::DayOfWeek,
    ];

    pub fn limit(self) -> &'static FieldLimit {
        &FIELD_LIMITS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.limit().name
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive numeric bounds and accepted names for one time field.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldLimit {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
    /// Lowercase symbolic names; empty for purely numeric fields.
    pub aliases: &'static [&'static str],
}

impl FieldLimit {
    /// Case-insensitive alias lookup.
    pub fn is_valid_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAYS: &[&str] = &["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Indexed by [`Field`]. Day of week runs to 7 because both 0 and 7 mean
/// Sunday.
pub static FIELD_LIMITS: [FieldLimit; 5] = [
    FieldLimit {
        name: "minute",
        min: 0,
        max: 59,
        aliases: &[],
    },
    FieldLimit {
        name: "hour",
        min: 0,
        max: 23,
        aliases: &[],
    },
    FieldLimit {
        name: "day of month",
        min: 1,
        max: 31,
        aliases: &[],
    },
    FieldLimit {
        name: "month",
        min: 1,
        max: 12,
        aliases: MONTHS,
    },
    FieldLimit {
        name: "day of week",
        min: 0,
        max: 7,
        aliases: WEEKDAYS,
    },
];
