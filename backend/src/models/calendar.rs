//! Weekday and academic term enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::IntervalError;

/// Day of the week a section meets on.
///
/// The catalog stores days as single-letter codes (`M T W R F S U`), which is
/// also what [`Weekday::code`] writes back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
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

    /// Single-letter catalog code.
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "R",
            Weekday::Friday => "F",
            Weekday::Saturday => "S",
            Weekday::Sunday => "U",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Weekday {
    type Err = IntervalError;

    /// Accepts catalog codes as well as full or three-letter English names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let day = match trimmed.to_lowercase().as_str() {
            "m" | "mon" | "monday" => Weekday::Monday,
            "t" | "tue" | "tues" | "tuesday" => Weekday::Tuesday,
            "w" | "wed" | "wednesday" => Weekday::Wednesday,
            "r" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thursday,
            "f" | "fri" | "friday" => Weekday::Friday,
            "s" | "sat" | "saturday" => Weekday::Saturday,
            "u" | "sun" | "sunday" => Weekday::Sunday,
            _ => return Err(IntervalError::UnknownWeekday(trimmed.to_string())),
        };
        Ok(day)
    }
}

/// Academic session within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Spring => "Spring",
            Term::Summer => "Summer",
            Term::Fall => "Fall",
            Term::Winter => "Winter",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "spring" => Ok(Term::Spring),
            "summer" => Ok(Term::Summer),
            "fall" | "autumn" => Ok(Term::Fall),
            "winter" => Ok(Term::Winter),
            _ => Err(IntervalError::UnknownTerm(trimmed.to_string())),
        }
    }
}
