//! Zodiac year lookup.
//!
//! The twelve signs repeat every twelve years. 1924 is a Rat year and is used
//! as the zero point of the cycle, so the sign for any year is
//! `(year - 1924) mod 12`, taken as a Euclidean remainder so years before the
//! epoch still land in `[0, 12)`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A year known to be index 0 (Rat) of the cycle.
pub const EPOCH_YEAR: i32 = 1924;

/// Number of signs in one cycle.
pub const CYCLE_LEN: usize = 12;

/// One of the twelve zodiac signs, in cycle order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Zodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl Zodiac {
    /// All signs in cycle order, starting at the epoch sign.
    pub const ALL: [Zodiac; CYCLE_LEN] = [
        Self::Rat,
        Self::Ox,
        Self::Tiger,
        Self::Rabbit,
        Self::Dragon,
        Self::Snake,
        Self::Horse,
        Self::Goat,
        Self::Monkey,
        Self::Rooster,
        Self::Dog,
        Self::Pig,
    ];

    /// Sign for a Gregorian year. Total over every `i32`, including years
    /// that make no historical sense.
    pub fn from_year(year: i32) -> Self {
        let offset = i64::from(year) - i64::from(EPOCH_YEAR);
        let index = offset.rem_euclid(CYCLE_LEN as i64) as usize;
        Self::ALL[index]
    }

    /// Position in the cycle, `0..12`.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The single-character label used in readings and file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rat => "鼠",
            Self::Ox => "牛",
            Self::Tiger => "虎",
            Self::Rabbit => "兔",
            Self::Dragon => "龙",
            Self::Snake => "蛇",
            Self::Horse => "马",
            Self::Goat => "羊",
            Self::Monkey => "猴",
            Self::Rooster => "鸡",
            Self::Dog => "狗",
            Self::Pig => "猪",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }
}

/// Label of the sign for `year`.
pub fn zodiac_for_year(year: i32) -> &'static str {
    Zodiac::from_year(year).label()
}

/// Render an ISO date (`1990-05-01`) the way it appears on a scroll
/// (`1990年5月1日`). Empty or unparseable input renders as an empty string.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => format!("{}年{}月{}日", d.year(), d.month(), d.day()),
        Err(_) => String::new(),
    }
}
