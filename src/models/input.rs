use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::zodiac::Zodiac;

/// Problems with what the user typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("birthday is required")]
    MissingBirthday,

    #[error("birthday must be a date in YYYY-MM-DD form, got {0:?}")]
    InvalidBirthday(String),

    #[error("unknown direction {0:?}; expected career, relationship or wealth")]
    UnknownDirection(String),
}

/// The topic a reading focuses on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Career,
    Relationship,
    Wealth,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Self::Career, Self::Relationship, Self::Wealth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Career => "career",
            Self::Relationship => "relationship",
            Self::Wealth => "wealth",
        }
    }

    /// Label used in the prompt and on the scroll.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Career => "事业",
            Self::Relationship => "感情",
            Self::Wealth => "财运",
        }
    }
}

impl FromStr for Direction {
    type Err = InputError;

    /// Accepts either the English name or the Chinese label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed) || d.label() == trimmed)
            .ok_or_else(|| InputError::UnknownDirection(s.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user submits: a birth date and the topic they are asking about.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInput {
    /// ISO calendar date, `YYYY-MM-DD`.
    pub birthday: String,
    #[serde(default)]
    pub direction: Direction,
}

impl UserInput {
    pub fn new(birthday: impl Into<String>, direction: Direction) -> Self {
        Self {
            birthday: birthday.into(),
            direction,
        }
    }

    pub fn birth_date(&self) -> Result<NaiveDate, InputError> {
        let raw = self.birthday.trim();
        if raw.is_empty() {
            return Err(InputError::MissingBirthday);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| InputError::InvalidBirthday(self.birthday.clone()))
    }

    pub fn zodiac(&self) -> Result<Zodiac, InputError> {
        Ok(Zodiac::from_year(self.birth_date()?.year()))
    }

    /// Checks the input is complete enough to send.
    pub fn validate(&self) -> Result<(), InputError> {
        self.birth_date().map(|_| ())
    }
}
