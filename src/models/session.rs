use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::fortune::FortuneResult;
use super::input::{InputError, UserInput};

/// Coarse state of a session, as shown to the user.
///
/// - `Idle`: waiting for a submission
/// - `Loading`: one provider request is in flight
/// - `Success`: a reading is available
/// - `Error`: the last request failed; the user may resubmit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    Idle,
    Loading,
    Success,
    Error,
}

impl LoadingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Phase data. A result only exists in `Success` and a message only in
/// `Error`, so the two can never be present together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Success { result: FortuneResult },
    Error { message: String },
}

/// Rejected session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a reading is already in progress")]
    AlreadyLoading,

    #[error("no reading is in progress")]
    NotLoading,

    #[error(transparent)]
    Input(#[from] InputError),
}

/// One user's interaction from first load until teardown.
///
/// Sessions are immutable records: every action returns a new `Session` and
/// leaves the receiver untouched, so a rejected action changes nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    id: Uuid,
    /// The submission being answered, kept until `reset`.
    input: Option<UserInput>,
    #[serde(flatten)]
    phase: Phase,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            input: None,
            phase: Phase::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> Option<&UserInput> {
        self.input.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> LoadingState {
        match self.phase {
            Phase::Idle => LoadingState::Idle,
            Phase::Loading => LoadingState::Loading,
            Phase::Success { .. } => LoadingState::Success,
            Phase::Error { .. } => LoadingState::Error,
        }
    }

    pub fn result(&self) -> Option<&FortuneResult> {
        match &self.phase {
            Phase::Success { result } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Start a reading. Allowed from any settled state; resubmitting after
    /// `Success` or `Error` is how the user retries.
    pub fn submit(&self, input: UserInput) -> Result<Self, SessionError> {
        if self.phase == Phase::Loading {
            return Err(SessionError::AlreadyLoading);
        }
        input.validate()?;
        Ok(self.advance(Some(input), Phase::Loading))
    }

    pub fn succeed(&self, result: FortuneResult) -> Result<Self, SessionError> {
        self.settle(Phase::Success { result })
    }

    pub fn fail(&self, message: impl Into<String>) -> Result<Self, SessionError> {
        self.settle(Phase::Error {
            message: message.into(),
        })
    }

    /// Clear the reading and return to `Idle` ("ask again").
    pub fn reset(&self) -> Result<Self, SessionError> {
        if self.phase == Phase::Loading {
            return Err(SessionError::AlreadyLoading);
        }
        Ok(self.advance(None, Phase::Idle))
    }

    fn settle(&self, phase: Phase) -> Result<Self, SessionError> {
        if self.phase != Phase::Loading {
            return Err(SessionError::NotLoading);
        }
        Ok(self.advance(self.input.clone(), phase))
    }

    fn advance(&self, input: Option<UserInput>, phase: Phase) -> Self {
        Self {
            id: self.id,
            input,
            phase,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
