use thiserror::Error;

use crate::state::StateId;

/// Errors raised by the machine itself.
///
/// Everything here is a contract violation of the embedding application:
/// a graph that references missing states, a miss handler answering with an
/// index that does not exist, or parsing before the machine was started.
/// Failures reported by callbacks are not errors of this kind, they surface
/// as [`Status::Error`](crate::Status::Error) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("machine has no registered states")]
    NoStates,

    #[error("machine is not started, call `prestart` before `parse`")]
    NotStarted,

    #[error("state <{0}> is not registered in the machine")]
    UnknownState(String),

    #[error("state <{state}> branches to unknown state index {index}")]
    UnknownBranch { state: String, index: StateId },

    #[error(
        "miss handler of <{state}> returned state index {index}, \
         machine has {len} states"
    )]
    InvalidStateIndex {
        state: String,
        index: StateId,
        len: usize,
    },

    #[error("invalid regex pattern element `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a state callback.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
