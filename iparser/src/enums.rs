use std::fmt;

use crate::state::StateId;

/// Verdict category of the last [`Machine::parse`](crate::Machine::parse)
/// call.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// More symbols are needed, or the symbol was ignored.
    #[default]
    Wait,
    /// An entry pattern completed and a new state was pushed.
    Branch,
    /// A leave pattern completed and the active state was left.
    Back,
    /// A miss handler forced a transition.
    Hardset,
    /// No pattern explained the buffer, it was replayed to the miss handler.
    Miss,
    /// A callback reported a failure.
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Wait => "wait",
            Status::Branch => "branch",
            Status::Back => "back",
            Status::Hardset => "hardset",
            Status::Miss => "miss",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Enter(StateId),
    Pop,
    Undecided,
    Miss,
}

/// Resolution memory kept by the classifier between symbols.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    #[default]
    Undetermined,
    /// A single branch is still plausible, only its entry is tracked.
    Entering(StateId),
    /// Only the active state's leave pattern is still plausible.
    Leaving,
}
