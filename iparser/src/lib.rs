//! Nested state machine engine for building streaming parsers.
//!
//! The embedding application registers [`State`]s on a [`Machine`], each with
//! an entry and a leave [`Pattern`], the set of states it may branch into and
//! optional callbacks. The machine then consumes the input one symbol at a
//! time through [`Machine::parse`]:
//! - symbols are buffered until some pattern explains them,
//! - a completed entry pattern pushes the branch onto the chain of active
//!   states and runs its entry hook,
//! - a completed leave pattern runs the exit hook and pops back to the parent,
//! - when nothing explains the buffered symbols they are replayed, oldest
//!   first, through the active state's miss handler.
//!
//! The verdict of every call is observable through [`Machine::status`].

mod classify;
mod enums;
mod error;
mod machine;
mod options;
mod pattern;
mod state;

pub use enums::Status;
pub use error::{Error, HookError, Result};
pub use machine::{Dump, Machine, ROOT};
pub use options::{HardsetReplay, IgnorePolicy, MachineOptions};
pub use pattern::{Pattern, PatternElement};
pub use state::{BufferHook, IgnoreSet, MissHandler, State, StateId};
