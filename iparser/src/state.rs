//! Single state of a parser machine.
//!
//! A [`State`] is a node of the graph the [`Machine`](crate::Machine) walks:
//! the pattern that enters it, the pattern that leaves it, the states it may
//! branch into, the symbols it ignores and the callbacks the machine runs
//! when the state is entered, left or misses.

use std::collections::HashSet;
use std::fmt;

use crate::error::HookError;
use crate::pattern::Pattern;

/// Stable index of a state, its position in registration order.
pub type StateId = usize;

/// Entry or exit hook, receives the buffered symbols that completed the
/// transition.
pub type BufferHook = Box<dyn FnMut(&[char]) -> Result<(), HookError> + Send>;

/// Handler receiving buffered symbols no pattern explained.
///
/// `Ok(Some(id))` forces a transition into state `id`, `Ok(None)` consumes
/// the symbol without a transition.
pub type MissHandler =
    Box<dyn FnMut(char) -> Result<Option<StateId>, HookError> + Send>;

/// Symbols a state skips.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    /// Skipped before classification.
    pub all: HashSet<char>,
    /// Skipped only while replaying a miss into the handler.
    pub handler: HashSet<char>,
}

impl IgnoreSet {
    #[inline]
    pub fn skips(&self, symbol: char) -> bool {
        self.all.contains(&symbol)
    }

    #[inline]
    pub fn skips_in_handler(&self, symbol: char) -> bool {
        self.handler.contains(&symbol)
    }
}

pub struct State {
    name: String,
    entry: Pattern,
    leave: Pattern,
    branches: Vec<StateId>,
    ignore: IgnoreSet,
    on_enter: Option<BufferHook>,
    on_leave: Option<BufferHook>,
    on_miss: Option<MissHandler>,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("leave", &self.leave)
            .field("branches", &self.branches)
            .field("ignore", &self.ignore)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("on_miss", &self.on_miss.is_some())
            .finish()
    }
}

impl State {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: Pattern::default(),
            leave: Pattern::default(),
            branches: Vec::new(),
            ignore: IgnoreSet::default(),
            on_enter: None,
            on_leave: None,
            on_miss: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &Pattern {
        &self.entry
    }

    pub fn leave(&self) -> &Pattern {
        &self.leave
    }

    pub fn branches(&self) -> &[StateId] {
        &self.branches
    }

    pub fn ignore(&self) -> &IgnoreSet {
        &self.ignore
    }

    pub fn ignore_mut(&mut self) -> &mut IgnoreSet {
        &mut self.ignore
    }

    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<Pattern>) -> Self {
        self.entry = entry.into();
        self
    }

    #[must_use]
    pub fn with_leave(mut self, leave: impl Into<Pattern>) -> Self {
        self.leave = leave.into();
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: StateId) -> Self {
        self.branches.push(branch);
        self
    }

    #[must_use]
    pub fn with_branches(
        mut self,
        branches: impl IntoIterator<Item = StateId>,
    ) -> Self {
        self.branches.extend(branches);
        self
    }

    #[must_use]
    pub fn ignore_all(mut self, symbols: impl IntoIterator<Item = char>) -> Self {
        self.ignore.all.extend(symbols);
        self
    }

    #[must_use]
    pub fn ignore_in_handler(
        mut self,
        symbols: impl IntoIterator<Item = char>,
    ) -> Self {
        self.ignore.handler.extend(symbols);
        self
    }

    pub fn set_entry(&mut self, entry: impl Into<Pattern>) {
        self.entry = entry.into();
    }

    pub fn set_leave(&mut self, leave: impl Into<Pattern>) {
        self.leave = leave.into();
    }

    pub fn add_branch(&mut self, branch: StateId) {
        self.branches.push(branch);
    }

    /// Run `hook` after the entry pattern completed.
    #[must_use]
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&[char]) -> Result<(), HookError> + Send + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    /// Run `hook` after the leave pattern completed.
    #[must_use]
    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&[char]) -> Result<(), HookError> + Send + 'static,
    {
        self.on_leave = Some(Box::new(hook));
        self
    }

    /// Handle symbols no pattern explained while this state is active.
    #[must_use]
    pub fn on_miss<F>(mut self, handler: F) -> Self
    where
        F: FnMut(char) -> Result<Option<StateId>, HookError> + Send + 'static,
    {
        self.on_miss = Some(Box::new(handler));
        self
    }

    pub(crate) fn run_enter(&mut self, buffer: &[char]) -> Result<(), HookError> {
        match self.on_enter.as_mut() {
            Some(hook) => hook(buffer),
            None => Ok(()),
        }
    }

    pub(crate) fn run_leave(&mut self, buffer: &[char]) -> Result<(), HookError> {
        match self.on_leave.as_mut() {
            Some(hook) => hook(buffer),
            None => Ok(()),
        }
    }

    pub(crate) fn run_miss(
        &mut self,
        symbol: char,
    ) -> Result<Option<StateId>, HookError> {
        match self.on_miss.as_mut() {
            Some(handler) => handler(symbol),
            None => Ok(None),
        }
    }
}
