use std::{fmt, mem};

use log::{debug, trace, warn};

use crate::classify::Classifier;
use crate::enums::{Status, Verdict};
use crate::error::{Error, HookError, Result};
use crate::options::{HardsetReplay, IgnorePolicy, MachineOptions};
use crate::state::{State, StateId};

/// Index of the root state, the first one registered.
pub const ROOT: StateId = 0;

/// Nested state machine that parses an input stream one symbol at a time.
///
/// States are registered with [`Machine::add_state`], the first one becoming
/// the root. After [`Machine::prestart`] every call to [`Machine::parse`]
/// feeds one symbol and leaves its verdict in [`Machine::status`].
///
/// The machine is single-writer: callbacks run inline within `parse` and
/// cannot reach back into the machine.
#[derive(Debug, Default)]
pub struct Machine {
    states: Vec<State>,
    chain: Vec<StateId>,
    buffer: Vec<char>,
    classifier: Classifier,
    status: Status,
    failure: Option<HookError>,
    options: MachineOptions,
    started: bool,
}

impl Machine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: MachineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// Register `state` and return its index.
    ///
    /// Changing the graph invalidates a running session, `prestart` must be
    /// called again before the next `parse`.
    pub fn add_state(&mut self, state: State) -> StateId {
        self.states.push(state);
        self.classifier.track();
        self.started = false;
        self.states.len() - 1
    }

    /// Look up a registered state by name.
    pub fn state_index(&self, name: &str) -> Result<StateId> {
        self.states
            .iter()
            .position(|state| state.name() == name)
            .ok_or_else(|| Error::UnknownState(name.to_owned()))
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// Mutable access to a registered state, for wiring up the graph.
    ///
    /// Like [`Machine::add_state`] this requires a new `prestart`.
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.started = false;
        self.states.get_mut(id)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Validate the graph and reset the machine to a fresh session: the chain
    /// holds only the root, the buffer is empty and all progress is zero.
    pub fn prestart(&mut self) -> Result<()> {
        if self.states.is_empty() {
            return Err(Error::NoStates);
        }

        let len = self.states.len();
        for state in &self.states {
            if let Some(&index) = state.branches().iter().find(|&&b| b >= len) {
                return Err(Error::UnknownBranch {
                    state: state.name().to_owned(),
                    index,
                });
            }
        }

        self.reset();
        self.chain.clear();
        self.chain.push(ROOT);
        self.status = Status::default();
        self.failure = None;
        self.started = true;

        Ok(())
    }

    /// Feed one symbol.
    ///
    /// Returns `Ok(false)` when a callback failed; the machine then stays as
    /// it was at the moment of failure and [`Machine::failure`] holds the
    /// reason. `Err` is returned for contract violations: parsing before
    /// `prestart`, or a miss handler naming a state that does not exist.
    pub fn parse(&mut self, symbol: char) -> Result<bool> {
        if !self.started {
            return Err(Error::NotStarted);
        }

        self.status = Status::Wait;
        let active = self.active();

        if self.states[active].ignore().skips(symbol) {
            if self.options.ignore_policy == IgnorePolicy::BufferThenSkip {
                self.buffer.push(symbol);
            }
            trace!("<{}> ignores {symbol:?}", self.states[active].name());
            return Ok(true);
        }

        self.buffer.push(symbol);

        let verdict = self.classifier.classify(&self.states, active, symbol);
        trace!("<{}> {symbol:?}: {verdict:?}", self.states[active].name());

        match verdict {
            Verdict::Enter(target) => Ok(self.enter(target)),
            Verdict::Pop => Ok(self.leave(active)),
            Verdict::Miss => self.flush(),
            Verdict::Undecided => Ok(true),
        }
    }

    /// Feed every char of `input`, stopping at the first failed callback.
    pub fn parse_str(&mut self, input: &str) -> Result<bool> {
        for symbol in input.chars() {
            if !self.parse(symbol)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Reason of the last [`Status::Error`].
    pub fn failure(&self) -> Option<&HookError> {
        self.failure.as_ref()
    }

    /// Active states, root first.
    pub fn chain(&self) -> &[StateId] {
        &self.chain
    }

    /// Symbols buffered since the last transition or miss.
    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.chain.last().copied()
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current_state().map(|id| self.states[id].name())
    }

    /// Entry and leave progress of a state, in matched pattern elements.
    pub fn progress(&self, id: StateId) -> Option<(usize, usize)> {
        self.classifier.progress(id)
    }

    /// Human readable listing of every state and its branches.
    pub fn dump(&self) -> Dump<'_> {
        Dump { machine: self }
    }

    #[inline]
    fn active(&self) -> StateId {
        self.chain.last().copied().unwrap_or(ROOT)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.classifier.reset();
    }

    fn fail(&mut self, err: HookError) -> bool {
        warn!("<{}> callback failed: {err}", self.states[self.active()].name());
        self.status = Status::Error;
        self.failure = Some(err);
        false
    }

    fn enter(&mut self, target: StateId) -> bool {
        self.chain.push(target);

        if let Err(err) = self.states[target].run_enter(&self.buffer) {
            return self.fail(err);
        }

        debug!(
            "branch into <{}> on {:?}",
            self.states[target].name(),
            self.buffer
        );
        self.reset();
        self.status = Status::Branch;
        true
    }

    fn leave(&mut self, active: StateId) -> bool {
        if let Err(err) = self.states[active].run_leave(&self.buffer) {
            return self.fail(err);
        }

        // The root is never popped.
        if self.chain.len() > 1 {
            self.chain.pop();
        }

        debug!(
            "back from <{}> on {:?}",
            self.states[active].name(),
            self.buffer
        );
        self.reset();
        self.status = Status::Back;
        true
    }

    /// Replay the buffer through the active state's miss handler.
    fn flush(&mut self) -> Result<bool> {
        self.status = Status::Miss;

        let buffered = mem::take(&mut self.buffer);
        let mut handler = self.active();
        debug!("<{}> missed {buffered:?}", self.states[handler].name());

        for symbol in buffered {
            if self.states[handler].ignore().skips_in_handler(symbol) {
                continue;
            }

            match self.states[handler].run_miss(symbol) {
                Ok(None) => {},
                Ok(Some(target)) if target < self.states.len() => {
                    debug!(
                        "<{}> hard-sets <{}> on {symbol:?}",
                        self.states[handler].name(),
                        self.states[target].name()
                    );
                    self.chain.push(target);
                    self.reset();
                    self.status = Status::Hardset;

                    match self.options.hardset_replay {
                        HardsetReplay::Stop => break,
                        HardsetReplay::Continue => handler = target,
                    }
                },
                Ok(Some(index)) => {
                    return Err(Error::InvalidStateIndex {
                        state: self.states[handler].name().to_owned(),
                        index,
                        len: self.states.len(),
                    });
                },
                Err(err) => return Ok(self.fail(err)),
            }
        }

        Ok(true)
    }
}

/// Display adapter returned by [`Machine::dump`].
pub struct Dump<'a> {
    machine: &'a Machine,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = self.machine.states();
        writeln!(f, "Parser states: {}", states.len())?;

        for state in states {
            writeln!(f)?;
            writeln!(f, "** state: {}", state.name())?;
            writeln!(f, "branches:")?;
            for &branch in state.branches() {
                match states.get(branch) {
                    Some(target) => writeln!(f, "  {}", target.name())?,
                    None => writeln!(f, "  <unknown {branch}>")?,
                }
            }
        }

        Ok(())
    }
}
