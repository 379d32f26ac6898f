//! Symbol classification for the machine.
//!
//! Every symbol is tested against the leave pattern of the active state and
//! the entry patterns of its branches. The classifier keeps, per state, how
//! many leading elements of each pattern the buffered symbols have matched so
//! far, plus a [`Phase`] that remembers when a single candidate is left so
//! that later symbols only test that one pattern.

use crate::enums::{Phase, Verdict};
use crate::pattern::Pattern;
use crate::state::{State, StateId};

/// How a symbol moved the progress through one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Complete,
    Advanced,
    Backtracked,
    Lost,
}

impl Step {
    #[inline]
    fn is_live(self) -> bool {
        matches!(self, Step::Advanced | Step::Backtracked)
    }
}

#[inline]
fn step(pattern: &Pattern, progress: &mut usize, symbol: char) -> Step {
    if pattern.matches(*progress, symbol) {
        *progress += 1;
        if *progress >= pattern.len() {
            return Step::Complete;
        }
        return Step::Advanced;
    }

    match pattern.checkback(*progress, symbol) {
        Some(position) => {
            *progress = position + 1;
            Step::Backtracked
        },
        None => {
            *progress = 0;
            Step::Lost
        },
    }
}

#[derive(Debug, Default)]
pub(crate) struct Classifier {
    phase: Phase,
    /// Entry progress, indexed by state.
    entry: Vec<usize>,
    /// Leave progress, indexed by state.
    leave: Vec<usize>,
}

impl Classifier {
    /// Start tracking one more state.
    pub(crate) fn track(&mut self) {
        self.entry.push(0);
        self.leave.push(0);
    }

    /// Zero every progress counter and forget any locked candidate.
    pub(crate) fn reset(&mut self) {
        self.entry.fill(0);
        self.leave.fill(0);
        self.phase = Phase::Undetermined;
    }

    pub(crate) fn progress(&self, state: StateId) -> Option<(usize, usize)> {
        Some((*self.entry.get(state)?, *self.leave.get(state)?))
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn classify(
        &mut self,
        states: &[State],
        active: StateId,
        symbol: char,
    ) -> Verdict {
        match self.phase {
            Phase::Undetermined => self.undetermined(states, active, symbol),
            Phase::Entering(target) => self.entering(states, target, symbol),
            Phase::Leaving => self.leaving(states, active, symbol),
        }
    }

    fn undetermined(
        &mut self,
        states: &[State],
        active: StateId,
        symbol: char,
    ) -> Verdict {
        let state = &states[active];

        // Leaving wins over entering a branch on the same symbol.
        let leave = step(state.leave(), &mut self.leave[active], symbol);
        if leave == Step::Complete {
            return Verdict::Pop;
        }

        let mut live = usize::from(leave.is_live());
        let mut candidate = None;

        for &branch in state.branches() {
            match step(states[branch].entry(), &mut self.entry[branch], symbol) {
                Step::Complete => return Verdict::Enter(branch),
                outcome if outcome.is_live() => {
                    live += 1;
                    candidate = Some(branch);
                },
                _ => {},
            }
        }

        match (live, candidate) {
            (0, _) => Verdict::Miss,
            (1, Some(branch)) => {
                self.phase = Phase::Entering(branch);
                Verdict::Undecided
            },
            (1, None) => {
                self.phase = Phase::Leaving;
                Verdict::Undecided
            },
            _ => Verdict::Undecided,
        }
    }

    fn entering(
        &mut self,
        states: &[State],
        target: StateId,
        symbol: char,
    ) -> Verdict {
        match step(states[target].entry(), &mut self.entry[target], symbol) {
            Step::Complete => {
                self.phase = Phase::Undetermined;
                Verdict::Enter(target)
            },
            Step::Advanced | Step::Backtracked => Verdict::Undecided,
            Step::Lost => {
                self.phase = Phase::Undetermined;
                Verdict::Miss
            },
        }
    }

    fn leaving(
        &mut self,
        states: &[State],
        active: StateId,
        symbol: char,
    ) -> Verdict {
        match step(states[active].leave(), &mut self.leave[active], symbol) {
            Step::Complete => {
                self.phase = Phase::Undetermined;
                Verdict::Pop
            },
            Step::Advanced | Step::Backtracked => Verdict::Undecided,
            Step::Lost => {
                self.phase = Phase::Undetermined;
                Verdict::Miss
            },
        }
    }
}
