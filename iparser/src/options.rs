use serde::Deserialize;

/// What happens to a symbol found in the active state's universal ignore set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnorePolicy {
    /// The symbol is appended to the buffer and then skipped, so entry and
    /// exit hooks still see it and a later miss replays it.
    #[default]
    BufferThenSkip,
    /// The symbol is dropped before it reaches the buffer.
    SkipUnbuffered,
}

/// What happens to the rest of a miss replay once a handler hard-sets a state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardsetReplay {
    /// Remaining buffered symbols are dropped.
    #[default]
    Stop,
    /// Remaining buffered symbols are replayed through the miss handler of
    /// the state that was just set.
    Continue,
}

/// Configuration knobs that influence how the machine treats its buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    pub ignore_policy: IgnorePolicy,
    pub hardset_replay: HardsetReplay,
}
