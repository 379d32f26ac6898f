//! JSON description of a state graph and its conversion into a [`Machine`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use iparser::{
    Machine, MachineOptions, Pattern, PatternElement, State, StateId,
};
use log::{debug, info};
use serde::Deserialize;

/// Graph used when no `--graph` file is given.
pub const DEMO: &str = include_str!("../graphs/demo.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Graph {
    #[serde(default)]
    pub options: MachineOptions,
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSpec {
    pub name: String,
    #[serde(default)]
    pub entry: Vec<ElementSpec>,
    #[serde(default)]
    pub leave: Vec<ElementSpec>,
    /// Branch targets, by state name.
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub ignore: IgnoreSpec,
    /// Symbols the miss handler turns into a forced transition, mapped to
    /// the name of the target state.
    #[serde(default)]
    pub hardset: HashMap<char, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IgnoreSpec {
    pub all: Vec<char>,
    pub handler: Vec<char>,
}

/// `"<"` or `{ "regex": "[0-9]" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ElementSpec {
    Literal(char),
    Regex { regex: String },
}

impl ElementSpec {
    fn compile(&self) -> iparser::Result<PatternElement> {
        match self {
            ElementSpec::Literal(symbol) => Ok(PatternElement::Literal(*symbol)),
            ElementSpec::Regex { regex } => PatternElement::regex(regex),
        }
    }
}

fn pattern(elements: &[ElementSpec]) -> iparser::Result<Pattern> {
    elements.iter().map(ElementSpec::compile).collect()
}

impl Graph {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("malformed graph description")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("failed to load graph {}", path.display()))
    }

    pub fn demo() -> anyhow::Result<Self> {
        Self::from_json(DEMO)
    }

    /// Build and prestart a machine whose callbacks log every transition.
    pub fn build(self) -> anyhow::Result<Machine> {
        let index = self.index()?;
        let resolve = |owner: &str, name: &str| -> anyhow::Result<StateId> {
            index.get(name).copied().with_context(|| {
                format!("state <{owner}> refers to unknown state <{name}>")
            })
        };

        let mut machine = Machine::with_options(self.options);
        for spec in &self.states {
            let entry = pattern(&spec.entry)
                .with_context(|| format!("bad entry of <{}>", spec.name))?;
            let leave = pattern(&spec.leave)
                .with_context(|| format!("bad leave of <{}>", spec.name))?;

            let mut branches = Vec::with_capacity(spec.branches.len());
            for branch in &spec.branches {
                branches.push(resolve(&spec.name, branch)?);
            }

            let mut hardset = HashMap::with_capacity(spec.hardset.len());
            for (&symbol, target) in &spec.hardset {
                hardset.insert(symbol, resolve(&spec.name, target)?);
            }

            let state = State::new(spec.name.as_str())
                .with_entry(entry)
                .with_leave(leave)
                .with_branches(branches)
                .ignore_all(spec.ignore.all.iter().copied())
                .ignore_in_handler(spec.ignore.handler.iter().copied());
            machine.add_state(logged(state, hardset));
        }

        machine.prestart()?;
        Ok(machine)
    }

    fn index(&self) -> anyhow::Result<HashMap<&str, StateId>> {
        let mut seen = HashSet::new();
        let mut index = HashMap::with_capacity(self.states.len());
        for (id, spec) in self.states.iter().enumerate() {
            if !seen.insert(spec.name.as_str()) {
                bail!("state <{}> is declared twice", spec.name);
            }
            index.insert(spec.name.as_str(), id);
        }
        Ok(index)
    }
}

fn logged(state: State, hardset: HashMap<char, StateId>) -> State {
    let enter = state.name().to_owned();
    let leave = enter.clone();
    let miss = enter.clone();

    state
        .on_enter(move |buffer| {
            info!("enter <{enter}> on {:?}", buffer.iter().collect::<String>());
            Ok(())
        })
        .on_leave(move |buffer| {
            info!("leave <{leave}> on {:?}", buffer.iter().collect::<String>());
            Ok(())
        })
        .on_miss(move |symbol| {
            let target = hardset.get(&symbol).copied();
            debug!("<{miss}> handles {symbol:?}");
            Ok(target)
        })
}
