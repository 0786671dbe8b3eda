//! Core data model shared by the DFA and NFA/εNFA representations: state/transition kinds,
//! the metadata discipline, and the stable fingerprint used as a cache key.
//!
//! States carry a derived [`StateKind`] tag alongside opaque per-state/per-transition
//! [`Metadata`], layered on top of the dense `Vec`-of-indices representation that keeps
//! recognition, minimization and the rest of the algorithms cheap to run.

use serde_json::Value as JsonValue;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// String-keyed, JSON-scalar/array/object/null-valued metadata attached to a state or
/// transition. Never interpreted by any recognition or transform algorithm (see the
/// "conditional transitions" open question in `SPEC_FULL.md`).
pub type Metadata = std::collections::BTreeMap<String, JsonValue>;

/// The kind tag carried by a [`crate::dfa::DfaState`]/[`crate::nfa::NfaState`]. Always
/// *derived* from membership in the automaton's initial/final sets at construction time, so
/// it can never disagree with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Initial,
    Final,
    Intermediate,
    InitialFinal,
}

impl StateKind {
    pub fn from_flags(initial: bool, accepting: bool) -> Self {
        match (initial, accepting) {
            (true, true) => StateKind::InitialFinal,
            (true, false) => StateKind::Initial,
            (false, true) => StateKind::Final,
            (false, false) => StateKind::Intermediate,
        }
    }

    pub fn is_initial(self) -> bool {
        matches!(self, StateKind::Initial | StateKind::InitialFinal)
    }

    pub fn is_final(self) -> bool {
        matches!(self, StateKind::Final | StateKind::InitialFinal)
    }
}

/// The kind tag carried by a transition. `Epsilon` and `Conditional` only ever appear on
/// εNFA/NFA transitions; a `Dfa` transition is always `Symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Symbol,
    Epsilon,
    Conditional,
}

/// The variant tag of an automaton. Matching on this (or on the `Automaton` enum it tags) is
/// always total — no type-hierarchy walk is needed anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AutomatonKind {
    Dfa,
    Nfa,
    #[serde(rename = "ENFA")]
    Enfa,
}

impl std::fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonKind::Dfa => write!(f, "DFA"),
            AutomatonKind::Nfa => write!(f, "NFA"),
            AutomatonKind::Enfa => write!(f, "εNFA"),
        }
    }
}

/// A state as seen by the builder API and the validation layer, before `kind` has been
/// derived from initial/final set membership. The builder accepts a flat list of these plus
/// separate `initial`/`finals` sets -- see `crate::dfa::build_dfa` / `crate::nfa::build_nfa`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawState {
    pub id: Rc<str>,
    pub metadata: Option<Metadata>,
}

impl RawState {
    pub fn new(id: impl Into<Rc<str>>) -> Self {
        Self {
            id: id.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(id: impl Into<Rc<str>>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            metadata: Some(metadata),
        }
    }
}

/// A single (source, symbol, target) transition as seen by the builder API and the
/// validation layer. `symbol` is `None` for an ε-transition. Internally, once an automaton is
/// built, transitions are stored as dense adjacency vectors rather than a flat list of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub source: Rc<str>,
    pub symbol: Option<Rc<str>>,
    pub target: Rc<str>,
    pub kind: TransitionKind,
    pub condition: Option<Metadata>,
    pub action: Option<Metadata>,
}

impl Transition {
    pub fn symbol_transition(source: impl Into<Rc<str>>, symbol: impl Into<Rc<str>>, target: impl Into<Rc<str>>) -> Self {
        Self {
            source: source.into(),
            symbol: Some(symbol.into()),
            target: target.into(),
            kind: TransitionKind::Symbol,
            condition: None,
            action: None,
        }
    }

    pub fn epsilon_transition(source: impl Into<Rc<str>>, target: impl Into<Rc<str>>) -> Self {
        Self {
            source: source.into(),
            symbol: None,
            target: target.into(),
            kind: TransitionKind::Epsilon,
            condition: None,
            action: None,
        }
    }
}

/// Matches `^[A-Za-z_][A-Za-z0-9_]*$` and length ≤ 100.
pub fn is_valid_identifier(id: &str) -> bool {
    if id.is_empty() || id.len() > 100 {
        return false;
    }
    let mut chars = id.chars();
    let first = chars.next().unwrap();
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A stable content hash over an automaton's canonical shape, used as a cache key by the
/// optimization and balancing engines. Two automata with the same fingerprint are not
/// guaranteed equal (it is a
/// hash, not a proof), but the cache only ever serves a fingerprint match back to the
/// operation that produced it, so a collision just costs a cache miss's worth of recomputation
/// at worst -- it never serves wrong data across genuinely different automata because the
/// full `(operation, fingerprint, parameters)` tuple is also checked by equality in the map key.
pub fn fingerprint<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
