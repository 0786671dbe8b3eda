//! # Deterministic Finite Automaton
//!
//! The DFA module includes the [Dfa] struct, a dense, arena-indexed representation of a
//! [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton).
//! A `Dfa` is built from validated input with [`build_dfa`], which runs every invariant
//! (I1-I6) described at the crate level before a single state is allocated.
//!
//! Unlike a classical DFA, a [Dfa] here is not required to be *total*: a missing
//! `(state, symbol)` transition is a warning from the validation layer, not an error, and
//! [`DfaEvaluator::step`] simply rejects rather than panicking or wrapping around. This is why
//! `DfaState::transitions` holds `Option<usize>` rather than a bare `usize`.
//!
//! ## Operations
//! * [Dfa::accepts] / [Dfa::evaluator] — recognition
//! * [Dfa::to_nfa] — trivial embedding into the NFA representation
//! * [Dfa::minimize] via [Dfa::remove_unreachable_states] + [Dfa::merge_nondistinguishable_states]
//! * [Dfa::union] / [Dfa::intersection] / [Dfa::difference] / [Dfa::symmetric_difference] / [Dfa::invert]
//! * [Dfa::equivalent_to] — used by the balancing engine to verify a transform didn't change the language

use crate::config::{check_checkpoint, EngineConfig};
use crate::error::EngineError;
use crate::model::{fingerprint, Metadata, RawState, StateKind, Transition, TransitionKind};
use crate::nfa::{Nfa, NfaState};
use crate::util::alphabet_equal;
use crate::validation::automaton::{AutomatonValidator, RawAutomaton};
use crate::validation::ValidationResult;
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub mod eval;

pub use eval::DfaEvaluator;

/// A [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton),
/// defined by its *alphabet*, a *set of states*, one of the states being its *initial state*, a
/// subset of its states being *final states*, and a (possibly partial) *transition function*.
#[derive(Clone, Debug)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

impl PartialEq for Dfa {
    fn eq(&self, other: &Self) -> bool {
        self.initial_state == other.initial_state
            && alphabet_equal(&self.alphabet, &other.alphabet)
            && self.states == other.states
    }
}

impl Hash for Dfa {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alphabet.len().hash(state);
        for symbol in self.alphabet.iter() {
            symbol.hash(state);
        }
        self.states.hash(state);
        self.initial_state.hash(state);
    }
}

/// A state in a DFA, holding its name, derived [`StateKind`], opaque metadata, and the
/// transition for each element of the alphabet (`None` when that transition is absent).
#[derive(Clone, Debug, PartialEq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) kind: StateKind,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) transitions: Vec<Option<usize>>,
}

/// Metadata is opaque and never contributes to an automaton's shape (see `crate::model`), so it
/// is deliberately excluded from the fingerprint -- two states differing only in metadata hash
/// identically.
impl Hash for DfaState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
        self.transitions.hash(state);
    }
}

impl DfaState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.kind.is_initial()
    }

    pub fn is_accepting(&self) -> bool {
        self.kind.is_final()
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Gets a list of transitions, as state indices for each element of the alphabet, in the
    /// alphabet's ordering. An entry is `None` where the DFA is partial.
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl From<DfaState> for NfaState {
    fn from(value: DfaState) -> Self {
        let DfaState {
            name,
            kind,
            metadata,
            transitions,
        } = value;
        NfaState {
            name,
            kind,
            metadata,
            epsilon_transitions: vec![],
            transitions: transitions
                .into_iter()
                .map(|t| t.into_iter().collect())
                .collect(),
        }
    }
}

impl From<Dfa> for Nfa {
    fn from(value: Dfa) -> Self {
        value.to_nfa()
    }
}

/// Builds a [`Dfa`] from a flat list of states, the alphabet, a list of transitions, exactly one
/// initial state and a set of final states, running the full I1-I6 validation pass first.
///
/// Returns the built automaton together with the (non-error) warnings/infos the validator
/// produced, e.g. an I5 "DFA is not total" warning. Returns `Err` with an
/// [`EngineError::InvalidAutomaton`] referencing the first validation error if any invariant
/// fails.
pub fn build_dfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_state: &str,
    final_states: &[Rc<str>],
) -> Result<(Dfa, ValidationResult), EngineError> {
    use crate::model::AutomatonKind;

    let initial_rc: Rc<str> = Rc::from(initial_state);
    let initials = [initial_rc.clone()];
    let raw = RawAutomaton {
        kind: AutomatonKind::Dfa,
        states,
        alphabet,
        transitions,
        initial_states: &initials,
        final_states,
    };
    let validation = AutomatonValidator::validate_build(&raw);
    if !validation.is_valid() {
        let reason = validation
            .errors()
            .first()
            .map(|f| f.message.clone())
            .unwrap_or_else(|| "automaton failed validation".to_string());
        return Err(EngineError::InvalidAutomaton {
            reason,
            location: Some("build_dfa".to_string()),
        });
    }

    let final_set: HashSet<&Rc<str>> = final_states.iter().collect();
    let index_of: HashMap<&Rc<str>, usize> = states.iter().enumerate().map(|(i, s)| (&s.id, i)).collect();

    let mut transition_table = vec![vec![None; alphabet.len()]; states.len()];
    let symbol_index: HashMap<&Rc<str>, usize> = alphabet.iter().enumerate().map(|(i, s)| (s, i)).collect();
    for t in transitions {
        if let (Some(&src), Some(symbol)) = (index_of.get(&t.source), &t.symbol) {
            if let Some(&sym_idx) = symbol_index.get(symbol) {
                if let Some(&tgt) = index_of.get(&t.target) {
                    transition_table[src][sym_idx] = Some(tgt);
                }
            }
        }
    }

    let dfa_states = states
        .iter()
        .enumerate()
        .map(|(i, raw_state)| DfaState {
            name: raw_state.id.clone(),
            kind: StateKind::from_flags(raw_state.id == initial_rc, final_set.contains(&raw_state.id)),
            metadata: raw_state.metadata.clone(),
            transitions: std::mem::take(&mut transition_table[i]),
        })
        .collect();

    let dfa = Dfa {
        alphabet: Rc::from(alphabet),
        states: dfa_states,
        initial_state: *index_of.get(&initial_rc).expect("validated initial state exists"),
    };
    debug!(
        "built DFA with {} states, {} alphabet symbols, {} warnings",
        dfa.states.len(),
        dfa.alphabet.len(),
        validation.warnings().len()
    );
    Ok((dfa, validation))
}

impl Dfa {
    /// Assembles a `Dfa` directly from already-determinized parts, skipping I1-I6 validation.
    /// Used internally by subset construction, which builds a result that is correct by
    /// construction (state 0 is always reachable and initial, transitions are always dense).
    pub(crate) fn from_parts(alphabet: Rc<[Rc<str>]>, states: Vec<DfaState>, initial_state: usize) -> Self {
        Dfa { alphabet, states, initial_state }
    }

    /// Inverts this automata, making accepting states non-accepting and vice versa.
    pub fn invert(&mut self) {
        self.states.iter_mut().for_each(|s| {
            s.kind = StateKind::from_flags(s.kind.is_initial(), !s.kind.is_final());
        });
    }

    /// Constructs the union of two DFAs. Returns `None` if the alphabets differ.
    pub fn union(&self, other: &Self) -> Option<Self> {
        self.product_construction(other, |s1, s2| is_accepting(s1) || is_accepting(s2))
    }

    /// Constructs the intersection of two DFAs. Returns `None` if the alphabets differ.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.product_construction(other, |s1, s2| is_accepting(s1) && is_accepting(s2))
    }

    /// Constructs the difference of two DFAs. Returns `None` if the alphabets differ.
    pub fn difference(&self, other: &Self) -> Option<Self> {
        self.product_construction(other, |s1, s2| is_accepting(s1) && !is_accepting(s2))
    }

    /// Constructs the symmetric difference of two DFAs. Returns `None` if the alphabets differ.
    pub fn symmetric_difference(&self, other: &Self) -> Option<Self> {
        self.product_construction(other, |s1, s2| is_accepting(s1) != is_accepting(s2))
    }

    /// Constructs a new DFA from two DFAs using the product construction, an acceptance
    /// predicate deciding for every pair of (possibly-stuck, given partial DFAs) states whether
    /// the combined state is accepting. A `None` state means the corresponding DFA is stuck (no
    /// transition was defined), which is never accepting.
    pub fn product_construction(&self, other: &Self, mut combinator: impl FnMut(Option<&DfaState>, Option<&DfaState>) -> bool) -> Option<Self> {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return None;
        }

        let mut evaluators_to_explore = vec![(self.evaluator(), other.evaluator())];
        let q1 = Some(self.initial_state);
        let q2 = Some(other.initial_state);
        let mut explored_states = HashSet::new();
        explored_states.insert((q1, q2));

        let mut state_data = vec![];

        while let Some((s1, s2)) = evaluators_to_explore.pop() {
            let mut transition_list = Vec::with_capacity(self.alphabet.len());
            for elem in self.alphabet.iter() {
                let mut d1 = s1.clone();
                d1.step(elem).ok();
                let mut d2 = s2.clone();
                d2.step(elem).ok();
                let states = (d1.current_state_idx(), d2.current_state_idx());
                transition_list.push(states);
                if explored_states.insert(states) {
                    evaluators_to_explore.push((d1, d2));
                }
            }

            state_data.push((
                (s1.current_state_idx(), s2.current_state_idx()),
                combinator(s1.current_state(), s2.current_state()),
                transition_list,
            ));
        }

        let names = {
            let mut hm = HashSet::new();
            let potential_names = explored_states
                .iter()
                .map_while(|(s1, s2)| {
                    let combined_name: Rc<str> = Rc::from(format!(
                        "({},{})",
                        s1.map_or("-".to_string(), |s1| self.states[s1].name.to_string()),
                        s2.map_or("-".to_string(), |s2| other.states[s2].name.to_string())
                    ));
                    hm.insert(combined_name.clone()).then_some(((*s1, *s2), combined_name))
                })
                .collect::<HashMap<_, _>>();
            if potential_names.len() < state_data.len() {
                explored_states
                    .iter()
                    .enumerate()
                    .map(|(idx, (s1, s2))| ((*s1, *s2), Rc::from(format!("{idx}"))))
                    .collect()
            } else {
                potential_names
            }
        };

        let rev_state_idx_map = state_data
            .iter()
            .enumerate()
            .map(|(idx, ((s1, s2), _, _))| ((*s1, *s2), idx))
            .collect::<HashMap<_, _>>();
        let initial_state = *rev_state_idx_map.get(&(q1, q2)).expect("initial state should have an index");

        let states = state_data
            .into_iter()
            .map(|(states, accepting, transitions)| DfaState {
                name: names.get(&states).expect("all states should have a name").clone(),
                kind: StateKind::from_flags(states == (q1, q2), accepting),
                metadata: None,
                transitions: transitions
                    .into_iter()
                    .map(|pair| rev_state_idx_map.get(&pair).copied())
                    .collect(),
            })
            .collect::<Vec<_>>();
        Some(Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state,
        })
    }

    /// Minimizes this DFA: removes unreachable states, then merges non-distinguishable ones.
    pub fn minimize(&mut self) {
        self.minimize_with_config(&EngineConfig::default()).ok();
    }

    /// As [`Dfa::minimize`], but checkpoints against a caller-supplied [`EngineConfig`] between
    /// refinement iterations so a long minimization can be cancelled or timed out.
    ///
    /// Completes against a sink state first if partial: Hopcroft's refinement tells states
    /// apart by their transition targets, and two states that are both simply missing a
    /// transition on some symbol look identical to the refinement unless a sink state is there
    /// to distinguish them.
    pub fn minimize_with_config(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        if !self.is_total() {
            *self = crate::optimize::completed_with_sink(self);
        }
        self.remove_unreachable_states();
        self.merge_nondistinguishable_states_with_config(config)
    }

    pub fn merge_nondistinguishable_states(&mut self) {
        self.merge_nondistinguishable_states_with_config(&EngineConfig::default()).ok();
    }

    pub fn merge_nondistinguishable_states_with_config(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        let classes = self.state_equivalence_classes_idx_with_config(config)?;
        let mapper = classes
            .into_iter()
            .flat_map(|mut set| {
                debug_assert!(!set.is_empty(), "should not have empty equivalence classes");
                // Deterministic tie-break: keep the lexicographically-smallest state name.
                set.sort_by(|&a, &b| self.states[a].name.cmp(&self.states[b].name));
                let new = set[0];
                set.into_iter().skip(1).map(move |old| (old, new)).collect::<Vec<_>>()
            })
            .collect::<HashMap<_, _>>();
        let map = |idx| mapper.get(&idx).copied();
        self.remap_transitions(map);
        if let Some(new_initial) = map(self.initial_state) {
            self.initial_state = new_initial;
        }
        let to_remove = mapper.into_keys().collect();
        self.remove_states(to_remove);
        Ok(())
    }

    pub fn state_equivalence_classes(&self) -> Vec<Vec<&DfaState>> {
        self.state_equivalence_classes_idx()
            .into_iter()
            .map(|class| class.into_iter().map(|state| &self.states[state]).collect::<Vec<_>>())
            .collect()
    }

    /// Hopcroft's partition-refinement algorithm. Unlike the unordered-`HashSet`-of-classes
    /// version this is adapted from, classes are returned as sorted `Vec<usize>` so that the
    /// representative chosen by `merge_nondistinguishable_states` is deterministic.
    pub fn state_equivalence_classes_idx(&self) -> Vec<Vec<usize>> {
        self.state_equivalence_classes_idx_with_config(&EngineConfig::default())
            .expect("default config never triggers a checkpoint failure")
    }

    pub fn state_equivalence_classes_idx_with_config(&self, config: &EngineConfig) -> Result<Vec<Vec<usize>>, EngineError> {
        let (finals, nonfinals): (HashSet<usize>, HashSet<usize>) = (0..self.states.len()).partition(|&idx| self.states[idx].is_accepting());
        if finals.is_empty() {
            return Ok(vec![sorted(nonfinals)]);
        } else if nonfinals.is_empty() {
            return Ok(vec![sorted(finals)]);
        }
        let mut p = vec![finals, nonfinals];
        let mut w = p.clone();

        while let Some(a) = w.pop() {
            check_checkpoint(config, "dfa minimization refinement")?;
            for c in 0..self.alphabet.len() {
                let x: HashSet<usize> = self
                    .states
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.transitions[c].map_or(false, |t| a.contains(&t)))
                    .map(|(i, _)| i)
                    .collect();
                p = p
                    .into_iter()
                    .map(|y| (x.intersection(&y).copied().collect::<HashSet<_>>(), y.difference(&x).copied().collect::<HashSet<_>>(), y))
                    .flat_map(|(inters, diff, y)| {
                        if !inters.is_empty() && !diff.is_empty() {
                            if let Some(idx) = w.iter().position(|hs| hs == &y) {
                                w.swap_remove(idx);
                                w.push(inters.clone());
                                w.push(diff.clone());
                            } else if inters.len() <= diff.len() {
                                w.push(inters.clone());
                            } else {
                                w.push(diff.clone());
                            }
                            vec![inters, diff].into_iter()
                        } else {
                            vec![y].into_iter()
                        }
                    })
                    .collect()
            }
        }
        Ok(p.into_iter().map(sorted).collect())
    }

    pub fn remove_unreachable_states(&mut self) {
        let states = self.unreachable_state_idx().into_iter().collect();
        self.remove_states(states);
    }

    /// Removes an arbitrary set of state indices, as long as none is the initial state. Used by
    /// the optimization engine's non-coaccessible pruning pass.
    pub(crate) fn remove_state_set(&mut self, states: Vec<usize>) {
        self.remove_states(states);
    }

    pub fn unreachable_states(&self) -> Vec<&DfaState> {
        self.unreachable_state_idx().into_iter().map(|idx| &self.states[idx]).collect()
    }

    pub fn unreachable_state_idx(&self) -> HashSet<usize> {
        let reachables = self.reachable_state_idx();
        (0..self.states.len()).filter(|x| !reachables.contains(x)).collect()
    }

    pub fn has_reachable_accepting_state(&self) -> bool {
        self.reachable_state_idx().iter().any(|idx| self.states[*idx].is_accepting())
    }

    pub fn reachable_states(&self) -> Vec<&DfaState> {
        self.reachable_state_idx().into_iter().map(|idx| &self.states[idx]).collect()
    }

    pub fn reachable_state_idx(&self) -> HashSet<usize> {
        let mut reachables = HashSet::from([self.initial_state]);
        let mut new_states = reachables.clone();
        while !new_states.is_empty() {
            new_states = new_states
                .drain()
                .flat_map(|state| self.states[state].transitions.iter().filter_map(|t| *t))
                .filter(|&state| reachables.insert(state))
                .collect();
        }
        reachables
    }

    /// States with no path to any accepting state. Used by the optimization engine's pruning
    /// pass (non-coaccessible states are dead weight, since no accepted word can pass through them).
    pub fn coaccessible_state_idx(&self) -> HashSet<usize> {
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); self.states.len()];
        for (from, state) in self.states.iter().enumerate() {
            for target in state.transitions.iter().filter_map(|t| *t) {
                predecessors[target].push(from);
            }
        }
        let mut coaccessible: HashSet<usize> = (0..self.states.len()).filter(|&i| self.states[i].is_accepting()).collect();
        let mut frontier: Vec<usize> = coaccessible.iter().copied().collect();
        while let Some(idx) = frontier.pop() {
            for &pred in &predecessors[idx] {
                if coaccessible.insert(pred) {
                    frontier.push(pred);
                }
            }
        }
        coaccessible
    }

    fn remap_transitions(&mut self, mapper: impl Fn(usize) -> Option<usize>) {
        self.states.iter_mut().for_each(|state| {
            state.transitions.iter_mut().for_each(|trans| {
                if let Some(t) = trans {
                    *t = mapper(*t).unwrap_or(*t);
                }
            })
        })
    }

    fn remove_states(&mut self, mut to_remove: Vec<usize>) {
        if to_remove.is_empty() {
            return;
        }
        let mut old_state_idx = (0..self.states.len()).collect::<Vec<_>>();

        to_remove.sort_unstable();
        to_remove.dedup();
        if let Err(less_than) = to_remove.binary_search(&self.initial_state) {
            self.initial_state -= less_than;
        } else {
            panic!("cannot remove initial state");
        }

        to_remove.iter().rev().for_each(|&idx| {
            self.states.remove(idx);
            old_state_idx.remove(idx);
        });

        let map = |idx| {
            let res = old_state_idx.binary_search(&idx);
            if cfg!(debug_assertions) {
                Some(res.expect("no transitions to removed state"))
            } else {
                res.ok()
            }
        };
        self.remap_transitions(map);
    }

    /// Converts this DFA to a NFA by converting each state; cheap, no clones of strings.
    pub fn to_nfa(self) -> Nfa {
        let Dfa { alphabet, states, initial_state } = self;
        let states = states.into_iter().map(|s| s.into()).collect();
        trace!("converted DFA with {} states to NFA representation", states_len(&states));
        Nfa {
            alphabet,
            states,
            initial_states: vec![initial_state],
            kind: crate::model::AutomatonKind::Nfa,
        }
    }

    /// Checks if this automaton accepts the given string, failing with
    /// [`EngineError::UnknownSymbol`] if a symbol outside the alphabet is given.
    pub fn accepts(&self, string: &[&str]) -> Result<bool, EngineError> {
        let mut eval = self.evaluator();
        eval.step_multiple(string)?;
        Ok(eval.is_accepting())
    }

    pub fn graphemes_only(&self) -> bool {
        use unicode_segmentation::UnicodeSegmentation;
        self.alphabet.iter().all(|str| str.graphemes(true).count() == 1)
    }

    pub fn accepts_graphemes(&self, string: &str) -> Result<bool, EngineError> {
        use unicode_segmentation::UnicodeSegmentation;
        let graphemes = string.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    pub fn evaluator(&self) -> DfaEvaluator<'_> {
        self.into()
    }

    /// Checks if this DFA is equivalent to another, i.e. they accept the same language over the
    /// same alphabet. Used by the balancing engine to verify a transform preserved the language.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return false;
        }

        let mut evaluators_to_explore = vec![(self.evaluator(), other.evaluator())];
        let mut explored_states = HashSet::new();
        explored_states.insert((evaluators_to_explore[0].0.current_state_idx(), evaluators_to_explore[0].1.current_state_idx()));

        while let Some((s1, s2)) = evaluators_to_explore.pop() {
            if s1.is_accepting() != s2.is_accepting() {
                return false;
            }
            for elem in self.alphabet.iter() {
                let mut d1 = s1.clone();
                d1.step(elem).ok();
                let mut d2 = s2.clone();
                d2.step(elem).ok();
                if explored_states.insert((d1.current_state_idx(), d2.current_state_idx())) {
                    evaluators_to_explore.push((d1, d2));
                }
            }
        }
        true
    }

    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }

    /// Stable content hash over this DFA's canonical shape, used as a cache key by the
    /// optimization engine.
    pub fn fingerprint(&self) -> u64 {
        fingerprint(self)
    }

    /// True if every `(state, symbol)` pair has a transition, i.e. the DFA is total.
    pub fn is_total(&self) -> bool {
        self.states.iter().all(|s| s.transitions.iter().all(Option::is_some))
    }

    /// Retargets a single `(state, symbol)` transition in place. Used by incremental
    /// minimization to apply a caller-supplied edit before re-running partition refinement.
    pub(crate) fn set_transition(&mut self, state: usize, symbol: usize, target: Option<usize>) {
        self.states[state].transitions[symbol] = target;
    }

    /// Renumbers states according to `order` (`order[new_idx] = old_idx`). Used by the
    /// balancing engine's structural/performance strategies.
    pub(crate) fn reorder_states(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.states.len());
        let mut old_to_new = vec![0usize; self.states.len()];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx;
        }
        let mut new_states: Vec<DfaState> = order.iter().map(|&old_idx| self.states[old_idx].clone()).collect();
        for state in new_states.iter_mut() {
            for t in state.transitions.iter_mut() {
                *t = t.map(|idx| old_to_new[idx]);
            }
        }
        self.initial_state = old_to_new[self.initial_state];
        self.states = new_states;
    }
}

fn is_accepting(state: Option<&DfaState>) -> bool {
    state.map_or(false, DfaState::is_accepting)
}

fn sorted(set: HashSet<usize>) -> Vec<usize> {
    let mut v: Vec<usize> = set.into_iter().collect();
    v.sort_unstable();
    v
}

fn states_len(states: &[NfaState]) -> usize {
    states.len()
}
