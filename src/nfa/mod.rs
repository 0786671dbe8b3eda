//! # Nondeterministic Finite Automaton, with or without ε-moves
//!
//! The [Nfa] struct represents both plain NFAs and εNFAs; [`Nfa::kind`] tags which one
//! explicitly rather than inferring it from whether `epsilon_transitions` happens to be
//! non-empty, since an εNFA with no epsilon transitions yet is still an εNFA as far as the wire
//! format and validation are concerned.
//!
//! ## Operations
//! * [Nfa::accepts] / [Nfa::evaluator] — recognition
//! * [Nfa::to_dfa] — subset construction
//! * [Nfa::remove_epsilon_moves] — ε-elimination, used to convert an εNFA down to a plain NFA
//! * [Nfa::union] / [Nfa::intersection] / [Nfa::product_construction]
//! * [Nfa::optimize] — [Nfa::remove_unreachable_states] + [Nfa::remove_epsilon_moves]

use crate::error::EngineError;
use crate::model::{fingerprint, AutomatonKind, Metadata, RawState, StateKind, Transition, TransitionKind};
use crate::dfa::{Dfa, DfaState};
use crate::util::alphabet_equal;
use crate::validation::automaton::{AutomatonValidator, RawAutomaton};
use crate::validation::ValidationResult;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::{iter, mem};

pub mod eval;

pub use eval::NfaEvaluator;

/// A non-deterministic finite automaton (with or without ε-moves), denoted by its alphabet,
/// states, a non-empty *set* of initial states, and an explicit [`AutomatonKind`] tag (`Nfa` or
/// `Enfa`). Unlike a [`crate::dfa::Dfa`], which I2 requires to have exactly one initial state,
/// a `Nfa` may start in any number of states at once.
#[derive(Clone, Debug)]
pub struct Nfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<NfaState>,
    /// Sorted, deduplicated, non-empty.
    pub(crate) initial_states: Vec<usize>,
    pub(crate) kind: AutomatonKind,
}

impl PartialEq for Nfa {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.initial_states == other.initial_states
            && alphabet_equal(&self.alphabet, &other.alphabet)
            && self.states == other.states
    }
}

impl Hash for Nfa {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.alphabet.len().hash(state);
        for symbol in self.alphabet.iter() {
            symbol.hash(state);
        }
        self.states.hash(state);
        self.initial_states.hash(state);
    }
}

/// A state in a NFA/εNFA: its name, derived [`StateKind`], opaque metadata, any amount of
/// epsilon transitions and any amount of transitions for each element in the alphabet.
#[derive(Clone, Debug, PartialEq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) kind: StateKind,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl Hash for NfaState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
        self.epsilon_transitions.hash(state);
        self.transitions.hash(state);
    }
}

impl NfaState {
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

    pub fn transitions(&self) -> &[Vec<usize>] {
        self.transitions.as_slice()
    }

    pub fn epsilon_transitions(&self) -> &[usize] {
        self.epsilon_transitions.as_slice()
    }
}

/// Builds a plain [`Nfa`] (no epsilon moves permitted) from raw builder input, running I1-I6.
/// `initial_states` is a non-empty set of initial state ids -- unlike a [`crate::dfa::Dfa`], a
/// `Nfa` may start in more than one state at once.
pub fn build_nfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_states: &[Rc<str>],
    final_states: &[Rc<str>],
) -> Result<(Nfa, ValidationResult), EngineError> {
    build_nfa_kind(states, alphabet, transitions, initial_states, final_states, AutomatonKind::Nfa)
}

/// Builds an [`Nfa`] tagged as an εNFA (epsilon transitions are permitted) from raw builder input.
pub fn build_enfa(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_states: &[Rc<str>],
    final_states: &[Rc<str>],
) -> Result<(Nfa, ValidationResult), EngineError> {
    build_nfa_kind(states, alphabet, transitions, initial_states, final_states, AutomatonKind::Enfa)
}

fn build_nfa_kind(
    states: &[RawState],
    alphabet: &[Rc<str>],
    transitions: &[Transition],
    initial_states: &[Rc<str>],
    final_states: &[Rc<str>],
    kind: AutomatonKind,
) -> Result<(Nfa, ValidationResult), EngineError> {
    let raw = RawAutomaton {
        kind,
        states,
        alphabet,
        transitions,
        initial_states,
        final_states,
    };
    let validation = AutomatonValidator::validate_build(&raw);
    if !validation.is_valid() {
        let reason = validation.errors().first().map(|f| f.message.clone()).unwrap_or_else(|| "automaton failed validation".to_string());
        return Err(EngineError::InvalidAutomaton {
            reason,
            location: Some("build_nfa".to_string()),
        });
    }

    let initial_set: HashSet<&Rc<str>> = initial_states.iter().collect();
    let final_set: HashSet<&Rc<str>> = final_states.iter().collect();
    let index_of: HashMap<&Rc<str>, usize> = states.iter().enumerate().map(|(i, s)| (&s.id, i)).collect();
    let symbol_index: HashMap<&Rc<str>, usize> = alphabet.iter().enumerate().map(|(i, s)| (s, i)).collect();

    let mut transition_table: Vec<Vec<Vec<usize>>> = vec![vec![Vec::new(); alphabet.len()]; states.len()];
    let mut epsilon_table: Vec<Vec<usize>> = vec![Vec::new(); states.len()];

    for t in transitions {
        let Some(&src) = index_of.get(&t.source) else { continue };
        let Some(&tgt) = index_of.get(&t.target) else { continue };
        match (&t.kind, &t.symbol) {
            (TransitionKind::Epsilon, _) => epsilon_table[src].push(tgt),
            (_, Some(symbol)) => {
                if let Some(&sym_idx) = symbol_index.get(symbol) {
                    transition_table[src][sym_idx].push(tgt);
                }
            }
            _ => {}
        }
    }

    let nfa_states = states
        .iter()
        .enumerate()
        .map(|(i, raw_state)| NfaState {
            name: raw_state.id.clone(),
            kind: StateKind::from_flags(initial_set.contains(&raw_state.id), final_set.contains(&raw_state.id)),
            metadata: raw_state.metadata.clone(),
            epsilon_transitions: mem::take(&mut epsilon_table[i]),
            transitions: mem::take(&mut transition_table[i]),
        })
        .collect();

    let mut initial_idx: Vec<usize> = initial_states.iter().map(|id| *index_of.get(id).expect("validated initial state exists")).collect();
    initial_idx.sort_unstable();
    initial_idx.dedup();

    let nfa = Nfa {
        alphabet: Rc::from(alphabet),
        states: nfa_states,
        initial_states: initial_idx,
        kind,
    };
    debug!("built {} with {} states, {} warnings", kind, nfa.states.len(), validation.warnings().len());
    Ok((nfa, validation))
}

impl Nfa {
    /// Assembles a `Nfa` directly from already-built parts, skipping I1-I6 validation. Used by
    /// the language-algebra constructions, which build a result that is correct by
    /// construction (disjointified state sets, ε-wiring added by the construction itself).
    pub(crate) fn from_parts(alphabet: Rc<[Rc<str>]>, states: Vec<NfaState>, initial_states: Vec<usize>, kind: AutomatonKind) -> Self {
        debug_assert!(!initial_states.is_empty(), "a Nfa must have at least one initial state");
        Nfa {
            alphabet,
            states,
            initial_states,
            kind,
        }
    }

    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    /// Constructs the union of two NFAs by adding a fresh initial state with epsilon
    /// transitions to both automata's initial states. Cheap: takes ownership since it never
    /// needs to clone either automaton. Returns `Err` with both automata unchanged if the
    /// alphabets differ.
    pub fn union(mut self, mut other: Self) -> Result<Self, (Self, Self)> {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return Err((self, other));
        }

        let alphabet_translation = other
            .alphabet
            .iter()
            .map(|elem1| self.alphabet.iter().enumerate().find_map(|(idx, elem2)| (elem1 == elem2).then_some(idx)).unwrap())
            .collect::<Vec<usize>>();

        if !alphabet_translation.windows(2).all(|v| v[0] < v[1]) {
            for state in other.states.iter_mut() {
                state.transitions = {
                    let mut vec = state.transitions.drain(..).zip(alphabet_translation.iter()).collect::<Vec<_>>();
                    vec.sort_by_key(|(_, b)| **b);
                    vec.into_iter().map(|(a, _)| a).collect()
                };
            }
        }

        let a_states = self.states.len();
        let remapping = |b_idx| Some(b_idx + a_states);
        other.remap_transitions(remapping);

        let b_initials: Vec<usize> = other.initial_states.iter().map(|&idx| remapping(idx).unwrap()).collect();
        let a_initials = self.initial_states.clone();
        self.states.extend(other.states);

        let names = self.states.iter().map(|s| s.name.as_ref()).collect::<HashSet<_>>();
        if names.len() != self.states.len() {
            let mut iter = 1..;
            self.states.iter_mut().for_each(|state| state.name = iter.next().map(|i| Rc::from(i.to_string().as_str())).unwrap());
        }

        let new_initial_state = NfaState {
            name: self.fresh_name("s_new"),
            kind: StateKind::Initial,
            metadata: None,
            epsilon_transitions: a_initials.iter().chain(b_initials.iter()).copied().collect(),
            transitions: vec![vec![]; self.alphabet.len()],
        };

        for idx in a_initials.into_iter().chain(b_initials) {
            self.demote_initial(idx);
        }
        self.initial_states = vec![self.states.len()];
        self.kind = AutomatonKind::Enfa;
        self.states.push(new_initial_state);
        Ok(self)
    }

    fn demote_initial(&mut self, idx: usize) {
        let s = &mut self.states[idx];
        s.kind = StateKind::from_flags(false, s.kind.is_final());
    }

    /// Constructs the intersection of two NFAs via the product construction.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.product_construction(other, |s1, s2| s1.zip(s2).map_or(false, |(s1, s2)| s1.is_accepting() && s2.is_accepting()))
    }

    /// Constructs a new NFA from two NFAs using the product construction. The combinator
    /// receives `None` for a side that currently has no active state.
    ///
    /// This is only sound for union/intersection: unlike the DFA product construction, negating
    /// one side's acceptance here does not produce the complement, since a NFA in "not
    /// accepting" isn't the same as "rejecting" (see module docs).
    pub fn product_construction(&self, other: &Self, mut combinator: impl FnMut(Option<&NfaState>, Option<&NfaState>) -> bool) -> Option<Self> {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return None;
        }

        let alphabet_translation = self
            .alphabet
            .iter()
            .map(|elem1| other.alphabet.iter().enumerate().find_map(|(idx, elem2)| (elem1 == elem2).then_some(idx)).unwrap())
            .collect::<Vec<usize>>();

        let seeds: Vec<(Option<usize>, Option<usize>)> = self
            .initial_states
            .iter()
            .flat_map(|&q1| other.initial_states.iter().map(move |&q2| (Some(q1), Some(q2))))
            .collect();
        let mut state_pairs_to_explore = seeds.clone();
        let mut explored_states: HashSet<_> = seeds.iter().copied().collect();

        let mut state_data = vec![];

        while let Some((s1, s2)) = state_pairs_to_explore.pop() {
            let mut transition_list = Vec::with_capacity(self.alphabet.len());
            let mut eps_transitions = Vec::with_capacity(
                s1.map_or(0, |s1| self.states[s1].epsilon_transitions.len()) + s2.map_or(0, |s2| other.states[s2].epsilon_transitions.len()),
            );

            for elem in 0..self.alphabet.len() {
                let other_elem = alphabet_translation[elem];
                let mut elem_transitions = Vec::new();

                match (
                    s1.filter(|&idx| !self.states[idx].transitions[elem].is_empty()),
                    s2.filter(|&idx| !other.states[idx].transitions[other_elem].is_empty()),
                ) {
                    (Some(s1), Some(s2)) => {
                        for &tr1 in &self.states[s1].transitions[elem] {
                            for &tr2 in &other.states[s2].transitions[other_elem] {
                                let states = (Some(tr1), Some(tr2));
                                elem_transitions.push(states);
                                if explored_states.insert(states) {
                                    state_pairs_to_explore.push(states);
                                }
                            }
                        }
                    }
                    (Some(s1), None) => {
                        for &tr1 in &self.states[s1].transitions[elem] {
                            let states = (Some(tr1), None);
                            elem_transitions.push(states);
                            if explored_states.insert(states) {
                                state_pairs_to_explore.push(states);
                            }
                        }
                    }
                    (None, Some(s2)) => {
                        for &tr2 in &other.states[s2].transitions[other_elem] {
                            let states = (None, Some(tr2));
                            elem_transitions.push(states);
                            if explored_states.insert(states) {
                                state_pairs_to_explore.push(states);
                            }
                        }
                    }
                    (None, None) => {}
                }

                transition_list.push(elem_transitions);
            }

            if let Some(s1) = s1 {
                for &eps1 in &self.states[s1].epsilon_transitions {
                    let states = (Some(eps1), s2);
                    eps_transitions.push(states);
                    if explored_states.insert(states) {
                        state_pairs_to_explore.push(states);
                    }
                }
            }
            if let Some(s2) = s2 {
                for &eps2 in &other.states[s2].epsilon_transitions {
                    let states = (s1, Some(eps2));
                    eps_transitions.push(states);
                    if explored_states.insert(states) {
                        state_pairs_to_explore.push(states);
                    }
                }
            }

            state_data.push((
                (s1, s2),
                combinator(s1.map(|s1| &self.states[s1]), s2.map(|s2| &other.states[s2])),
                transition_list,
                eps_transitions,
            ));
        }

        let names = {
            let mut hm = HashSet::new();
            let potential_names = explored_states
                .iter()
                .map_while(|(s1, s2)| {
                    let combined_name: Rc<str> = Rc::from(format!(
                        "({},{})",
                        s1.map_or("none", |s1| &self.states[s1].name),
                        s2.map_or("none", |s2| &other.states[s2].name)
                    ));
                    hm.insert(combined_name.clone()).then_some(((*s1, *s2), combined_name))
                })
                .collect::<HashMap<_, _>>();
            if potential_names.len() < state_data.len() {
                explored_states.iter().enumerate().map(|(idx, (s1, s2))| ((*s1, *s2), Rc::from(format!("{idx}")))).collect()
            } else {
                potential_names
            }
        };

        let rev_state_idx_map = state_data.iter().enumerate().map(|(idx, ((s1, s2), _, _, _))| ((*s1, *s2), idx)).collect::<HashMap<_, _>>();
        let initial_states: Vec<usize> = {
            let mut idxs: Vec<usize> = seeds.iter().map(|pair| *rev_state_idx_map.get(pair).expect("seed state should have an index")).collect();
            idxs.sort_unstable();
            idxs.dedup();
            idxs
        };
        let seed_set: HashSet<_> = seeds.iter().copied().collect();

        let has_epsilon = state_data.iter().any(|(_, _, _, eps)| !eps.is_empty());

        let states = state_data
            .into_iter()
            .map(|(states, accepting, transitions, epsilon_transitions)| NfaState {
                name: names.get(&states).expect("all states should have a name").clone(),
                kind: StateKind::from_flags(seed_set.contains(&states), accepting),
                metadata: None,
                transitions: transitions
                    .into_iter()
                    .map(|transition_list| {
                        transition_list.iter().map(|states| *rev_state_idx_map.get(states).expect("each state pair with transition to it should have an idx")).collect()
                    })
                    .collect(),
                epsilon_transitions: epsilon_transitions
                    .into_iter()
                    .map(|states| *rev_state_idx_map.get(&states).expect("each state pair with transition to it should have an idx"))
                    .collect(),
            })
            .collect::<Vec<_>>();
        Some(Nfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_states,
            kind: if has_epsilon { AutomatonKind::Enfa } else { AutomatonKind::Nfa },
        })
    }

    /// Removes unreachable states, then all epsilon moves.
    pub fn optimize(&mut self) {
        self.remove_unreachable_states();
        self.remove_epsilon_moves();
    }

    /// Removes all epsilon moves from this automaton, demoting it to a plain NFA
    /// (`self.kind()` becomes [`AutomatonKind::Nfa`]). Inlines the epsilon closure of each
    /// state's targets into its normal transitions, then discards states that become dead
    /// (no non-epsilon transitions, not accepting, not initial).
    pub fn remove_epsilon_moves(&mut self) {
        if !self.has_epsilon_moves() {
            self.kind = AutomatonKind::Nfa;
            return;
        }

        let closures = (0..self.states.len()).filter_map(|idx| self.closure(idx)).collect::<Vec<_>>();

        self.states.iter_mut().for_each(|state| {
            state.transitions.iter_mut().for_each(|transition_set| {
                *transition_set = transition_set.iter().fold(HashSet::new(), |mut set, transition| {
                    set.extend(&closures[*transition]);
                    set
                }).drain().collect();
            });
            state.epsilon_transitions.clear();
        });

        let mut dead_states = HashSet::new();
        let mut added_states = true;
        while added_states {
            added_states = false;
            for (idx, state) in self.states.iter().enumerate() {
                if !dead_states.contains(&idx)
                    && !state.is_accepting()
                    && !state.is_initial()
                    && state.transitions.iter().all(|transitions| transitions.iter().all(|idx| dead_states.contains(idx)))
                {
                    dead_states.insert(idx);
                    added_states = true;
                }
            }
        }

        // Starting nondeterministically in any of several initial states is, for language
        // purposes, equivalent to starting in the union of their closures. Only when there was
        // exactly one initial state to begin with, and its own closure didn't reach any other
        // state, can it simply stay the sole initial state unchanged.
        let init_closure: HashSet<usize> = self.initial_states.iter().flat_map(|&i| closures[i].iter().copied()).filter(|x| !dead_states.contains(x)).collect();
        let single_initial_is_its_own_closure = self.initial_states.len() == 1 && init_closure.len() == 1 && init_closure.contains(&self.initial_states[0]);

        if !single_initial_is_its_own_closure {
            let old_initials = self.initial_states.clone();
            for &old in &old_initials {
                self.demote_initial(old);
            }

            let new_state_name = self.fresh_name("s_new");
            let transitions = (0..self.alphabet.len())
                .map(|elem_idx| {
                    init_closure
                        .iter()
                        .fold(HashSet::new(), |mut set, &state| {
                            set.extend(self.states[state].transitions[elem_idx].iter().copied());
                            set
                        })
                        .drain()
                        .filter(|i| !dead_states.contains(i))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            let new_state = NfaState {
                name: new_state_name,
                kind: StateKind::from_flags(true, init_closure.iter().any(|idx| self.states[*idx].is_accepting())),
                metadata: None,
                epsilon_transitions: vec![],
                transitions,
            };
            self.initial_states = vec![self.states.len()];
            self.states.push(new_state);
        }

        self.states.iter_mut().for_each(|state| {
            state.transitions.iter_mut().for_each(|transition| transition.retain(|idx| !dead_states.contains(idx)))
        });

        self.remove_states(dead_states.drain().collect());
        self.kind = AutomatonKind::Nfa;
    }

    fn remove_states(&mut self, mut to_remove: Vec<usize>) {
        if to_remove.is_empty() {
            return;
        }
        let mut old_state_idx = (0..self.states.len()).collect::<Vec<_>>();

        to_remove.sort_unstable();
        to_remove.dedup();
        self.initial_states = self
            .initial_states
            .iter()
            .map(|&idx| match to_remove.binary_search(&idx) {
                Err(less_than) => idx - less_than,
                Ok(_) => panic!("cannot remove initial state"),
            })
            .collect();

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

    fn remap_transitions(&mut self, mapper: impl Fn(usize) -> Option<usize>) {
        self.states.iter_mut().for_each(|state| {
            state.transitions.iter_mut().for_each(|table| table.iter_mut().for_each(|trans| *trans = mapper(*trans).unwrap_or(*trans)));
            state.epsilon_transitions.iter_mut().for_each(|trans| *trans = mapper(*trans).unwrap_or(*trans));
        })
    }

    fn fresh_name(&mut self, wanted: &str) -> Rc<str> {
        if self.states.iter().all(|s| s.name.as_ref() != wanted) {
            Rc::from(wanted)
        } else {
            (0..).map(|i| Rc::from(i.to_string().as_str())).find(|n| self.states.iter().all(|s| &s.name != n)).unwrap()
        }
    }

    pub fn remove_unreachable_states(&mut self) {
        let states = self.unreachable_state_idx().into_iter().collect();
        self.remove_states(states);
    }

    pub fn unreachable_states(&self) -> Vec<&NfaState> {
        self.unreachable_state_idx().into_iter().map(|idx| &self.states[idx]).collect()
    }

    pub fn unreachable_state_idx(&self) -> HashSet<usize> {
        let reachables = self.reachable_state_idx();
        (0..self.states.len()).filter(|x| !reachables.contains(x)).collect()
    }

    pub fn has_reachable_accepting_state(&self) -> bool {
        self.reachable_state_idx().iter().any(|idx| self.states[*idx].is_accepting())
    }

    pub fn reachable_states(&self) -> Vec<&NfaState> {
        self.reachable_state_idx().into_iter().map(|idx| &self.states[idx]).collect()
    }

    pub fn reachable_state_idx(&self) -> HashSet<usize> {
        let mut reachables: HashSet<usize> = self.initial_states.iter().copied().collect();
        let mut new_states = reachables.clone();
        while !new_states.is_empty() {
            new_states = new_states
                .drain()
                .flat_map(|state| self.states[state].transitions.iter().flatten().copied().chain(self.closure(state).unwrap()))
                .filter(|&state| reachables.insert(state))
                .collect();
        }
        reachables
    }

    /// Converts this NFA/εNFA to a DFA using subset construction. State names in the result are
    /// sequential from `0`; state `0` is always the initial state.
    pub fn to_dfa(&self) -> Dfa {
        self.to_dfa_with_config(&crate::config::EngineConfig::default()).expect("default config never triggers a checkpoint or cap failure")
    }

    /// As [`Nfa::to_dfa`], but checkpoints against the given [`EngineConfig`] and fails with
    /// [`EngineError::ConversionTooLarge`] if the state cap is exceeded.
    pub fn to_dfa_with_config(&self, config: &crate::config::EngineConfig) -> Result<Dfa, EngineError> {
        let mut gen = 0usize..;
        let mut map = HashMap::new();
        let mut accepting = HashSet::new();
        let mut to_explore = vec![self.evaluator()];
        let mut transitions = HashMap::new();

        {
            let key = Self::set_to_vec(to_explore[0].current_states_idx());
            let n = gen.next().unwrap();
            map.insert(key, n);
            if to_explore[0].is_accepting() {
                accepting.insert(n);
            }
        }

        while let Some(eval) = to_explore.pop() {
            crate::config::check_checkpoint(config, "nfa subset construction")?;
            if map.len() > config.subset_construction_state_cap {
                return Err(EngineError::ConversionTooLarge {
                    limit: config.subset_construction_state_cap,
                    produced: map.len(),
                });
            }
            let mut tr = Vec::with_capacity(self.alphabet.len());
            for new_evaluator in eval.step_all() {
                let is_accepting = new_evaluator.is_accepting();
                let key = Self::set_to_vec(new_evaluator.current_states_idx());
                if !map.contains_key(&key) {
                    to_explore.push(new_evaluator);
                }
                let x = *map.entry(key).or_insert_with(|| gen.next().unwrap());
                tr.push(Some(x));
                if is_accepting {
                    accepting.insert(x);
                }
            }
            transitions.insert(Self::set_to_vec(eval.current_states_idx()), tr);
        }

        let sorted_keys = {
            let mut vec = map.iter().collect::<Vec<_>>();
            vec.sort_by_key(|(_, &n)| n);
            vec
        };

        let states = sorted_keys
            .into_iter()
            .map(|(key, &n)| DfaState {
                name: Rc::from(n.to_string()),
                kind: StateKind::from_flags(n == 0, accepting.contains(&n)),
                metadata: None,
                transitions: transitions.remove(key).unwrap(),
            })
            .collect();

        debug!("subset construction produced {} DFA states from {} NFA states", map.len(), self.states.len());

        Ok(Dfa::from_parts(Rc::clone(&self.alphabet), states, 0))
    }

    /// Checks if this automaton accepts the given string, failing with
    /// [`EngineError::UnknownSymbol`] for a symbol outside the alphabet.
    pub fn accepts(&self, string: &[&str]) -> Result<bool, EngineError> {
        let mut eval = self.evaluator();
        eval.step_multiple(string)?;
        Ok(eval.is_accepting())
    }

    pub fn accepts_graphemes(&self, string: &str) -> Result<bool, EngineError> {
        use unicode_segmentation::UnicodeSegmentation;
        let graphemes = string.graphemes(true).collect::<Vec<_>>();
        self.accepts(&graphemes)
    }

    pub fn graphemes_only(&self) -> bool {
        use unicode_segmentation::UnicodeSegmentation;
        self.alphabet.iter().all(|str| str.graphemes(true).count() == 1)
    }

    pub fn has_epsilon_moves(&self) -> bool {
        self.states.iter().any(|state| !state.epsilon_transitions.is_empty())
    }

    pub fn evaluator(&self) -> NfaEvaluator<'_> {
        self.into()
    }

    pub fn closure(&self, start: usize) -> Option<HashSet<usize>> {
        if start >= self.states.len() {
            return None;
        }
        let mut all = HashSet::new();
        all.insert(start);
        let mut new = vec![start];
        while !new.is_empty() {
            let old_new = mem::take(&mut new);
            for state in old_new {
                for &eps_target in &self.states[state].epsilon_transitions {
                    if all.insert(eps_target) {
                        new.push(eps_target)
                    }
                }
            }
        }
        Some(all)
    }

    /// Checks if this NFA is equivalent to another, tracking all states reachable at the same
    /// time in both automata.
    pub fn equivalent_to(&self, other: &Nfa) -> bool {
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return false;
        }

        let mut evaluators_to_explore = vec![(self.evaluator(), other.evaluator())];
        let mut explored_states = HashSet::new();
        explored_states.insert((
            Self::set_to_vec(evaluators_to_explore[0].0.current_states_idx()),
            Self::set_to_vec(evaluators_to_explore[0].1.current_states_idx()),
        ));

        while let Some((s1, s2)) = evaluators_to_explore.pop() {
            if s1.is_accepting() != s2.is_accepting() {
                return false;
            }
            for elem in self.alphabet.iter() {
                let mut d1 = s1.clone();
                d1.step(elem).ok();
                let mut d2 = s2.clone();
                d2.step(elem).ok();
                if explored_states.insert((Self::set_to_vec(d1.current_states_idx()), Self::set_to_vec(d2.current_states_idx()))) {
                    evaluators_to_explore.push((d1, d2));
                }
            }
        }
        true
    }

    fn set_to_vec<T: Clone + Ord>(set: &HashSet<T>) -> Vec<T> {
        let mut vec = set.iter().cloned().collect::<Vec<_>>();
        vec.sort();
        vec
    }

    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// All states this automaton may start in. Non-empty, sorted, deduplicated.
    pub fn initial_states(&self) -> impl Iterator<Item = &NfaState> {
        self.initial_states.iter().map(|&idx| &self.states[idx])
    }

    pub fn initial_state_indices(&self) -> &[usize] {
        &self.initial_states
    }

    pub fn fingerprint(&self) -> u64 {
        fingerprint(self)
    }
}
