//! Balancing metrics: the measurements `BalancingEngine` uses to pick and verify a strategy.

use crate::dfa::Dfa;
use std::collections::HashMap;
use std::rc::Rc;

/// Per-state access frequency. Defaults to uniform (`1.0` per state) when the caller has no
/// real profiling data to supply.
pub type AccessProfile = HashMap<Rc<str>, f64>;

pub fn uniform_profile(dfa: &Dfa) -> AccessProfile {
    dfa.states().iter().map(|s| (Rc::from(s.name()), 1.0)).collect()
}

/// Measurements of a DFA's shape and estimated runtime/memory behavior, computed for a given
/// access profile.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingMetrics {
    pub state_count: usize,
    pub transition_count: usize,
    pub mean_out_degree: f64,
    pub min_out_degree: usize,
    pub max_out_degree: usize,
    pub out_degree_variance: f64,
    pub memory_estimate_bytes: usize,
    pub recognition_complexity: f64,
}

impl BalancingMetrics {
    pub fn compute(dfa: &Dfa, profile: &AccessProfile) -> Self {
        let out_degrees: Vec<usize> = dfa.states().iter().map(|s| s.transitions().iter().filter(|t| t.is_some()).count()).collect();
        let state_count = dfa.states().len();
        let transition_count: usize = out_degrees.iter().sum();
        let mean = if state_count == 0 { 0.0 } else { transition_count as f64 / state_count as f64 };
        let variance = if state_count == 0 {
            0.0
        } else {
            out_degrees.iter().map(|&d| (d as f64 - mean).powi(2)).sum::<f64>() / state_count as f64
        };

        // Dense row per state (one `Option<usize>` slot per alphabet symbol); estimate assumes
        // 8 bytes per slot plus a small per-state overhead.
        let alphabet_len = dfa.alphabet().len();
        let memory_estimate_bytes = state_count * (alphabet_len * 8 + 32);

        let recognition_complexity = dfa
            .states()
            .iter()
            .zip(out_degrees.iter())
            .map(|(state, &degree)| degree as f64 * profile.get(state.name()).copied().unwrap_or(1.0))
            .sum();

        Self {
            state_count,
            transition_count,
            mean_out_degree: mean,
            min_out_degree: out_degrees.iter().copied().min().unwrap_or(0),
            max_out_degree: out_degrees.iter().copied().max().unwrap_or(0),
            out_degree_variance: variance,
            memory_estimate_bytes,
            recognition_complexity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawState, Transition};

    #[test]
    fn uniform_profile_assigns_one_to_every_state() {
        let states = vec![RawState::new("a"), RawState::new("b")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &[], &[], "a", &[]).unwrap();
        let profile = uniform_profile(&dfa);
        assert_eq!(profile.len(), 2);
        assert!(profile.values().all(|&v| v == 1.0));
    }

    #[test]
    fn metrics_reflect_out_degree() {
        let states = vec![RawState::new("a"), RawState::new("b")];
        let alphabet = vec![Rc::from("x"), Rc::from("y")];
        let transitions = vec![Transition::symbol_transition("a", "x", "b")];
        let (dfa, _) = crate::dfa::build_dfa(&states, &alphabet, &transitions, "a", &[Rc::from("b")]).unwrap();
        let metrics = BalancingMetrics::compute(&dfa, &uniform_profile(&dfa));
        assert_eq!(metrics.state_count, 2);
        assert_eq!(metrics.transition_count, 1);
        assert_eq!(metrics.max_out_degree, 1);
        assert_eq!(metrics.min_out_degree, 0);
    }
}
