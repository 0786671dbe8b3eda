//! Balancing engine: measures a DFA along several axes and reshapes it toward better
//! out-degree distribution, hot-state locality, or memory footprint, without changing its
//! language.
//!
//! Every strategy's output is verified against the input by [`Dfa::equivalent_to`] before
//! `auto_balance` returns it; a strategy that somehow changed the language surfaces as
//! [`EngineError::OptimizationValidationError`] rather than silently shipping a broken automaton.

pub mod memory;
pub mod metrics;
pub mod performance;
pub mod structural;

pub use memory::MemoryStrategy;
pub use metrics::{AccessProfile, BalancingMetrics};
pub use performance::PerformanceStrategy;
pub use structural::StructuralStrategy;

use crate::dfa::Dfa;
use crate::error::EngineError;
use std::collections::HashMap;
use std::rc::Rc;

/// The outcome of running a single balancing strategy: the transformed DFA plus its metrics
/// before and after, so a caller (or `auto_balance`) can judge whether the transform helped.
#[derive(Debug, Clone)]
pub struct BalancingResult {
    pub dfa: Dfa,
    pub metrics_before: BalancingMetrics,
    pub metrics_after: BalancingMetrics,
    /// Shortest word from the initial state to each of the hottest states, as precomputed by
    /// [`performance::fast_path_cache`]. Only [`PerformanceStrategy`] populates this; every
    /// other strategy leaves it `None`.
    pub fast_path_cache: Option<HashMap<Rc<str>, Vec<Rc<str>>>>,
}

/// A named transform that reshapes a DFA's internal structure while preserving its language.
pub trait BalancingStrategy {
    fn name(&self) -> &'static str;
    fn balance(&self, dfa: &Dfa, profile: &AccessProfile) -> Result<BalancingResult, EngineError>;
    fn metrics(&self, dfa: &Dfa, profile: &AccessProfile) -> BalancingMetrics {
        BalancingMetrics::compute(dfa, profile)
    }
    fn is_balanced(&self, dfa: &Dfa, profile: &AccessProfile) -> bool;
}

/// Which strategy to run: a specific one by name, or `Auto` to let the engine pick.
pub enum BalanceChoice<'a> {
    Named(&'a str),
    Auto,
}

/// A `name -> strategy` registry. `auto_balance` evaluates every registered strategy's metrics,
/// picks the one with the largest projected improvement in recognition complexity, applies it,
/// and verifies the result preserves the language before returning it.
pub struct BalancingEngine {
    strategies: HashMap<&'static str, Box<dyn BalancingStrategy>>,
}

impl Default for BalancingEngine {
    fn default() -> Self {
        let mut engine = Self { strategies: HashMap::new() };
        engine.register(Box::new(StructuralStrategy));
        engine.register(Box::new(PerformanceStrategy));
        engine.register(Box::new(MemoryStrategy));
        engine
    }
}

impl BalancingEngine {
    pub fn new() -> Self {
        Self { strategies: HashMap::new() }
    }

    pub fn register(&mut self, strategy: Box<dyn BalancingStrategy>) {
        self.strategies.insert(strategy.name(), strategy);
    }

    pub fn balance(&self, dfa: &Dfa, choice: BalanceChoice<'_>, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        match choice {
            BalanceChoice::Named(name) => {
                let strategy = self.strategies.get(name).ok_or_else(|| EngineError::UnknownBalancingStrategy { name: name.to_string() })?;
                self.run_and_verify(dfa, strategy.as_ref(), profile)
            }
            BalanceChoice::Auto => self.auto_balance(dfa, profile),
        }
    }

    /// Runs every registered strategy, picks the one with the largest drop in
    /// `recognition_complexity`, applies it, and verifies language preservation.
    pub fn auto_balance(&self, dfa: &Dfa, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        let before = BalancingMetrics::compute(dfa, profile);
        let mut best: Option<BalancingResult> = None;

        for strategy in self.strategies.values() {
            let candidate = self.run_and_verify(dfa, strategy.as_ref(), profile)?;
            let improvement = before.recognition_complexity - candidate.metrics_after.recognition_complexity;
            let best_improvement = best.as_ref().map_or(f64::NEG_INFINITY, |b: &BalancingResult| before.recognition_complexity - b.metrics_after.recognition_complexity);
            if improvement > best_improvement {
                best = Some(candidate);
            }
        }

        best.ok_or_else(|| EngineError::OptimizationValidationError {
            detail: "no balancing strategies registered".to_string(),
        })
    }

    fn run_and_verify(&self, dfa: &Dfa, strategy: &dyn BalancingStrategy, profile: &AccessProfile) -> Result<BalancingResult, EngineError> {
        let result = strategy.balance(dfa, profile)?;
        if !dfa.equivalent_to(&result.dfa) {
            return Err(EngineError::OptimizationValidationError {
                detail: format!("strategy '{}' changed the automaton's language", strategy.name()),
            });
        }
        Ok(result)
    }
}
