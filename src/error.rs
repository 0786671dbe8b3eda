//! The flat error taxonomy used across the engine (see the crate-level docs for the
//! propagation policy: validation problems are returned as data in a [`crate::validation::ValidationResult`],
//! everything here is returned as `Err` to short-circuit a transform).

use thiserror::Error;

/// Every way a call into this engine can fail, outside of the layered
/// [`crate::validation::ValidationResult`] used for reporting many problems at once.
///
/// This is deliberately a single flat enum rather than a hierarchy of error types: a caller
/// (CLI, service, …) can match on it exhaustively without walking an inheritance chain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An invariant (I1-I6) failed while constructing an automaton.
    #[error("invalid automaton: {reason}{}", location.as_ref().map(|l| format!(" (at {l})")).unwrap_or_default())]
    InvalidAutomaton {
        reason: String,
        location: Option<String>,
    },

    /// A word given to `accepts` contains a symbol outside the automaton's alphabet.
    #[error("unknown symbol '{symbol}'{}", position.map(|p| format!(" at position {p}")).unwrap_or_default())]
    UnknownSymbol {
        symbol: String,
        position: Option<usize>,
    },

    /// Subset construction would exceed the configured state cap.
    #[error("conversion produced more than {limit} states (stopped at {produced})")]
    ConversionTooLarge { limit: usize, produced: usize },

    /// A caller-supplied deadline elapsed mid-transform.
    #[error("operation timed out during {phase}")]
    OperationTimeout { phase: String },

    /// A caller-supplied cancellation token was observed set mid-transform.
    #[error("operation cancelled during {phase}")]
    OperationCancelled { phase: String },

    /// A post-transform equivalence check failed. This should be unreachable; if it fires it
    /// indicates a bug in the engine itself, not a problem with caller input.
    #[error("optimization validation failed: {detail}")]
    OptimizationValidationError { detail: String },

    /// `validate_value` was asked to validate an `EntityKind` with no registered validator.
    #[error("no validator registered for type '{type_name}'")]
    NoValidatorForType { type_name: String },

    /// `BalancingEngine::balance` was asked to run a strategy name nothing is registered under.
    #[error("no balancing strategy registered under '{name}'")]
    UnknownBalancingStrategy { name: String },
}
