//! # Validation layer
//!
//! A [`ValidationResult`] carries three ordered, *append-only-while-building* lists
//! (errors/warnings/infos). The only mutable surface is [`ValidationResultBuilder`]; once
//! `.build()` is called the result has no mutating methods and `is_valid` is derived once from
//! `errors.is_empty()`, rather than a mutable result that flips `is_valid` as errors accumulate.
//!
//! Validators are not dispatched through a type hierarchy. [`EntityKind`] is a closed, total
//! enum and [`ValidationManager`] is just a `HashMap<EntityKind, _>` -- there's no "most
//! specific validator wins" problem to solve because there is no hierarchy to walk.

pub mod automaton;
pub mod state;
pub mod transition;

use crate::error::EngineError;
use std::collections::HashMap;
use std::fmt;

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single validation finding: a severity, a short machine-friendly code, and a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.code, self.message)
    }
}

/// The frozen result of validating one value: three ordered lists, plus `is_valid`, derived
/// once at construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    infos: Vec<Finding>,
    is_valid: bool,
}

impl ValidationResult {
    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn infos(&self) -> &[Finding] {
        &self.infos
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Merges another (already-frozen) result into a fresh one. Used by `AutomatonValidator`
    /// to compose `StateValidator`/`TransitionValidator` results over every entity.
    pub fn merge(results: impl IntoIterator<Item = ValidationResult>) -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();
        for result in results {
            builder.errors.extend(result.errors);
            builder.warnings.extend(result.warnings);
            builder.infos.extend(result.infos);
        }
        builder.build()
    }

    /// A short count summary, e.g. for logging: `(errors, warnings, infos)`.
    pub fn summarize(&self) -> (usize, usize, usize) {
        (self.errors.len(), self.warnings.len(), self.infos.len())
    }

    /// Convenience: turn the first error (if any) into an
    /// [`EngineError::InvalidAutomaton`], for callers that want to short-circuit on the
    /// boundary between "collect many problems" and "fail fast".
    pub fn into_invalid_automaton_error(self, location: Option<String>) -> Option<EngineError> {
        self.errors.first().map(|f| EngineError::InvalidAutomaton {
            reason: f.message.clone(),
            location,
        })
    }
}

/// The only mutable surface for assembling a [`ValidationResult`].
#[derive(Debug, Default)]
pub struct ValidationResultBuilder {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    infos: Vec<Finding>,
}

impl ValidationResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, code: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.push(Finding {
            severity: Severity::Error,
            code,
            message: message.into(),
        });
        self
    }

    pub fn warning(&mut self, code: &'static str, message: impl Into<String>) -> &mut Self {
        self.warnings.push(Finding {
            severity: Severity::Warning,
            code,
            message: message.into(),
        });
        self
    }

    pub fn info(&mut self, code: &'static str, message: impl Into<String>) -> &mut Self {
        self.infos.push(Finding {
            severity: Severity::Info,
            code,
            message: message.into(),
        });
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn build(self) -> ValidationResult {
        let is_valid = self.errors.is_empty();
        ValidationResult {
            errors: self.errors,
            warnings: self.warnings,
            infos: self.infos,
            is_valid,
        }
    }
}

/// A closed, total tag for every kind of value this crate can validate. Used as the
/// [`ValidationManager`] registry key instead of walking a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    State,
    Transition,
    Dfa,
    Nfa,
    Enfa,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::State => "State",
            EntityKind::Transition => "Transition",
            EntityKind::Dfa => "Dfa",
            EntityKind::Nfa => "Nfa",
            EntityKind::Enfa => "Enfa",
        };
        write!(f, "{name}")
    }
}

/// A `HashMap`-backed value the generic `validate_value` entry point can hold: a thunk
/// producing a [`ValidationResult`] for an opaque piece of already-serialized context.
pub type ValidatorFn = Box<dyn Fn(&serde_json::Value) -> ValidationResult + Send + Sync>;

/// Holds a `EntityKind -> validator` map. Installed once at startup and treated as read-only
/// thereafter -- no interior mutability is exposed past construction.
#[derive(Default)]
pub struct ValidationManager {
    validators: HashMap<EntityKind, ValidatorFn>,
}

impl ValidationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EntityKind, validator: ValidatorFn) {
        self.validators.insert(kind, validator);
    }

    /// Dispatches to the registered validator for `kind`. Fails with
    /// [`EngineError::NoValidatorForType`] if nothing is registered -- the one place in this
    /// crate where an unknown validator surfaces as a hard error rather than a finding, since
    /// there is no sensible `ValidationResult` to return for a type nobody knows how to check.
    pub fn validate(&self, kind: EntityKind, value: &serde_json::Value) -> Result<ValidationResult, EngineError> {
        self.validators
            .get(&kind)
            .map(|validator| validator(value))
            .ok_or_else(|| EngineError::NoValidatorForType {
                type_name: kind.to_string(),
            })
    }

    pub fn validate_all<'a>(
        &self,
        items: impl IntoIterator<Item = (EntityKind, &'a serde_json::Value)>,
    ) -> Result<Vec<ValidationResult>, EngineError> {
        items
            .into_iter()
            .map(|(kind, value)| self.validate(kind, value))
            .collect()
    }
}
