//! Process-wide rule registry.
//!
//! Registration is expected to finish before any validation call references
//! a newly registered name. The registry itself is safe to read and write
//! concurrently, but a rule registered mid-flight may or may not be seen by
//! calls already running; ordering that is the caller's responsibility.

mod builtin;

use crate::{context::Context, value::Value, walker::FieldPath};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, RwLock},
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// REGISTRY
///

static REGISTRY: LazyLock<RwLock<RuleRegistry>> =
    LazyLock::new(|| RwLock::new(RuleRegistry::new()));

pub type ValidationFn =
    Arc<dyn Fn(&RuleContext<'_>, &Value) -> Result<bool, RuleError> + Send + Sync>;

pub type TransformationFn =
    Arc<dyn Fn(&RuleContext<'_>, Value) -> Result<Value, RuleError> + Send + Sync>;

/// Register a validation rule in the process-wide registry.
/// An existing rule with the same name is replaced.
pub fn register_validation<F>(name: impl Into<String>, rule: F)
where
    F: Fn(&RuleContext<'_>, &Value) -> Result<bool, RuleError> + Send + Sync + 'static,
{
    REGISTRY
        .write()
        .expect("rule registry poisoned while acquiring write lock")
        .register_validation(name, rule);
}

/// Register a transformation rule in the process-wide registry.
/// An existing rule with the same name is replaced.
pub fn register_transformation<F>(name: impl Into<String>, rule: F)
where
    F: Fn(&RuleContext<'_>, Value) -> Result<Value, RuleError> + Send + Sync + 'static,
{
    REGISTRY
        .write()
        .expect("rule registry poisoned while acquiring write lock")
        .register_transformation(name, rule);
}

#[must_use]
pub fn resolve_validation(name: &str) -> Option<ValidationFn> {
    GlobalRules.validation(name)
}

#[must_use]
pub fn resolve_transformation(name: &str) -> Option<TransformationFn> {
    GlobalRules.transformation(name)
}

///
/// RuleResolver
///
/// Name → rule lookup used by the engine. Resolved rules are cloned out so
/// no lock is held while a rule runs.
///

pub trait RuleResolver {
    fn validation(&self, name: &str) -> Option<ValidationFn>;

    fn transformation(&self, name: &str) -> Option<TransformationFn>;
}

///
/// GlobalRules
/// resolver backed by the process-wide registry
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalRules;

impl RuleResolver for GlobalRules {
    fn validation(&self, name: &str) -> Option<ValidationFn> {
        REGISTRY
            .read()
            .expect("rule registry poisoned while acquiring read lock")
            .validation(name)
    }

    fn transformation(&self, name: &str) -> Option<TransformationFn> {
        REGISTRY
            .read()
            .expect("rule registry poisoned while acquiring read lock")
            .transformation(name)
    }
}

///
/// RuleRegistry
///
/// `new` / `default` pre-register the built-in validations (`required`,
/// `required_create`, `required_update`, `required_validate`, `min`, `max`,
/// `email`). There are no built-in transformations.
///

#[derive(Clone)]
pub struct RuleRegistry {
    validations: HashMap<String, ValidationFn>,
    transformations: HashMap<String, TransformationFn>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::install(&mut registry);

        registry
    }

    /// A registry without the built-in rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validations: HashMap::new(),
            transformations: HashMap::new(),
        }
    }

    pub fn register_validation<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleContext<'_>, &Value) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self.validations.insert(name.clone(), Arc::new(rule)).is_some();

        debug!(rule = %name, replaced, "validation rule registered");
    }

    pub fn register_transformation<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&RuleContext<'_>, Value) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        let name = name.into();
        let replaced = self
            .transformations
            .insert(name.clone(), Arc::new(rule))
            .is_some();

        debug!(rule = %name, replaced, "transformation rule registered");
    }

    #[must_use]
    pub fn contains_validation(&self, name: &str) -> bool {
        self.validations.contains_key(name)
    }

    #[must_use]
    pub fn contains_transformation(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut validations: Vec<_> = self.validations.keys().collect();
        let mut transformations: Vec<_> = self.transformations.keys().collect();
        validations.sort();
        transformations.sort();

        f.debug_struct("RuleRegistry")
            .field("validations", &validations)
            .field("transformations", &transformations)
            .finish()
    }
}

impl RuleResolver for RuleRegistry {
    fn validation(&self, name: &str) -> Option<ValidationFn> {
        self.validations.get(name).cloned()
    }

    fn transformation(&self, name: &str) -> Option<TransformationFn> {
        self.transformations.get(name).cloned()
    }
}

///
/// RuleContext
///
/// Everything a rule sees besides the value itself. `zero` reports whether
/// the value holds the zero value of the field's type; a set reference to a
/// record is never zero even when all of its fields are.
///

#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub ctx: &'a Context,
    pub path: &'a FieldPath,
    pub rule: &'a str,
    pub param: Option<&'a str>,
    pub zero: bool,
}

impl RuleContext<'_> {
    #[must_use]
    pub const fn method(&self) -> crate::context::Method {
        self.ctx.method()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.ctx.is_cancelled()
    }

    /// The parameter parsed as a number; absence or garbage is a
    /// configuration error.
    pub fn numeric_param(&self) -> Result<f64, RuleError> {
        let param = self
            .param
            .filter(|p| !p.is_empty())
            .ok_or_else(|| RuleError::MissingParam {
                rule: self.rule.to_string(),
            })?;

        param.parse().map_err(|_| RuleError::InvalidParam {
            rule: self.rule.to_string(),
            param: param.to_string(),
        })
    }
}

///
/// RuleError
///
/// Returned by rule functions. Any rule error aborts the call; parameter
/// errors surface as `ConfigError::InvalidParam`, everything else as
/// `ConfigError::RuleFailed`.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RuleError {
    #[error("rule '{rule}' requires a parameter")]
    MissingParam { rule: String },

    #[error("rule '{rule}' expects a numeric parameter, got '{param}'")]
    InvalidParam { rule: String, param: String },

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    #[must_use]
    pub const fn is_param_error(&self) -> bool {
        matches!(self, Self::MissingParam { .. } | Self::InvalidParam { .. })
    }
}

///
/// TESTS
///
