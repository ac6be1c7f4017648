use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

///
/// Method
///
/// The collaborator operation a call runs on behalf of.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Create,
    Update,
    #[default]
    Validate,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Validate => "validate",
        };

        write!(f, "{label}")
    }
}

///
/// Scope
///
/// Method gate shared by omission directives and the `required_*` rules.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    Always,
    Only(Method),
}

impl Scope {
    #[must_use]
    pub fn admits(self, method: Method) -> bool {
        match self {
            Self::Always => true,
            Self::Only(only) => only == method,
        }
    }
}

///
/// CancelSignal
///
/// Advisory cancellation handed to every rule invocation. Clones share the
/// same flag. The engine never checks it; rules that block are expected to.
///

#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// A timeout too large to represent as an `Instant` means no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Instant::now()
            .checked_add(timeout)
            .map_or_else(Self::new, Self::with_deadline)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

///
/// Context
///
/// Per-call execution context. Built by the calling collaborator and borrowed
/// by one engine call.
///

#[derive(Clone, Debug, Default)]
pub struct Context {
    method: Method,
    allow_empty_fields: BTreeSet<String>,
    merge_fields: BTreeSet<String>,
    skip_validation: bool,
    cancel: CancelSignal,
}

impl Context {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn create() -> Self {
        Self::new(Method::Create)
    }

    #[must_use]
    pub fn update() -> Self {
        Self::new(Method::Update)
    }

    #[must_use]
    pub fn validation() -> Self {
        Self::new(Method::Validate)
    }

    /// Exempt a store path from omission even when its value is zero.
    #[must_use]
    pub fn allow_empty(mut self, path: impl Into<String>) -> Self {
        self.allow_empty_fields.insert(path.into());
        self
    }

    /// Mark a store path as merged into an existing document; merged paths are
    /// exempt from omission the same way `allow_empty` paths are.
    #[must_use]
    pub fn merge(mut self, path: impl Into<String>) -> Self {
        self.merge_fields.insert(path.into());
        self
    }

    #[must_use]
    pub const fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub const fn skips_validation(&self) -> bool {
        self.skip_validation
    }

    #[must_use]
    pub const fn allow_empty_fields(&self) -> &BTreeSet<String> {
        &self.allow_empty_fields
    }

    #[must_use]
    pub const fn merge_fields(&self) -> &BTreeSet<String> {
        &self.merge_fields
    }

    #[must_use]
    pub fn is_exempt(&self, store_path: &str) -> bool {
        self.allow_empty_fields.contains(store_path) || self.merge_fields.contains(store_path)
    }

    #[must_use]
    pub const fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_admits_matching_method_only() {
        assert!(Scope::Always.admits(Method::Create));
        assert!(Scope::Always.admits(Method::Validate));
        assert!(Scope::Only(Method::Update).admits(Method::Update));
        assert!(!Scope::Only(Method::Update).admits(Method::Create));
    }

    #[test]
    fn exemption_covers_both_sets() {
        let ctx = Context::update().allow_empty("age").merge("profile.bio");

        assert!(ctx.is_exempt("age"));
        assert!(ctx.is_exempt("profile.bio"));
        assert!(!ctx.is_exempt("profile"));
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let signal = CancelSignal::new();
        let ctx = Context::create().with_cancel(signal.clone());

        assert!(!ctx.is_cancelled());
        signal.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn elapsed_deadline_reads_as_cancelled() {
        let signal = CancelSignal::with_deadline(Instant::now());

        assert!(signal.is_cancelled());
        assert!(!CancelSignal::with_timeout(Duration::from_secs(3600)).is_cancelled());
    }

    #[test]
    fn unrepresentable_timeout_has_no_deadline() {
        let signal = CancelSignal::with_timeout(Duration::MAX);

        assert_eq!(signal.deadline(), None);
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn default_context_validates() {
        let ctx = Context::default();

        assert_eq!(ctx.method(), Method::Validate);
        assert!(!ctx.skips_validation());
    }
}
