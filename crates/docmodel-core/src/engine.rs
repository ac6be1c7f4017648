use crate::{
    context::Context,
    error::{ConfigError, Error, FieldError, RuleKind, ValidationErrors},
    model::Directive,
    registry::{GlobalRules, RuleContext, RuleResolver},
    traits::Record,
    value::{Document, Value},
    walker::{self, FieldVisit, FieldVisitor, Step},
};
use tracing::{debug, trace, warn};

/// Validate and transform a record with the process-wide rule registry.
pub fn validate(record: &dyn Record, ctx: &Context) -> Result<Document, Error> {
    Engine::global().validate(record, ctx)
}

/// Validation-only entry point: the normalized document is discarded.
pub fn check(record: &dyn Record, ctx: &Context) -> Result<(), Error> {
    Engine::global().check(record, ctx)
}

///
/// Engine
///
/// Runs the directive pipeline of every visible field and assembles the
/// normalized document. Holds no state between calls.
///

#[derive(Clone, Copy)]
pub struct Engine<'r> {
    rules: &'r dyn RuleResolver,
}

impl Engine<'static> {
    #[must_use]
    pub fn global() -> Self {
        Self {
            rules: &GlobalRules,
        }
    }
}

impl<'r> Engine<'r> {
    #[must_use]
    pub const fn new(rules: &'r dyn RuleResolver) -> Self {
        Self { rules }
    }

    /// Returns the normalized document, the aggregated field errors, or the
    /// configuration error that aborted the walk.
    pub fn validate(&self, record: &dyn Record, ctx: &Context) -> Result<Document, Error> {
        let record_path = record.model().path;
        let mut pass = RulePass {
            rules: self.rules,
            ctx,
            errors: ValidationErrors::default(),
        };

        let doc = walker::walk(record, &mut pass).inspect_err(|err| {
            warn!(record = record_path, method = %ctx.method(), error = %err, "call aborted");
        })?;

        debug!(
            record = record_path,
            method = %ctx.method(),
            skip_validation = ctx.skips_validation(),
            fields = doc.len(),
            errors = pass.errors.len(),
            "record processed"
        );

        pass.errors.into_result(doc)
    }

    pub fn check(&self, record: &dyn Record, ctx: &Context) -> Result<(), Error> {
        self.validate(record, ctx).map(|_| ())
    }
}

///
/// RulePass
/// field visitor for one engine call
///

struct RulePass<'a> {
    rules: &'a dyn RuleResolver,
    ctx: &'a Context,
    errors: ValidationErrors,
}

impl RulePass<'_> {
    fn is_omitted(&self, visit: &FieldVisit<'_>, exempt: bool) -> bool {
        !exempt && visit.zero && visit.field.omits_for(self.ctx.method())
    }
}

// emit
// an unset reference is left out of the output unless its path is exempt
fn emit(value: Value, exempt: bool) -> Step {
    if matches!(value, Value::Null) && !exempt {
        Step::Skip
    } else {
        Step::Emit(value)
    }
}

impl FieldVisitor for RulePass<'_> {
    fn visit_field(&mut self, visit: FieldVisit<'_>) -> Result<Step, ConfigError> {
        let exempt = self.ctx.is_exempt(visit.store_path);

        if self.is_omitted(&visit, exempt) {
            trace!(path = %visit.path, "field omitted");
            return Ok(Step::Skip);
        }

        if self.ctx.skips_validation() || visit.field.directives.is_empty() {
            return Ok(if visit.composite {
                Step::Descend { emit: true }
            } else {
                emit(visit.value()?, exempt)
            });
        }

        let mut current = visit.value()?;
        let FieldVisit {
            field,
            path,
            mut zero,
            composite,
            ..
        } = visit;
        let mut transformed = false;

        for directive in &field.directives {
            match directive {
                Directive::Validation { rule, param, token } => {
                    let check = self.rules.validation(rule).ok_or_else(|| {
                        ConfigError::UnknownRule {
                            kind: RuleKind::Validation,
                            rule: rule.clone(),
                            path: path.to_string(),
                        }
                    })?;
                    let rc = RuleContext {
                        ctx: self.ctx,
                        path,
                        rule,
                        param: param.as_deref(),
                        zero,
                    };

                    let passed = check(&rc, &current)
                        .map_err(|source| ConfigError::from_rule(token, path, source))?;

                    if !passed {
                        trace!(path = %path, token = %token, "validation failed");
                        self.errors.push(FieldError::new(field, path, token));

                        // children still report their own errors
                        return Ok(if composite {
                            Step::Descend { emit: false }
                        } else {
                            Step::Skip
                        });
                    }
                }
                Directive::Transformation { rule, token } => {
                    let transform = self.rules.transformation(rule).ok_or_else(|| {
                        ConfigError::UnknownRule {
                            kind: RuleKind::Transformation,
                            rule: rule.clone(),
                            path: path.to_string(),
                        }
                    })?;
                    let rc = RuleContext {
                        ctx: self.ctx,
                        path,
                        rule,
                        param: None,
                        zero,
                    };

                    current = transform(&rc, current)
                        .map_err(|source| ConfigError::from_rule(token, path, source))?;
                    zero = current.is_zero();
                    transformed = true;
                }
            }
        }

        Ok(if composite && !transformed {
            Step::Descend { emit: true }
        } else {
            emit(current, exempt)
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests;
