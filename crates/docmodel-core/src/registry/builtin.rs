use crate::{
    context::{Method, Scope},
    registry::{RuleContext, RuleError, RuleRegistry},
    value::Value,
};
use regex::Regex;
use std::sync::LazyLock;

// HTML living standard "valid e-mail address" grammar.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

pub(super) fn install(registry: &mut RuleRegistry) {
    registry.register_validation("required", required(Scope::Always));
    registry.register_validation("required_create", required(Scope::Only(Method::Create)));
    registry.register_validation("required_update", required(Scope::Only(Method::Update)));
    registry.register_validation(
        "required_validate",
        required(Scope::Only(Method::Validate)),
    );
    registry.register_validation("min", min);
    registry.register_validation("max", max);
    registry.register_validation("email", email);
}

// required
// passes outright when the scope does not admit the calling method
fn required(
    scope: Scope,
) -> impl Fn(&RuleContext<'_>, &Value) -> Result<bool, RuleError> + Send + Sync + 'static {
    move |rc: &RuleContext<'_>, _: &Value| Ok(!scope.admits(rc.method()) || !rc.zero)
}

fn min(rc: &RuleContext<'_>, value: &Value) -> Result<bool, RuleError> {
    let bound = rc.numeric_param()?;

    Ok(measure(value).is_some_and(|m| m >= bound))
}

fn max(rc: &RuleContext<'_>, value: &Value) -> Result<bool, RuleError> {
    let bound = rc.numeric_param()?;

    Ok(measure(value).is_some_and(|m| m <= bound))
}

fn email(_: &RuleContext<'_>, value: &Value) -> Result<bool, RuleError> {
    Ok(value.as_text().is_some_and(|s| EMAIL.is_match(s)))
}

// measure
// numbers compare by value, text / lists / documents by length
#[allow(clippy::cast_precision_loss)]
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::Text(_) | Value::List(_) | Value::Document(_) => value.len().map(|n| n as f64),
        _ => value.as_f64(),
    }
}

///
/// TESTS
///
