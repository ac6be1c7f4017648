use super::*;
use crate::{
    context::{CancelSignal, Method},
    error::{ConfigError, ErrorClass, ValidationErrors},
    registry::{RuleError, RuleRegistry},
    test_fixtures::{Account, Address, Profile},
    walker::materialize_record,
};
use docmodel_derive::Record;
use proptest::prelude::*;
use std::collections::BTreeMap;

///
/// Fixtures
///

#[derive(Debug, Default, Record)]
struct Handle {
    #[record(tag = "handle,transform=trim,no_space")]
    handle: String,
}

#[derive(Debug, Default, Record)]
struct StrictHandle {
    #[record(tag = "handle,no_space,transform=trim")]
    handle: String,
}

#[derive(Debug, Default, Record)]
struct Basket {
    #[record(tag = "items,max=1")]
    items: Vec<Address>,

    #[record(tag = "tags,transform=count")]
    tags: Vec<String>,
}

#[derive(Debug, Default, Record)]
struct Directory {
    offices: BTreeMap<String, Address>,
}

#[derive(Debug, Default, Record)]
struct Draft {
    #[record(tag = "title,required_create,omitempty_update")]
    title: String,

    #[record(tag = "note,omitempty_create")]
    note: String,
}

#[derive(Debug, Default, Record)]
struct Settings {
    #[record(tag = "labels,required")]
    labels: BTreeMap<String, String>,

    #[record(tag = "inner,required")]
    inner: Option<Draft>,

    #[record(tag = "kept,omitempty")]
    kept: BTreeMap<String, u32>,
}

#[derive(Debug, Default, Record)]
struct Misconfigured {
    #[record(tag = "value,no_such_rule")]
    value: String,
}

#[derive(Debug, Default, Record)]
struct BadParam {
    #[record(tag = "value,min=abc")]
    value: String,
}

#[derive(Debug, Default, Record)]
struct Failing {
    #[record(tag = "value,boom")]
    value: String,
}

fn rules() -> RuleRegistry {
    let mut rules = RuleRegistry::new();

    rules.register_transformation("trim", |_, v| match v {
        Value::Text(s) => Ok(Value::Text(s.trim().to_string())),
        other => Ok(other),
    });
    rules.register_validation("no_space", |_, v| {
        Ok(v.as_text().is_some_and(|s| !s.contains(' ')))
    });
    rules.register_transformation("count", |_, v| {
        Ok(v.len().map_or(Value::Null, |n| Value::Uint(n as u64)))
    });
    rules.register_validation("boom", |_, _| Err(RuleError::failed("backend down")));

    rules
}

fn run(record: &dyn Record, ctx: &Context) -> Result<Document, Error> {
    let rules = rules();

    Engine::new(&rules).validate(record, ctx)
}

fn field_errors(result: Result<Document, Error>) -> ValidationErrors {
    match result {
        Err(Error::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    }
}

fn config_error(result: Result<Document, Error>) -> ConfigError {
    match result {
        Err(Error::Config(err)) => err,
        other => panic!("expected configuration error, got {other:?}"),
    }
}

fn account(email: &str, password: &str) -> Account {
    Account {
        email: email.into(),
        password: password.into(),
        ..Account::default()
    }
}

///
/// Omission
///

#[test]
fn empty_password_is_omitted_and_never_validated() {
    let doc = run(&account("bob@example.com", ""), &Context::create()).unwrap();

    assert_eq!(doc.get("email"), Some(&Value::from("bob@example.com")));
    assert!(!doc.contains_key("password"));
    assert!(!doc.contains_key("age"));
    assert!(!doc.contains_key("secret"));
}

#[test]
fn exempt_paths_are_emitted_even_when_empty() {
    let allow = run(&account("bob@example.com", ""), &Context::create().allow_empty("age")).unwrap();
    assert_eq!(allow.get("age"), Some(&Value::Uint(0)));

    let merge = run(&account("bob@example.com", ""), &Context::update().merge("age")).unwrap();
    assert_eq!(merge.get("age"), Some(&Value::Uint(0)));
}

#[test]
fn exempt_empty_field_still_runs_its_directives() {
    let errors = field_errors(run(
        &account("bob@example.com", ""),
        &Context::create().allow_empty("password"),
    ));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token, "required");
}

#[test]
fn nested_exemptions_use_store_paths() {
    let profile = Profile {
        display_name: "bob".into(),
        address: Some(Address {
            city: "Sofia".into(),
            zip: 0,
        }),
        ..Profile::default()
    };

    let plain = run(&profile, &Context::validation()).unwrap();
    assert_eq!(plain.get_path("address.zip"), None);

    let exempt = run(&profile, &Context::validation().allow_empty("address.zip")).unwrap();
    assert_eq!(exempt.get_path("address.zip"), Some(&Value::Uint(0)));
}

#[test]
fn method_scoped_omission_and_requirement() {
    let draft = Draft::default();

    let errors = field_errors(run(&draft, &Context::create()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token, "required_create");

    let update = run(&draft, &Context::update()).unwrap();
    assert!(!update.contains_key("title"));
    assert_eq!(update.get("note"), Some(&Value::from("")));

    let validate = run(&draft, &Context::validation()).unwrap();
    assert_eq!(validate.get("title"), Some(&Value::from("")));
}

#[test]
fn set_composites_with_empty_contents_are_not_empty() {
    let settings = Settings {
        labels: [("k".to_string(), String::new())].into_iter().collect(),
        inner: Some(Draft::default()),
        kept: [("a".to_string(), 0)].into_iter().collect(),
    };

    let doc = run(&settings, &Context::update()).unwrap();

    assert_eq!(doc.get_path("labels.k"), Some(&Value::from("")));
    assert_eq!(doc.get_path("inner.note"), Some(&Value::from("")));
    assert_eq!(doc.get_path("kept.a"), Some(&Value::Uint(0)));
}

#[test]
fn unset_and_empty_composites_are_empty() {
    let errors = field_errors(run(&Settings::default(), &Context::update()));
    let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();

    assert_eq!(paths, vec!["labels", "inner"]);

    let settings = Settings {
        labels: [("k".to_string(), "v".to_string())].into_iter().collect(),
        inner: Some(Draft::default()),
        ..Settings::default()
    };
    let doc = run(&settings, &Context::update()).unwrap();

    assert!(!doc.contains_key("kept"));
}

#[test]
fn required_after_transform_sees_the_transformed_value() {
    #[derive(Debug, Default, Record)]
    struct Padded {
        #[record(tag = "value,transform=trim,required")]
        value: String,
    }

    let errors = field_errors(run(
        &Padded {
            value: "   ".into(),
        },
        &Context::validation(),
    ));

    assert_eq!(errors[0].token, "required");
}

///
/// Validation
///

#[test]
fn short_password_fails_on_min() {
    let errors = field_errors(run(&account("bob@example.com", "abc"), &Context::create()));

    assert_eq!(errors.len(), 1);

    let err = errors.field("password").unwrap();
    assert_eq!(err.path, "password");
    assert_eq!(err.token, "min=6");
    assert_eq!(err.message, "field 'password' failed on the 'min=6' rule");
}

#[test]
fn first_failing_directive_is_the_only_error_for_a_field() {
    let errors = field_errors(run(&account("", "secret-pass"), &Context::create()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.field("email").unwrap().token, "required");
}

#[test]
fn errors_from_every_field_are_aggregated_in_order() {
    let errors = field_errors(run(&account("not-an-email", "abc"), &Context::create()));
    let tokens: Vec<_> = errors.iter().map(|e| e.token.as_str()).collect();

    assert_eq!(tokens, vec!["email", "min=6"]);
    assert!(errors.to_string().starts_with("validation failed with 2 field error(s)"));
}

#[test]
fn errors_carry_store_name_and_source_identifier() {
    let errors = field_errors(run(&Profile::default(), &Context::validation()));
    let err = errors.field("displayName").unwrap();

    assert_eq!(err.ident, "display_name");
    assert_eq!(errors.field("display_name"), Some(err));
}

#[test]
fn unset_reference_is_left_out_unless_exempt() {
    let profile = Profile {
        display_name: "bob".into(),
        ..Profile::default()
    };

    let doc = run(&profile, &Context::validation()).unwrap();
    assert!(!doc.contains_key("address"));
    assert_eq!(doc.get("previous"), Some(&Value::List(Vec::new())));
    assert_eq!(doc.get("labels"), Some(&Value::Document(Document::new())));

    let exempt = run(&profile, &Context::validation().allow_empty("address")).unwrap();
    assert_eq!(exempt.get("address"), Some(&Value::Null));
}

#[test]
fn nested_errors_are_attributed_with_indices_and_keys() {
    let profile = Profile {
        display_name: "bob".into(),
        previous: vec![
            Address {
                city: "Plovdiv".into(),
                zip: 4000,
            },
            Address::default(),
        ],
        ..Profile::default()
    };
    let errors = field_errors(run(&profile, &Context::validation()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.at("previous[1].city").unwrap().token, "required");

    let directory = Directory {
        offices: [("hq".to_string(), Address::default())].into_iter().collect(),
    };
    let errors = field_errors(run(&directory, &Context::validation()));

    assert!(errors.at("offices[hq].city").is_some());
}

#[test]
fn failed_composite_still_reports_child_errors() {
    let basket = Basket {
        items: vec![Address::default(), Address::default()],
        ..Basket::default()
    };
    let errors = field_errors(run(&basket, &Context::validation()));
    let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();

    assert_eq!(paths, vec!["items", "items[0].city", "items[1].city"]);
    assert_eq!(errors[0].token, "max=1");
}

///
/// Transformation
///

#[test]
fn directives_run_in_tag_order() {
    let padded = "  bob  ";

    let doc = run(
        &Handle {
            handle: padded.into(),
        },
        &Context::validation(),
    )
    .unwrap();
    assert_eq!(doc.get("handle"), Some(&Value::from("bob")));

    let errors = field_errors(run(
        &StrictHandle {
            handle: padded.into(),
        },
        &Context::validation(),
    ));
    assert_eq!(errors[0].token, "no_space");
}

#[test]
fn transformed_composite_is_emitted_without_descent() {
    let basket = Basket {
        tags: vec!["a".into(), "b".into(), "c".into()],
        ..Basket::default()
    };
    let doc = run(&basket, &Context::validation()).unwrap();

    assert_eq!(doc.get("tags"), Some(&Value::Uint(3)));
}

#[test]
fn skip_validation_emits_raw_values() {
    let record = Handle {
        handle: "  bob  ".into(),
    };
    let doc = run(&record, &Context::validation().skip_validation()).unwrap();

    assert_eq!(doc.get("handle"), Some(&Value::from("  bob  ")));

    let account = account("", "abc");
    let doc = run(&account, &Context::create().skip_validation()).unwrap();
    assert_eq!(doc.get("email"), Some(&Value::from("")));
    assert_eq!(doc.get("password"), Some(&Value::from("abc")));
}

///
/// Configuration errors
///

#[test]
fn unknown_rule_aborts_the_call() {
    let err = config_error(run(&Misconfigured::default(), &Context::validation()));

    assert!(matches!(
        err,
        ConfigError::UnknownRule {
            kind: RuleKind::Validation,
            ref rule,
            ref path,
        } if rule == "no_such_rule" && path == "value"
    ));
}

#[test]
fn unparsable_parameter_is_a_configuration_error() {
    let result = run(
        &BadParam {
            value: "abc".into(),
        },
        &Context::validation(),
    );

    assert_eq!(result.as_ref().unwrap_err().class(), ErrorClass::Configuration);
    assert!(matches!(config_error(result), ConfigError::InvalidParam { ref token, .. } if token == "min=abc"));
}

#[test]
fn rule_error_aborts_with_rule_failed() {
    let err = config_error(run(
        &Failing {
            value: "x".into(),
        },
        &Context::validation(),
    ));

    assert!(matches!(
        err,
        ConfigError::RuleFailed {
            source: RuleError::Failed(ref msg),
            ..
        } if msg == "backend down"
    ));
}

#[test]
fn skip_validation_does_not_resolve_rules() {
    let doc = run(&Misconfigured::default(), &Context::validation().skip_validation()).unwrap();

    assert_eq!(doc.get("value"), Some(&Value::from("")));
}

///
/// Context
///

#[test]
fn cancellation_is_advisory() {
    let cancel = CancelSignal::new();
    cancel.cancel();

    let ctx = Context::new(Method::Create).with_cancel(cancel);

    assert!(run(&account("bob@example.com", "long-enough"), &ctx).is_ok());
}

#[test]
fn check_discards_the_document() {
    let rules = rules();
    let engine = Engine::new(&rules);

    assert!(engine.check(&account("bob@example.com", "long-enough"), &Context::create()).is_ok());
    assert_eq!(
        engine
            .check(&account("bob@example.com", "abc"), &Context::create())
            .unwrap_err()
            .class(),
        ErrorClass::Validation
    );
}

///
/// Properties
///

proptest! {
    #[test]
    fn skip_validation_never_fails_and_matches_raw_view(
        email in "[a-zA-Z@. ]{0,16}",
        password in "[a-z]{1,10}",
        age in 1u32..200,
    ) {
        let record = Account { email, password, age, ..Account::default() };
        let doc = run(&record, &Context::update().skip_validation()).unwrap();

        prop_assert_eq!(doc, materialize_record(&record).unwrap());
    }

    #[test]
    fn repeated_calls_are_identical(email in "[a-z]{0,6}(@[a-z]{1,6}\\.com)?", password in "[a-z]{0,10}") {
        let record = account(&email, &password);
        let ctx = Context::create();

        let first = run(&record, &ctx);
        let second = run(&record, &ctx);

        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn password_length_decides_min(password in "[a-z]{1,12}") {
        let result = run(&account("bob@example.com", &password), &Context::create());

        if password.chars().count() >= 6 {
            prop_assert!(result.is_ok());
        } else {
            let errors = field_errors(result);
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors[0].token.as_str(), "min=6");
        }
    }
}
