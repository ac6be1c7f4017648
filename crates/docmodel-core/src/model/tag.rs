use crate::context::{Method, Scope};
use thiserror::Error as ThisError;

const IGNORE: &str = "-";
const TRANSFORM: &str = "transform";

///
/// TagError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TagError {
    #[error("empty directive at position {position}")]
    EmptyToken { position: usize },

    #[error("directive '{token}' has no rule name")]
    EmptyRule { token: String },

    #[error("ignored field cannot carry directives")]
    IgnoreWithDirectives,
}

///
/// Directive
///
/// One executable unit of a field tag. `token` is the exact source text
/// (e.g. `min=6`) and is what field errors cite.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Directive {
    Validation {
        rule: String,
        param: Option<String>,
        token: String,
    },
    Transformation {
        rule: String,
        token: String,
    },
}

impl Directive {
    #[must_use]
    pub fn rule(&self) -> &str {
        match self {
            Self::Validation { rule, .. } | Self::Transformation { rule, .. } => rule,
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Validation { token, .. } | Self::Transformation { token, .. } => token,
        }
    }
}

///
/// FieldTag
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldTag {
    pub name: String,
    pub ignore: bool,
    pub omit: Vec<Scope>,
    pub directives: Vec<Directive>,
}

impl FieldTag {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ignore: false,
            omit: Vec::new(),
            directives: Vec::new(),
        }
    }
}

///
/// parse_tag
///
/// The first comma-separated token is the name slot: `-` ignores the field,
/// an empty slot keeps `default_name`. Every later token is an omission
/// scope, `transform=NAME`, `NAME=PARAM` or a bare validation `NAME`.
///
/// Rule names are not resolved here.
///
pub fn parse_tag(tag: &str, default_name: &str) -> Result<FieldTag, TagError> {
    if tag.trim().is_empty() {
        return Ok(FieldTag::named(default_name));
    }

    let mut tokens = tag.split(',').map(str::trim);
    let name = tokens.next().unwrap_or_default();

    if name == IGNORE {
        return if tokens.next().is_some() {
            Err(TagError::IgnoreWithDirectives)
        } else {
            Ok(FieldTag {
                ignore: true,
                ..FieldTag::named(default_name)
            })
        };
    }

    let mut out = FieldTag::named(if name.is_empty() { default_name } else { name });

    for (offset, token) in tokens.enumerate() {
        if token.is_empty() {
            return Err(TagError::EmptyToken {
                position: offset + 1,
            });
        }

        if let Some(scope) = omit_scope(token) {
            out.omit.push(scope);
            continue;
        }

        out.directives.push(parse_directive(token)?);
    }

    Ok(out)
}

fn omit_scope(token: &str) -> Option<Scope> {
    match token {
        "omitempty" => Some(Scope::Always),
        "omitempty_create" => Some(Scope::Only(Method::Create)),
        "omitempty_update" => Some(Scope::Only(Method::Update)),
        "omitempty_validate" => Some(Scope::Only(Method::Validate)),
        _ => None,
    }
}

fn parse_directive(token: &str) -> Result<Directive, TagError> {
    let empty_rule = || TagError::EmptyRule {
        token: token.to_string(),
    };

    match token.split_once('=') {
        Some((key, rule)) if key.trim() == TRANSFORM => {
            let rule = rule.trim();
            if rule.is_empty() {
                return Err(empty_rule());
            }

            Ok(Directive::Transformation {
                rule: rule.to_string(),
                token: token.to_string(),
            })
        }
        Some((rule, param)) => {
            let rule = rule.trim();
            if rule.is_empty() {
                return Err(empty_rule());
            }

            Ok(Directive::Validation {
                rule: rule.to_string(),
                param: Some(param.trim().to_string()),
                token: token.to_string(),
            })
        }
        None => Ok(Directive::Validation {
            rule: token.to_string(),
            param: None,
            token: token.to_string(),
        }),
    }
}

///
/// TESTS
///
