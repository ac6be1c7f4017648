use crate::{
    context::{Context, Method},
    error::ConfigError,
};
use serde::{Deserialize, Serialize};

///
/// Options
///
/// Serializable form of a `Context`, for collaborators that keep per-operation
/// defaults in a TOML file:
///
/// ```toml
/// method = "update"
/// allow_empty_fields = ["profile.age"]
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub method: Method,
    pub skip_validation: bool,
    pub allow_empty_fields: Vec<String>,
    pub merge_fields: Vec<String>,
}

impl Options {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|err| ConfigError::InvalidOptions(err.to_string()))
    }

    #[must_use]
    pub fn into_context(self) -> Context {
        let mut ctx = Context::new(self.method);

        for path in self.allow_empty_fields {
            ctx = ctx.allow_empty(path);
        }
        for path in self.merge_fields {
            ctx = ctx.merge(path);
        }
        if self.skip_validation {
            ctx = ctx.skip_validation();
        }

        ctx
    }
}

impl From<Options> for Context {
    fn from(options: Options) -> Self {
        options.into_context()
    }
}

///
/// TESTS
///
