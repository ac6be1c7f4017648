use crate::{
    model::{FieldDescriptor, TagError},
    registry::RuleError,
    value::Document,
    walker::FieldPath,
};
use derive_more::{Deref, IntoIterator};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Outcome of a failed engine call. `Validation` carries bad-data findings;
/// `Config` means the model or the registry is wrong and the call aborted.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Config(_) => ErrorClass::Configuration,
        }
    }

    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Config(_) => None,
        }
    }

    #[must_use]
    pub const fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    Configuration,
}

///
/// RuleKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleKind {
    Validation,
    Transformation,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Transformation => write!(f, "transformation"),
        }
    }
}

///
/// ConfigError
///
/// Model or registration defects. Always abort the current call.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid tag on {record}::{field}: {source}")]
    InvalidTag {
        record: &'static str,
        field: &'static str,
        #[source]
        source: TagError,
    },

    #[error("duplicate store name '{name}' on {record}")]
    DuplicateName { record: &'static str, name: String },

    #[error("unknown {kind} rule '{rule}' at '{path}'")]
    UnknownRule {
        kind: RuleKind,
        rule: String,
        path: String,
    },

    #[error("invalid parameter for '{token}' at '{path}': {source}")]
    InvalidParam {
        token: String,
        path: String,
        #[source]
        source: RuleError,
    },

    #[error("rule '{token}' failed at '{path}': {source}")]
    RuleFailed {
        token: String,
        path: String,
        #[source]
        source: RuleError,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ConfigError {
    /// Classify an error returned by a rule function.
    pub(crate) fn from_rule(token: &str, path: &FieldPath, source: RuleError) -> Self {
        let token = token.to_string();
        let path = path.to_string();

        if source.is_param_error() {
            Self::InvalidParam {
                token,
                path,
                source,
            }
        } else {
            Self::RuleFailed {
                token,
                path,
                source,
            }
        }
    }
}

///
/// FieldError
///
/// One attributed validation failure. `token` is the directive exactly as
/// written in the tag, parameter included.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    pub name: String,
    pub ident: &'static str,
    pub path: String,
    pub token: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &FieldDescriptor, path: &FieldPath, token: &str) -> Self {
        let path = path.to_string();
        let message = format!("field '{path}' failed on the '{token}' rule");

        Self {
            name: field.name.clone(),
            ident: field.ident,
            path,
            token: token.to_string(),
            message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

///
/// ValidationErrors
///
/// Field errors in traversal order. Never empty when returned inside
/// `Error::Validation`.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct ValidationErrors {
    #[into_iterator(owned, ref)]
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// First error recorded for a store name or source identifier.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.name == key || e.ident == key)
    }

    /// Error recorded at an exact attribution path, e.g. `items[1].name`.
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub(crate) fn into_result(self, doc: Document) -> Result<Document, Error> {
        if self.errors.is_empty() {
            Ok(doc)
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} field error(s)", self.errors.len())?;

        for error in &self.errors {
            write!(f, "; {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

///
/// TESTS
///
