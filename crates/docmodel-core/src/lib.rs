//! Core runtime for docmodel: record models, tag directives, the rule
//! registry, the structure walker and the rule engine.
//!
//! A record type derives `Record`; its field tags are parsed once per type
//! into a cached descriptor. `validate` walks a record, omits empty fields
//! the tags and the calling `Context` allow it to, runs each field's
//! directives in order and returns either the normalized `Document` or the
//! aggregated field errors.

extern crate self as docmodel;

// public exports are one module level down
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;
pub mod traits;
pub mod value;
pub mod walker;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use engine::{Engine, check, validate};
pub use error::Error;
pub use registry::{register_transformation, register_validation};

///
/// Prelude
///
/// Domain vocabulary only: records, contexts, values and rule signatures.
///

pub mod prelude {
    pub use crate::{
        context::{CancelSignal, Context, Method},
        engine::{Engine, check, validate},
        error::{Error, FieldError, ValidationErrors},
        registry::{RuleContext, RuleError, register_transformation, register_validation},
        traits::{FieldValue, Record},
        value::{Document, Value},
    };
}
