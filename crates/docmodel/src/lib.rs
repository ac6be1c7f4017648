//! ## Crate layout
//! - `core`: runtime record model, rule registry, walker and rule engine.
//! - `derive`: the `Record` derive macro.
//!
//! Most callers only need the `prelude`: derive `Record` on their types,
//! register custom rules at startup, then call `validate` with a `Context`
//! per create / update / validate operation.

pub use docmodel_core as core;
pub use docmodel_derive as derive;

// generated code refers to these as `::docmodel::<module>`
pub use docmodel_core::{
    config, context, engine, error, model, registry, traits, value, walker,
};

pub use docmodel_core::{Engine, Error, check, register_transformation, register_validation, validate};
pub use docmodel_derive::Record;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::{config::Options, derive::Record};
    pub use serde::{Deserialize, Serialize};
}
