//! Static record models emitted by `#[derive(Record)]`, the tag directive
//! parser, and the per-type descriptor cache built from both.

pub mod descriptor;
pub mod field;
pub mod record;
pub mod tag;

pub use descriptor::{FieldDescriptor, RecordDescriptor, descriptor_of};
pub use field::FieldModel;
pub use record::RecordModel;
pub use tag::{Directive, FieldTag, TagError, parse_tag};
