mod field_value;

pub use field_value::FieldValue;

use crate::{model::RecordModel, value::Value};
use std::{any::Any, fmt};

///
/// Record
///
/// The reflective boundary. Implemented by `#[derive(Record)]`: `model`
/// returns the static field declarations, `field` reads one field by its
/// declaration index.
///

pub trait Record: Any {
    fn model(&self) -> &'static RecordModel;

    fn field(&self, index: usize) -> Option<Node<'_>>;
}

///
/// Node
///
/// Borrowed view of one field value. Optional references and boxes are
/// already dereferenced; an unset reference is `Leaf(Value::Null)`.
///

pub enum Node<'a> {
    Leaf(Value),
    Record(&'a dyn Record),
    List(Vec<Self>),
    Map(Vec<(String, Self)>),
}

impl Node<'_> {
    /// True for nodes the walker can descend into.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !matches!(self, Self::Leaf(_))
    }

    /// True when the field holds the zero value of its type. A set reference
    /// to a record is never zero; lists and maps are zero only when empty.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Leaf(value) => value.is_zero(),
            Self::Record(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Self::Record(record) => f.debug_tuple("Record").field(&record.model().path).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
        }
    }
}
