use crate::{traits::Node, value::Value};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    hash::BuildHasher,
    rc::Rc,
    sync::Arc,
};

///
/// FieldValue
///
/// Conversion boundary from a Rust field to the walker's `Node` view.
/// Records get their impl from `#[derive(Record)]`.
///

pub trait FieldValue {
    fn to_node(&self) -> Node<'_>;
}

macro_rules! impl_leaf {
    ($variant:ident => $($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_node(&self) -> Node<'_> {
                    Node::Leaf(Value::$variant((*self).into()))
                }
            }
        )*
    };
}

impl_leaf!(Bool => bool);
impl_leaf!(Int => i8, i16, i32, i64);
impl_leaf!(Uint => u8, u16, u32, u64);
impl_leaf!(Float64 => f32, f64);

impl FieldValue for usize {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(Value::Uint(*self as u64))
    }
}

impl FieldValue for isize {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(Value::Int(*self as i64))
    }
}

impl FieldValue for char {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(Value::Text(self.to_string()))
    }
}

impl FieldValue for &str {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(Value::Text((*self).to_string()))
    }
}

impl FieldValue for String {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(Value::Text(self.clone()))
    }
}

impl FieldValue for Value {
    fn to_node(&self) -> Node<'_> {
        Node::Leaf(self.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_node(&self) -> Node<'_> {
        match self {
            Some(v) => v.to_node(),
            None => Node::Leaf(Value::Null),
        }
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Box<T> {
    fn to_node(&self) -> Node<'_> {
        (**self).to_node()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Arc<T> {
    fn to_node(&self) -> Node<'_> {
        (**self).to_node()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for Rc<T> {
    fn to_node(&self) -> Node<'_> {
        (**self).to_node()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_node(&self) -> Node<'_> {
        Node::List(self.iter().map(FieldValue::to_node).collect())
    }
}

impl<T: FieldValue> FieldValue for BTreeSet<T> {
    fn to_node(&self) -> Node<'_> {
        Node::List(self.iter().map(FieldValue::to_node).collect())
    }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    fn to_node(&self) -> Node<'_> {
        Node::Map(self.iter().map(|(k, v)| (k.clone(), v.to_node())).collect())
    }
}

// Entries are sorted by key so traversal order does not depend on the hasher.
impl<T: FieldValue, S: BuildHasher> FieldValue for HashMap<String, T, S> {
    fn to_node(&self) -> Node<'_> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        Node::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.clone(), v.to_node()))
                .collect(),
        )
    }
}

///
/// TESTS
///
