//! Depth-first traversal of a record guided by its cached descriptor.
//!
//! The walker owns recursion and output assembly. A `FieldVisitor` decides,
//! per visible field, whether the field is skipped, emitted as a given value,
//! or descended into.

use crate::{
    error::ConfigError,
    model::{FieldDescriptor, RecordDescriptor, descriptor_of},
    traits::{Node, Record},
    value::{Document, Value},
};
use std::fmt::{self, Write};

///
/// PathSegment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
    Key(String),
}

///
/// FieldPath
///
/// `Display` renders the attribution path (`items[2].name`, `meta[en].title`);
/// `store_path` keeps field segments only (`items.name`).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, seg: PathSegment) {
        self.segments.push(seg);
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn store_path(&self) -> String {
        let mut out = String::new();

        for seg in &self.segments {
            if let PathSegment::Field(name) = seg {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
        }

        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let mut first = true;

        for seg in &self.segments {
            match seg {
                PathSegment::Field(name) => {
                    if !first {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => {
                    let _ = write!(out, "[{i}]");
                }
                PathSegment::Key(k) => {
                    let _ = write!(out, "[{k}]");
                }
            }
            first = false;
        }

        f.write_str(&out)
    }
}

///
/// FieldVisit
///
/// One visible field as presented to a visitor. The raw value is only
/// materialized on request through `value`.
///

#[derive(Debug)]
pub struct FieldVisit<'a> {
    pub record: &'a RecordDescriptor,
    pub field: &'a FieldDescriptor,
    pub path: &'a FieldPath,
    pub store_path: &'a str,
    pub node: &'a Node<'a>,
    pub zero: bool,
    pub composite: bool,
}

impl FieldVisit<'_> {
    /// Raw value of the field; composite fields are built out in full.
    pub fn value(&self) -> Result<Value, ConfigError> {
        materialize(self.node)
    }
}

///
/// Step
///

#[derive(Debug, PartialEq)]
pub enum Step {
    /// Nothing is emitted and the field is not descended into.
    Skip,
    /// Emit this value under the field's store name without descending.
    Emit(Value),
    /// Walk the field's children; emit the assembled value when `emit`.
    Descend { emit: bool },
}

///
/// FieldVisitor
///

pub trait FieldVisitor {
    fn visit_field(&mut self, visit: FieldVisit<'_>) -> Result<Step, ConfigError>;
}

/// Walk a record from the root, returning the assembled document.
pub fn walk<V: FieldVisitor>(record: &dyn Record, visitor: &mut V) -> Result<Document, ConfigError> {
    let mut path = FieldPath::root();

    walk_record(record, visitor, &mut path)
}

fn walk_record<V: FieldVisitor>(
    record: &dyn Record,
    visitor: &mut V,
    path: &mut FieldPath,
) -> Result<Document, ConfigError> {
    let descriptor = descriptor_of(record)?;
    let mut out = Document::new();

    for field in descriptor.fields.iter().filter(|f| !f.ignore) {
        let Some(node) = record.field(field.index) else {
            continue;
        };

        path.push(PathSegment::Field(field.name.clone()));

        let store_path = path.store_path();
        let visit = FieldVisit {
            record: &descriptor,
            field,
            path,
            store_path: &store_path,
            node: &node,
            zero: node.is_zero(),
            composite: node.is_composite(),
        };

        match visitor.visit_field(visit)? {
            Step::Skip => {}
            Step::Emit(value) => {
                out.insert(field.name.clone(), value);
            }
            Step::Descend { emit } => {
                let value = walk_node(&node, visitor, path)?;
                if emit {
                    out.insert(field.name.clone(), value);
                }
            }
        }

        path.pop();
    }

    Ok(out)
}

fn walk_node<V: FieldVisitor>(
    node: &Node<'_>,
    visitor: &mut V,
    path: &mut FieldPath,
) -> Result<Value, ConfigError> {
    match node {
        Node::Leaf(value) => Ok(value.clone()),
        Node::Record(record) => walk_record(*record, visitor, path).map(Value::Document),
        Node::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                out.push(walk_node(item, visitor, path)?);
                path.pop();
            }

            Ok(Value::List(out))
        }
        Node::Map(entries) => {
            let mut out = Document::new();
            for (key, item) in entries {
                path.push(PathSegment::Key(key.clone()));
                out.insert(key.clone(), walk_node(item, visitor, path)?);
                path.pop();
            }

            Ok(Value::Document(out))
        }
    }
}

/// Convert a node to its raw value: records become documents keyed by store
/// name with ignored fields left out. No rules run.
pub fn materialize(node: &Node<'_>) -> Result<Value, ConfigError> {
    match node {
        Node::Leaf(value) => Ok(value.clone()),
        Node::Record(record) => materialize_record(*record).map(Value::Document),
        Node::List(items) => items
            .iter()
            .map(materialize)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Node::Map(entries) => {
            let mut out = Document::new();
            for (key, item) in entries {
                out.insert(key.clone(), materialize(item)?);
            }

            Ok(Value::Document(out))
        }
    }
}

/// Raw document view of a record.
pub fn materialize_record(record: &dyn Record) -> Result<Document, ConfigError> {
    let descriptor = descriptor_of(record)?;
    let mut out = Document::new();

    for field in descriptor.fields.iter().filter(|f| !f.ignore) {
        if let Some(node) = record.field(field.index) {
            out.insert(field.name.clone(), materialize(&node)?);
        }
    }

    Ok(out)
}

///
/// TESTS
///
