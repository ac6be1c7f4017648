use crate::value::Value;
use derive_more::IntoIterator;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;

///
/// Document
///
/// Insertion-ordered string-keyed map. Keys are unique; inserting an existing
/// key replaces the value in place and keeps its position.
///

#[derive(Clone, Debug, Default, IntoIterator, PartialEq)]
pub struct Document {
    #[into_iterator(owned, ref)]
    entries: Vec<(String, Value)>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();

        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }

        self.entries.push((key, value));

        None
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;

        Some(self.entries.remove(pos).1)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Look up a value by dot-separated path through nested documents.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;

        for segment in segments {
            current = current.as_document()?.get(segment)?;
        }

        Some(current)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten nested documents into dot-path keys.
    ///
    /// Lists and empty documents are kept whole under their own path; only
    /// non-empty documents are expanded.
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        let mut out = BTreeMap::new();
        flatten_into(self, None, &mut out);

        out
    }
}

fn flatten_into(doc: &Document, prefix: Option<&str>, out: &mut BTreeMap<String, Value>) {
    for (key, value) in doc.iter() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.to_string(),
        };

        match value {
            Value::Document(inner) if !inner.is_empty() => flatten_into(inner, Some(&path), out),
            _ => {
                out.insert(path, value.clone());
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }

        doc
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}
