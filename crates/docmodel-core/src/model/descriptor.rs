use crate::{
    context::{Method, Scope},
    error::ConfigError,
    model::{
        record::RecordModel,
        tag::{Directive, parse_tag},
    },
    traits::Record,
};
use std::{
    any::{Any, TypeId},
    collections::{HashMap, HashSet},
    sync::{Arc, LazyLock, RwLock},
};
use tracing::debug;

///
/// DESCRIPTORS
/// process-wide cache, one descriptor per record type
///

static DESCRIPTORS: LazyLock<RwLock<HashMap<TypeId, Arc<RecordDescriptor>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Return the cached descriptor for a record's type, building it on first use.
///
/// Concurrent first use may parse the model more than once, but only the
/// first descriptor published under the write lock is ever handed out.
pub fn descriptor_of(record: &dyn Record) -> Result<Arc<RecordDescriptor>, ConfigError> {
    let any: &dyn Any = record;
    let type_id = any.type_id();

    if let Some(found) = DESCRIPTORS
        .read()
        .expect("descriptor cache poisoned while acquiring read lock")
        .get(&type_id)
    {
        return Ok(Arc::clone(found));
    }

    let built = Arc::new(RecordDescriptor::build(record.model())?);

    let mut cache = DESCRIPTORS
        .write()
        .expect("descriptor cache poisoned while acquiring write lock");
    let published = cache.entry(type_id).or_insert_with(|| {
        debug!(
            record = built.path,
            fields = built.fields.len(),
            "record descriptor built"
        );
        Arc::clone(&built)
    });

    Ok(Arc::clone(published))
}

///
/// RecordDescriptor
///

#[derive(Debug)]
pub struct RecordDescriptor {
    pub path: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Parse every field tag of a model. Fails on malformed tags and on two
    /// visible fields sharing a store name.
    pub fn build(model: &RecordModel) -> Result<Self, ConfigError> {
        let mut fields = Vec::with_capacity(model.fields.len());
        let mut names = HashSet::new();

        for (index, field) in model.fields.iter().enumerate() {
            let tag = parse_tag(field.tag, field.name).map_err(|source| {
                ConfigError::InvalidTag {
                    record: model.path,
                    field: field.ident,
                    source,
                }
            })?;

            if !tag.ignore && !names.insert(tag.name.clone()) {
                return Err(ConfigError::DuplicateName {
                    record: model.path,
                    name: tag.name,
                });
            }

            fields.push(FieldDescriptor {
                index,
                ident: field.ident,
                name: tag.name,
                ignore: tag.ignore,
                omit: tag.omit,
                directives: tag.directives,
            });
        }

        Ok(Self {
            path: model.path,
            fields,
        })
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

///
/// FieldDescriptor
///

#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    /// Position in the record model; the accessor index for `Record::field`.
    pub index: usize,
    pub ident: &'static str,
    pub name: String,
    pub ignore: bool,
    pub omit: Vec<Scope>,
    pub directives: Vec<Directive>,
}

impl FieldDescriptor {
    /// True when an omission directive applies under `method`.
    #[must_use]
    pub fn omits_for(&self, method: Method) -> bool {
        self.omit.iter().any(|scope| scope.admits(method))
    }
}

///
/// TESTS
///
