use crate::model::field::FieldModel;

///
/// RecordModel
///
/// Static declaration of a record type, one per `#[derive(Record)]`.
/// Field order is declaration order and drives traversal order.
///

#[derive(Debug)]
pub struct RecordModel {
    /// Fully qualified type path, used in logs and configuration errors.
    pub path: &'static str,
    pub fields: &'static [FieldModel],
}

impl RecordModel {
    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.ident == ident)
    }
}
