///
/// FieldModel
///
/// `ident` is the Rust identifier, `name` the default store name (the ident
/// after any `rename_all`), `tag` the raw directive string.
///

#[derive(Debug)]
pub struct FieldModel {
    pub ident: &'static str,
    pub name: &'static str,
    pub tag: &'static str,
}
