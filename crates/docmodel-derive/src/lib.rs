use proc_macro::TokenStream;

mod record;

/// Derive `Record` (and `FieldValue`) for a struct with named fields.
///
/// Field directives go in `#[record(tag = "...")]`; the struct accepts
/// `#[record(rename_all = "...")]` to derive default store names.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
