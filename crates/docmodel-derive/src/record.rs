use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, ext::IdentExt};

///
/// RecordInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: Generics,
    data: Data<(), RecordField>,

    #[darling(default)]
    rename_all: Option<RenameRule>,
}

///
/// RecordField
///

#[derive(Debug, FromField)]
#[darling(attributes(record))]
struct RecordField {
    ident: Option<Ident>,

    #[darling(default)]
    tag: Option<String>,
}

///
/// RenameRule
///

#[derive(Clone, Copy, Debug)]
enum RenameRule {
    Lower,
    Upper,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn apply(self, ident: &str) -> String {
        match self {
            Self::Lower => ident.to_lowercase(),
            Self::Upper => ident.to_uppercase(),
            Self::Camel => ident.to_case(Case::Camel),
            Self::Pascal => ident.to_case(Case::Pascal),
            Self::Snake => ident.to_case(Case::Snake),
            Self::ScreamingSnake => ident.to_case(Case::Snake).to_uppercase(),
            Self::Kebab => ident.to_case(Case::Kebab),
        }
    }
}

impl darling::FromMeta for RenameRule {
    fn from_string(s: &str) -> darling::Result<Self> {
        match s {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "camelCase" => Ok(Self::Camel),
            "PascalCase" => Ok(Self::Pascal),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            _ => Err(darling::Error::unknown_value(s)),
        }
    }
}

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match RecordInput::from_derive_input(&input).and_then(|record| expand(&record)) {
        Ok(tokens) => tokens,
        Err(err) => err.write_errors(),
    }
}

fn expand(record: &RecordInput) -> darling::Result<TokenStream> {
    if !record.generics.params.is_empty() {
        return Err(
            darling::Error::custom("Record cannot be derived for generic structs")
                .with_span(&record.generics),
        );
    }

    let Data::Struct(fields) = &record.data else {
        return Err(darling::Error::unsupported_shape("enum").with_span(&record.ident));
    };

    let ident = &record.ident;
    let type_name = ident.unraw().to_string();

    let mut models = Vec::with_capacity(fields.len());
    let mut arms = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = &field.ident else {
            return Err(darling::Error::unsupported_shape("unnamed field"));
        };

        let raw = field_ident.unraw().to_string();
        let name = record
            .rename_all
            .map_or_else(|| raw.clone(), |rule| rule.apply(&raw));
        let tag = field.tag.clone().unwrap_or_default();

        models.push(quote! {
            ::docmodel::model::FieldModel {
                ident: #raw,
                name: #name,
                tag: #tag,
            }
        });
        arms.push(quote! {
            #index => Some(::docmodel::traits::FieldValue::to_node(&self.#field_ident)),
        });
    }

    Ok(quote! {
        impl ::docmodel::traits::Record for #ident {
            fn model(&self) -> &'static ::docmodel::model::RecordModel {
                static MODEL: ::docmodel::model::RecordModel = ::docmodel::model::RecordModel {
                    path: concat!(module_path!(), "::", #type_name),
                    fields: &[#(#models),*],
                };

                &MODEL
            }

            fn field(&self, index: usize) -> Option<::docmodel::traits::Node<'_>> {
                match index {
                    #(#arms)*
                    _ => None,
                }
            }
        }

        impl ::docmodel::traits::FieldValue for #ident {
            fn to_node(&self) -> ::docmodel::traits::Node<'_> {
                ::docmodel::traits::Node::Record(self)
            }
        }
    })
}

///
/// TESTS
///
