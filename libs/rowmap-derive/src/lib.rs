use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for destination records.
///
/// Generates two impls on the annotated struct:
///
/// - `rowmap_api::Record`: `fields()` (static column metadata) and
///   `slots()` (one scan target per mapped field, same order).
/// - `rowmap_api::HasShape`: `Shape::Record` carrying the full type path, so
///   same-named records from different modules are told apart.
///
/// The struct must implement `Default` (a fresh default instance is scanned
/// into for every row) and every mapped field type must implement `FromValue`.
///
/// # Example
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Account {
///     pub id: i64,
///
///     #[column(name = "acct_status", value_map = "1:ACTIVE,0:INACTIVE")]
///     pub status: String,
///
///     #[column(skip)]
///     pub cached: bool,
/// }
/// ```
///
/// Column names default to the field name. `value_map` tables are checked
/// here, so a malformed table is a compile error.
#[proc_macro_derive(Record, attributes(column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Record only supports structs")),
    };

    let mut spec_tokens = Vec::new();
    let mut slot_tokens = Vec::new();
    // Lower-cased column → field, to reject two fields claiming one column.
    let mut seen_columns: HashMap<String, String> = HashMap::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_name_str = field_name.unraw().to_string();

        // Parse #[column(...)] attribute.
        let mut column: Option<LitStr> = None;
        let mut value_map: Option<LitStr> = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("column") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    column = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("value_map") {
                    value_map = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else {
                    return Err(meta.error("unknown column attribute (expected name, value_map or skip)"));
                }
                Ok(())
            })?;
        }

        if skip {
            if column.is_some() || value_map.is_some() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "#[column(skip)] cannot be combined with name or value_map",
                ));
            }
            continue;
        }

        let column_str = match &column {
            Some(lit) => {
                let value = lit.value();
                if value.trim().is_empty() {
                    return Err(syn::Error::new_spanned(lit, "column name must not be empty"));
                }
                value
            }
            None => field_name_str.clone(),
        };

        if let Some(previous) = seen_columns.insert(column_str.to_lowercase(), field_name_str.clone()) {
            return Err(syn::Error::new_spanned(
                field_name,
                format!("column '{column_str}' is already mapped to field '{previous}'"),
            ));
        }

        let value_map_expr = match &value_map {
            Some(lit) => {
                check_value_map(&lit.value())
                    .map_err(|msg| syn::Error::new_spanned(lit, format!("invalid value_map: {msg}")))?;
                quote! { ::std::option::Option::Some(#lit) }
            }
            None => quote! { ::std::option::Option::None },
        };

        spec_tokens.push(quote! {
            ::rowmap_api::record::FieldSpec {
                column: #column_str,
                field: #field_name_str,
                value_map: #value_map_expr,
            }
        });

        slot_tokens.push(quote! {
            &mut self.#field_name as &mut dyn ::rowmap_api::convert::ScanTarget
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::rowmap_api::record::HasShape for #name #ty_generics #where_clause {
            fn shape() -> ::rowmap_api::record::Shape {
                ::rowmap_api::record::Shape::Record(::std::any::type_name::<Self>())
            }
        }

        impl #impl_generics ::rowmap_api::record::Record for #name #ty_generics #where_clause {
            fn fields() -> &'static [::rowmap_api::record::FieldSpec] {
                const FIELDS: &[::rowmap_api::record::FieldSpec] = &[
                    #(#spec_tokens),*
                ];
                FIELDS
            }

            fn slots(&mut self) -> ::std::vec::Vec<&mut dyn ::rowmap_api::convert::ScanTarget> {
                ::std::vec![
                    #(#slot_tokens),*
                ]
            }
        }
    };

    Ok(expanded)
}

/// Same rules as `rowmap_api::ValueMap::parse`, checked at compile time.
fn check_value_map(spec: &str) -> Result<(), String> {
    let mut keys: Vec<&str> = Vec::new();
    for item in spec.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (key, _) = item
            .split_once(':')
            .ok_or_else(|| format!("entry '{item}' has no ':' separator"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("entry '{item}' has an empty key"));
        }
        if keys.contains(&key) {
            return Err(format!("duplicate key '{key}'"));
        }
        keys.push(key);
    }
    if keys.is_empty() {
        return Err("value map is empty".to_string());
    }
    Ok(())
}
