//! `#[derive(NvValue)]`: generates an `nvpair::marshal::NvValue` impl from a
//! struct's fields and their `#[nv(...)]` tags.
//!
//! ```ignore
//! #[derive(NvValue)]
//! struct Flags {
//!     #[nv(name = "enabled")]
//!     enabled: bool,
//!     #[nv(name = "raw", byte)]
//!     raw: u8,
//!     nested: Inner,
//!     optional: Option<u32>,
//! }
//! ```
//!
//! Field tags follow spec's `name[,option...]` grammar (§4.4): an absent
//! `name` falls back to the field's identifier, matched case-insensitively
//! on decode; `byte` selects the raw-byte kind for `u8`/`Vec<u8>` fields.
//! `Option<T>` fields are omitted from the encoded list when `None`, and
//! decode leniently rather than erroring when their pair is absent.
//! Any field whose type is not one of the built-in scalar/array/`NvList`/
//! `Value` types is assumed to itself derive (or hand-implement) `NvValue`,
//! and is encoded/decoded as a nested list.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

#[proc_macro_derive(NvValue, attributes(nv))]
pub fn derive_nv_value(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "NvValue can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "NvValue can only be derived for structs",
            ))
        }
    };

    let mut to_pairs = Vec::new();
    let mut from_fields = Vec::new();
    let mut field_idents = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .expect("named field always has an identifier");
        let tag = FieldTag::from_attrs(&field.attrs, ident)?;
        let tag_name = &tag.name;

        field_idents.push(ident.clone());

        if let Some(inner) = option_inner(&field.ty) {
            let to_value_expr = value_expr_ref(inner, &tag, quote!(v));
            to_pairs.push(quote! {
                if let Some(v) = &self.#ident {
                    list.push(#tag_name, #to_value_expr);
                }
            });

            let from_value_expr = from_value_expr(inner, &tag, tag_name);
            from_fields.push(quote! {
                let #ident = match nvpair::marshal::lookup_field(list, #tag_name) {
                    ::core::option::Option::Some(value) => {
                        ::core::option::Option::Some(#from_value_expr)
                    }
                    ::core::option::Option::None => ::core::option::Option::None,
                };
            });
        } else {
            let to_value_expr = value_expr_ref(&field.ty, &tag, quote!(&self.#ident));
            to_pairs.push(quote! {
                list.push(#tag_name, #to_value_expr);
            });

            let from_value_expr = from_value_expr(&field.ty, &tag, tag_name);
            from_fields.push(quote! {
                let #ident = match nvpair::marshal::lookup_field(list, #tag_name) {
                    ::core::option::Option::Some(value) => #from_value_expr,
                    ::core::option::Option::None => {
                        return ::core::result::Result::Err(
                            nvpair::marshal::MarshalError::MissingField {
                                pair: nvpair::__String::from(#tag_name),
                            },
                        )
                    }
                };
            });
        }
    }

    Ok(quote! {
        impl #impl_generics nvpair::marshal::NvValue for #name #ty_generics #where_clause {
            fn to_pairs(&self, list: &mut nvpair::value::NvList) {
                #(#to_pairs)*
            }

            fn from_pairs(
                list: &nvpair::value::NvList,
            ) -> ::core::result::Result<Self, nvpair::marshal::MarshalError> {
                #(#from_fields)*
                ::core::result::Result::Ok(#name {
                    #(#field_idents),*
                })
            }
        }
    })
}

/// A parsed `#[nv(name = "...", byte)]` attribute, resolved to a concrete
/// tag name at macro-expansion time (no runtime string parsing needed).
struct FieldTag {
    name: String,
    byte: bool,
}

impl FieldTag {
    fn from_attrs(attrs: &[syn::Attribute], ident: &syn::Ident) -> syn::Result<FieldTag> {
        let mut name = None;
        let mut byte = false;

        for attr in attrs {
            if !attr.path().is_ident("nv") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    name = Some(lit.value());
                } else if meta.path.is_ident("byte") {
                    byte = true;
                } else {
                    return Err(meta.error("unsupported nv attribute option"));
                }
                Ok(())
            })?;
        }

        Ok(FieldTag {
            name: name.unwrap_or_else(|| ident.to_string()),
            byte,
        })
    }
}

/// Returns `Some(inner)` if `ty` is `Option<inner>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

/// Returns `Some(inner)` if `ty` is `Vec<inner>`.
fn vec_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Vec" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

/// True if `ty` is one of the scalar/array/`NvList`/`Value` types the
/// marshaller's compatibility matrix already covers via `ToValue`/
/// `FromValue`. Anything else is assumed to be a user type that itself
/// implements `NvValue` and is encoded as a nested list.
fn is_builtin(ty: &Type) -> bool {
    const SCALARS: &[&str] = &[
        "bool", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f64", "String", "NvList",
        "Value",
    ];

    let Type::Path(path) = ty else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    let ident = segment.ident.to_string();

    if ident == "Vec" {
        return match vec_inner(ty) {
            Some(inner) => is_builtin_vec_element(inner),
            None => false,
        };
    }

    SCALARS.contains(&ident.as_str())
}

fn is_builtin_vec_element(ty: &Type) -> bool {
    const ELEMENTS: &[&str] = &[
        "bool", "i8", "i16", "u16", "i32", "u32", "i64", "u64", "u8", "String", "NvList",
    ];
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    ELEMENTS.contains(&segment.ident.to_string().as_str())
}

/// Builds the `to_value()` expression for a field of type `ty`, bound to the
/// given expression tokens (`&self.field` or a dereferenced `Option` match
/// binding).
fn value_expr_ref(ty: &Type, tag: &FieldTag, expr: TokenStream) -> TokenStream {
    if tag.byte && is_u8_scalar(ty) {
        return quote! { nvpair::marshal::encode_u8(*#expr, true) };
    }
    if tag.byte {
        if let Some(inner) = vec_inner(ty) {
            if is_u8_scalar(inner) {
                return quote! { nvpair::marshal::encode_u8_array(#expr, true) };
            }
        }
    }
    if is_builtin(ty) {
        return quote! { nvpair::marshal::ToValue::to_value(#expr) };
    }
    if let Some(inner) = vec_inner(ty) {
        // A Vec of a non-builtin element is assumed to be a sequence of
        // nested NvValue implementers, encoded as an NvlistArray.
        quote! { nvpair::marshal::nested_array_to_value::<#inner>(#expr) }
    } else {
        quote! { nvpair::marshal::nested_to_value(#expr) }
    }
}

fn is_u8_scalar(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path.is_ident("u8")
}

/// Builds the `from_value()`/`nested_from_value()` expression for decoding
/// a field of type `ty` out of a looked-up `value` pair named `tag_name`.
fn from_value_expr(ty: &Type, _tag: &FieldTag, tag_name: &str) -> TokenStream {
    if is_builtin(ty) {
        return quote! {
            <#ty as nvpair::marshal::FromValue>::from_value(#tag_name, value)?
        };
    }
    if let Some(inner) = vec_inner(ty) {
        quote! {
            nvpair::marshal::nested_array_from_value::<#inner>(#tag_name, value)?
        }
    } else {
        quote! {
            nvpair::marshal::nested_from_value::<#ty>(#tag_name, value)?
        }
    }
}
