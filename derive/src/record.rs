use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

static RIG_ATTRIBUTE_NAME: &str = "rig";

/// Per-field `#[rig(...)]` configuration.
enum RigAttr {
    /// No attribute; the field participates with an empty tag.
    None,
    /// `#[rig("...")]`
    Tag(String),
    /// `#[rig(skip)]`
    Skip,
}

impl RigAttr {
    fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut parsed = RigAttr::None;
        for attr in attrs {
            if !attr.path().is_ident(RIG_ATTRIBUTE_NAME) {
                continue;
            }
            if !matches!(parsed, RigAttr::None) {
                return Err(Error::new_spanned(
                    attr,
                    "duplicate `#[rig(...)]` attribute on field",
                ));
            }
            parsed = if let Ok(lit) = attr.parse_args::<LitStr>() {
                RigAttr::Tag(lit.value())
            } else {
                let ident: Ident = attr.parse_args().map_err(|_| {
                    Error::new_spanned(attr, "expected `#[rig(\"tag\")]` or `#[rig(skip)]`")
                })?;
                if ident != "skip" {
                    return Err(Error::new_spanned(
                        ident,
                        "expected `#[rig(\"tag\")]` or `#[rig(skip)]`",
                    ));
                }
                RigAttr::Skip
            };
        }
        Ok(parsed)
    }
}

pub(crate) fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "`#[derive(Record)]` does not support generic types: a record's \
             shape is a single `'static` table over concrete field types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(Error::new_spanned(
                    ident,
                    "`#[derive(Record)]` requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(Error::new_spanned(
                ident,
                "`#[derive(Record)]` only supports structs",
            ));
        }
    };

    let mut field_shapes = Vec::new();
    let mut empty_fields = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_ident = field.ident.as_ref().unwrap();
        let field_ty = &field.ty;

        let tag = match RigAttr::parse(&field.attrs)? {
            RigAttr::Skip => {
                // Hidden from the shape; only the empty-value constructor
                // knows about it.
                empty_fields.push(quote! {
                    #field_ident: ::core::default::Default::default()
                });
                continue;
            }
            RigAttr::Tag(tag) => tag,
            RigAttr::None => String::new(),
        };

        let name = field_ident.to_string();
        empty_fields.push(quote! {
            #field_ident: rigging::shape::Field::empty()
        });
        field_shapes.push(quote! {
            rigging::shape::FieldShape::of::<#field_ty>(
                #name,
                #tag,
                #index,
                |record, value| {
                    let record = record
                        .downcast_mut::<#ident>()
                        .ok_or_else(rigging::shape::AccessError::mismatch::<#ident>)?;
                    let value = value
                        .downcast::<#field_ty>()
                        .map_err(|_| rigging::shape::AccessError::mismatch::<#field_ty>())?;
                    record.#field_ident = *value;
                    ::core::result::Result::Ok(())
                },
            )
        });
    }

    let name = ident.to_string();

    Ok(quote! {
        const _: () = {
            #[automatically_derived]
            impl rigging::shape::Record for #ident {
                fn shape() -> &'static rigging::shape::Shape {
                    static CELL: ::std::sync::OnceLock<rigging::shape::Shape> =
                        ::std::sync::OnceLock::new();
                    CELL.get_or_init(|| {
                        rigging::shape::Shape::of::<#ident>(
                            #name,
                            ::std::vec![#(#field_shapes),*],
                        )
                    })
                }
            }

            #[automatically_derived]
            impl rigging::shape::Field for #ident {
                fn empty() -> Self {
                    Self {
                        #(#empty_fields),*
                    }
                }

                fn record_shape() -> ::core::option::Option<&'static rigging::shape::Shape> {
                    ::core::option::Option::Some(<#ident as rigging::shape::Record>::shape())
                }
            }
        };
    })
}
