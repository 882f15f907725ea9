//! Derive support for `rigging`. See [`macro@Record`].

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Implements `rigging::Record` (and its `Field` supertrait) for a struct
/// with named fields, generating the `'static` shape table the resolver
/// walks.
///
/// Each named field becomes one entry in the shape, in declaration order.
/// Field attributes:
///
/// - `#[rig("directive; other=a,b")]` attaches the directive tag that is
///   parsed when a resolver tree is built for the record.
/// - `#[rig(skip)]` hides the field from the shape entirely; it is filled
///   with `Default::default()` when the record is constructed and no
///   directive can reach it.
///
/// Enums, tuple structs, unit structs, and generic types are rejected: a
/// shape is a single static table keyed by concrete field types.
///
/// ```rust, ignore
/// use rigging::derive::Record;
///
/// #[derive(Record)]
/// struct Login {
///     #[rig("required")]
///     user: String,
///     #[rig("required; secret")]
///     password: String,
///     #[rig(skip)]
///     attempts: u32,
/// }
/// ```
#[proc_macro_derive(Record, attributes(rig))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
