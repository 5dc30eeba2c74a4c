//! # Accessor Derive
//!
//! Derive macro for configuration-style structs: a by-value getter plus
//! `with_`/`set_` builders for every named field.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input, spanned::Spanned};

/// Derive `Accessors` for a struct with named, `Copy` fields.
///
/// For each field `foo: Ty` this generates
///
/// - `const fn foo(&self) -> Ty`
/// - `const fn with_foo(mut self, value: Ty) -> Self`
/// - `fn set_foo(&mut self, value: Ty) -> &mut Self`
///
/// Field attributes:
/// - `#[accessors(skip)]`: generate nothing for the field.
/// - `#[accessors(readonly)]`: generate the getter only.
///
/// # Example
///
/// ```
/// use utils_accessors_derive::Accessors;
///
/// #[derive(Accessors)]
/// struct Limits {
///     batch: usize,
///     #[accessors(readonly)]
///     engines: u8,
/// }
///
/// let limits = Limits { batch: 8, engines: 4 }.with_batch(16);
/// assert_eq!(limits.batch(), 16);
/// assert_eq!(limits.engines(), 4);
/// ```
#[proc_macro_derive(Accessors, attributes(accessors))]
pub fn derive_accessors(input: TokenStream) -> TokenStream {
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = parse_macro_input!(input as DeriveInput);

    let fields = match data {
        Data::Struct(s) => match s.fields {
            Fields::Named(n) => n.named,
            other => {
                return syn::Error::new(other.span(), "Accessors requires named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(ident.span(), "Accessors can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut methods = Vec::new();
    for field in fields {
        let Some(name) = &field.ident else { continue };
        let mode = match field_mode(&field.attrs) {
            Ok(mode) => mode,
            Err(err) => return err.to_compile_error().into(),
        };
        if mode == Mode::Skip {
            continue;
        }

        let ty = &field.ty;
        methods.push(quote! {
            #[inline]
            #[must_use]
            pub const fn #name(&self) -> #ty {
                self.#name
            }
        });

        if mode == Mode::ReadOnly {
            continue;
        }

        let with_name = format_ident!("with_{}", name);
        let set_name = format_ident!("set_{}", name);
        methods.push(quote! {
            #[inline]
            #[must_use]
            pub const fn #with_name(mut self, value: #ty) -> Self {
                self.#name = value;
                self
            }

            #[inline]
            pub fn #set_name(&mut self, value: #ty) -> &mut Self {
                self.#name = value;
                self
            }
        });
    }

    TokenStream::from(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    })
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    Full,
    ReadOnly,
    Skip,
}

fn field_mode(attrs: &[syn::Attribute]) -> syn::Result<Mode> {
    let mut mode = Mode::Full;
    for attr in attrs.iter().filter(|a| a.path().is_ident("accessors")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                mode = Mode::Skip;
                Ok(())
            } else if meta.path.is_ident("readonly") {
                if mode != Mode::Skip {
                    mode = Mode::ReadOnly;
                }
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `readonly`"))
            }
        })?;
    }
    Ok(mode)
}
