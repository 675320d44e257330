//! Implementation of the `#[derive(Attributes)]` macro.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Lit, Path, Result};

/// Parsed `#[attr(...)]` options for one field.
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
    with: Option<Path>,
}

fn parse_field_attrs(attrs: &[syn::Attribute]) -> Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("attr")) {
        attr.parse_nested_meta(|meta| {
            let ident = meta.path.get_ident().map(|i| i.to_string());
            match ident.as_deref() {
                Some("skip") => {
                    parsed.skip = true;
                }
                Some("rename") => {
                    let value: Lit = meta.value()?.parse()?;
                    if let Lit::Str(s) = value {
                        parsed.rename = Some(s.value());
                    } else {
                        return Err(Error::new(value.span(), "expected string literal"));
                    }
                }
                Some("with") => {
                    parsed.with = Some(meta.value()?.parse()?);
                }
                _ => {
                    return Err(meta.error("unknown attr option, expected `skip`, `rename` or `with`"));
                }
            }
            Ok(())
        })?;
    }

    if parsed.skip && (parsed.rename.is_some() || parsed.with.is_some()) {
        return Err(Error::new(
            attrs
                .iter()
                .find(|a| a.path().is_ident("attr"))
                .map_or_else(proc_macro2::Span::call_site, |a| a.span()),
            "`skip` cannot be combined with `rename` or `with`",
        ));
    }

    Ok(parsed)
}

/// Constant name for a field: `priority` becomes `PRIORITY`.
fn constant_ident(field: &Ident) -> Ident {
    let name = field.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name);
    format_ident!("{}", name.to_uppercase(), span = field.span())
}

/// Main implementation of the Attributes derive macro.
pub fn attributes_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Attributes can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Attributes can only be derived for structs",
            ))
        }
    };

    let mut constants: Vec<TokenStream> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let raw = field_name.to_string();
        let exposed = attrs
            .rename
            .unwrap_or_else(|| raw.strip_prefix("r#").unwrap_or(&raw).to_string());

        if names.contains(&exposed) {
            return Err(Error::new(
                field.span(),
                format!("duplicate attribute name `{}`", exposed),
            ));
        }

        let constant = constant_ident(field_name);
        let doc = format!("Attribute name of `{}`.", raw);
        constants.push(quote! {
            #[doc = #doc]
            pub const #constant: &'static str = #exposed;
        });

        let conversion = match &attrs.with {
            Some(path) => quote! {
                ::core::convert::Into::<::filter_collection::Value>::into(#path(&self.#field_name))
            },
            None => quote! {
                ::core::convert::Into::<::filter_collection::Value>::into(
                    ::core::clone::Clone::clone(&self.#field_name)
                )
            },
        };
        arms.push(quote! {
            #exposed => ::core::option::Option::Some(#conversion),
        });

        names.push(exposed);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*

            /// Every attribute name exposed by this type, in declaration order.
            pub const ATTRIBUTES: &'static [&'static str] = &[#(#names),*];
        }

        impl #impl_generics ::filter_collection::Attributes for #struct_name #ty_generics #where_clause {
            fn attribute(&self, name: &str) -> ::core::option::Option<::filter_collection::Value> {
                match name {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}
