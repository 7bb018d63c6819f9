//! Derive macros for the `gamejson` object mapper.
//!
//! `#[derive(JsonSerialize)]` and `#[derive(JsonDeserialize)]` work on
//! named-field structs and generate the same probe-and-assign loops a
//! hand-written mapping would use. Field selection metadata comes from the
//! struct itself: a field's Rust visibility decides whether it counts as
//! public, and `#[json(...)]` attributes refine the rest.
//!
//! Supported attributes:
//!
//! - `#[json(non_public)]` — treat the field as non-public regardless of its
//!   Rust visibility.
//! - `#[json(backing)]` — mark the field as auto-property backing storage,
//!   mapped only when `Settings::include_backing_fields` is set.
//! - `#[json(skip)]` — never serialized, never probed.
//! - struct level `#[json(property(name = "...", get = "...", set = "..."))]`
//!   — an accessor-backed pseudo-field, mapped through the named getter and
//!   setter only when `Settings::serialize_tagged_properties` is set.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr};

#[proc_macro_derive(JsonSerialize, attributes(json))]
pub fn derive_json_serialize(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_serialize(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[proc_macro_derive(JsonDeserialize, attributes(json))]
pub fn derive_json_deserialize(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_deserialize(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

struct FieldSpec {
    ident: Ident,
    name: String,
    public: bool,
    backing: bool,
}

struct PropertySpec {
    name: String,
    getter: Ident,
    setter: Ident,
}

fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<FieldSpec>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "gamejson derives support structs with named fields only",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "gamejson derives support structs only",
            ))
        }
    };

    let mut specs = Vec::new();
    for field in fields {
        let ident = field.ident.clone().expect("named field has an ident");
        let mut public = matches!(field.vis, syn::Visibility::Public(_));
        let mut backing = false;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("json") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("non_public") {
                    public = false;
                    Ok(())
                } else if meta.path.is_ident("backing") {
                    backing = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("property") {
                    Err(meta.error("`property` goes on the struct, not a field"))
                } else {
                    Err(meta.error("unsupported gamejson field attribute"))
                }
            })?;
        }

        if skip {
            continue;
        }
        specs.push(FieldSpec {
            name: ident.to_string(),
            ident,
            public,
            backing,
        });
    }
    Ok(specs)
}

fn collect_properties(input: &DeriveInput) -> syn::Result<Vec<PropertySpec>> {
    let mut specs = Vec::new();
    for attr in &input.attrs {
        if !attr.path().is_ident("json") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("property") {
                return Err(meta.error("unsupported gamejson struct attribute"));
            }

            let mut name = None;
            let mut getter = None;
            let mut setter = None;
            meta.parse_nested_meta(|inner| {
                let literal: LitStr = inner.value()?.parse()?;
                if inner.path.is_ident("name") {
                    name = Some(literal.value());
                } else if inner.path.is_ident("get") {
                    getter = Some(literal.value());
                } else if inner.path.is_ident("set") {
                    setter = Some(literal.value());
                } else {
                    return Err(inner.error("expected `name`, `get`, or `set`"));
                }
                Ok(())
            })?;

            let name = name.ok_or_else(|| meta.error("property needs a `name`"))?;
            let getter = getter.ok_or_else(|| meta.error("property needs a `get` method"))?;
            let setter = setter.ok_or_else(|| meta.error("property needs a `set` method"))?;
            specs.push(PropertySpec {
                name,
                getter: format_ident!("{}", getter),
                setter: format_ident!("{}", setter),
            });
            Ok(())
        })?;
    }
    Ok(specs)
}

fn visibility_tokens(public: bool) -> TokenStream2 {
    if public {
        quote!(::gamejson::Visibility::Public)
    } else {
        quote!(::gamejson::Visibility::NonPublic)
    }
}

fn field_condition(spec: &FieldSpec) -> TokenStream2 {
    let visibility = visibility_tokens(spec.public);
    if spec.backing {
        quote! {
            settings.field_visibility.includes(#visibility)
                && settings.include_backing_fields
        }
    } else {
        quote! { settings.field_visibility.includes(#visibility) }
    }
}

fn expand_serialize(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = collect_fields(input)?;
    let properties = collect_properties(input)?;
    let ident = &input.ident;

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(syn::parse_quote!(::gamejson::JsonSerialize));
        param.bounds.push(syn::parse_quote!(::core::any::Any));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let field_writes = fields.iter().map(|spec| {
        let condition = field_condition(spec);
        let field_ident = &spec.ident;
        let name = &spec.name;
        quote! {
            if #condition {
                writer.begin_property(#name);
                ::gamejson::serialize_value(&self.#field_ident, writer, settings)?;
                writer.end_property()?;
            }
        }
    });

    let property_writes = properties.iter().map(|spec| {
        let name = &spec.name;
        let getter = &spec.getter;
        quote! {
            if settings.serialize_tagged_properties {
                writer.begin_property(#name);
                ::gamejson::serialize_value(&self.#getter(), writer, settings)?;
                writer.end_property()?;
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::gamejson::JsonSerialize for #ident #ty_generics #where_clause {
            fn json_serialize(
                &self,
                writer: &mut ::gamejson::Writer,
                settings: &::gamejson::Settings,
            ) -> ::gamejson::Result<()> {
                writer.begin_object();
                #(#field_writes)*
                #(#property_writes)*
                writer.end_object()
            }
        }
    })
}

fn expand_deserialize(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = collect_fields(input)?;
    let properties = collect_properties(input)?;
    let ident = &input.ident;

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(syn::parse_quote!(::gamejson::JsonDeserialize));
        param.bounds.push(syn::parse_quote!(::core::any::Any));
        param
            .bounds
            .push(syn::parse_quote!(::core::default::Default));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let field_probes = fields.iter().map(|spec| {
        let condition = field_condition(spec);
        let field_ident = &spec.ident;
        let name = &spec.name;
        quote! {
            if #condition && reader.try_consume_property(#name)? {
                value.#field_ident = ::gamejson::deserialize_value(reader, settings)?;
                consumed = true;
            }
        }
    });

    let property_probes = properties.iter().map(|spec| {
        let name = &spec.name;
        let setter = &spec.setter;
        quote! {
            if settings.serialize_tagged_properties && reader.try_consume_property(#name)? {
                value.#setter(::gamejson::deserialize_value(reader, settings)?);
                consumed = true;
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::gamejson::JsonDeserialize for #ident #ty_generics #where_clause {
            fn json_deserialize(
                reader: &mut ::gamejson::Reader<'_>,
                settings: &::gamejson::Settings,
            ) -> ::gamejson::Result<Self> {
                if reader.is_null_token() {
                    reader.consume_null()?;
                    return Ok(<Self as ::core::default::Default>::default());
                }

                let mut value = <Self as ::core::default::Default>::default();
                reader.expect_object_start()?;
                while !reader.is_at_object_end() {
                    let mut consumed = false;
                    #(#field_probes)*
                    #(#property_probes)*
                    if !consumed {
                        reader.consume_property_name()?;
                        reader.consume_unknown_value()?;
                    }
                }
                reader.expect_object_end()?;
                Ok(value)
            }
        }
    })
}
