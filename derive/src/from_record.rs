use std::collections::HashMap;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitStr, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut seen: HashMap<String, Ident> = HashMap::new();

    for field in &fields {
        let existing = seen.insert(field.identifier.value(), field.name.clone());

        if existing.is_some() {
            Err(Error::new(
                field.identifier.span(),
                "Field names must be unique.",
            ))?
        }
    }

    let cases = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            value_type,
            identifier,
            handler,
        } = field;

        let assignment = if let Some((field_type, handler)) = handler {
            let body = &handler.body;
            let acc = handler.inputs.iter().nth(0).unwrap();
            let val = handler.inputs.iter().nth(1).unwrap();

            quote! {
                (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
            }
        } else {
            quote! {
                self.#name = Some(value)
            }
        };

        quote! {
            #identifier => {
                if let Some(value) = <#value_type as ::vedirect::avec::FromValue>::from_value(value) {
                    #assignment;
                }
            }
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::vedirect::avec::FromRecord for #name #ty_generics #where_clause {
            fn add_field(&mut self, name: &str, value: &::vedirect::sans::value::Value) {
                match name {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    value_type: Type,
    identifier: LitStr,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let FieldAttribute {
            identifier,
            handler,
        } = attr.meta.require_list()?.parse_args()?;

        let value_type = if let Some(handler) = &handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected value type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            option_inner_type(&field.ty)?
        };

        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            value_type,
            identifier,
            handler,
        }))
    }
}

/// Extract `T` from a field of type `Option<T>`.
fn option_inner_type(ty: &Type) -> Result<Type> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(inner_type)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(inner_type.clone())
}

#[derive(Debug)]
struct FieldAttribute {
    identifier: LitStr,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = input.parse::<LitStr>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            handler,
        })
    }
}
