use crate::attrs::{FieldAttrs, RecordAttrs};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, Type, Visibility};

struct ExportedField<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
    attrs: FieldAttrs,
}

pub fn expand_derive_record(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Record)] does not support generic types",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Record)] can only be used on structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Record)] requires named fields",
        ));
    };

    let record_attrs = RecordAttrs::parse(&input.attrs)?;
    let ident = &input.ident;
    let record_name = record_attrs
        .name
        .clone()
        .unwrap_or_else(|| ident.unraw().to_string());

    let mut exported = Vec::new();
    let mut hidden = Vec::new();
    for field in &fields.named {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let name = field_ident.unraw().to_string();
        if attrs.skip || !matches!(field.vis, Visibility::Public(_)) {
            hidden.push(name);
            continue;
        }
        exported.push(ExportedField {
            ident: field_ident,
            name,
            ty: &field.ty,
            attrs,
        });
    }

    let schema_impl = expand_schema(ident, &record_name, &exported, &hidden);
    let record_impl = expand_record(ident, &exported);
    let nested_impl = record_attrs.nested.then(|| expand_nested(ident));

    Ok(quote! {
        #schema_impl
        #record_impl
        #nested_impl
    })
}

fn expand_schema(
    ident: &Ident,
    record_name: &str,
    exported: &[ExportedField<'_>],
    hidden: &[String],
) -> TokenStream2 {
    let descriptors = exported.iter().map(|field| {
        let name = &field.name;
        let ty = field.ty;
        let read = field.attrs.read.as_ref().map(|read| quote!(.read(#read)));
        let write = field.attrs.write.as_ref().map(|write| quote!(.write(#write)));
        let alias = field.attrs.alias.as_ref().map(|alias| quote!(.alias(#alias)));
        quote! {
            .field(
                ::rolecast_core::FieldDescriptor::new(
                    #name,
                    <#ty as ::rolecast_core::FieldValue>::field_type(),
                )
                #read #write #alias
            )
        }
    });

    quote! {
        impl ::rolecast_core::RecordSchema for #ident {
            fn record_name() -> &'static str {
                #record_name
            }

            fn record_schema() -> ::std::sync::Arc<::rolecast_core::Schema> {
                static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<::rolecast_core::Schema>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(SCHEMA.get_or_init(|| {
                    ::std::sync::Arc::new(
                        ::rolecast_core::Schema::builder(#record_name)
                            #(#descriptors)*
                            #(.hidden(#hidden))*
                            .build(),
                    )
                }))
            }
        }
    }
}

fn expand_record(ident: &Ident, exported: &[ExportedField<'_>]) -> TokenStream2 {
    let get_arms = exported.iter().map(|field| {
        let name = &field.name;
        let field_ident = field.ident;
        quote! {
            #name => ::std::option::Option::Some(
                ::rolecast_core::FieldValue::to_value(&self.#field_ident)
            ),
        }
    });
    let set_arms = exported.iter().map(|field| {
        let name = &field.name;
        let field_ident = field.ident;
        let ty = field.ty;
        quote! {
            #name => {
                self.#field_ident = <#ty as ::rolecast_core::FieldValue>::from_value(value)
                    .map_err(|e| e.at(name))?;
                ::std::result::Result::Ok(())
            }
        }
    });

    quote! {
        impl ::rolecast_core::Record for #ident {
            fn schema(&self) -> ::std::sync::Arc<::rolecast_core::Schema> {
                <Self as ::rolecast_core::RecordSchema>::record_schema()
            }

            fn get(&self, name: &str) -> ::std::option::Option<::rolecast_core::Value> {
                match name {
                    #(#get_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set(
                &mut self,
                name: &str,
                value: ::rolecast_core::Value,
            ) -> ::rolecast_core::Result<()> {
                match name {
                    #(#set_arms)*
                    _ => {
                        let schema = <Self as ::rolecast_core::RecordSchema>::record_schema();
                        match schema.lookup(name) {
                            ::std::result::Result::Err(err) => ::std::result::Result::Err(err),
                            ::std::result::Result::Ok(_) => ::std::result::Result::Err(
                                ::rolecast_core::Error::field_not_found(name),
                            ),
                        }
                    }
                }
            }
        }
    }
}

fn expand_nested(ident: &Ident) -> TokenStream2 {
    quote! {
        impl ::rolecast_core::FieldValue for #ident {
            fn field_type() -> ::rolecast_core::FieldType {
                ::rolecast_core::FieldType::Record(::rolecast_core::RecordType::of::<Self>())
            }

            fn to_value(&self) -> ::rolecast_core::Value {
                ::rolecast_core::Value::Record(::rolecast_core::RecordValue::capture(self))
            }

            fn from_value(
                value: ::rolecast_core::Value,
            ) -> ::std::result::Result<Self, ::rolecast_core::CoercionError> {
                ::rolecast_core::RecordValue::restore::<Self>(value)
            }
        }
    }
}
