//! Parsing of `#[record(...)]` and `#[field(...)]` attributes

use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

/// Struct-level options
#[derive(Default)]
pub struct RecordAttrs {
    pub name: Option<String>,
    pub nested: bool,
}

/// Field-level options
#[derive(Default)]
pub struct FieldAttrs {
    pub read: Option<String>,
    pub write: Option<String>,
    pub alias: Option<String>,
    pub skip: bool,
}

impl RecordAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    set_once(&meta, &mut parsed.name)
                } else if meta.path.is_ident("nested") {
                    parsed.nested = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute, expected `name` or `nested`"))
                }
            })?;
        }
        Ok(parsed)
    }
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("field")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("read") {
                    set_once(&meta, &mut parsed.read)
                } else if meta.path.is_ident("write") {
                    set_once(&meta, &mut parsed.write)
                } else if meta.path.is_ident("alias") {
                    set_once(&meta, &mut parsed.alias)
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    Ok(())
                } else {
                    Err(meta.error(
                        "unsupported field attribute, expected `read`, `write`, `alias` or `skip`",
                    ))
                }
            })?;
        }
        Ok(parsed)
    }
}

fn set_once(meta: &ParseNestedMeta<'_>, slot: &mut Option<String>) -> syn::Result<()> {
    let lit: LitStr = meta.value()?.parse()?;
    if slot.is_some() {
        return Err(meta.error("duplicate attribute"));
    }
    *slot = Some(lit.value());
    Ok(())
}
