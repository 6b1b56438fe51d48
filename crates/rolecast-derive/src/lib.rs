//! Derive macro for rolecast records
//!
//! `#[derive(Record)]` generates, for a struct with named fields:
//!
//! | Generated | Purpose |
//! |-----------|---------|
//! | `RecordSchema` | Field descriptor table, built once and cached |
//! | `Record` | Field reads and writes by name |
//! | `FieldValue` | Only with `#[record(nested)]`: the record as a field of another record |
//!
//! ## Attributes
//!
//! ```ignore
//! #[derive(Record, Default)]
//! #[record(name = "User", nested)]
//! pub struct User {
//!     #[field(read = "*", write = "admin,user", alias = "display_name")]
//!     pub name: String,
//!     #[field(read = "admin", write = "admin")]
//!     pub secret: String,
//!     #[field(skip)]
//!     pub cache_key: u64,
//!     password_hash: String,
//! }
//! ```
//!
//! Only `pub` fields are exported. Private and `skip` fields are recorded as
//! hidden so lookups can tell them apart from unknown names. Generic structs
//! are rejected.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod expand;

/// Derive `RecordSchema` and `Record` for a struct with named fields
#[proc_macro_derive(Record, attributes(record, field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand_derive_record(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
