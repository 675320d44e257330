//! Proc macros for filter-collection.
//!
//! This crate provides the [`Attributes`] derive, which lets a struct's
//! fields be read by name in `where`, `select`, `sort_by_attr` and `max`.
//! It is re-exported from `filter-collection` under the default `derive`
//! feature; depend on this crate directly only if that feature is off.
//!
//! # Examples
//!
//! For working examples, see `filter-collection/tests/derive.rs`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attributes;

/// Derives the `Attributes` trait for structs with named fields.
///
/// Every field is exposed under its own name and converted with
/// `self.field.clone().into()`, so field types must be `Clone` and
/// convertible into `Value`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from lookups |
/// | `rename = "..."` | Expose the field under a custom name |
/// | `with = path` | Convert through `fn(&FieldType) -> Value` instead of cloning |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Name constants (e.g., `Task::NAME`, `Task::PRIORITY`) holding the
///    exposed attribute names
/// 2. `Task::ATTRIBUTES`, every exposed name in declaration order
/// 3. Implementation of `Attributes::attribute()`
///
/// # Example
///
/// ```ignore
/// use filter_collection::{Attributes, Collection, Value};
///
/// #[derive(Clone, Attributes)]
/// struct Task {
///     name: String,
///
///     #[attr(rename = "prio")]
///     priority: u8,
///
///     #[attr(with = tag_count)]
///     tags: Vec<String>,
///
///     #[attr(skip)]
///     internal_id: u64,
/// }
///
/// fn tag_count(tags: &Vec<String>) -> Value {
///     Value::from(tags.len())
/// }
///
/// let tasks = Collection::from(vec![
///     Task { name: "Write docs".into(), priority: 3, tags: vec![], internal_id: 1 },
///     Task { name: "Fix bug".into(), priority: 5, tags: vec!["core".into()], internal_id: 2 },
/// ]);
///
/// let results = tasks
///     .where_((Task::PRIORITY, ">=", 3))
///     .where_(Task::TAGS)
///     .get()
///     .unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(Task::ATTRIBUTES, ["name", "prio", "tags"]);
/// ```
#[proc_macro_derive(Attributes, attributes(attr))]
pub fn attributes_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    attributes::attributes_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
