//! In-memory collections with a fluent where/select query builder.
//!
//! A [`Collection`] is an ordered, shared sequence with set-style
//! combinators (union, intersection, dedup) and sorting. Any collection, or
//! any plain `Vec`, can be filtered with a [`Query`]:
//!
//! - `where_("attr")` keeps elements whose attribute is truthy
//! - `where_(("attr", value))` keeps elements whose attribute equals `value`
//! - `where_(("attr", ">=", value))` compares with one of `==`, `!=`, `>=`,
//!   `<=`, `>`, `<`
//! - `where_not(..)` drops matches instead of keeping them
//! - `where_fn(|x| ..)` keeps elements a closure accepts
//! - `select([..])` projects results onto named attributes
//!
//! Clauses narrow the working set one after another, in the order they were
//! added. Attributes are read by name through the [`Attributes`] trait,
//! which is usually derived.
//!
//! # Quick Start
//!
//! ```rust
//! use filter_collection::{Attributes, Collection, Value};
//!
//! #[derive(Debug, Clone, PartialEq, Attributes)]
//! struct Task {
//!     name: String,
//!     priority: i32,
//!     archived: bool,
//! }
//!
//! let tasks = Collection::from(vec![
//!     Task { name: "Write docs".into(), priority: 3, archived: false },
//!     Task { name: "Fix bug".into(), priority: 5, archived: false },
//!     Task { name: "Old task".into(), priority: 1, archived: true },
//! ]);
//!
//! let open = tasks
//!     .where_(("priority", ">=", 3))
//!     .where_not("archived")
//!     .get()
//!     .unwrap();
//! assert_eq!(open.len(), 2);
//!
//! let names = tasks
//!     .where_("archived")
//!     .select(["name"])
//!     .get()
//!     .unwrap()
//!     .into_records()
//!     .unwrap();
//! assert_eq!(names.get(0).unwrap()["name"], Value::from("Old task"));
//!
//! assert_eq!(tasks.max("priority").unwrap(), Some(Value::from(5)));
//! ```
//!
//! # Errors
//!
//! Evaluation is fallible: a missing attribute, an ordering comparison
//! between values of different kinds, an out-of-range index, or (with
//! [`OperatorPolicy::Strict`]) an unknown comparator all surface as a
//! [`CollectionError`].
//!
//! # Logging
//!
//! Query evaluation emits `tracing` events: one `debug` event per
//! evaluation and one `trace` event per applied clause.

// Lets derive output, which names `::filter_collection`, expand inside this crate.
extern crate self as filter_collection;

mod attribute;
mod clause;
mod collection;
mod container;
mod error;
mod op;
mod options;
mod projection;
mod query;
mod record;
mod value;

pub use attribute::Attributes;
pub use clause::{Clause, Condition, Term, Test};
pub use collection::{Collection, Iter};
pub use container::Container;
pub use error::{CollectionError, Result};
pub use op::{Comparator, Op};
pub use options::{AttributePolicy, OperatorPolicy, QueryOptions};
pub use projection::{Projection, Row, Selection};
pub use query::Query;
pub use record::Record;
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use filter_collection_macros::Attributes;
