//! Attribute lookup by name.
//!
//! String terms in where-clauses, select lists and `sort_by_attr` are
//! resolved through the [`Attributes`] trait. Implement it by hand or
//! derive it with `#[derive(Attributes)]`.

use std::rc::Rc;

use crate::error::{CollectionError, Result};
use crate::options::AttributePolicy;
use crate::value::Value;

/// Types whose attributes can be read by name.
///
/// This trait is typically derived, but can also be implemented manually.
///
/// # Manual Implementation
///
/// ```
/// use filter_collection::{Attributes, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Attributes for Task {
///     fn attribute(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(Value::from(self.name.as_str())),
///             "priority" => Some(Value::from(self.priority)),
///             _ => None,
///         }
///     }
/// }
/// ```
///
/// # Derive Usage
///
/// ```
/// use filter_collection::{Attributes, Collection};
///
/// #[derive(Clone, Attributes)]
/// struct Task {
///     name: String,
///     #[attr(rename = "prio")]
///     priority: u8,
/// }
///
/// let tasks = Collection::from(vec![
///     Task { name: "Write docs".into(), priority: 3 },
///     Task { name: "Fix bug".into(), priority: 5 },
/// ]);
///
/// let urgent = tasks.where_(("prio", ">", 4)).get().unwrap();
/// assert_eq!(urgent.len(), 1);
/// ```
pub trait Attributes {
    /// Returns the value of the named attribute, or `None` if the type
    /// has no such attribute.
    fn attribute(&self, name: &str) -> Option<Value>;
}

/// Looks up an attribute, applying the missing-attribute policy.
pub(crate) fn resolve<T>(item: &T, name: &str, policy: AttributePolicy) -> Result<Value>
where
    T: Attributes + ?Sized,
{
    match item.attribute(name) {
        Some(value) => Ok(value),
        None => match policy {
            AttributePolicy::Error => Err(CollectionError::attribute_not_found::<T>(name)),
            AttributePolicy::Null => Ok(Value::Null),
        },
    }
}

// Scalars carry no named attributes; queries over them use function terms.
macro_rules! no_attributes {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Attributes for $ty {
                fn attribute(&self, _name: &str) -> Option<Value> {
                    None
                }
            }
        )+
    };
}

no_attributes!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

// A bare value has no named parts either.
no_attributes!(Value);

impl<T: Attributes + ?Sized> Attributes for &T {
    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}

impl<T: Attributes + ?Sized> Attributes for Box<T> {
    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}

impl<T: Attributes + ?Sized> Attributes for Rc<T> {
    fn attribute(&self, name: &str) -> Option<Value> {
        (**self).attribute(name)
    }
}
