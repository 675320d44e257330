//! Projected rows produced by `select`.

use indexmap::IndexMap;

use crate::attribute::{self, Attributes};
use crate::error::Result;
use crate::options::AttributePolicy;
use crate::value::Value;

/// Selected attribute values of one element, in selection order.
///
/// Records are themselves [`Attributes`], so a projected result can be
/// queried again by key.
pub type Record = IndexMap<String, Value>;

impl Attributes for Record {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Reads `attributes` off `item` into a record.
pub(crate) fn project<T>(item: &T, attributes: &[String], policy: AttributePolicy) -> Result<Record>
where
    T: Attributes,
{
    attributes
        .iter()
        .map(|name| Ok((name.clone(), attribute::resolve(item, name, policy)?)))
        .collect()
}
