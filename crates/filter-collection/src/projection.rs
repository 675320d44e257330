//! Attribute projection over query results.

use crate::attribute::Attributes;
use crate::clause::Condition;
use crate::container::Container;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::query::Query;
use crate::record::{self, Record};
use crate::value::Value;

/// A query whose results are reduced to selected attributes.
///
/// Created by [`Query::select`]. Each surviving element becomes a
/// [`Record`] holding the selected attributes in selection order, and
/// [`get`](Projection::get) returns those records in the source's
/// container kind. With no attributes selected, elements pass through
/// unchanged.
///
/// ```
/// use filter_collection::{Query, Record, Value};
///
/// let rows: Vec<Record> = vec![
///     Record::from([("name".into(), Value::from("a")), ("size".into(), Value::from(3))]),
///     Record::from([("name".into(), Value::from("b")), ("size".into(), Value::from(1))]),
/// ];
///
/// let names = Query::new(&rows)
///     .where_(("size", ">", 2))
///     .select(["name"])
///     .get()
///     .unwrap()
///     .into_records()
///     .unwrap();
///
/// assert_eq!(names.len(), 1);
/// assert_eq!(names[0]["name"], Value::from("a"));
/// assert_eq!(names[0].len(), 1);
/// ```
pub struct Projection<'a, C: Container> {
    query: Query<'a, C>,
    attributes: Vec<String>,
}

impl<'a, C: Container> Projection<'a, C> {
    pub(crate) fn new(query: Query<'a, C>) -> Self {
        Projection {
            query,
            attributes: Vec::new(),
        }
    }

    /// Adds attributes to the selection, skipping ones already selected.
    pub fn select<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in attributes {
            let name = name.into();
            if !self.attributes.contains(&name) {
                self.attributes.push(name);
            }
        }
        self
    }

    /// Adds a where-clause to the underlying query.
    pub fn where_(mut self, condition: impl Into<Condition<C::Item>>) -> Self {
        self.query = self.query.where_(condition);
        self
    }

    /// Adds an inverted where-clause to the underlying query.
    pub fn where_not(mut self, condition: impl Into<Condition<C::Item>>) -> Self {
        self.query = self.query.where_not(condition);
        self
    }

    pub fn where_fn<F, R>(mut self, predicate: F) -> Self
    where
        F: Fn(&C::Item) -> R + 'static,
        R: Into<Value>,
    {
        self.query = self.query.where_fn(predicate);
        self
    }

    pub fn where_not_fn<F, R>(mut self, predicate: F) -> Self
    where
        F: Fn(&C::Item) -> R + 'static,
        R: Into<Value>,
    {
        self.query = self.query.where_not_fn(predicate);
        self
    }

    /// Replaces the evaluation options of the underlying query.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.query = self.query.with_options(options);
        self
    }

    /// Returns the selected attribute names in order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Returns the underlying query.
    pub fn query(&self) -> &Query<'a, C> {
        &self.query
    }

    /// Returns one record per matching element, or the matching elements
    /// themselves when nothing is selected.
    pub fn get(&self) -> Result<Selection<C>>
    where
        C::Item: Attributes + Clone,
    {
        if self.attributes.is_empty() {
            return Ok(Selection::Items(self.query.get()?));
        }
        let records = self.records()?;
        Ok(Selection::Records(<C::Rebind<Record> as Container>::from_items(records)))
    }

    /// Returns the first row [`get`](Projection::get) would yield.
    ///
    /// Every survivor is projected first, so an element that cannot be
    /// projected fails the call even when it is not the first.
    pub fn first(&self) -> Result<Option<Row<C::Item>>>
    where
        C::Item: Attributes + Clone,
    {
        if self.attributes.is_empty() {
            return Ok(self.query.first()?.map(Row::Item));
        }
        Ok(self.records()?.into_iter().next().map(Row::Record))
    }

    /// Returns `true` if [`get`](Projection::get) would yield at least one row.
    pub fn exists(&self) -> Result<bool>
    where
        C::Item: Attributes,
    {
        Ok(self.count()? > 0)
    }

    /// Returns the number of rows [`get`](Projection::get) would yield.
    pub fn count(&self) -> Result<usize>
    where
        C::Item: Attributes,
    {
        if self.attributes.is_empty() {
            return self.query.count();
        }
        Ok(self.records()?.len())
    }

    fn records(&self) -> Result<Vec<Record>>
    where
        C::Item: Attributes,
    {
        let policy = self.query.options().attribute_policy();
        self.query.source().with_items(|items| {
            self.query
                .survivors(items)?
                .into_iter()
                .map(|item| record::project(item, &self.attributes, policy))
                .collect()
        })
    }
}

/// Result of [`Projection::get`].
pub enum Selection<C: Container> {
    /// Nothing was selected; the matching elements, unchanged.
    Items(C),
    /// One record per matching element.
    Records(C::Rebind<Record>),
}

impl<C: Container> Selection<C> {
    /// Returns `true` if the rows are projected records.
    pub fn is_projected(&self) -> bool {
        matches!(self, Selection::Records(_))
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        match self {
            Selection::Items(items) => items.with_items(<[C::Item]>::len),
            Selection::Records(records) => records.with_items(<[Record]>::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the unprojected elements, if nothing was selected.
    pub fn into_items(self) -> Option<C> {
        match self {
            Selection::Items(items) => Some(items),
            Selection::Records(_) => None,
        }
    }

    /// Returns the projected records, if attributes were selected.
    pub fn into_records(self) -> Option<C::Rebind<Record>> {
        match self {
            Selection::Items(_) => None,
            Selection::Records(records) => Some(records),
        }
    }
}

impl<C> Clone for Selection<C>
where
    C: Container + Clone,
    C::Rebind<Record>: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Selection::Items(items) => Selection::Items(items.clone()),
            Selection::Records(records) => Selection::Records(records.clone()),
        }
    }
}

impl<C> PartialEq for Selection<C>
where
    C: Container + PartialEq,
    C::Rebind<Record>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selection::Items(a), Selection::Items(b)) => a == b,
            (Selection::Records(a), Selection::Records(b)) => a == b,
            _ => false,
        }
    }
}

impl<C> std::fmt::Debug for Selection<C>
where
    C: Container + std::fmt::Debug,
    C::Rebind<Record>: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Items(items) => f.debug_tuple("Items").field(items).finish(),
            Selection::Records(records) => f.debug_tuple("Records").field(records).finish(),
        }
    }
}

/// One row of a [`Selection`], as returned by [`Projection::first`].
#[derive(Debug, Clone, PartialEq)]
pub enum Row<T> {
    /// An unprojected element.
    Item(T),
    /// A projected record.
    Record(Record),
}

impl<T> Row<T> {
    pub fn into_item(self) -> Option<T> {
        match self {
            Row::Item(item) => Some(item),
            Row::Record(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Row::Item(_) => None,
            Row::Record(record) => Some(record),
        }
    }
}

impl<C: Container> Clone for Projection<'_, C> {
    fn clone(&self) -> Self {
        Projection {
            query: self.query.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<C: Container> std::fmt::Debug for Projection<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projection")
            .field("query", &self.query)
            .field("attributes", &self.attributes)
            .finish()
    }
}
