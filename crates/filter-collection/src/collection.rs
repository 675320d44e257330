//! The [`Collection`] container.
//!
//! A `Collection` is an ordered, mutable, index-addressable sequence with
//! set-like helpers and query entry points. Its storage is a shared handle:
//! [`Collection::shared`] aliases another collection's elements, while
//! [`Collection::copy`] makes an independent clone.

use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div};
use std::rc::Rc;

use tracing::debug;

use crate::attribute::{self, Attributes};
use crate::clause::Condition;
use crate::container::Container;
use crate::error::{CollectionError, Result};
use crate::op::{self, Op};
use crate::options::AttributePolicy;
use crate::query::Query;
use crate::value::Value;

/// Ordered, mutable sequence with query support.
///
/// Mutating methods take `&self` and return `&Self`, so calls chain:
///
/// ```
/// use filter_collection::Collection;
///
/// let numbers = Collection::new();
/// numbers.append(3).append(1).extend([4, 1]);
/// numbers.sort();
///
/// assert_eq!(numbers.to_vec(), vec![1, 1, 3, 4]);
/// assert_eq!(numbers.unique().to_vec(), vec![1, 3, 4]);
/// ```
///
/// # Panics
///
/// Storage follows `RefCell` borrow rules. Mutating a collection while an
/// element guard from [`get`](Collection::get) or an [`iter`](Collection::iter)
/// over the same storage is alive panics.
pub struct Collection<T> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T> Collection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Collection::from(Vec::new())
    }

    /// Wraps another collection's storage without copying it.
    ///
    /// Both handles see every later mutation made through either one.
    ///
    /// ```
    /// use filter_collection::Collection;
    ///
    /// let original = Collection::from(vec![1, 2]);
    /// let alias = Collection::shared(&original);
    /// alias.append(3);
    ///
    /// assert_eq!(original.len(), 3);
    /// assert!(alias.shares_storage_with(&original));
    /// ```
    pub fn shared(other: &Collection<T>) -> Self {
        Collection {
            data: Rc::clone(&other.data),
        }
    }

    /// Returns `true` if both handles point at the same storage.
    pub fn shares_storage_with(&self, other: &Collection<T>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Returns `true` if the collection holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    /// Borrows the element at `index`.
    pub fn get(&self, index: usize) -> Result<Ref<'_, T>> {
        let data = self.data.borrow();
        let len = data.len();
        Ref::filter_map(data, |items| items.get(index))
            .map_err(|_| CollectionError::IndexOutOfRange { index, len })
    }

    /// Replaces the element at `index`.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        let mut data = self.data.borrow_mut();
        let len = data.len();
        let slot = data
            .get_mut(index)
            .ok_or(CollectionError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Iterates over the current elements in order.
    ///
    /// Every call starts from the collection's state at that moment.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            rest: Some(Ref::map(self.data.borrow(), Vec::as_slice)),
        }
    }

    /// Inserts `item` before `index`; an index past the end appends.
    pub fn insert(&self, index: usize, item: T) -> &Self {
        let mut data = self.data.borrow_mut();
        let index = index.min(data.len());
        data.insert(index, item);
        self
    }

    /// Appends one element.
    pub fn append(&self, item: T) -> &Self {
        self.data.borrow_mut().push(item);
        self
    }

    /// Appends every element of `items`.
    pub fn extend<I>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = T>,
    {
        self.data.borrow_mut().extend(items);
        self
    }

    /// Appends clones of another container's elements.
    ///
    /// `other` may share storage with `self`; its elements are read before
    /// anything is appended.
    pub fn extend_from<C>(&self, other: &C) -> &Self
    where
        C: Container<Item = T>,
        T: Clone,
    {
        let items = other.with_items(<[T]>::to_vec);
        self.data.borrow_mut().extend(items);
        self
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.data.borrow_mut().clear();
    }

    /// Clones the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.borrow().clone()
    }

    /// Unwraps the elements, cloning them only if the storage is shared.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        match Rc::try_unwrap(self.data) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        }
    }

    /// Returns `true` if some element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.data.borrow().contains(item)
    }

    /// Returns a collection with independent clones of every element.
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        Collection::from(self.to_vec())
    }

    /// Returns a copy of `self` followed by `other`'s elements.
    ///
    /// Duplicates are kept. Also available as `&a + &b`.
    pub fn union<C>(&self, other: &C) -> Self
    where
        C: Container<Item = T>,
        T: Clone,
    {
        let result = self.copy();
        result.extend_from(other);
        result
    }

    /// Returns the elements of `other` that equal some element of `self`.
    ///
    /// Keeps `other`'s order and multiplicity. Elements are compared by
    /// equality only, so this is quadratic. Also available as `&a / &b`.
    pub fn intersect<C>(&self, other: &C) -> Self
    where
        C: Container<Item = T>,
        T: Clone + PartialEq,
    {
        let data = self.data.borrow();
        let kept = other.with_items(|items| {
            items
                .iter()
                .filter(|item| data.contains(item))
                .cloned()
                .collect::<Vec<_>>()
        });
        Collection::from(kept)
    }

    /// Returns the first occurrence of each distinct element, in order.
    pub fn unique(&self) -> Self
    where
        T: Clone + PartialEq,
    {
        let mut seen: Vec<T> = Vec::new();
        for item in self.data.borrow().iter() {
            if !seen.contains(item) {
                seen.push(item.clone());
            }
        }
        Collection::from(seen)
    }

    /// Sorts in place by natural order.
    ///
    /// The sort is stable. Pairs without an ordering (NaN) are treated as
    /// equal.
    pub fn sort(&self) -> &Self
    where
        T: PartialOrd,
    {
        self.data
            .borrow_mut()
            .sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        self
    }

    /// Sorts in place by a key computed once per element.
    pub fn sort_by_key<K, F>(&self, key: F) -> &Self
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let mut data = self.data.borrow_mut();
        let keys: Vec<K> = data.iter().map(key).collect();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[a].partial_cmp(&keys[b]).unwrap_or(Ordering::Equal));
        reorder(&mut data, order);
        self
    }

    /// Sorts in place by the value of a named attribute.
    ///
    /// Every key is resolved and checked before anything moves: a missing
    /// attribute or keys of incomparable kinds fail the call and leave the
    /// collection as it was.
    pub fn sort_by_attr(&self, name: &str) -> Result<&Self>
    where
        T: Attributes,
    {
        let mut data = self.data.borrow_mut();
        let keys = data
            .iter()
            .map(|item| attribute::resolve(item, name, AttributePolicy::Error))
            .collect::<Result<Vec<Value>>>()?;

        let mut failure = None;
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| match op::compare_for("<", &keys[a], &keys[b]) {
            Ok(ordering) => ordering.unwrap_or(Ordering::Equal),
            Err(err) => {
                failure.get_or_insert(err);
                Ordering::Equal
            }
        });
        if let Some(err) = failure {
            debug!(attribute = name, error = %err, "sort by attribute failed");
            return Err(err);
        }

        reorder(&mut data, order);
        Ok(self)
    }

    /// Starts a query over this collection.
    pub fn query(&self) -> Query<'_, Self> {
        Query::new(self)
    }

    /// Starts a query with one where-clause.
    pub fn where_(&self, condition: impl Into<Condition<T>>) -> Query<'_, Self> {
        self.query().where_(condition)
    }

    /// Starts a query with one inverted where-clause.
    pub fn where_not(&self, condition: impl Into<Condition<T>>) -> Query<'_, Self> {
        self.query().where_not(condition)
    }

    /// Starts a query keeping elements for which `predicate` is truthy.
    pub fn where_fn<F, R>(&self, predicate: F) -> Query<'_, Self>
    where
        F: Fn(&T) -> R + 'static,
        R: Into<Value>,
    {
        self.query().where_fn(predicate)
    }

    /// Starts a query dropping elements for which `predicate` is truthy.
    pub fn where_not_fn<F, R>(&self, predicate: F) -> Query<'_, Self>
    where
        F: Fn(&T) -> R + 'static,
        R: Into<Value>,
    {
        self.query().where_not_fn(predicate)
    }

    /// Returns the largest value of `attr`, or `None` when empty.
    ///
    /// Uses strict greater-than, so the earliest maximal element wins ties.
    pub fn max(&self, attr: &str) -> Result<Option<Value>>
    where
        T: Attributes,
    {
        Ok(self.max_position(attr)?.map(|(_, value)| value))
    }

    /// Returns a clone of the element holding the largest value of `attr`.
    pub fn max_item(&self, attr: &str) -> Result<Option<T>>
    where
        T: Attributes + Clone,
    {
        let position = self.max_position(attr)?;
        Ok(position.map(|(index, _)| self.data.borrow()[index].clone()))
    }

    fn max_position(&self, attr: &str) -> Result<Option<(usize, Value)>>
    where
        T: Attributes,
    {
        let data = self.data.borrow();
        let mut best: Option<(usize, Value)> = None;
        for (index, item) in data.iter().enumerate() {
            let value = attribute::resolve(item, attr, AttributePolicy::Error)?;
            let replace = match &best {
                Some((_, current)) => Op::Gt.apply(&value, current)?,
                None => true,
            };
            if replace {
                best = Some((index, value));
            }
        }
        Ok(best)
    }
}

/// Moves elements into the positions listed by `order`.
fn reorder<T>(data: &mut Vec<T>, order: Vec<usize>) {
    let mut slots: Vec<Option<T>> = data.drain(..).map(Some).collect();
    data.extend(order.into_iter().filter_map(|index| slots[index].take()));
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Collection {
            data: Rc::new(RefCell::new(items)),
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Collection::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.data.borrow_mut().extend(iter);
    }
}

impl<T> Container for Collection<T> {
    type Item = T;
    type Rebind<U> = Collection<U>;

    fn with_items<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        f(&self.data.borrow())
    }

    fn from_items(items: Vec<T>) -> Self {
        Collection::from(items)
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.data.borrow() == *other.data.borrow()
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Collection<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self.data.borrow() == *other
    }
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.try_borrow() {
            Ok(data) => write!(f, "Collection({:?})", *data),
            Err(_) => f.write_str("Collection(<borrowed>)"),
        }
    }
}

impl<T, C> Add<&C> for &Collection<T>
where
    C: Container<Item = T>,
    T: Clone,
{
    type Output = Collection<T>;

    fn add(self, other: &C) -> Collection<T> {
        self.union(other)
    }
}

impl<T, C> Div<&C> for &Collection<T>
where
    C: Container<Item = T>,
    T: Clone + PartialEq,
{
    type Output = Collection<T>;

    fn div(self, other: &C) -> Collection<T> {
        self.intersect(other)
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = Ref<'a, T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Iterator over a collection's elements, yielding borrow guards.
///
/// The storage stays borrowed until the iterator and every yielded guard
/// are dropped.
pub struct Iter<'a, T> {
    rest: Option<Ref<'a, [T]>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Ref<'a, T>;

    fn next(&mut self) -> Option<Ref<'a, T>> {
        let rest = self.rest.take()?;
        if rest.is_empty() {
            return None;
        }
        let (head, tail) = Ref::map_split(rest, |slice| slice.split_at(1));
        self.rest = Some(tail);
        Some(Ref::map(head, |head| &head[0]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.rest.as_ref().map_or(0, |rest| rest.len());
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
