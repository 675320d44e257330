//! Source and result containers for queries.
//!
//! A query reads its elements from a [`Container`] and hands results back
//! in the same kind of container: filtering a `Vec` yields a `Vec`,
//! filtering a [`Collection`](crate::Collection) yields a `Collection`.

/// Sequence type a [`Query`](crate::Query) can run against.
pub trait Container {
    /// Element type.
    type Item;

    /// The same container kind holding `U` elements, used for projections.
    type Rebind<U>: Container<Item = U>;

    /// Calls `f` with the current elements in order.
    fn with_items<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[Self::Item]) -> R;

    /// Builds a container from owned elements.
    fn from_items(items: Vec<Self::Item>) -> Self;
}

impl<T> Container for Vec<T> {
    type Item = T;
    type Rebind<U> = Vec<U>;

    fn with_items<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        f(self)
    }

    fn from_items(items: Vec<T>) -> Self {
        items
    }
}
