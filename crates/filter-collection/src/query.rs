//! Query builder and executor.
//!
//! The [`Query`] struct accumulates where-clauses with a fluent builder API
//! and evaluates them on demand against its source container.

use tracing::{debug, trace};

use crate::attribute::Attributes;
use crate::clause::{Clause, Condition};
use crate::container::Container;
use crate::error::Result;
use crate::options::QueryOptions;
use crate::projection::Projection;
use crate::value::Value;

/// A query over a borrowed source container.
///
/// Clauses are applied in the order they were added, each one narrowing
/// the elements that survived the previous ones. Nothing runs until a
/// terminal call ([`get`](Query::get), [`exists`](Query::exists),
/// [`first`](Query::first), [`count`](Query::count)); terminals leave the
/// builder untouched, so a query can be evaluated again or extended.
///
/// # Example
///
/// ```
/// use filter_collection::{Query, Term};
///
/// let data = vec![1, 2, 3, 4];
///
/// let result = Query::new(&data).where_fn(|x| *x >= 3).get().unwrap();
/// assert_eq!(result, vec![3, 4]);
///
/// let odd = Query::new(&data)
///     .where_not((Term::func(|x: &i32| x % 2), 0))
///     .get()
///     .unwrap();
/// assert_eq!(odd, vec![1, 3]);
/// ```
pub struct Query<'a, C: Container> {
    source: &'a C,
    clauses: Vec<Clause<C::Item>>,
    options: QueryOptions,
}

impl<'a, C: Container> Query<'a, C> {
    /// Creates a query with no clauses over `source`.
    ///
    /// An empty query matches every element.
    pub fn new(source: &'a C) -> Self {
        Query {
            source,
            clauses: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds a where-clause.
    ///
    /// Accepts an attribute name (`"done"`), a two-term equality
    /// (`("status", "open")`), a three-term comparison
    /// (`("priority", ">=", 2)`), or any [`Condition`].
    pub fn where_(mut self, condition: impl Into<Condition<C::Item>>) -> Self {
        self.clauses.push(Clause::new(condition.into(), false));
        self
    }

    /// Adds an inverted where-clause: elements matching it are dropped.
    pub fn where_not(mut self, condition: impl Into<Condition<C::Item>>) -> Self {
        self.clauses.push(Clause::new(condition.into(), true));
        self
    }

    /// Keeps elements for which `predicate` returns a truthy value.
    pub fn where_fn<F, R>(self, predicate: F) -> Self
    where
        F: Fn(&C::Item) -> R + 'static,
        R: Into<Value>,
    {
        self.where_(Condition::predicate(predicate))
    }

    /// Drops elements for which `predicate` returns a truthy value.
    pub fn where_not_fn<F, R>(self, predicate: F) -> Self
    where
        F: Fn(&C::Item) -> R + 'static,
        R: Into<Value>,
    {
        self.where_not(Condition::predicate(predicate))
    }

    /// Replaces the evaluation options.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Projects surviving elements onto the named attributes.
    ///
    /// Duplicate names are ignored; the first occurrence fixes the order.
    /// An empty selection leaves the elements unprojected.
    pub fn select<I, S>(self, attributes: I) -> Projection<'a, C>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::new(self).select(attributes)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the source container.
    pub fn source(&self) -> &'a C {
        self.source
    }

    /// Returns the clauses in evaluation order.
    pub fn clauses(&self) -> &[Clause<C::Item>] {
        &self.clauses
    }

    /// Returns the evaluation options.
    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Returns `true` if no clauses were added (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Returns the matching elements in a fresh container of the source's type.
    pub fn get(&self) -> Result<C>
    where
        C::Item: Attributes + Clone,
    {
        let items = self.source.with_items(|items| {
            self.survivors(items)
                .map(|kept| kept.into_iter().cloned().collect::<Vec<_>>())
        })?;
        Ok(C::from_items(items))
    }

    /// Returns `true` if at least one element matches.
    pub fn exists(&self) -> Result<bool>
    where
        C::Item: Attributes,
    {
        Ok(self.count()? > 0)
    }

    /// Returns the first matching element, if any.
    pub fn first(&self) -> Result<Option<C::Item>>
    where
        C::Item: Attributes + Clone,
    {
        self.source.with_items(|items| {
            self.survivors(items)
                .map(|kept| kept.first().map(|item| (*item).clone()))
        })
    }

    /// Returns the number of matching elements.
    pub fn count(&self) -> Result<usize>
    where
        C::Item: Attributes,
    {
        self.source
            .with_items(|items| self.survivors(items).map(|kept| kept.len()))
    }

    /// Applies every clause in order, narrowing the working set each time.
    ///
    /// Fails on the first element a clause cannot evaluate.
    pub(crate) fn survivors<'s>(&self, items: &'s [C::Item]) -> Result<Vec<&'s C::Item>>
    where
        C::Item: Attributes,
    {
        debug!(
            clauses = self.clauses.len(),
            source = items.len(),
            "evaluating query"
        );

        let mut working: Vec<&'s C::Item> = items.iter().collect();
        for (index, clause) in self.clauses.iter().enumerate() {
            let mut kept = Vec::with_capacity(working.len());
            for item in working {
                if clause.admits(item, &self.options)? {
                    kept.push(item);
                }
            }
            trace!(
                clause = index,
                invert = clause.invert,
                remaining = kept.len(),
                "applied where clause"
            );
            working = kept;
        }

        debug!(matched = working.len(), "query evaluated");
        Ok(working)
    }
}

impl<C: Container> Clone for Query<'_, C> {
    fn clone(&self) -> Self {
        Query {
            source: self.source,
            clauses: self.clauses.clone(),
            options: self.options,
        }
    }
}

impl<C: Container> std::fmt::Debug for Query<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("clauses", &self.clauses)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::error::CollectionError;
    use crate::op::Op;
    use crate::options::{AttributePolicy, OperatorPolicy};

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        name: String,
        priority: i64,
        archived: bool,
    }

    impl Attributes for Task {
        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(&self.name)),
                "priority" => Some(Value::from(self.priority)),
                "archived" => Some(Value::from(self.archived)),
                _ => None,
            }
        }
    }

    fn task(name: &str, priority: i64, archived: bool) -> Task {
        Task {
            name: name.to_string(),
            priority,
            archived,
        }
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task("Task A", 1, false),
            task("Task B", 2, false),
            task("Urgent Task", 5, false),
            task("Critical Task", 5, true),
            task("Done Task", 3, true),
        ]
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn empty_query_matches_all() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks);

        assert!(query.is_empty());
        assert_eq!(query.get().unwrap(), tasks);
    }

    #[test]
    fn single_equality_clause() {
        let tasks = sample_tasks();
        let results = Query::new(&tasks).where_(("priority", 5)).get().unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|t| t.priority == 5));
    }

    #[test]
    fn clauses_are_conjunctive() {
        let tasks = sample_tasks();
        let results = Query::new(&tasks)
            .where_(("priority", 5))
            .where_(("archived", false))
            .get()
            .unwrap();

        assert_eq!(names(&results), ["Urgent Task"]);
    }

    #[test]
    fn truthy_attribute_clause() {
        let tasks = sample_tasks();
        let results = Query::new(&tasks).where_("archived").get().unwrap();
        assert_eq!(names(&results), ["Critical Task", "Done Task"]);
    }

    #[test]
    fn where_not_excludes() {
        let tasks = sample_tasks();
        let results = Query::new(&tasks).where_not("archived").get().unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| !t.archived));
    }

    #[test]
    fn three_term_comparisons() {
        let tasks = sample_tasks();

        let cases = [
            (Op::Gte, 3, 3usize),
            (Op::Gt, 3, 2),
            (Op::Lte, 2, 2),
            (Op::Lt, 2, 1),
            (Op::Eq, 5, 2),
            (Op::Ne, 5, 3),
        ];
        for (op, operand, expected) in cases {
            let results = Query::new(&tasks)
                .where_(("priority", op.as_str(), operand))
                .count()
                .unwrap();
            assert_eq!(results, expected, "priority {} {}", op, operand);
        }
    }

    #[test]
    fn where_fn_and_where_not_fn() {
        let tasks = sample_tasks();
        let results = Query::new(&tasks)
            .where_fn(|t| t.name.contains("Task"))
            .where_not_fn(|t| t.priority > 2)
            .get()
            .unwrap();

        assert_eq!(names(&results), ["Task A", "Task B"]);
    }

    #[test]
    fn unknown_operator_is_false_by_default() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks).where_(("priority", "~=", 5));

        assert!(query.get().unwrap().is_empty());

        // Inverted, every element survives
        let inverted = Query::new(&tasks).where_not(("priority", "~=", 5));
        assert_eq!(inverted.count().unwrap(), 5);
    }

    #[test]
    fn unknown_operator_strict() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks)
            .with_options(QueryOptions::new().unknown_operator(OperatorPolicy::Strict))
            .where_(("priority", "~=", 5));

        assert_eq!(
            query.get().unwrap_err(),
            CollectionError::UnknownOperator("~=".into())
        );
    }

    #[test]
    fn missing_attribute_propagates() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks).where_(("owner", "me"));

        assert!(matches!(
            query.get(),
            Err(CollectionError::AttributeNotFound { ref attribute, .. }) if attribute == "owner"
        ));
        assert!(query.exists().is_err());
        assert!(query.first().is_err());
    }

    #[test]
    fn missing_attribute_as_null() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks)
            .with_options(QueryOptions::new().missing_attribute(AttributePolicy::Null))
            .where_not("owner");

        assert_eq!(query.count().unwrap(), 5);
    }

    #[test]
    fn later_clauses_only_see_survivors() {
        // The second clause would fail on strings, but they are gone by then.
        let data = vec![Value::from("x"), Value::from(1), Value::from(7)];
        let results = Query::new(&data)
            .where_fn(|v: &Value| v.is_number())
            .where_((crate::Term::func(|v: &Value| v.clone()), ">", 3))
            .get()
            .unwrap();

        assert_eq!(results, vec![Value::from(7)]);
    }

    #[test]
    fn type_mismatch_fails_fast() {
        let data = vec![Value::from(1), Value::from("x")];
        let result = Query::new(&data)
            .where_((crate::Term::func(|v: &Value| v.clone()), ">", 0))
            .get();

        assert!(matches!(result, Err(CollectionError::TypeMismatch { .. })));
    }

    #[test]
    fn get_is_idempotent_and_extendable() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks).where_not("archived");

        let first = query.get().unwrap();
        let second = query.get().unwrap();
        assert_eq!(first, second);

        let narrowed = query.where_(("priority", ">", 1)).get().unwrap();
        assert_eq!(names(&narrowed), ["Task B", "Urgent Task"]);
    }

    #[test]
    fn exists_and_first() {
        let tasks = sample_tasks();

        let query = Query::new(&tasks).where_(("priority", 5));
        assert!(query.exists().unwrap());
        assert_eq!(query.first().unwrap().map(|t| t.name), Some("Urgent Task".into()));

        let none = Query::new(&tasks).where_(("priority", 99));
        assert!(!none.exists().unwrap());
        assert_eq!(none.first().unwrap(), None);
    }

    #[test]
    fn empty_source() {
        let empty: Vec<Task> = Vec::new();
        let query = Query::new(&empty).where_(("missing", 1));

        assert!(query.get().unwrap().is_empty());
        assert!(!query.exists().unwrap());
        assert_eq!(query.first().unwrap(), None);
    }

    #[test]
    fn collection_source_yields_collection() {
        let tasks = Collection::from(sample_tasks());
        let results: Collection<Task> = tasks.where_(("archived", true)).get().unwrap();

        assert_eq!(results.len(), 2);
        assert!(!results.shares_storage_with(&tasks));
    }

    #[test]
    fn query_sees_current_collection_state() {
        let tasks = Collection::from(sample_tasks());
        let query = tasks.query().where_(("priority", ">=", 5));
        assert_eq!(query.count().unwrap(), 2);

        tasks.set(0, task("Task A", 9, false)).unwrap();
        assert_eq!(query.count().unwrap(), 3);
    }

    #[test]
    fn clone_and_debug() {
        let tasks = sample_tasks();
        let query = Query::new(&tasks).where_(("priority", 5));
        let cloned = query.clone().where_("archived");

        assert_eq!(query.clauses().len(), 1);
        assert_eq!(cloned.clauses().len(), 2);
        assert!(format!("{:?}", query).starts_with("Query {"));
    }
}
