//! Where-clauses: terms, conditions and the invert flag.
//!
//! A [`Condition`] takes one of three shapes:
//!
//! | Shape | Written as | Keeps an element when |
//! |-------|------------|-----------------------|
//! | truthy | `"attr"` or `Term::func(f)` | the resolved term is truthy |
//! | equals | `("attr", literal)` | the resolved term equals the literal |
//! | compare | `("attr", ">=", literal)` | the operator holds between them |
//!
//! A [`Clause`] is a condition plus the invert flag set by `where_not`.

use std::fmt;
use std::rc::Rc;

use crate::attribute::{self, Attributes};
use crate::error::{CollectionError, Result};
use crate::op::Comparator;
use crate::options::{OperatorPolicy, QueryOptions};
use crate::value::Value;

type TermFn<T> = Rc<dyn Fn(&T) -> Value>;

/// The left-hand side of a condition: an attribute name or a function.
pub enum Term<T> {
    /// Attribute read through [`Attributes`].
    Attribute(String),
    /// Function applied to the element.
    Function(TermFn<T>),
}

impl<T> Term<T> {
    /// Creates an attribute term.
    pub fn attr(name: impl Into<String>) -> Self {
        Term::Attribute(name.into())
    }

    /// Creates a function term.
    ///
    /// ```
    /// use filter_collection::{Query, Term};
    ///
    /// let words = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
    /// let long = Query::new(&words)
    ///     .where_((Term::func(|w: &String| w.len()), ">", 1))
    ///     .get()
    ///     .unwrap();
    /// assert_eq!(long, vec!["bb", "ccc"]);
    /// ```
    pub fn func<F, R>(f: F) -> Self
    where
        F: Fn(&T) -> R + 'static,
        R: Into<Value>,
    {
        Term::Function(Rc::new(move |item: &T| f(item).into()))
    }

    /// Returns the attribute name, if this is an attribute term.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Term::Attribute(name) => Some(name),
            Term::Function(_) => None,
        }
    }

    /// Resolves the term against an element.
    pub fn resolve(&self, item: &T, options: &QueryOptions) -> Result<Value>
    where
        T: Attributes,
    {
        match self {
            Term::Attribute(name) => attribute::resolve(item, name, options.attribute_policy()),
            Term::Function(f) => Ok(f(item)),
        }
    }
}

impl<T> Clone for Term<T> {
    fn clone(&self) -> Self {
        match self {
            Term::Attribute(name) => Term::Attribute(name.clone()),
            Term::Function(f) => Term::Function(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Term::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<T> From<&str> for Term<T> {
    fn from(name: &str) -> Self {
        Term::attr(name)
    }
}

impl<T> From<String> for Term<T> {
    fn from(name: String) -> Self {
        Term::attr(name)
    }
}

/// What a condition checks once its term is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// The term is truthy.
    Truthy,
    /// The term equals the literal.
    Equals(Value),
    /// The comparator holds between the term and the literal.
    Compare(Comparator, Value),
}

/// A single filter condition, without the invert flag.
pub struct Condition<T> {
    /// Left-hand side.
    pub term: Term<T>,
    /// Check applied to the resolved term.
    pub test: Test,
}

impl<T> Condition<T> {
    /// One-term condition: keeps elements whose term is truthy.
    pub fn truthy(term: impl Into<Term<T>>) -> Self {
        Condition {
            term: term.into(),
            test: Test::Truthy,
        }
    }

    /// Two-term condition: keeps elements whose term equals `value`.
    pub fn equals(term: impl Into<Term<T>>, value: impl Into<Value>) -> Self {
        Condition {
            term: term.into(),
            test: Test::Equals(value.into()),
        }
    }

    /// Three-term condition: keeps elements where `term <op> value` holds.
    pub fn compare(
        term: impl Into<Term<T>>,
        op: impl Into<Comparator>,
        value: impl Into<Value>,
    ) -> Self {
        Condition {
            term: term.into(),
            test: Test::Compare(op.into(), value.into()),
        }
    }

    /// Keeps elements for which `predicate` returns a truthy value.
    pub fn predicate<F, R>(predicate: F) -> Self
    where
        F: Fn(&T) -> R + 'static,
        R: Into<Value>,
    {
        Condition::truthy(Term::func(predicate))
    }

    /// Evaluates the condition against one element.
    pub fn evaluate(&self, item: &T, options: &QueryOptions) -> Result<bool>
    where
        T: Attributes,
    {
        let rval = self.term.resolve(item, options)?;
        match &self.test {
            Test::Truthy => Ok(rval.is_truthy()),
            Test::Equals(expected) => Ok(rval == *expected),
            Test::Compare(Comparator::Known(op), operand) => op.apply(&rval, operand),
            Test::Compare(Comparator::Unknown(token), _) => match options.operator_policy() {
                OperatorPolicy::Lenient => Ok(false),
                OperatorPolicy::Strict => Err(CollectionError::UnknownOperator(token.clone())),
            },
        }
    }
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        Condition {
            term: self.term.clone(),
            test: self.test.clone(),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("term", &self.term)
            .field("test", &self.test)
            .finish()
    }
}

impl<T> From<&str> for Condition<T> {
    fn from(name: &str) -> Self {
        Condition::truthy(name)
    }
}

impl<T> From<String> for Condition<T> {
    fn from(name: String) -> Self {
        Condition::truthy(name)
    }
}

impl<T> From<Term<T>> for Condition<T> {
    fn from(term: Term<T>) -> Self {
        Condition::truthy(term)
    }
}

impl<T, V: Into<Value>> From<(&str, V)> for Condition<T> {
    fn from((name, value): (&str, V)) -> Self {
        Condition::equals(name, value)
    }
}

impl<T, V: Into<Value>> From<(Term<T>, V)> for Condition<T> {
    fn from((term, value): (Term<T>, V)) -> Self {
        Condition::equals(term, value)
    }
}

impl<T, O: Into<Comparator>, V: Into<Value>> From<(&str, O, V)> for Condition<T> {
    fn from((name, op, value): (&str, O, V)) -> Self {
        Condition::compare(name, op, value)
    }
}

impl<T, O: Into<Comparator>, V: Into<Value>> From<(Term<T>, O, V)> for Condition<T> {
    fn from((term, op, value): (Term<T>, O, V)) -> Self {
        Condition::compare(term, op, value)
    }
}

/// A condition and whether it was added through `where_not`.
pub struct Clause<T> {
    /// The condition to evaluate.
    pub condition: Condition<T>,
    /// Flips inclusion when set.
    pub invert: bool,
}

impl<T> Clause<T> {
    /// Creates a clause.
    pub fn new(condition: Condition<T>, invert: bool) -> Self {
        Clause { condition, invert }
    }

    /// Returns `true` if the element survives this clause.
    pub fn admits(&self, item: &T, options: &QueryOptions) -> Result<bool>
    where
        T: Attributes,
    {
        Ok(self.condition.evaluate(item, options)? != self.invert)
    }
}

impl<T> Clone for Clause<T> {
    fn clone(&self) -> Self {
        Clause::new(self.condition.clone(), self.invert)
    }
}

impl<T> fmt::Debug for Clause<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("condition", &self.condition)
            .field("invert", &self.invert)
            .finish()
    }
}
