//! Per-query evaluation settings.

/// What to do with a comparator token outside the six known operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatorPolicy {
    /// The clause evaluates to `false` for every element.
    #[default]
    Lenient,
    /// Evaluation fails with [`CollectionError::UnknownOperator`](crate::CollectionError::UnknownOperator).
    Strict,
}

/// What to do when a term names an attribute the element lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributePolicy {
    /// Evaluation fails with [`CollectionError::AttributeNotFound`](crate::CollectionError::AttributeNotFound).
    #[default]
    Error,
    /// The attribute resolves to [`Value::Null`](crate::Value::Null).
    Null,
}

/// Evaluation settings attached to a [`Query`](crate::Query).
///
/// The defaults reproduce the permissive comparator handling and strict
/// attribute lookup of a plain `where` chain.
///
/// ```
/// use filter_collection::{AttributePolicy, OperatorPolicy, QueryOptions};
///
/// let options = QueryOptions::new()
///     .unknown_operator(OperatorPolicy::Strict)
///     .missing_attribute(AttributePolicy::Null);
///
/// assert_eq!(options.operator_policy(), OperatorPolicy::Strict);
/// assert_eq!(options.attribute_policy(), AttributePolicy::Null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueryOptions {
    unknown_operator: OperatorPolicy,
    missing_attribute: AttributePolicy,
}

impl QueryOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        QueryOptions::default()
    }

    /// Sets the unknown comparator policy.
    pub fn unknown_operator(mut self, policy: OperatorPolicy) -> Self {
        self.unknown_operator = policy;
        self
    }

    /// Sets the missing attribute policy.
    pub fn missing_attribute(mut self, policy: AttributePolicy) -> Self {
        self.missing_attribute = policy;
        self
    }

    /// Returns the unknown comparator policy.
    pub fn operator_policy(&self) -> OperatorPolicy {
        self.unknown_operator
    }

    /// Returns the missing attribute policy.
    pub fn attribute_policy(&self) -> AttributePolicy {
        self.missing_attribute
    }
}
