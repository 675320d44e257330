//! Comparison operators for three-term where-clauses.
//!
//! Clauses name their operator with a token (`">="`, `"!="`, ...). Tokens
//! parse into [`Op`]; anything else is kept as [`Comparator::Unknown`] and
//! handled by the query's [`OperatorPolicy`](crate::OperatorPolicy).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CollectionError, Result};
use crate::value::Value;

/// Comparison operator.
///
/// `Eq` and `Ne` work on any pair of values. The ordering operators
/// require both sides to be of a comparable kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl Op {
    /// All operators, in token-table order.
    pub const ALL: [Op; 6] = [Op::Eq, Op::Ne, Op::Gte, Op::Lte, Op::Gt, Op::Lt];

    /// Returns the token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Lt => "<",
        }
    }

    /// Returns `true` for `>=`, `<=`, `>` and `<`.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Op::Eq | Op::Ne)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }

    /// Applies the operator with `left` on the left-hand side.
    ///
    /// Ordering operators between incomparable kinds fail with
    /// [`CollectionError::TypeMismatch`]; comparisons involving NaN are
    /// `false`.
    pub fn apply(self, left: &Value, right: &Value) -> Result<bool> {
        match self {
            Op::Eq => Ok(left == right),
            Op::Ne => Ok(left != right),
            _ => {
                let ordering = compare_for(self.as_str(), left, right)?;
                Ok(ordering.is_some_and(|ordering| self.eval_ordering(ordering)))
            }
        }
    }
}

/// Orders two values on behalf of `op`, rejecting incomparable kinds.
///
/// Lists compare lexicographically: the first unequal pair of elements
/// decides, and that pair must itself be comparable. `Ok(None)` means the
/// kinds match but no ordering exists (NaN).
pub(crate) fn compare_for(op: &'static str, left: &Value, right: &Value) -> Result<Option<Ordering>> {
    match (left, right) {
        (Value::List(a), Value::List(b)) => {
            for (x, y) in a.iter().zip(b) {
                if x != y {
                    return compare_for(op, x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ if left.is_comparable_with(right) => Ok(left.partial_cmp(right)),
        _ => Err(CollectionError::TypeMismatch {
            op,
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = CollectionError;

    fn from_str(token: &str) -> Result<Self> {
        Op::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| CollectionError::UnknownOperator(token.to_string()))
    }
}

/// The operator slot of a three-term clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// A recognised operator.
    Known(Op),
    /// A token that is not one of the six operators.
    Unknown(String),
}

impl Comparator {
    /// Parses a token, keeping unrecognised tokens verbatim.
    pub fn parse(token: &str) -> Self {
        token
            .parse()
            .map_or_else(|_| Comparator::Unknown(token.to_string()), Comparator::Known)
    }

    /// Returns the operator, if recognised.
    pub fn op(&self) -> Option<Op> {
        match self {
            Comparator::Known(op) => Some(*op),
            Comparator::Unknown(_) => None,
        }
    }

    /// Returns the token as written.
    pub fn token(&self) -> &str {
        match self {
            Comparator::Known(op) => op.as_str(),
            Comparator::Unknown(token) => token,
        }
    }
}

impl From<Op> for Comparator {
    fn from(op: Op) -> Self {
        Comparator::Known(op)
    }
}

impl From<&str> for Comparator {
    fn from(token: &str) -> Self {
        Comparator::parse(token)
    }
}

impl From<String> for Comparator {
    fn from(token: String) -> Self {
        Comparator::parse(&token)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
