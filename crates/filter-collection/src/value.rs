//! Runtime values produced by attribute lookups and predicate terms.
//!
//! Every where-clause resolves its term to a [`Value`] before testing it,
//! and every select-attribute lands in a [`Record`](crate::Record) as one.

use std::cmp::Ordering;

use serde::Serialize;

/// Dynamic value read off an element.
///
/// Equality never fails: values of unrelated kinds are simply unequal.
/// This includes booleans and numbers, so `Bool(true) != 1`; a clause like
/// `("done", 1)` never matches a boolean attribute.
/// Ordering is only defined within a kind (numbers with numbers, strings
/// with strings, and so on); see [`Value::is_comparable_with`].
///
/// # Example
///
/// ```
/// use filter_collection::Value;
///
/// assert_eq!(Value::from(1), Value::from(1.0));
/// assert_ne!(Value::from("1"), Value::from(1));
/// assert!(Value::from("a") < Value::from("b"));
/// assert!(!Value::from("").is_truthy());
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Owned string value.
    String(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `List` value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list items, if present.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness used by single-term where-clauses.
    ///
    /// `Null` and `false` are falsy, numbers are falsy when zero, strings
    /// and lists are falsy when empty. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_zero(),
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Name of this value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Returns `true` if ordering operators are defined between the two values.
    ///
    /// Only the outer kinds are checked. Two lists are compared element by
    /// element, and the deciding pair must be comparable too. Comparable
    /// pairs may still have no ordering when a NaN is involved.
    pub fn is_comparable_with(&self, other: &Value) -> bool {
        matches!(
            (self, other),
            (Value::Bool(_), Value::Bool(_))
                | (Value::Number(_), Value::Number(_))
                | (Value::String(_), Value::String(_))
                | (Value::List(_), Value::List(_))
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => a.compare(*b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision:
/// - `I64` for signed integers
/// - `U64` for unsigned integers
/// - `F64` for floating point
///
/// Equality and ordering across variants compare the numeric value, so
/// `I64(1) == F64(1.0)`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for any representation of zero.
    pub fn is_zero(self) -> bool {
        match self {
            Number::I64(n) => n == 0,
            Number::U64(n) => n == 0,
            Number::F64(n) => n == 0.0,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Integer pairs of different signedness stay exact.
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }

            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
