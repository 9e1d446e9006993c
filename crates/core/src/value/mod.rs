use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::MultitypeError;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Int,
    Double,
    Boolean,
    String,
    List,
    Map,
    None,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Int => "int",
            Tag::Double => "double",
            Tag::Boolean => "boolean",
            Tag::String => "string",
            Tag::List => "list",
            Tag::Map => "map",
            Tag::None => "null",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed option value.
///
/// Exactly one payload is active at a time and each value owns it outright,
/// so cloning is a deep copy. Equality never fails: values with different
/// tags are simply unequal. Ordering and arithmetic live in [`crate::ops`]
/// and report tag problems as errors, while the `as_*` accessors fall back
/// to the zero value of the requested type instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value. Renders as `null`.
    #[default]
    None,
    Int(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    /// Ordered sequence, duplicates allowed.
    List(Vec<Value>),
    /// String-keyed mapping without a stable iteration order.
    Map(HashMap<String, Value>),
}

impl Value {
    /// Shared `None` value.
    pub const NULL: Value = Value::None;

    pub fn tag(&self) -> Tag {
        match self {
            Value::None => Tag::None,
            Value::Int(_) => Tag::Int,
            Value::Double(_) => Tag::Double,
            Value::Boolean(_) => Tag::Boolean,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Map(_) => Tag::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(v) => *v,
            _ => 0,
        }
    }

    pub fn as_double(&self) -> f64 {
        match self {
            Value::Double(v) => *v,
            _ => 0.0,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Value::Boolean(v) => *v,
            _ => false,
        }
    }

    /// Returns the string payload, or an empty string for any other tag.
    ///
    /// This is not the textual rendering; use `to_string()` for that.
    pub fn as_string(&self) -> String {
        self.as_str().to_owned()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Value::String(v) => v,
            _ => "",
        }
    }

    pub fn as_list(&self) -> Vec<Value> {
        self.as_slice().to_vec()
    }

    pub fn as_slice(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    pub fn as_map(&self) -> HashMap<String, Value> {
        match self {
            Value::Map(entries) => entries.clone(),
            _ => HashMap::new(),
        }
    }

    /// Looks up `key` in a map payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Returns the list element at `index`.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_slice().get(index)
    }

    /// Element count for lists and maps, byte length for strings, zero for
    /// scalars and `None`.
    pub fn len(&self) -> usize {
        match self {
            Value::String(v) => v.len(),
            Value::List(items) => items.len(),
            Value::Map(entries) => entries.len(),
            Value::None | Value::Int(_) | Value::Double(_) | Value::Boolean(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_try_from_int {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Value {
                type Error = MultitypeError;

                fn try_from(value: $ty) -> Result<Self, Self::Error> {
                    i64::try_from(value)
                        .map(Value::Int)
                        .map_err(|_| MultitypeError::IntOutOfRange {
                            value: value.to_string(),
                        })
                }
            }
        )*
    };
}

// Wider or platform-sized integers may not fit in an `i64`.
impl_try_from_int!(u64, usize, isize, i128, u128);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<String>, T: Into<Value>> From<HashMap<K, T>> for Value {
    fn from(entries: HashMap<K, T>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
