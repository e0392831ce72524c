//! Fixed-size value tuples that can seed an interpolation context.

use crate::keys::{self, Context};
use crate::{InterpolationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered, fixed-size group of values.
///
/// As a context source, the elements are read as alternating key/value
/// pairs: `("host", "localhost", "port", 8080)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    /// Create a tuple from values in order.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self(values.into_iter().collect())
    }

    /// Number of elements.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.0.get(index).ok_or(InterpolationError::IndexOutOfRange {
            index,
            arity: self.arity(),
        })
    }

    /// All elements, in order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Read the elements as a key/value mapping.
    pub fn to_map(&self) -> Result<Context> {
        keys::plain_pairs(&self.0)
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Tuple {
    fn from((key, value): (K, V)) -> Self {
        Self(vec![Value::String(key.into()), value.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_in_and_out_of_range() {
        let tuple = Tuple::new([json!("a"), json!(1)]);
        assert_eq!(tuple.arity(), 2);
        assert_eq!(tuple.get(1), Ok(&json!(1)));
        assert_eq!(
            tuple.get(2),
            Err(InterpolationError::IndexOutOfRange { index: 2, arity: 2 })
        );
    }

    #[test]
    fn test_to_map() {
        let tuple = Tuple::from(("port", 3306));
        let map = tuple.to_map().unwrap();
        assert_eq!(map.get("port"), Some(&json!(3306)));
    }

    #[test]
    fn test_to_map_odd_arity_fails() {
        let tuple = Tuple::new([json!("a")]);
        assert!(matches!(
            tuple.to_map(),
            Err(InterpolationError::MalformedArguments { len: 1 })
        ));
    }
}
