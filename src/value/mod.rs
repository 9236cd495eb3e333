pub mod kind;


pub use kind::{Paging, ValueKind};

use serde::{Deserialize, Serialize};

/// A decoded command reply.
///
/// Replies are tree-shaped: a `Sequence` may nest arbitrarily deep but never
/// refers back to an ancestor. An empty `Sequence` is not the same as `Nil`
/// and renders differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultValue {
    Nil,
    Scalar(String),
    Integer(i64),
    /// Any other numeric reply, kept as its text. Printed unquoted like
    /// `Integer`.
    Number(String),
    Sequence(Vec<ResultValue>),
}

impl ResultValue {
    pub fn scalar(text: impl Into<String>) -> Self {
        ResultValue::Scalar(text.into())
    }

    pub fn sequence(items: impl IntoIterator<Item = ResultValue>) -> Self {
        ResultValue::Sequence(items.into_iter().collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, ResultValue::Nil)
    }

    /// Depth of the deepest nested sequence; scalars are depth 0.
    pub fn depth(&self) -> usize {
        match self {
            ResultValue::Sequence(items) => {
                1 + items.iter().map(ResultValue::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl From<&str> for ResultValue {
    fn from(text: &str) -> Self {
        ResultValue::Scalar(text.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(text: String) -> Self {
        ResultValue::Scalar(text)
    }
}

impl From<i64> for ResultValue {
    fn from(n: i64) -> Self {
        ResultValue::Integer(n)
    }
}

impl<T: Into<ResultValue>> From<Option<T>> for ResultValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ResultValue::Nil, Into::into)
    }
}

impl<T: Into<ResultValue>> From<Vec<T>> for ResultValue {
    fn from(items: Vec<T>) -> Self {
        ResultValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

// Replies reach the terminal as JSON through the event bridge. Maps are
// flattened into alternating key/value entries the way the reference client
// prints RESP2 map replies.
impl From<serde_json::Value> for ResultValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ResultValue::Nil,
            Value::Bool(b) => ResultValue::Integer(i64::from(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ResultValue::Integer(i),
                None => ResultValue::Number(n.to_string()),
            },
            Value::String(s) => ResultValue::Scalar(s),
            Value::Array(items) => {
                ResultValue::Sequence(items.into_iter().map(ResultValue::from).collect())
            }
            Value::Object(map) => ResultValue::Sequence(
                map.into_iter()
                    .flat_map(|(k, v)| [ResultValue::Scalar(k), ResultValue::from(v)])
                    .collect(),
            ),
        }
    }
}
