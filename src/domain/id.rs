//! Node identity

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identity value of a node: either a string or an integer.
///
/// Comparison is strict: `Str("1")` and `Int(1)` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Str(value)
    }
}

impl From<&String> for NodeId {
    fn from(value: &String) -> Self {
        NodeId::Str(value.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId::Int(value.into())
    }
}

/// Parsing never fails and always produces a string id.
impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NodeId::Str(s.to_string()))
    }
}
