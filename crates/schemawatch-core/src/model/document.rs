//! Loosely-typed entity documents.
//!
//! Upstream documents have no published schema. [`Node`] replaces duck-typed
//! field access with explicit capability checks: every accessor is total and
//! degrades to [`Node::Missing`] instead of failing.

use serde_json::Value;
use std::collections::BTreeMap;

/// Scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

/// One node of a raw entity document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(BTreeMap<String, Node>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    /// Result of looking up something that is not there.
    Missing,
}

static MISSING: Node = Node::Missing;

impl Node {
    /// Parse a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Node::from(value))
    }

    /// Child under `key`, or `Missing` if this is not a mapping or the key is absent.
    pub fn get(&self, key: &str) -> &Node {
        match self {
            Node::Mapping(map) => map.get(key).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Missing)
    }

    /// Keys of a mapping, in sorted order. Empty for every other variant.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_mapping()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Entries of a collection.
    ///
    /// A collection is either a sequence of entries or a mapping of
    /// `name -> entry`; both shapes occur upstream. Scalars and `Missing`
    /// yield nothing.
    pub fn entries(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self {
            Node::Sequence(items) => Box::new(items.iter()),
            Node::Mapping(map) => Box::new(map.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// String items of a node that holds either one string or a list of them.
    pub fn string_items(&self) -> Vec<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => vec![s.as_str()],
            Node::Sequence(items) => items.iter().filter_map(Node::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(_) => "scalar",
            Node::Missing => "missing",
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
        }
    }
}
