use std::fmt;

use super::node::Node;

/// Predicate used to look up descendants of a [`Node`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Elements with the given tag name.
    Tag(String),
    /// Elements whose attribute `name` equals `value`.
    Attr { name: String, value: String },
}

impl Selector {
    pub fn tag(name: impl Into<String>) -> Self {
        Selector::Tag(name.into())
    }

    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn class(value: impl Into<String>) -> Self {
        Self::attr("class", value)
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::attr("id", value)
    }

    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Selector::Tag(tag) => node.tag() == tag,
            Selector::Attr { name, value } => node.attr(name) == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Tag(tag) => write!(f, "<{tag}>"),
            Selector::Attr { name, value } => write!(f, "[{name}='{value}']"),
        }
    }
}
