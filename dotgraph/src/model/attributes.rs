//! Attribute values and the ordered containers that hold them.

use crate::adt::map::OrderedMap;
use crate::gv::parser::ast::AttributeListKind;
use std::fmt;

/// The value of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Option::Some(s),
            _ => Option::None,
        }
    }
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Option::Some(*n),
            _ => Option::None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Option::Some(*b),
            _ => Option::None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&String> for AttributeValue {
    fn from(s: &String) -> Self {
        AttributeValue::String(s.clone())
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<&AttributeValue> for AttributeValue {
    fn from(v: &AttributeValue) -> Self {
        v.clone()
    }
}

macro_rules! number_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(n: $ty) -> Self {
                    AttributeValue::Number(n as f64)
                }
            }
        )*
    };
}

number_value_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// An ordered set of attributes. Keys are unique, and iteration follows the
/// order in which keys were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    map: OrderedMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> &mut Self {
        self.map.insert(key.into(), value.into());
        self
    }

    /// Sets \p key to \p value. A `None` value changes nothing: a missing
    /// key stays missing and a present one keeps its value. Use `delete` to
    /// remove a key.
    pub fn set_opt<V: Into<AttributeValue>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        if let Option::Some(value) = value {
            self.map.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.map.get(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<AttributeValue> {
        self.map.remove(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Sets every key/value pair in \p entries, in order.
    pub fn apply<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        for (key, value) in entries {
            self.map.insert(key.into(), value.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a str, &'a AttributeValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)>
    for Attributes
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        attrs.apply(iter);
        attrs
    }
}

/// Implemented by every model entity that carries attributes. The provided
/// methods forward to the entity's `Attributes`.
pub trait HasAttributes {
    fn attribute_map(&self) -> &Attributes;
    fn attribute_map_mut(&mut self) -> &mut Attributes;

    fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> &mut Self
    where
        Self: Sized,
    {
        self.attribute_map_mut().set(key, value);
        self
    }

    fn set_opt<V: Into<AttributeValue>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self
    where
        Self: Sized,
    {
        self.attribute_map_mut().set_opt(key, value);
        self
    }

    fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attribute_map().get(key)
    }

    fn delete(&mut self, key: &str) -> Option<AttributeValue> {
        self.attribute_map_mut().delete(key)
    }

    fn clear(&mut self) {
        self.attribute_map_mut().clear();
    }

    fn apply<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        self.attribute_map_mut().apply(entries);
        self
    }
}

impl HasAttributes for Attributes {
    fn attribute_map(&self) -> &Attributes {
        self
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        self
    }
}

/// The attributes that belong to one node or one edge, with the comment
/// that is printed inside of its `[ ... ]` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributesGroup {
    pub comment: Option<String>,
    attributes: Attributes,
}

impl AttributesGroup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HasAttributes for AttributesGroup {
    fn attribute_map(&self) -> &Attributes {
        &self.attributes
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// A block of default attributes: `graph [...]`, `node [...]` or
/// `edge [...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    kind: AttributeListKind,
    pub comment: Option<String>,
    attributes: Attributes,
}

impl AttributeList {
    pub fn new(kind: AttributeListKind) -> Self {
        Self {
            kind,
            comment: Option::None,
            attributes: Attributes::new(),
        }
    }

    pub fn kind(&self) -> AttributeListKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl HasAttributes for AttributeList {
    fn attribute_map(&self) -> &Attributes {
        &self.attributes
    }
    fn attribute_map_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// The three default attribute lists of a graph or a subgraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub graph: AttributeList,
    pub node: AttributeList,
    pub edge: AttributeList,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            graph: AttributeList::new(AttributeListKind::Graph),
            node: AttributeList::new(AttributeListKind::Node),
            edge: AttributeList::new(AttributeListKind::Edge),
        }
    }
}

impl Defaults {
    pub fn get(&self, kind: AttributeListKind) -> &AttributeList {
        match kind {
            AttributeListKind::Graph => &self.graph,
            AttributeListKind::Node => &self.node,
            AttributeListKind::Edge => &self.edge,
        }
    }

    pub fn get_mut(&mut self, kind: AttributeListKind) -> &mut AttributeList {
        match kind {
            AttributeListKind::Graph => &mut self.graph,
            AttributeListKind::Node => &mut self.node,
            AttributeListKind::Edge => &mut self.edge,
        }
    }

    /// \returns the lists in the order in which they are printed.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeList> {
        [&self.graph, &self.node, &self.edge].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_delete() {
        let mut attrs = Attributes::new();
        attrs.set("label", "x").set("width", 2).set("fixedsize", true);
        assert_eq!(attrs.get("label"), Some(&AttributeValue::from("x")));
        assert_eq!(attrs.get("width").and_then(|v| v.as_number()), Some(2.0));
        assert_eq!(attrs.get("fixedsize").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.delete("width"), Some(AttributeValue::Number(2.0)));
        assert_eq!(attrs.get("width"), None);
        attrs.clear();
        assert!(attrs.is_empty());
    }

    #[test]
    fn unset_values_are_not_stored() {
        let mut attrs = Attributes::new();
        attrs.set_opt("color", Option::<&str>::None);
        assert!(attrs.is_empty());
        attrs.set("color", "red");
        attrs.set_opt("color", Option::<&str>::None);
        assert_eq!(attrs.get("color"), Some(&AttributeValue::from("red")));
        attrs.set_opt("color", Option::Some("blue"));
        assert_eq!(attrs.get("color"), Some(&AttributeValue::from("blue")));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn apply_keeps_first_insertion_order() {
        let mut attrs: Attributes = vec![("b", 1), ("a", 2)].into_iter().collect();
        attrs.apply([("c", 3), ("b", 4)]);
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(attrs.get("b"), Some(&AttributeValue::Number(4.0)));
    }

    #[test]
    fn number_display() {
        assert_eq!(AttributeValue::from(1).to_string(), "1");
        assert_eq!(AttributeValue::from(0.5).to_string(), "0.5");
        assert_eq!(AttributeValue::from(false).to_string(), "false");
    }
}
