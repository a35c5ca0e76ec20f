//! Walks a [`ParsedNode`] tree and shapes it into the keyed JSON structure.
//!
//! Each element becomes an [`ElementWrapper`], a single-entry object whose key
//! is produced by [`element_key`]. Text is trimmed, whitespace-only text is
//! dropped, and element children take precedence over loose text.

use std::collections::BTreeMap;

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    dom::{ParsedElement, ParsedNode},
    key::element_key,
};

/// Result of transforming one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Contributes nothing to its parent; serializes as `null`.
    Absent,
    Text(String),
    Elements(Vec<ElementWrapper>),
    Wrapper(ElementWrapper),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Element {
    /// Every attribute except `id`, ordered by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Child {
    Text(String),
    Elements(Vec<ElementWrapper>),
}

impl Child {
    /// Collapses the child elements into one mapping keyed by generated key.
    /// Siblings sharing a key overwrite earlier ones; text yields an empty map.
    pub fn into_map(self) -> BTreeMap<String, Element> {
        match self {
            Child::Text(_) => BTreeMap::new(),
            Child::Elements(wrappers) => wrappers
                .into_iter()
                .map(|wrapper| (wrapper.key, wrapper.element))
                .collect(),
        }
    }
}

/// An element under its generated key; serializes as `{ key: element }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementWrapper {
    pub key: String,
    pub element: Element,
}

impl Serialize for ElementWrapper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.element)?;
        map.end()
    }
}

pub fn transform(node: &ParsedNode) -> Value {
    match node {
        // Only the first top-level element is represented.
        ParsedNode::Document(children) => match children.iter().find(|c| c.is_element()) {
            Some(first) => transform(first),
            None => Value::Absent,
        },
        ParsedNode::Element(el) => Value::Wrapper(transform_element(el)),
        ParsedNode::Text(text) => match text.trim() {
            "" => Value::Absent,
            trimmed => Value::Text(trimmed.to_string()),
        },
        ParsedNode::Comment(_) | ParsedNode::Other => Value::Absent,
    }
}

pub fn transform_element(el: &ParsedElement) -> ElementWrapper {
    let mut id = "";
    let mut attributes = BTreeMap::new();
    for (key, value) in &el.attrs {
        if key == "id" {
            id = value.as_str();
        } else {
            attributes.insert(key.clone(), value.clone());
        }
    }

    let mut children = Vec::new();
    let mut text = String::new();
    for node in &el.children {
        match node {
            ParsedNode::Element(child) => children.push(transform_element(child)),
            ParsedNode::Text(fragment) => text.push_str(fragment.trim()),
            _ => {}
        }
    }

    let child = if !children.is_empty() {
        Some(Child::Elements(children))
    } else if !text.is_empty() {
        Some(Child::Text(text))
    } else {
        None
    };

    ElementWrapper {
        key: element_key(&el.name, id),
        element: Element { attributes, child },
    }
}
