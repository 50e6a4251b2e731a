//! Materialized nodes.
//!
//! Nodes only exist for valid input. Children are materialized on first
//! access and memoized by the factory that built them, so walking into the
//! same field twice gives back the same node.

pub mod context;

pub use context::NodeContext;

use crate::error::Result;
use crate::node_factory::{Built, Entry};
use indexmap::IndexMap;
use openapi_source::PointerSegment;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Any materialized node.
#[derive(Debug, Clone)]
pub enum Node {
    Object(ObjectNode),
    Array(ArrayNode),
    Map(MapNode),
    /// Scalars and other unstructured values
    Value(Value),
}

impl Node {
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapNode> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ObjectNode> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_array(self) -> Option<ArrayNode> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<MapNode> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Context of structured nodes. Values don't carry one.
    pub fn node_context(&self) -> Option<&NodeContext> {
        match self {
            Node::Object(object) => Some(object.node_context()),
            Node::Array(array) => Some(array.node_context()),
            Node::Map(map) => Some(map.node_context()),
            Node::Value(_) => None,
        }
    }

    /// Step into a child by pointer segment. Numeric keys index arrays.
    pub fn child(&self, segment: &PointerSegment) -> Result<Option<Node>> {
        match (self, segment) {
            (Node::Object(object), segment) => object.get(&segment.to_string()),
            (Node::Map(map), segment) => map.get(&segment.to_string()),
            (Node::Array(array), PointerSegment::Index(index)) => array.get(*index),
            (Node::Array(array), PointerSegment::Key(key)) => match key.parse::<usize>() {
                Ok(index) => array.get(index),
                Err(_) => Ok(None),
            },
            (Node::Value(_), _) => Ok(None),
        }
    }

    /// Whether both are the same materialized node. Values never are.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => a.ptr_eq(b),
            (Node::Array(a), Node::Array(b)) => a.ptr_eq(b),
            (Node::Map(a), Node::Map(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Conversion from a generic [`Node`] into a typed view of it.
pub trait NodeType: Sized {
    fn from_node(node: Node) -> Option<Self>;
}

impl NodeType for Node {
    fn from_node(node: Node) -> Option<Self> {
        Some(node)
    }
}

impl NodeType for ObjectNode {
    fn from_node(node: Node) -> Option<Self> {
        node.into_object()
    }
}

impl NodeType for ArrayNode {
    fn from_node(node: Node) -> Option<Self> {
        node.into_array()
    }
}

impl NodeType for MapNode {
    fn from_node(node: Node) -> Option<Self> {
        node.into_map()
    }
}

impl NodeType for Value {
    fn from_node(node: Node) -> Option<Self> {
        node.into_value()
    }
}

impl NodeType for String {
    fn from_node(node: Node) -> Option<Self> {
        match node.into_value()? {
            Value::String(string) => Some(string),
            _ => None,
        }
    }
}

/// Materialize the child behind an entry, treating defaulted-to-nothing
/// collections as absent.
fn entry_node(entry: &Entry, segment: PointerSegment, parent: &NodeContext) -> Result<Option<Node>> {
    match entry {
        _ if !is_present(entry) => Ok(None),
        Entry::Value(value) => Ok(Some(Node::Value(value.clone()))),
        Entry::Child(child) => child
            .node(parent.next_field(segment, child.context()))
            .map(Some),
    }
}

/// False for absent fields kept only as placeholders.
fn is_present(entry: &Entry) -> bool {
    match entry {
        Entry::Value(value) => !value.is_null(),
        Entry::Child(child) => !matches!(child.built(), Built::Value(Value::Null)),
    }
}

fn entry_value(entry: &Entry) -> Option<&Value> {
    let value = match entry {
        Entry::Value(value) => value,
        Entry::Child(child) => match child.built() {
            Built::Value(value) => value,
            _ => return None,
        },
    };
    (!value.is_null()).then_some(value)
}

fn extension_key(name: &str) -> String {
    if name.starts_with("x-") {
        name.to_string()
    } else {
        format!("x-{}", name)
    }
}

struct ObjectData {
    type_name: String,
    fields: IndexMap<String, Entry>,
    context: NodeContext,
}

/// A node built from an object's field table.
#[derive(Clone)]
pub struct ObjectNode(Rc<ObjectData>);

impl ObjectNode {
    pub(crate) fn new(type_name: String, fields: IndexMap<String, Entry>, context: NodeContext) -> Self {
        Self(Rc::new(ObjectData {
            type_name,
            fields,
            context,
        }))
    }

    /// Name of the object type, e.g. `Info`.
    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    pub fn node_context(&self) -> &NodeContext {
        &self.0.context
    }

    /// Fields that have a value, declared fields first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .fields
            .iter()
            .filter(|(_, entry)| is_present(entry))
            .map(|(key, _)| key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.fields.contains_key(key)
    }

    /// The raw value of a scalar field.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.fields.get(key).and_then(entry_value)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// A boolean field; absent counts as false.
    pub fn boolean(&self, key: &str) -> bool {
        self.value(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Any field as a node.
    pub fn get(&self, key: &str) -> Result<Option<Node>> {
        match self.0.fields.get(key) {
            Some(entry) => entry_node(entry, key.into(), &self.0.context),
            None => Ok(None),
        }
    }

    /// A field as a typed node.
    pub fn child<T: NodeType>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.get(key)?.and_then(T::from_node))
    }

    /// An `x-` field, by name with or without its prefix.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.value(&extension_key(name))
    }

    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.fields.iter().filter_map(|(key, entry)| match entry {
            Entry::Value(value) if key.starts_with("x-") => Some((key.as_str(), value)),
            _ => None,
        })
    }

    pub fn ptr_eq(&self, other: &ObjectNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectNode({} at {})",
            self.0.type_name,
            self.0.context.document_location()
        )
    }
}

struct ArrayData {
    items: Vec<Entry>,
    context: NodeContext,
}

/// A node built from a sequence.
#[derive(Clone)]
pub struct ArrayNode(Rc<ArrayData>);

impl ArrayNode {
    pub(crate) fn new(items: Vec<Entry>, context: NodeContext) -> Self {
        Self(Rc::new(ArrayData { items, context }))
    }

    pub fn node_context(&self) -> &NodeContext {
        &self.0.context
    }

    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Option<Node>> {
        match self.0.items.get(index) {
            Some(entry) => entry_node(entry, index.into(), &self.0.context),
            None => Ok(None),
        }
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.0.items.get(index).and_then(entry_value)
    }

    /// Every element as a node, in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Node>> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index).transpose())
    }

    pub fn ptr_eq(&self, other: &ArrayNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArrayNode({} items at {})",
            self.len(),
            self.0.context.document_location()
        )
    }
}

struct MapData {
    entries: IndexMap<String, Entry>,
    extensions: bool,
    context: NodeContext,
}

/// A node built from a mapping with arbitrary keys.
#[derive(Clone)]
pub struct MapNode(Rc<MapData>);

impl MapNode {
    pub(crate) fn new(entries: IndexMap<String, Entry>, extensions: bool, context: NodeContext) -> Self {
        Self(Rc::new(MapData {
            entries,
            extensions,
            context,
        }))
    }

    pub fn node_context(&self) -> &NodeContext {
        &self.0.context
    }

    fn is_extension_key(&self, key: &str) -> bool {
        self.0.extensions && key.starts_with("x-")
    }

    /// Keys in input order, leaving out `x-` extensions where the map
    /// accepts them.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .entries
            .keys()
            .map(String::as_str)
            .filter(|key| !self.is_extension_key(key))
    }

    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Result<Option<Node>> {
        match self.0.entries.get(key) {
            Some(entry) => entry_node(entry, key.into(), &self.0.context),
            None => Ok(None),
        }
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.entries.get(key).and_then(entry_value)
    }

    /// Every non-extension entry as a node, in input order.
    pub fn iter(&self) -> impl Iterator<Item = Result<(&str, Node)>> + '_ {
        self.keys().filter_map(move |key| {
            self.get(key)
                .map(|node| node.map(|node| (key, node)))
                .transpose()
        })
    }

    pub fn extension(&self, name: &str) -> Option<&Value> {
        let key = extension_key(name);
        if self.is_extension_key(&key) {
            self.value(&key)
        } else {
            None
        }
    }

    pub fn ptr_eq(&self, other: &MapNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MapNode({} entries at {})",
            self.0.entries.len(),
            self.0.context.document_location()
        )
    }
}

/// A map node whose values are all of one type.
pub struct NodeMap<T> {
    node: MapNode,
    marker: PhantomData<T>,
}

impl<T: NodeType> NodeMap<T> {
    pub fn node(&self) -> &MapNode {
        &self.node
    }

    pub fn node_context(&self) -> &NodeContext {
        self.node.node_context()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.node.keys()
    }

    pub fn len(&self) -> usize {
        self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.node.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Result<Option<T>> {
        Ok(self.node.get(key)?.and_then(T::from_node))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<(&str, T)>> + '_ {
        self.node.iter().filter_map(|entry| match entry {
            Ok((key, node)) => T::from_node(node).map(|typed| Ok((key, typed))),
            Err(error) => Some(Err(error)),
        })
    }

    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.node.extension(name)
    }
}

impl<T> Clone for NodeMap<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for NodeMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeMap({:?})", self.node)
    }
}

impl<T: NodeType> NodeType for NodeMap<T> {
    fn from_node(node: Node) -> Option<Self> {
        node.into_map().map(|node| NodeMap {
            node,
            marker: PhantomData,
        })
    }
}

/// An array node whose elements are all of one type.
pub struct NodeList<T> {
    node: ArrayNode,
    marker: PhantomData<T>,
}

impl<T: NodeType> NodeList<T> {
    pub fn node(&self) -> &ArrayNode {
        &self.node
    }

    pub fn node_context(&self) -> &NodeContext {
        self.node.node_context()
    }

    pub fn len(&self) -> usize {
        self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Option<T>> {
        Ok(self.node.get(index)?.and_then(T::from_node))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        self.node.iter().filter_map(|item| match item {
            Ok(node) => T::from_node(node).map(Ok),
            Err(error) => Some(Err(error)),
        })
    }

    /// All elements, failing on the first that can't be materialized.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<T> Clone for NodeList<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for NodeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeList({:?})", self.node)
    }
}

impl<T: NodeType> NodeType for NodeList<T> {
    fn from_node(node: Node) -> Option<Self> {
        node.into_array().map(|node| NodeList {
            node,
            marker: PhantomData,
        })
    }
}

/// Declare a typed view over an [`ObjectNode`].
macro_rules! object_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name($crate::node::ObjectNode);

        impl $name {
            /// The untyped node behind this view.
            pub fn node(&self) -> &$crate::node::ObjectNode {
                &self.0
            }

            pub fn node_context(&self) -> &$crate::node::NodeContext {
                self.0.node_context()
            }

            /// An `x-` field, by name with or without its prefix.
            pub fn extension(&self, name: &str) -> Option<&serde_json::Value> {
                self.0.extension(name)
            }
        }

        impl $crate::node::NodeType for $name {
            fn from_node(node: $crate::node::Node) -> Option<Self> {
                node.into_object().map($name)
            }
        }
    };
}

pub(crate) use object_node;
