//! Turning raw input into validated, lazily materialized nodes.
//!
//! A [`Factory`] describes what kind of value is expected at a place in the
//! document. Instantiating it with raw input and a [`Context`] gives a
//! [`NodeFactory`], which validates the input on first use and hands out a
//! [`Node`] only when the input is valid.
//!
//! Building is eager: validating a factory builds every child factory below
//! it, so errors anywhere in a document surface from the root. The one
//! exception is a reference that leads back into a structure already being
//! built. Those are deferred and only unfold when a consumer walks into them.

pub mod array;
pub mod field;
pub mod map;
pub mod object;
pub mod reference;

pub use array::{ArrayFactory, CollectionDefault};
pub use field::{FieldDefault, FieldSpec, FieldValidator, InputType, ObjectSchema};
pub use map::MapFactory;

use crate::context::Context;
use crate::error::{Error, Result, ValidationError, ValidationErrorKind};
use crate::node::{ArrayNode, MapNode, Node, NodeContext, ObjectNode};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use openapi_source::SourceCollection;
use reference::DeferredReference;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// The kinds of value a place in the document can hold.
#[derive(Clone)]
pub enum Factory {
    /// A scalar (or otherwise unstructured) value checked against a type
    Value(InputType),
    /// An object described by a static field table
    Object(&'static Lazy<ObjectSchema>),
    Array(Box<ArrayFactory>),
    Map(Box<MapFactory>),
    /// Either the wrapped factory, or a `$ref` to something it accepts
    Reference(Box<Factory>),
    /// A factory picked by looking at the input; the message is reported
    /// when nothing fits
    Select(fn(&Value) -> Option<Factory>, &'static str),
}

impl Factory {
    pub fn object(schema: &'static Lazy<ObjectSchema>) -> Self {
        Factory::Object(schema)
    }

    pub fn reference(factory: Factory) -> Self {
        Factory::Reference(Box::new(factory))
    }

    pub fn type_name(&self) -> String {
        match self {
            Factory::Value(input_type) => input_type.name().to_string(),
            Factory::Object(schema) => schema.name.to_string(),
            Factory::Array(_) => "Array".to_string(),
            Factory::Map(_) => "Map".to_string(),
            Factory::Reference(inner) => inner.type_name(),
            Factory::Select(..) => "Value".to_string(),
        }
    }

    /// Whether an absent field of this kind still produces a value.
    fn builds_when_absent(&self) -> bool {
        match self {
            Factory::Object(schema) => schema.default.is_some(),
            Factory::Array(_) | Factory::Map(_) => true,
            Factory::Reference(inner) => inner.builds_when_absent(),
            Factory::Value(_) | Factory::Select(..) => false,
        }
    }

    /// The factory that actually applies to `input`: references without a
    /// `$ref` marker fall through to what they wrap and selections are made.
    fn resolve_for(&self, input: Option<&Value>) -> Factory {
        match self {
            Factory::Reference(inner) if !reference::has_marker(input) => inner.resolve_for(input),
            Factory::Select(select, _) => match input.and_then(select) {
                Some(selected) => selected.resolve_for(input),
                None => self.clone(),
            },
            _ => self.clone(),
        }
    }
}

impl From<InputType> for Factory {
    fn from(input_type: InputType) -> Self {
        Factory::Value(input_type)
    }
}

impl From<ArrayFactory> for Factory {
    fn from(factory: ArrayFactory) -> Self {
        Factory::Array(Box::new(factory))
    }
}

impl From<MapFactory> for Factory {
    fn from(factory: MapFactory) -> Self {
        Factory::Map(Box::new(factory))
    }
}

// Object tables refer to each other (and themselves), so Debug never
// descends into them.
impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Value(input_type) => write!(f, "Value({})", input_type.name()),
            Factory::Object(schema) => write!(f, "Object({})", schema.name),
            Factory::Array(array) => write!(f, "Array({:?})", array.value_factory),
            Factory::Map(map) => write!(f, "Map({:?})", map.value_factory),
            Factory::Reference(inner) => write!(f, "Reference({:?})", inner),
            Factory::Select(_, message) => write!(f, "Select({:?})", message),
        }
    }
}

/// A built child: scalars are kept inline, everything else is a factory of
/// its own.
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    Value(Value),
    Child(Rc<NodeFactory>),
}

impl Entry {
    pub(crate) fn resolved_input(&self) -> &Value {
        match self {
            Entry::Value(value) => value,
            Entry::Child(child) => child.resolved_input(),
        }
    }
}

/// What building produced, by kind.
#[derive(Debug)]
pub(crate) enum Built {
    Value(Value),
    Object(IndexMap<String, Entry>),
    Array(Vec<Entry>),
    Map(IndexMap<String, Entry>),
    /// A followed reference and whether the local input was only the `$ref`
    Reference { target: Rc<NodeFactory>, pure: bool },
    Deferred(DeferredReference),
    Invalid,
}

/// Outcome of validating one factory's input.
#[derive(Debug)]
pub(crate) struct BuildResult {
    pub errors: Vec<ValidationError>,
    pub resolved_input: Value,
    pub built: Built,
}

impl BuildResult {
    /// A collection that defaults to no value.
    pub(crate) fn absent() -> Self {
        Self {
            errors: Vec::new(),
            resolved_input: Value::Null,
            built: Built::Value(Value::Null),
        }
    }

    pub(crate) fn invalid(error: ValidationError, resolved_input: Value) -> Self {
        Self {
            errors: vec![error],
            resolved_input,
            built: Built::Invalid,
        }
    }
}

/// Build a child for `factory`, inline when it is a scalar.
///
/// Returns the entry plus the errors it raised.
pub(crate) fn build_entry(
    factory: &Factory,
    input: Option<Value>,
    context: Context,
) -> (Entry, Vec<ValidationError>) {
    match factory.resolve_for(input.as_ref()) {
        Factory::Value(input_type) => {
            let value = input.unwrap_or(Value::Null);
            let errors = if input_type.accepts(&value) {
                Vec::new()
            } else {
                vec![type_error(input_type.name(), &context)]
            };
            (Entry::Value(value), errors)
        }
        resolved => {
            let child = NodeFactory::new(resolved, input, context);
            let errors = child.errors().to_vec();
            (Entry::Child(Rc::new(child)), errors)
        }
    }
}

pub(crate) fn type_error(expected: &str, context: &Context) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InvalidType {
            expected: expected.to_string(),
        },
        context.source_location().clone(),
    )
}

/// A factory bound to its input and context.
///
/// Validation runs at most once, on first query. The materialized node is
/// memoized too, so repeated calls to [`NodeFactory::node`] return the same
/// node.
pub struct NodeFactory {
    factory: Factory,
    input: Option<Value>,
    context: Context,
    build: OnceCell<BuildResult>,
    node: OnceCell<Node>,
}

impl NodeFactory {
    pub fn new(factory: Factory, input: Option<Value>, context: Context) -> Self {
        let input = input.filter(|value| !value.is_null());
        Self {
            factory: factory.resolve_for(input.as_ref()),
            input,
            context,
            build: OnceCell::new(),
            node: OnceCell::new(),
        }
    }

    /// A factory over the whole root document of `sources`.
    pub fn for_root(factory: Factory, sources: Rc<SourceCollection>) -> Self {
        let input = sources.root().data().clone();
        Self::new(factory, Some(input), Context::root(sources))
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn input(&self) -> Option<&Value> {
        self.input.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn type_name(&self) -> String {
        self.factory.type_name()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Every problem found in this factory's input and below it, in the
    /// order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.build_result().errors
    }

    /// The input with defaults applied and references replaced by what they
    /// point to.
    pub fn resolved_input(&self) -> &Value {
        &self.build_result().resolved_input
    }

    pub(crate) fn built(&self) -> &Built {
        &self.build_result().built
    }

    fn build_result(&self) -> &BuildResult {
        self.build.get_or_init(|| self.build())
    }

    fn build(&self) -> BuildResult {
        let input = self.input.as_ref();
        match &self.factory {
            Factory::Value(input_type) => {
                let value = input.cloned().unwrap_or(Value::Null);
                if input_type.accepts(&value) {
                    BuildResult {
                        errors: Vec::new(),
                        resolved_input: value.clone(),
                        built: Built::Value(value),
                    }
                } else {
                    BuildResult::invalid(type_error(input_type.name(), &self.context), value)
                }
            }
            Factory::Object(schema) => object::build(schema, input, &self.context),
            Factory::Array(array) => array::build(array, input, &self.context),
            Factory::Map(map) => map::build(map, input, &self.context),
            Factory::Reference(_) => reference::build(&self.factory, input, &self.context),
            Factory::Select(_, message) => BuildResult::invalid(
                ValidationError::new(
                    ValidationErrorKind::FieldValidation {
                        message: message.to_string(),
                    },
                    self.context.source_location().clone(),
                ),
                input.cloned().unwrap_or(Value::Null),
            ),
        }
    }

    /// Materialize the node for this factory.
    ///
    /// Fails with [`Error::InvalidNode`] when the input is invalid. The first
    /// successful call decides the node; later calls return it unchanged.
    pub fn node(&self, node_context: NodeContext) -> Result<Node> {
        if let Some(node) = self.node.get() {
            return Ok(node.clone());
        }

        if !self.is_valid() {
            return Err(Error::InvalidNode {
                type_name: self.type_name(),
                location: self.context.source_location().to_string(),
                errors: self.errors().to_vec(),
            });
        }

        let node = match self.built() {
            Built::Value(value) => Node::Value(value.clone()),
            Built::Object(fields) => Node::Object(ObjectNode::new(
                self.type_name(),
                fields.clone(),
                node_context,
            )),
            Built::Array(items) => Node::Array(ArrayNode::new(items.clone(), node_context)),
            Built::Map(entries) => {
                let extensions = matches!(&self.factory, Factory::Map(map) if map.extensions);
                Node::Map(MapNode::new(entries.clone(), extensions, node_context))
            }
            Built::Reference { target, pure } => {
                target.node(node_context.resolved_reference(target.context(), *pure))?
            }
            Built::Deferred(deferred) => {
                let target = deferred.target();
                target.node(node_context.resolved_reference(target.context(), deferred.pure()))?
            }
            Built::Invalid => {
                return Err(Error::InvalidNode {
                    type_name: self.type_name(),
                    location: self.context.source_location().to_string(),
                    errors: Vec::new(),
                });
            }
        };

        Ok(self.node.get_or_init(|| node).clone())
    }

    /// Materialize the node as the start of a walk.
    pub fn root_node(&self) -> Result<Node> {
        self.node(NodeContext::root(&self.context))
    }
}

impl fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFactory")
            .field("factory", &self.factory)
            .field("context", &self.context)
            .finish()
    }
}
