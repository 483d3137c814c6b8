//! Layout tree model.
//!
//! DESIGN
//! ======
//! A layout is a closed tree of [`Node`] values. The walker dispatches on the
//! variant instead of inspecting runtime types:
//!
//! - `Leaf` holds a primitive (string, number, boolean, null).
//! - `Component` is an instance of a [`ComponentKind`] with an optional
//!   identifier, a `children` slot, and named properties.
//! - `Sequence` is an ordered list or fixed-length tuple of nodes.
//! - `Mapping` is opaque configuration-like data. The walker only enters it
//!   through a slot path declared on the owning component kind.
//!
//! Trees are plain owned values. Whoever holds a tree owns it; transforms
//! consume a tree and hand back a new one.
//!
//! Serialization follows the Dash component JSON shape
//! (`{"type", "namespace", "props"}`) so a host renderer can mount the result
//! without an extra translation layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::path::PropPath;

/// Named properties of a component, or the entries of an opaque mapping.
pub type Props = BTreeMap<String, Node>;

/// Property names backed by dedicated `Component` fields.
const RESERVED_PROPS: [&str; 2] = ["id", "children"];

/// Keys that mark a mapping as a serialized component.
pub const SERIALIZED_COMPONENT_KEYS: [&str; 3] = ["type", "namespace", "props"];

// =============================================================================
// SCALARS & IDENTIFIERS
// =============================================================================

/// A primitive leaf value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(v) => v.serialize(serializer),
            Self::String(v) => serializer.serialize_str(v),
        }
    }
}

/// A component identifier.
///
/// `Name` is the plain string form. `Pattern` is the structured form used for
/// pattern-matching addressing (`{"type": ..., "index": ...}`); its values are
/// arbitrary JSON so an author-supplied numeric index survives untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Name(String),
    Pattern(Map<String, Value>),
}

impl Identifier {
    /// The plain string form, if this is a `Name`.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Pattern(_) => None,
        }
    }

    /// Structured fields, if this is a `Pattern`.
    #[must_use]
    pub fn as_pattern(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Name(_) => None,
            Self::Pattern(fields) => Some(fields),
        }
    }
}

impl Identifier {
    /// A string leaf becomes a `Name`; a mapping of plain data becomes a
    /// `Pattern`. Anything else has no identifier form.
    #[must_use]
    pub fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Leaf(Scalar::String(name)) => Some(Self::Name(name.clone())),
            Node::Mapping(_) => match node.to_json()? {
                Value::Object(fields) => Some(Self::Pattern(fields)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<Map<String, Value>> for Identifier {
    fn from(value: Map<String, Value>) -> Self {
        Self::Pattern(value)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Name(name) => serializer.serialize_str(name),
            Self::Pattern(fields) => fields.serialize(serializer),
        }
    }
}

// =============================================================================
// COMPONENT KIND
// =============================================================================

/// Class-level description of a component type.
///
/// `slots` lists the extra tree-bearing properties (besides `children`) as
/// path specifications, e.g. `header` or `items[].content`. A kind is shared
/// by every instance through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentKind {
    namespace: String,
    name: String,
    slots: Vec<PropPath>,
}

impl ComponentKind {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into(), slots: Vec::new() }
    }

    /// Declare an extra tree-bearing property path.
    #[must_use]
    pub fn with_slot(mut self, path: PropPath) -> Self {
        self.slots.push(path);
        self
    }

    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slots(&self) -> &[PropPath] {
        &self.slots
    }
}

// =============================================================================
// COMPONENT
// =============================================================================

/// One component instance in a layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: Arc<ComponentKind>,
    pub id: Option<Identifier>,
    pub children: Option<Box<Node>>,
    pub props: Props,
}

impl Component {
    #[must_use]
    pub fn new(kind: &Arc<ComponentKind>) -> Self {
        Self { kind: Arc::clone(kind), id: None, children: None, props: Props::new() }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<Identifier>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl Into<Node>) -> Self {
        self.children = Some(Box::new(children.into()));
        self
    }

    /// Set a named property. `children` and `id` land in their dedicated
    /// fields so the walker and the injector see them.
    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "children" => self.children = Some(Box::new(value)),
            "id" => match value {
                Node::Leaf(Scalar::Null) => self.id = None,
                other => match Identifier::from_node(&other) {
                    Some(id) => self.id = Some(id),
                    None => warn!(component = %self.kind.name, "ignoring id that is neither a string nor a mapping"),
                },
            },
            _ => {
                self.props.insert(name, value);
            }
        }
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The shared kind handle, for callers that outlive a borrow of `self`.
    #[must_use]
    pub fn shared_kind(&self) -> &Arc<ComponentKind> {
        &self.kind
    }

    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&Node> {
        self.props.get(name)
    }
}

/// Serializes the `props` object of a component: declared properties plus
/// `id` and `children`, which live in dedicated fields on the Rust side.
struct PropsView<'a>(&'a Component);

impl Serialize for PropsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let component = self.0;
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &component.props {
            if RESERVED_PROPS.contains(&key.as_str()) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        if let Some(id) = &component.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(children) = &component.children {
            map.serialize_entry("children", children)?;
        }
        map.end()
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", self.kind.name())?;
        map.serialize_entry("namespace", self.kind.namespace())?;
        map.serialize_entry("props", &PropsView(self))?;
        map.end()
    }
}

// =============================================================================
// NODE
// =============================================================================

/// Whether a sequence is variable-length or fixed-length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeqKind {
    #[default]
    List,
    Tuple,
}

/// An ordered run of nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    pub kind: SeqKind,
    pub items: Vec<Node>,
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

/// A layout tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Scalar),
    Component(Component),
    Sequence(Sequence),
    Mapping(Props),
}

impl Default for Node {
    fn default() -> Self {
        Self::Leaf(Scalar::Null)
    }
}

impl Node {
    #[must_use]
    pub fn null() -> Self {
        Self::Leaf(Scalar::Null)
    }

    /// A variable-length sequence.
    pub fn list<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self::Sequence(Sequence { kind: SeqKind::List, items: items.into_iter().map(Into::into).collect() })
    }

    /// A fixed-length sequence.
    pub fn tuple<I, N>(items: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self::Sequence(Sequence { kind: SeqKind::Tuple, items: items.into_iter().map(Into::into).collect() })
    }

    /// An opaque mapping.
    pub fn mapping<I, K, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, N)>,
        K: Into<String>,
        N: Into<Node>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    #[must_use]
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&Props> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Plain JSON for a tree without components; `None` if one is present.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Self::Leaf(Scalar::Null) => Some(Value::Null),
            Self::Leaf(Scalar::Bool(v)) => Some(Value::Bool(*v)),
            Self::Leaf(Scalar::Number(v)) => Some(Value::Number(v.clone())),
            Self::Leaf(Scalar::String(v)) => Some(Value::String(v.clone())),
            Self::Component(_) => None,
            Self::Sequence(seq) => seq.items.iter().map(Self::to_json).collect::<Option<Vec<_>>>().map(Value::Array),
            Self::Mapping(map) => map
                .iter()
                .map(|(key, value)| Some((key.clone(), value.to_json()?)))
                .collect::<Option<Map<_, _>>>()
                .map(Value::Object),
        }
    }

    /// True for a mapping shaped like a serialized component
    /// (`type` + `namespace` + `props`).
    #[must_use]
    pub fn is_serialized_component(&self) -> bool {
        match self {
            Self::Mapping(map) => SERIALIZED_COMPONENT_KEYS.iter().all(|k| map.contains_key(*k)),
            _ => false,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(scalar) => scalar.serialize(serializer),
            Self::Component(component) => component.serialize(serializer),
            Self::Sequence(seq) => seq.serialize(serializer),
            Self::Mapping(map) => map.serialize(serializer),
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<Component> for Node {
    fn from(value: Component) -> Self {
        Self::Component(value)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Leaf(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Leaf(Scalar::String(value.to_owned()))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Leaf(Scalar::String(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Leaf(Scalar::Bool(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Leaf(Scalar::Number(value.into()))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::null(), |n| Self::Leaf(Scalar::Number(n)))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Sequence(Sequence { kind: SeqKind::List, items: value })
    }
}

impl From<Vec<Component>> for Node {
    fn from(value: Vec<Component>) -> Self {
        Self::list(value)
    }
}

/// Plain JSON becomes leaves, lists and opaque mappings. JSON never produces
/// `Component` nodes; a serialized component stays an opaque mapping.
impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(v) => Self::Leaf(Scalar::Bool(v)),
            Value::Number(v) => Self::Leaf(Scalar::Number(v)),
            Value::String(v) => Self::Leaf(Scalar::String(v)),
            Value::Array(items) => Self::list(items),
            Value::Object(fields) => Self::mapping(fields),
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
