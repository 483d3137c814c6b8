//! Layout registry: the catalog of named, resolvable layouts.
//!
//! DESIGN
//! ======
//! The registry is an explicitly constructed value, shared by `Arc` between
//! the tab host and request handlers. Registration is append-only: there is
//! no update operation, and re-registering an id requires an explicit
//! `unregister` first, so a layout's identity is stable for the life of the
//! process.
//!
//! CONCURRENCY
//! ===========
//! Reads vastly outnumber writes (registration happens at start-up). A
//! `std::sync::RwLock` serializes `register`/`unregister`/`clear` against
//! each other and against readers. Readers receive `Arc<LayoutRecord>`
//! snapshots; records are never mutated after insertion. User producer code
//! runs only after the lock is released, so a slow or failing layout never
//! blocks the catalog.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::ErrorCode;
use crate::layout::{Layout, ProduceError};
use crate::params::{self, Args, ParameterInfo};
use crate::tree::{Component, Identifier, Node};
use crate::walk::walk;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("layout '{0}' is already registered")]
    DuplicateLayout(String),
    #[error("layout id cannot be empty")]
    InvalidLayoutId,
    #[error("layout '{id}' is malformed: {reason}")]
    MalformedLayout { id: String, reason: String },
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateLayout(_) => "E_DUPLICATE_LAYOUT",
            Self::InvalidLayoutId => "E_INVALID_LAYOUT_ID",
            Self::MalformedLayout { .. } => "E_MALFORMED_LAYOUT",
        }
    }
}

// =============================================================================
// PRESETS
// =============================================================================

/// A canned parameter configuration, values already in string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterPreset {
    pub description: String,
    pub params: Args,
}

/// Presets keyed by preset key, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presets(Vec<(String, ParameterPreset)>);

impl Presets {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParameterPreset> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, preset)| preset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterPreset)> {
        self.0.iter().map(|(k, preset)| (k.as_str(), preset))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or replace `key`, keeping its original position on replace.
    fn upsert(&mut self, key: String, preset: ParameterPreset) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = preset,
            None => self.0.push((key, preset)),
        }
    }
}

impl Serialize for Presets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, preset) in &self.0 {
            map.serialize_entry(key, preset)?;
        }
        map.end()
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

#[derive(Debug, Clone)]
struct RawPreset {
    key: String,
    description: String,
    params: Map<String, Value>,
}

/// Optional display metadata and behavior flags for [`LayoutRegistry::register`].
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    name: Option<String>,
    description: Option<String>,
    keywords: Vec<String>,
    allow_multiple: bool,
    presets: Vec<RawPreset>,
}

impl LayoutOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Display label. Defaults to the layout id.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Allow several tabs of this layout at once. Enables identifier
    /// injection when the layout is rendered into a tab.
    #[must_use]
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// Add a canned parameter configuration. Values may be any JSON value;
    /// they are stored in string form.
    #[must_use]
    pub fn preset<I, K, V>(mut self, key: impl Into<String>, description: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.presets.push(RawPreset {
            key: key.into(),
            description: description.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        });
        self
    }
}

fn normalize_presets(raw: Vec<RawPreset>) -> Option<Presets> {
    if raw.is_empty() {
        return None;
    }

    let mut presets = Presets::default();
    for preset in raw {
        let params = preset
            .params
            .iter()
            .map(|(k, v)| (k.clone(), params::stringify(v)))
            .collect();
        presets.upsert(preset.key, ParameterPreset { description: preset.description, params });
    }
    Some(presets)
}

// =============================================================================
// RECORD
// =============================================================================

/// A registered layout. Immutable once inserted.
#[derive(Debug)]
pub struct LayoutRecord {
    pub id: String,
    pub layout: Layout,
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub allow_multiple: bool,
    pub parameters: Vec<ParameterInfo>,
    pub presets: Option<Presets>,
}

impl LayoutRecord {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.layout.is_static()
    }

    /// Materialize the layout tree.
    ///
    /// A static tree is cloned. A lazy producer is invoked with `args`, after
    /// declared defaults are filled in for names the caller left out.
    /// Required arguments are not checked here.
    ///
    /// # Errors
    ///
    /// Returns the producer's own error unmodified.
    pub fn resolve_with(&self, args: &Args) -> Result<Node, ProduceError> {
        match &self.layout {
            Layout::Static(tree) => Ok(tree.clone()),
            Layout::Lazy(producer) => producer.call(&args.with_defaults(&self.parameters)),
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Default)]
struct RegistryInner {
    records: HashMap<String, Arc<LayoutRecord>>,
    /// Insertion order for listing.
    order: Vec<String>,
}

/// Catalog of layouts keyed by layout id.
#[derive(Default)]
pub struct LayoutRegistry {
    inner: RwLock<RegistryInner>,
}

impl LayoutRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a layout under `id`.
    ///
    /// # Errors
    ///
    /// - `InvalidLayoutId` if `id` is empty or blank.
    /// - `MalformedLayout` if a static tree fails validation.
    /// - `DuplicateLayout` if `id` is already registered; the existing record
    ///   is left untouched.
    pub fn register(&self, id: &str, layout: impl Into<Layout>, options: LayoutOptions) -> Result<(), RegistryError> {
        if id.trim().is_empty() {
            return Err(RegistryError::InvalidLayoutId);
        }

        let layout = layout.into();
        if let Layout::Static(tree) = &layout {
            validate_static(id, tree)?;
        }

        let parameters = match &layout {
            Layout::Static(_) => Vec::new(),
            Layout::Lazy(producer) => params::extract(producer.as_ref()),
        };

        let record = LayoutRecord {
            id: id.to_owned(),
            name: options.name.unwrap_or_else(|| id.to_owned()),
            description: options.description.unwrap_or_default(),
            keywords: options.keywords,
            allow_multiple: options.allow_multiple,
            parameters,
            presets: normalize_presets(options.presets),
            layout,
        };
        let is_static = record.is_static();
        let allow_multiple = record.allow_multiple;

        let mut inner = self.write();
        if inner.records.contains_key(id) {
            return Err(RegistryError::DuplicateLayout(id.to_owned()));
        }
        inner.records.insert(id.to_owned(), Arc::new(record));
        inner.order.push(id.to_owned());
        drop(inner);

        info!(layout_id = id, is_static, allow_multiple, "layout registered");
        Ok(())
    }

    /// Remove a layout. Returns whether anything was removed; an unknown id
    /// is not an error.
    pub fn unregister(&self, id: &str) -> bool {
        let mut inner = self.write();
        if inner.records.remove(id).is_none() {
            return false;
        }
        inner.order.retain(|existing| existing != id);
        drop(inner);

        info!(layout_id = id, "layout unregistered");
        true
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<LayoutRecord>> {
        self.read().records.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.read().records.contains_key(id)
    }

    /// Snapshot of every record in registration order. Each record carries
    /// its own `id`; use [`LayoutRegistry::by_id`] for keyed lookup.
    #[must_use]
    pub fn list_all(&self) -> Vec<Arc<LayoutRecord>> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    /// Snapshot keyed by id. Later registry changes do not show up in it.
    #[must_use]
    pub fn by_id(&self) -> HashMap<String, Arc<LayoutRecord>> {
        self.read().records.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Resolve a layout without arguments. `Ok(None)` for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns a lazy producer's own error unmodified.
    pub fn resolve(&self, id: &str) -> Result<Option<Node>, ProduceError> {
        self.resolve_with(id, &Args::new())
    }

    /// Resolve a layout with named string arguments. `Ok(None)` for an
    /// unknown id.
    ///
    /// # Errors
    ///
    /// Returns a lazy producer's own error unmodified.
    pub fn resolve_with(&self, id: &str, args: &Args) -> Result<Option<Node>, ProduceError> {
        let Some(record) = self.get(id) else {
            debug!(layout_id = id, "resolve requested for unknown layout");
            return Ok(None);
        };

        debug!(layout_id = id, is_static = record.is_static(), args = args.len(), "resolving layout");
        record.resolve_with(args).map(Some)
    }

    /// Drop every record. Meant for test isolation.
    pub fn clear(&self) {
        let mut inner = self.write();
        let dropped = inner.records.len();
        inner.records.clear();
        inner.order.clear();
        drop(inner);

        info!(dropped, "layout registry cleared");
    }
}

/// Reject static trees a host could not mount: components without a type
/// name, empty string identifiers, and repeated string identifiers.
fn validate_static(id: &str, tree: &Node) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    let mut problem: Option<String> = None;

    walk(tree.clone(), &mut |component: Component| {
        if problem.is_none() {
            problem = component_problem(&component, &mut seen);
        }
        component
    });

    match problem {
        Some(reason) => Err(RegistryError::MalformedLayout { id: id.to_owned(), reason }),
        None => Ok(()),
    }
}

fn component_problem(component: &Component, seen: &mut HashSet<String>) -> Option<String> {
    if component.kind().name().trim().is_empty() {
        return Some("component with an empty type name".to_owned());
    }
    match &component.id {
        Some(Identifier::Name(name)) if name.is_empty() => {
            Some(format!("empty identifier on '{}'", component.kind().name()))
        }
        Some(Identifier::Name(name)) if !seen.insert(name.clone()) => Some(format!("duplicate identifier '{name}'")),
        _ => None,
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
