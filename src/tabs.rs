//! Tab host: open, close, and render tab instances of registered layouts.
//!
//! DESIGN
//! ======
//! A tab pairs a layout id with the string arguments it was opened with and a
//! stable UUID instance id. Rendering resolves the layout with those
//! arguments and, when the layout allows multiple instances, scopes every
//! identifier to the instance id. Resolving the same `(layout_id, args)` and
//! injecting the same instance id always reproduces an equivalent tree, so
//! the host can re-render a tab at any time.
//!
//! Required-parameter validation happens here, before a tab exists; the
//! registry itself never checks arguments.
//!
//! A layout without `allow_multiple` is opened at most once. Opening it again
//! re-activates the existing tab instead of creating a second one.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::HostConfig;
use crate::error::ErrorCode;
use crate::inject::inject;
use crate::layout::ProduceError;
use crate::params::Args;
use crate::registry::LayoutRegistry;
use crate::tree::{Component, ComponentKind, Node};

/// Namespace of components produced by the tab host itself.
pub const HOST_NAMESPACE: &str = "kaleido";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("layout not found: {0}")]
    UnknownLayout(String),
    #[error("layout '{layout_id}' has no preset '{preset}'")]
    UnknownPreset { layout_id: String, preset: String },
    #[error("tab not found: {0}")]
    UnknownTab(String),
    #[error("tab limit reached (max {max})")]
    TabLimit { max: usize },
    #[error("layout '{layout_id}' is missing required parameters: {}", .names.join(", "))]
    MissingParameters { layout_id: String, names: Vec<String> },
    #[error("layout '{layout_id}' failed to render: {source}")]
    Produce {
        layout_id: String,
        #[source]
        source: ProduceError,
    },
}

impl ErrorCode for TabError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLayout(_) => "E_UNKNOWN_LAYOUT",
            Self::UnknownPreset { .. } => "E_UNKNOWN_PRESET",
            Self::UnknownTab(_) => "E_UNKNOWN_TAB",
            Self::TabLimit { .. } => "E_TAB_LIMIT",
            Self::MissingParameters { .. } => "E_MISSING_PARAMETERS",
            Self::Produce { .. } => "E_LAYOUT_RENDER",
        }
    }
}

/// One open tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInstance {
    /// Stable instance id; injected as the identifier index.
    pub id: String,
    pub layout_id: String,
    /// Display name, initially the layout's name.
    pub name: String,
    /// Milliseconds since Unix epoch.
    pub created_at: i64,
    pub layout_params: Args,
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

// =============================================================================
// HOST
// =============================================================================

pub struct TabHost {
    registry: Arc<LayoutRegistry>,
    config: HostConfig,
    tabs: Vec<TabInstance>,
    active: Option<String>,
}

impl TabHost {
    #[must_use]
    pub fn new(registry: Arc<LayoutRegistry>, config: HostConfig) -> Self {
        Self { registry, config, tabs: Vec::new(), active: None }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<LayoutRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[must_use]
    pub fn tabs(&self) -> &[TabInstance] {
        &self.tabs
    }

    #[must_use]
    pub fn get(&self, tab_id: &str) -> Option<&TabInstance> {
        self.tabs.iter().find(|tab| tab.id == tab_id)
    }

    #[must_use]
    pub fn active(&self) -> Option<&TabInstance> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Layout ids to offer in the new-tab picker: the configured list minus
    /// unknown ids, or every registered layout when nothing is configured.
    #[must_use]
    pub fn displayed_layouts(&self) -> Vec<String> {
        match &self.config.displayed_layouts {
            Some(ids) => ids
                .iter()
                .filter(|id| self.registry.contains(id))
                .cloned()
                .collect(),
            None => self
                .registry
                .list_all()
                .iter()
                .map(|record| record.id.clone())
                .collect(),
        }
    }

    /// Open a tab for `layout_id` with `args` and make it active.
    ///
    /// # Errors
    ///
    /// - `UnknownLayout` if the id is not registered.
    /// - `TabLimit` if the configured maximum is reached.
    /// - `MissingParameters` if a required parameter has no argument.
    pub fn open(&mut self, layout_id: &str, args: Args) -> Result<TabInstance, TabError> {
        let record = self
            .registry
            .get(layout_id)
            .ok_or_else(|| TabError::UnknownLayout(layout_id.to_owned()))?;

        if !record.allow_multiple {
            if let Some(existing) = self.tabs.iter().find(|tab| tab.layout_id == layout_id) {
                let existing = existing.clone();
                self.active = Some(existing.id.clone());
                info!(layout_id, tab_id = %existing.id, "single-instance layout already open; activated");
                return Ok(existing);
            }
        }

        if let Some(max) = self.config.max_tabs {
            if self.tabs.len() >= max {
                return Err(TabError::TabLimit { max });
            }
        }

        let missing = args.missing(&record.parameters);
        if !missing.is_empty() {
            return Err(TabError::MissingParameters {
                layout_id: layout_id.to_owned(),
                names: missing.into_iter().map(str::to_owned).collect(),
            });
        }

        let tab = TabInstance {
            id: Uuid::new_v4().to_string(),
            layout_id: layout_id.to_owned(),
            name: record.name.clone(),
            created_at: now_ms(),
            layout_params: args,
        };
        self.tabs.push(tab.clone());
        self.active = Some(tab.id.clone());

        info!(layout_id, tab_id = %tab.id, open_tabs = self.tabs.len(), "tab opened");
        Ok(tab)
    }

    /// Open a tab using one of the layout's parameter presets.
    ///
    /// # Errors
    ///
    /// `UnknownPreset` if the layout has no such preset, plus everything
    /// [`TabHost::open`] returns.
    pub fn open_preset(&mut self, layout_id: &str, preset: &str) -> Result<TabInstance, TabError> {
        let record = self
            .registry
            .get(layout_id)
            .ok_or_else(|| TabError::UnknownLayout(layout_id.to_owned()))?;
        let args = record
            .presets
            .as_ref()
            .and_then(|presets| presets.get(preset))
            .map(|p| p.params.clone())
            .ok_or_else(|| TabError::UnknownPreset { layout_id: layout_id.to_owned(), preset: preset.to_owned() })?;

        self.open(layout_id, args)
    }

    /// Open the configured initial layout when no tab is open yet.
    ///
    /// The initial tab is a hint: an unknown layout, or one that needs
    /// arguments, is logged and skipped.
    ///
    /// # Errors
    ///
    /// A producer failure or the tab limit, as [`TabHost::open`] reports them.
    pub fn open_initial(&mut self) -> Result<Option<TabInstance>, TabError> {
        if !self.tabs.is_empty() {
            return Ok(None);
        }
        let Some(layout_id) = self.config.initial_tab.clone() else {
            return Ok(None);
        };
        match self.open(&layout_id, Args::new()) {
            Ok(tab) => Ok(Some(tab)),
            Err(err @ (TabError::UnknownLayout(_) | TabError::MissingParameters { .. })) => {
                warn!(%layout_id, error = %err, "initial tab skipped");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Close a tab. When it was active, the tab now at its position (or the
    /// last tab) becomes active.
    ///
    /// # Errors
    ///
    /// `UnknownTab` if no tab has this id.
    pub fn close(&mut self, tab_id: &str) -> Result<TabInstance, TabError> {
        let position = self
            .tabs
            .iter()
            .position(|tab| tab.id == tab_id)
            .ok_or_else(|| TabError::UnknownTab(tab_id.to_owned()))?;
        let closed = self.tabs.remove(position);

        if self.active.as_deref() == Some(tab_id) {
            self.active = self
                .tabs
                .get(position)
                .or_else(|| self.tabs.last())
                .map(|tab| tab.id.clone());
        }

        info!(tab_id, layout_id = %closed.layout_id, open_tabs = self.tabs.len(), "tab closed");
        Ok(closed)
    }

    /// # Errors
    ///
    /// `UnknownTab` if no tab has this id.
    pub fn activate(&mut self, tab_id: &str) -> Result<(), TabError> {
        if self.get(tab_id).is_none() {
            return Err(TabError::UnknownTab(tab_id.to_owned()));
        }
        self.active = Some(tab_id.to_owned());
        Ok(())
    }

    /// # Errors
    ///
    /// `UnknownTab` if no tab has this id.
    pub fn rename(&mut self, tab_id: &str, name: impl Into<String>) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|tab| tab.id == tab_id)
            .ok_or_else(|| TabError::UnknownTab(tab_id.to_owned()))?;
        tab.name = name.into();
        Ok(())
    }

    /// Render an open tab's content.
    ///
    /// # Errors
    ///
    /// `UnknownTab` for an unknown tab id, or whatever [`render_tab`] returns.
    pub fn render(&self, tab_id: &str) -> Result<Node, TabError> {
        let tab = self
            .get(tab_id)
            .ok_or_else(|| TabError::UnknownTab(tab_id.to_owned()))?;
        render_tab(&self.registry, tab)
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Materialize a tab's layout tree.
///
/// A layout that has since been unregistered renders as a "not found"
/// placeholder rather than an error.
///
/// # Errors
///
/// `Produce` if the layout's own code fails.
pub fn render_tab(registry: &LayoutRegistry, tab: &TabInstance) -> Result<Node, TabError> {
    let Some(record) = registry.get(&tab.layout_id) else {
        warn!(layout_id = %tab.layout_id, tab_id = %tab.id, "tab references unknown layout");
        return Ok(not_found(&tab.layout_id));
    };

    let tree = record
        .resolve_with(&tab.layout_params)
        .map_err(|source| TabError::Produce { layout_id: tab.layout_id.clone(), source })?;

    if record.allow_multiple {
        Ok(inject(tree, &tab.id))
    } else {
        Ok(tree)
    }
}

/// Placeholder content for a tab whose layout is not registered.
#[must_use]
pub fn not_found(layout_id: &str) -> Node {
    let kind = ComponentKind::new(HOST_NAMESPACE, "LayoutNotFound").shared();
    Component::new(&kind)
        .with_prop("layoutId", layout_id)
        .with_children(format!("Layout '{layout_id}' not found"))
        .into()
}

#[cfg(test)]
#[path = "tabs_test.rs"]
mod tests;
