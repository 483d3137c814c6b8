//! Decorator-style registration of producer functions.
//!
//! `register_lazy(id)` collects display metadata, then `apply` registers a
//! [`LayoutFn`] and hands back a [`LayoutHandle`] standing in for it:
//!
//! - Producer declares parameters: the producer itself is registered as a
//!   lazy layout and the handle forwards every call to it. Evaluation waits
//!   until a tab supplies arguments.
//! - Producer declares none: it runs exactly once, inside `apply`, and the
//!   result is registered as a static layout. The handle returns that cached
//!   tree forever. Such a layout never refreshes; picking up new data takes
//!   an `unregister` followed by a fresh registration (or a restart).

use serde_json::Value;
use tracing::debug;

use crate::error::ErrorCode;
use crate::layout::{LayoutFn, ProduceError};
use crate::params::{self, Args};
use crate::registry::{LayoutOptions, LayoutRegistry, RegistryError};
use crate::tree::Node;

#[derive(Debug, thiserror::Error)]
pub enum LazyError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("layout '{id}' failed during eager evaluation: {source}")]
    Produce {
        id: String,
        #[source]
        source: ProduceError,
    },
}

impl ErrorCode for LazyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(err) => err.error_code(),
            Self::Produce { .. } => "E_LAYOUT_EVALUATION",
        }
    }
}

/// Start a decorator-style registration for `id`.
#[must_use]
pub fn register_lazy(id: impl Into<String>) -> LazyRegistration {
    LazyRegistration { id: id.into(), options: LayoutOptions::new() }
}

/// Pending registration; see [`register_lazy`].
#[derive(Debug, Clone)]
pub struct LazyRegistration {
    id: String,
    options: LayoutOptions,
}

impl LazyRegistration {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.name(name);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.options = self.options.description(description);
        self
    }

    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.keywords(keywords);
        self
    }

    #[must_use]
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.options = self.options.allow_multiple(allow);
        self
    }

    #[must_use]
    pub fn preset<I, K, V>(mut self, key: impl Into<String>, description: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.options = self.options.preset(key, description, params);
        self
    }

    /// Register `producer` and return its stand-in.
    ///
    /// # Errors
    ///
    /// - `Registry` if the registry rejects the id or the tree.
    /// - `Produce` if a parameterless producer fails while being evaluated.
    pub fn apply(self, registry: &LayoutRegistry, producer: LayoutFn) -> Result<LayoutHandle, LazyError> {
        if !params::extract(&producer).is_empty() {
            registry.register(&self.id, producer.clone(), self.options)?;
            debug!(layout_id = %self.id, "registered deferred layout");
            return Ok(LayoutHandle::Deferred(producer));
        }

        let tree = producer
            .call(&Args::new())
            .map_err(|source| LazyError::Produce { id: self.id.clone(), source })?;
        registry.register(&self.id, tree.clone(), self.options)?;
        debug!(layout_id = %self.id, "registered eagerly evaluated layout");
        Ok(LayoutHandle::Cached(tree))
    }
}

/// What a decorated producer turns into.
#[derive(Debug, Clone)]
pub enum LayoutHandle {
    /// Calls through to the producer.
    Deferred(LayoutFn),
    /// Returns the tree computed at registration.
    Cached(Node),
}

impl LayoutHandle {
    /// Invoke the decorated layout.
    ///
    /// # Errors
    ///
    /// A deferred producer's own error, unmodified.
    pub fn call(&self, args: &Args) -> Result<Node, ProduceError> {
        match self {
            Self::Deferred(producer) => producer.call(args),
            Self::Cached(tree) => Ok(tree.clone()),
        }
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

#[cfg(test)]
#[path = "lazy_test.rs"]
mod tests;
