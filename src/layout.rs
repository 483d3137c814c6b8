//! Layout sources: materialized trees and on-demand producers.
//!
//! The static/lazy decision is made once, when the value is built, and
//! carried as a variant. Nothing downstream re-checks it.

use std::fmt;
use std::sync::Arc;

use crate::params::{Args, Introspect, Param};
use crate::tree::Node;

/// Failure raised by user layout code. Propagated to the caller unmodified.
pub type ProduceError = Box<dyn std::error::Error + Send + Sync>;

type ProduceFn = dyn Fn(&Args) -> Result<Node, ProduceError> + Send + Sync;

// =============================================================================
// PRODUCER
// =============================================================================

/// A layout producer: a closure plus its declared parameters.
#[derive(Clone)]
pub struct LayoutFn {
    signature: Option<Vec<Param>>,
    func: Arc<ProduceFn>,
}

impl LayoutFn {
    /// A producer taking no parameters (until [`LayoutFn::param`] adds some).
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Args) -> Result<Node, ProduceError> + Send + Sync + 'static,
    {
        Self { signature: Some(Vec::new()), func: Arc::new(func) }
    }

    /// A producer whose parameters cannot be determined.
    pub fn opaque<F>(func: F) -> Self
    where
        F: Fn(&Args) -> Result<Node, ProduceError> + Send + Sync + 'static,
    {
        Self { signature: None, func: Arc::new(func) }
    }

    /// Declare the next formal parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.signature.get_or_insert_with(Vec::new).push(param);
        self
    }

    /// Run the producer.
    ///
    /// # Errors
    ///
    /// Whatever the user code returns.
    pub fn call(&self, args: &Args) -> Result<Node, ProduceError> {
        (self.func)(args)
    }
}

impl Introspect for LayoutFn {
    fn signature(&self) -> Option<&[Param]> {
        self.signature.as_deref()
    }
}

impl fmt::Debug for LayoutFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutFn")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// What a registry record holds.
#[derive(Debug, Clone)]
pub enum Layout {
    /// A materialized tree, returned as-is on every resolve.
    Static(Node),
    /// A producer invoked on every resolve.
    Lazy(Arc<LayoutFn>),
}

impl Layout {
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    #[must_use]
    pub fn as_producer(&self) -> Option<&LayoutFn> {
        match self {
            Self::Static(_) => None,
            Self::Lazy(producer) => Some(producer),
        }
    }
}

/// A static layout has no parameters.
impl Introspect for Layout {
    fn signature(&self) -> Option<&[Param]> {
        match self {
            Self::Static(_) => Some(&[]),
            Self::Lazy(producer) => producer.signature(),
        }
    }
}

impl From<Node> for Layout {
    fn from(value: Node) -> Self {
        Self::Static(value)
    }
}

impl From<crate::tree::Component> for Layout {
    fn from(value: crate::tree::Component) -> Self {
        Self::Static(value.into())
    }
}

impl From<LayoutFn> for Layout {
    fn from(value: LayoutFn) -> Self {
        Self::Lazy(Arc::new(value))
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
