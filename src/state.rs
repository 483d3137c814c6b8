//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! registry is internally synchronized and shared as-is. The tab host is
//! mutated by request handlers, so it sits behind an async `RwLock`.
//! Handlers copy what they need out of the host and drop the guard before
//! running any layout code.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::registry::LayoutRegistry;
use crate::tabs::TabHost;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LayoutRegistry>,
    pub tabs: Arc<RwLock<TabHost>>,
}

impl AppState {
    #[must_use]
    pub fn new(host: TabHost) -> Self {
        Self { registry: Arc::clone(host.registry()), tabs: Arc::new(RwLock::new(host)) }
    }
}
