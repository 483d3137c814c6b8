//! Layout catalog route.

use axum::extract::State;
use axum::response::Json;

use crate::metadata::LayoutCatalog;
use crate::state::AppState;

/// `GET /api/layouts`: metadata for every registered layout, keyed by id.
pub async fn list_layouts(State(state): State<AppState>) -> Json<LayoutCatalog> {
    Json(state.registry.list_metadata())
}

#[cfg(test)]
#[path = "layouts_test.rs"]
mod tests;
