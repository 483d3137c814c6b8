//! Tab lifecycle routes.
//!
//! Layout code never runs under the tab-host lock: `tab_content` copies the
//! tab out, releases the guard, and renders on the blocking pool.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::params::Args;
use crate::routes::{ApiError, ErrorBody, api_error};
use crate::state::AppState;
use crate::tabs::{self, TabError, TabInstance};
use crate::tree::Node;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsResponse {
    pub tabs: Vec<TabInstance>,
    pub active_tab: Option<String>,
    pub displayed_layouts: Vec<String>,
}

/// Body of `POST /api/tabs`. A `preset` takes precedence over `params`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTabBody {
    pub layout_id: String,
    #[serde(default)]
    pub params: Args,
    pub preset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameTabBody {
    pub name: String,
}

pub(crate) fn tab_error_status(err: &TabError) -> StatusCode {
    match err {
        TabError::UnknownLayout(_) | TabError::UnknownPreset { .. } | TabError::UnknownTab(_) => {
            StatusCode::NOT_FOUND
        }
        TabError::TabLimit { .. } => StatusCode::CONFLICT,
        TabError::MissingParameters { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TabError::Produce { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn tab_error(err: TabError) -> ApiError {
    if let TabError::Produce { layout_id, source } = &err {
        error!(%layout_id, error = %source, "layout failed to render");
    }
    api_error(tab_error_status(&err), &err)
}

/// `GET /api/tabs`: open tabs, the active tab id, and the new-tab picker list.
pub async fn list_tabs(State(state): State<AppState>) -> Json<TabsResponse> {
    let host = state.tabs.read().await;
    Json(TabsResponse {
        tabs: host.tabs().to_vec(),
        active_tab: host.active().map(|tab| tab.id.clone()),
        displayed_layouts: host.displayed_layouts(),
    })
}

/// `POST /api/tabs`: open a tab (or re-activate a single-instance one).
pub async fn open_tab(
    State(state): State<AppState>,
    Json(body): Json<OpenTabBody>,
) -> Result<Json<TabInstance>, ApiError> {
    let mut host = state.tabs.write().await;
    let opened = match body.preset.as_deref() {
        Some(preset) => host.open_preset(&body.layout_id, preset),
        None => host.open(&body.layout_id, body.params),
    };
    opened.map(Json).map_err(tab_error)
}

/// `DELETE /api/tabs/:id`
pub async fn close_tab(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut host = state.tabs.write().await;
    host.close(&id).map(|_| StatusCode::NO_CONTENT).map_err(tab_error)
}

/// `PATCH /api/tabs/:id`: rename a tab.
pub async fn rename_tab(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RenameTabBody>,
) -> Result<StatusCode, ApiError> {
    let mut host = state.tabs.write().await;
    host.rename(&id, body.name).map(|()| StatusCode::NO_CONTENT).map_err(tab_error)
}

/// `POST /api/tabs/:id/activate`
pub async fn activate_tab(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let mut host = state.tabs.write().await;
    host.activate(&id).map(|()| StatusCode::NO_CONTENT).map_err(tab_error)
}

/// `GET /api/tabs/:id/content`: the tab's rendered layout tree.
pub async fn tab_content(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Node>, ApiError> {
    let tab = state.tabs.read().await.get(&id).cloned();
    let Some(tab) = tab else {
        return Err(tab_error(TabError::UnknownTab(id)));
    };

    let registry = Arc::clone(&state.registry);
    let rendered = tokio::task::spawn_blocking(move || tabs::render_tab(&registry, &tab))
        .await
        .map_err(|err| {
            error!(tab_id = %id, error = %err, "render task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { code: "E_RENDER_TASK", message: err.to_string() }),
            )
        })?;

    rendered.map(Json).map_err(tab_error)
}

#[cfg(test)]
#[path = "tabs_test.rs"]
mod tests;
