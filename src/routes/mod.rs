//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A thin JSON API over the layout registry and tab host. The browser shell
//! lists the catalog, opens and closes tabs, and fetches each tab's rendered
//! tree to mount it.

pub mod layouts;
pub mod tabs;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::state::AppState;

/// JSON error body: `{"code": "E_...", "message": "..."}`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error<E: ErrorCode>(status: StatusCode, err: &E) -> ApiError {
    (status, Json(ErrorBody { code: err.error_code(), message: err.to_string() }))
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/layouts", get(layouts::list_layouts))
        .route("/api/tabs", get(tabs::list_tabs).post(tabs::open_tab))
        .route("/api/tabs/{id}", delete(tabs::close_tab).patch(tabs::rename_tab))
        .route("/api/tabs/{id}/activate", post(tabs::activate_tab))
        .route("/api/tabs/{id}/content", get(tabs::tab_content))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
