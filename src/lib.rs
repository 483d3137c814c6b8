//! Layout registry and tab host for multi-page dashboard applications.
//!
//! Authors register layouts under string ids, either as materialized
//! component trees or as producer functions that build a tree on demand from
//! named string arguments. A tab host resolves layouts into tabs and, when a
//! layout may be open in several tabs at once, rewrites every component
//! identifier into a per-tab pattern so callbacks can tell instances apart.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`tree`] | Closed layout tree model and its Dash-shaped JSON form |
//! | [`path`] | Slot path specifications (`items[].content`) |
//! | [`walk`] | Recursive tree walker applying a component transform |
//! | [`inject`] | Per-instance identifier scoping |
//! | [`params`] | Parameter declarations, introspection, string arguments |
//! | [`layout`] | Static trees and lazy producers |
//! | [`registry`] | The layout catalog: register, resolve, list |
//! | [`lazy`] | Decorator-style producer registration |
//! | [`metadata`] | Transport-safe catalog for the host UI |
//! | [`tabs`] | Tab host: open, close, render tab instances |
//! | [`config`] | Host configuration from the environment |
//! | [`error`] | Shared error-code trait |
//! | [`state`] | Axum application state |
//! | [`routes`] | JSON HTTP API |

pub mod config;
pub mod error;
pub mod inject;
pub mod layout;
pub mod lazy;
pub mod metadata;
pub mod params;
pub mod path;
pub mod registry;
pub mod routes;
pub mod state;
pub mod tabs;
pub mod tree;
pub mod walk;
