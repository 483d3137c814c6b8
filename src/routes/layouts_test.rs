use super::*;
use crate::config::HostConfig;
use crate::registry::{LayoutOptions, LayoutRegistry};
use crate::tabs::TabHost;
use crate::tree::Node;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn lists_registered_layouts() {
    let registry = LayoutRegistry::new();
    registry
        .register("home", Node::from("Welcome"), LayoutOptions::new().name("Home"))
        .unwrap();
    let state = AppState::new(TabHost::new(Arc::new(registry), HostConfig::default()));

    let Json(catalog) = list_layouts(State(state)).await;
    let value = serde_json::to_value(&catalog).unwrap();
    assert_eq!(value["home"]["name"], json!("Home"));
    assert_eq!(value["home"]["parameters"], json!([]));
}
