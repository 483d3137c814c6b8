use super::*;
use crate::config::HostConfig;
use crate::layout::LayoutFn;
use crate::params::Param;
use crate::registry::{LayoutOptions, LayoutRegistry};
use crate::tabs::TabHost;
use crate::tree::{Component, ComponentKind};
use serde_json::json;

fn state(config: HostConfig) -> AppState {
    let registry = LayoutRegistry::new();
    registry.register("home", Node::from("Welcome"), LayoutOptions::new()).unwrap();

    let graph = ComponentKind::new("dcc", "Graph").shared();
    let explorer = LayoutFn::new(move |args: &Args| {
        Ok(Component::new(&graph)
            .with_id("graph")
            .with_prop("country", args.require("country")?)
            .into())
    })
    .param(Param::required("country"));
    registry
        .register(
            "explorer",
            explorer,
            LayoutOptions::new()
                .allow_multiple(true)
                .preset("peru", "Peru", [("country", "Peru")]),
        )
        .unwrap();
    registry
        .register("broken", LayoutFn::new(|_| Err("offline".into())).param(Param::optional("x", 1)), LayoutOptions::new())
        .unwrap();

    AppState::new(TabHost::new(Arc::new(registry), config))
}

fn open_body(layout_id: &str, params: Args, preset: Option<&str>) -> Json<OpenTabBody> {
    Json(OpenTabBody { layout_id: layout_id.into(), params, preset: preset.map(str::to_owned) })
}

#[test]
fn tab_error_status_mapping() {
    assert_eq!(tab_error_status(&TabError::UnknownLayout("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(tab_error_status(&TabError::UnknownTab("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(tab_error_status(&TabError::TabLimit { max: 1 }), StatusCode::CONFLICT);
    assert_eq!(
        tab_error_status(&TabError::MissingParameters { layout_id: "x".into(), names: vec![] }),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        tab_error_status(&TabError::Produce { layout_id: "x".into(), source: "boom".into() }),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn open_body_accepts_camel_case_and_optional_fields() {
    let body: OpenTabBody = serde_json::from_value(json!({"layoutId": "home"})).unwrap();
    assert_eq!(body.layout_id, "home");
    assert!(body.params.is_empty());
    assert!(body.preset.is_none());
}

#[tokio::test]
async fn open_render_and_close() {
    let state = state(HostConfig::default());
    let Json(tab) = open_tab(State(state.clone()), open_body("explorer", Args::new().with("country", "Chile"), None))
        .await
        .unwrap();

    let Json(tree) = tab_content(State(state.clone()), Path(tab.id.clone())).await.unwrap();
    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value["props"]["id"], json!({"type": "graph", "index": tab.id.clone()}));

    let Json(listing) = list_tabs(State(state.clone())).await;
    assert_eq!(listing.tabs.len(), 1);
    assert_eq!(listing.active_tab.as_deref(), Some(tab.id.as_str()));
    assert_eq!(listing.displayed_layouts, ["home", "explorer", "broken"]);

    let status = close_tab(State(state.clone()), Path(tab.id.clone())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, Json(body)) = tab_content(State(state), Path(tab.id)).await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.code, "E_UNKNOWN_TAB");
}

#[tokio::test]
async fn open_with_preset() {
    let state = state(HostConfig::default());
    let Json(tab) = open_tab(State(state), open_body("explorer", Args::new(), Some("peru")))
        .await
        .unwrap();
    assert_eq!(tab.layout_params.get("country"), Some("Peru"));
}

#[tokio::test]
async fn open_reports_missing_parameters() {
    let state = state(HostConfig::default());
    let (status, Json(body)) = open_tab(State(state), open_body("explorer", Args::new(), None))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.code, "E_MISSING_PARAMETERS");
    assert!(body.message.contains("country"));
}

#[tokio::test]
async fn open_respects_tab_limit() {
    let state = state(HostConfig::default().with_max_tabs(Some(1)));
    open_tab(State(state.clone()), open_body("home", Args::new(), None)).await.unwrap();
    let (status, _) = open_tab(State(state), open_body("explorer", Args::new().with("country", "Peru"), None))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn render_failure_is_internal_error() {
    let state = state(HostConfig::default());
    let Json(tab) = open_tab(State(state.clone()), open_body("broken", Args::new(), None)).await.unwrap();
    let (status, Json(body)) = tab_content(State(state), Path(tab.id)).await.unwrap_err();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.code, "E_LAYOUT_RENDER");
}

#[tokio::test]
async fn activate_and_rename() {
    let state = state(HostConfig::default());
    let Json(first) = open_tab(State(state.clone()), open_body("home", Args::new(), None)).await.unwrap();
    open_tab(State(state.clone()), open_body("explorer", Args::new().with("country", "Peru"), None))
        .await
        .unwrap();

    let status = activate_tab(State(state.clone()), Path(first.id.clone())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    let status = rename_tab(State(state.clone()), Path(first.id.clone()), Json(RenameTabBody { name: "Start".into() }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(listing) = list_tabs(State(state.clone())).await;
    assert_eq!(listing.active_tab.as_deref(), Some(first.id.as_str()));
    assert_eq!(listing.tabs[0].name, "Start");

    let (status, _) = activate_tab(State(state), Path("missing".into())).await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}
