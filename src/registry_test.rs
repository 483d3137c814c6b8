use super::*;
use crate::layout::LayoutFn;
use crate::params::Param;
use crate::tree::ComponentKind;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

fn div() -> Arc<ComponentKind> {
    ComponentKind::new("html", "Div").shared()
}

fn home() -> Node {
    let kind = div();
    Component::new(&kind).with_id("home").with_children("Welcome").into()
}

#[test]
fn register_and_resolve_static() {
    let registry = LayoutRegistry::new();
    registry.register("home", home(), LayoutOptions::new()).unwrap();

    let first = registry.resolve("home").unwrap();
    let second = registry.resolve("home").unwrap();
    assert_eq!(first, Some(home()));
    assert_eq!(first, second);
}

#[test]
fn resolve_unknown_is_none() {
    let registry = LayoutRegistry::new();
    assert!(registry.resolve("missing").unwrap().is_none());
    assert!(registry.get("does-not-exist").is_none());
    assert!(!registry.contains("does-not-exist"));
}

#[test]
fn duplicate_id_is_rejected_and_original_kept() {
    let registry = LayoutRegistry::new();
    registry.register("home", home(), LayoutOptions::new().name("Home")).unwrap();

    let err = registry.register("home", Node::from("other"), LayoutOptions::new()).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateLayout("home".into()));
    assert_eq!(err.error_code(), "E_DUPLICATE_LAYOUT");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("home").unwrap().name, "Home");
    assert_eq!(registry.resolve("home").unwrap(), Some(home()));
}

#[test]
fn empty_id_is_rejected() {
    let registry = LayoutRegistry::new();
    assert_eq!(
        registry.register("  ", home(), LayoutOptions::new()),
        Err(RegistryError::InvalidLayoutId)
    );
    assert!(registry.is_empty());
}

#[test]
fn name_defaults_to_id() {
    let registry = LayoutRegistry::new();
    registry.register("home", home(), LayoutOptions::new()).unwrap();
    let record = registry.get("home").unwrap();
    assert_eq!(record.name, "home");
    assert_eq!(record.description, "");
    assert!(record.is_static());
    assert!(record.parameters.is_empty());
    assert!(record.presets.is_none());
}

#[test]
fn lazy_layout_runs_only_on_resolve() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let producer = LayoutFn::new(move |args: &Args| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Node::from(format!("Hello {}", args.require("name")?)))
    })
    .param(Param::required("name"));

    let registry = LayoutRegistry::new();
    registry.register("greeting", producer, LayoutOptions::new()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let out = registry.resolve_with("greeting", &Args::new().with("name", "Ada")).unwrap();
    assert_eq!(out, Some(Node::from("Hello Ada")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_resolve_fills_defaults() {
    let producer = LayoutFn::new(|args: &Args| Ok(Node::from(args.require("year")?.to_owned())))
        .param(Param::optional("year", 2007));
    let registry = LayoutRegistry::new();
    registry.register("year", producer, LayoutOptions::new()).unwrap();

    assert_eq!(registry.resolve("year").unwrap(), Some(Node::from("2007")));
    assert_eq!(
        registry.resolve_with("year", &Args::new().with("year", "1952")).unwrap(),
        Some(Node::from("1952"))
    );
}

#[test]
fn producer_error_propagates() {
    let producer = LayoutFn::new(|_| Err("data source offline".into()));
    let registry = LayoutRegistry::new();
    registry.register("broken", producer, LayoutOptions::new()).unwrap();

    let err = registry.resolve("broken").unwrap_err();
    assert_eq!(err.to_string(), "data source offline");
}

#[test]
fn lazy_parameters_are_introspected_at_registration() {
    let producer = LayoutFn::new(|_| Ok(Node::null()))
        .param(Param::required("country"))
        .param(Param::optional("year", "2007"))
        .param(Param::var_keyword("rest"));
    let registry = LayoutRegistry::new();
    registry.register("explorer", producer, LayoutOptions::new()).unwrap();

    let record = registry.get("explorer").unwrap();
    let names: Vec<_> = record.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["country", "year"]);
}

#[test]
fn unregister_then_register_again() {
    let registry = LayoutRegistry::new();
    registry.register("home", home(), LayoutOptions::new()).unwrap();

    assert!(registry.unregister("home"));
    assert!(!registry.unregister("home"));
    assert!(!registry.contains("home"));

    registry.register("home", Node::from("v2"), LayoutOptions::new()).unwrap();
    assert_eq!(registry.resolve("home").unwrap(), Some(Node::from("v2")));
}

#[test]
fn list_all_keeps_registration_order() {
    let registry = LayoutRegistry::new();
    for id in ["zeta", "alpha", "mid"] {
        registry.register(id, Node::from(id), LayoutOptions::new()).unwrap();
    }
    registry.unregister("alpha");
    registry.register("alpha", Node::from("again"), LayoutOptions::new()).unwrap();

    let ids: Vec<_> = registry.list_all().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, ["zeta", "mid", "alpha"]);
}

#[test]
fn by_id_is_a_detached_snapshot() {
    let registry = LayoutRegistry::new();
    registry.register("home", home(), LayoutOptions::new()).unwrap();

    let mut snapshot = registry.by_id();
    assert_eq!(snapshot["home"].id, "home");
    snapshot.remove("home");
    assert!(registry.get("home").is_some());

    registry.register("later", home(), LayoutOptions::new()).unwrap();
    assert!(!snapshot.contains_key("later"));
}

#[test]
fn clear_empties_registry() {
    let registry = LayoutRegistry::new();
    registry.register("a", Node::from("a"), LayoutOptions::new()).unwrap();
    registry.register("b", Node::from("b"), LayoutOptions::new()).unwrap();
    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.list_all().is_empty());
}

#[test]
fn presets_are_stringified_in_order() {
    let options = LayoutOptions::new()
        .preset("asia", "Asia, life expectancy", [("continent", json!("Asia")), ("top", json!(10))])
        .preset("europe", "Europe", [("continent", json!("Europe")), ("log", json!(true))]);
    let registry = LayoutRegistry::new();
    registry.register("compare", Node::null(), options).unwrap();

    let presets = registry.get("compare").unwrap().presets.clone().unwrap();
    assert_eq!(presets.len(), 2);
    let asia = presets.get("asia").unwrap();
    assert_eq!(asia.params.get("continent"), Some("Asia"));
    assert_eq!(asia.params.get("top"), Some("10"));
    assert_eq!(presets.get("europe").unwrap().params.get("log"), Some("true"));

    let keys: Vec<_> = presets.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["asia", "europe"]);
}

#[test]
fn malformed_static_trees_are_rejected() {
    let div = div();
    let unnamed = ComponentKind::new("html", "").shared();

    let empty_id: Node = Component::new(&div).with_id("").into();
    let duplicate: Node = Component::new(&div)
        .with_id("x")
        .with_children(Component::new(&div).with_id("x"))
        .into();
    let nameless: Node = Component::new(&unnamed).into();

    let registry = LayoutRegistry::new();
    for (id, tree) in [("a", empty_id), ("b", duplicate), ("c", nameless)] {
        let err = registry.register(id, tree, LayoutOptions::new()).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedLayout { .. }), "{id}: {err}");
        assert_eq!(err.error_code(), "E_MALFORMED_LAYOUT");
    }
    assert!(registry.is_empty());
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = Arc::new(LayoutRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .register(&format!("layout-{i}"), Node::from(i64::from(i)), LayoutOptions::new())
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.len(), 8);
}
