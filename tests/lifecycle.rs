//! End-to-end flow through the public API: register, list, open tabs, render,
//! close, unregister.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kaleido::config::HostConfig;
use kaleido::layout::LayoutFn;
use kaleido::lazy::register_lazy;
use kaleido::params::{Args, Param};
use kaleido::path::PropPath;
use kaleido::registry::{LayoutOptions, LayoutRegistry};
use kaleido::tabs::{TabError, TabHost};
use kaleido::tree::{Component, ComponentKind, Node};
use serde_json::json;

struct Fixture {
    host: TabHost,
    report_calls: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
    let registry = Arc::new(LayoutRegistry::new());
    let div = ComponentKind::new("html", "Div").shared();
    let graph = ComponentKind::new("dcc", "Graph").shared();
    let tabs = ComponentKind::new("bootstrap", "Tabs")
        .with_slot(PropPath::parse("panes[]").expect("valid path"))
        .shared();

    registry
        .register(
            "home",
            Component::new(&div).with_id("welcome").with_children("Welcome"),
            LayoutOptions::new().name("Home"),
        )
        .expect("register home");

    let report_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&report_calls);
    register_lazy("report")
        .name("Report")
        .allow_multiple(true)
        .preset("q1", "First quarter", [("quarter", json!(1))])
        .apply(
            &registry,
            LayoutFn::new(move |args: &Args| {
                calls.fetch_add(1, Ordering::SeqCst);
                let quarter = args.require("quarter")?;
                Ok(Component::new(&tabs)
                    .with_id("report-tabs")
                    .with_prop(
                        "panes",
                        Node::list([
                            Component::new(&graph).with_id("revenue").with_prop("quarter", quarter),
                            Component::new(&graph).with_id("costs").with_prop("quarter", quarter),
                        ]),
                    )
                    .into())
            })
            .param(Param::required("quarter")),
        )
        .expect("register report");

    Fixture { host: TabHost::new(registry, HostConfig::default()), report_calls }
}

#[test]
fn catalog_lists_layouts_in_registration_order() {
    let Fixture { host, .. } = fixture();
    let catalog = host.registry().list_metadata();
    let ids: Vec<_> = catalog.iter().map(|meta| meta.id.as_str()).collect();
    assert_eq!(ids, ["home", "report"]);

    let value = serde_json::to_value(&catalog).expect("serialize catalog");
    assert_eq!(value["report"]["allowMultiple"], json!(true));
    assert_eq!(value["report"]["parameters"][0]["name"], json!("quarter"));
    assert_eq!(value["report"]["parameterPresets"]["q1"]["params"], json!({"quarter": "1"}));
}

#[test]
fn two_instances_render_with_distinct_ids() {
    let Fixture { mut host, report_calls } = fixture();
    assert_eq!(report_calls.load(Ordering::SeqCst), 0);

    let first = host.open_preset("report", "q1").expect("open q1");
    let second = host.open("report", Args::new().with("quarter", "2")).expect("open q2");
    assert_ne!(first.id, second.id);
    assert_eq!(report_calls.load(Ordering::SeqCst), 0);

    let a = serde_json::to_value(host.render(&first.id).expect("render first")).expect("json");
    let b = serde_json::to_value(host.render(&second.id).expect("render second")).expect("json");
    assert_eq!(report_calls.load(Ordering::SeqCst), 2);

    assert_eq!(a["props"]["panes"][0]["props"]["id"], json!({"type": "revenue", "index": first.id}));
    assert_eq!(b["props"]["panes"][0]["props"]["id"], json!({"type": "revenue", "index": second.id}));
    assert_eq!(a["props"]["panes"][1]["props"]["quarter"], json!("1"));
    assert_eq!(b["props"]["panes"][1]["props"]["quarter"], json!("2"));
}

#[test]
fn closing_and_unregistering() {
    let Fixture { mut host, .. } = fixture();
    let home = host.open("home", Args::new()).expect("open home");
    let report = host.open("report", Args::new().with("quarter", "3")).expect("open report");

    host.close(&report.id).expect("close report");
    assert_eq!(host.active().map(|tab| tab.id.clone()), Some(home.id.clone()));

    assert!(host.registry().unregister("home"));
    let placeholder = serde_json::to_value(host.render(&home.id).expect("render")).expect("json");
    assert_eq!(placeholder["type"], json!("LayoutNotFound"));

    let err = host.open("home", Args::new()).expect_err("home is gone");
    assert!(matches!(err, TabError::UnknownLayout(_)));
}
