//! Demo layouts served by the `kaleido` binary.
//!
//! A handful of static pages plus parameterized explorers over a tiny
//! life-expectancy table, enough to exercise every registration path:
//! static trees, deferred producers, an eagerly evaluated producer, presets,
//! and multi-instance layouts with nested slots.

use std::sync::Arc;

use serde_json::json;

use kaleido::layout::{LayoutFn, ProduceError};
use kaleido::lazy::{LazyError, register_lazy};
use kaleido::params::{Args, Param};
use kaleido::path::{PathError, PropPath};
use kaleido::registry::{LayoutOptions, LayoutRegistry, RegistryError};
use kaleido::tree::{Component, ComponentKind, Node};

#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Lazy(#[from] LazyError),
}

// =============================================================================
// DATA
// =============================================================================

struct Row {
    country: &'static str,
    continent: &'static str,
    year: u16,
    life_exp: f64,
    gdp_percap: f64,
}

const ROWS: &[Row] = &[
    Row { country: "Chile", continent: "Americas", year: 1952, life_exp: 54.7, gdp_percap: 3940.0 },
    Row { country: "Chile", continent: "Americas", year: 2007, life_exp: 78.6, gdp_percap: 13172.0 },
    Row { country: "Peru", continent: "Americas", year: 1952, life_exp: 43.9, gdp_percap: 3759.0 },
    Row { country: "Peru", continent: "Americas", year: 2007, life_exp: 71.4, gdp_percap: 7409.0 },
    Row { country: "Japan", continent: "Asia", year: 1952, life_exp: 63.0, gdp_percap: 3217.0 },
    Row { country: "Japan", continent: "Asia", year: 2007, life_exp: 82.6, gdp_percap: 31656.0 },
    Row { country: "India", continent: "Asia", year: 1952, life_exp: 37.4, gdp_percap: 547.0 },
    Row { country: "India", continent: "Asia", year: 2007, life_exp: 64.7, gdp_percap: 2452.0 },
    Row { country: "Norway", continent: "Europe", year: 1952, life_exp: 72.7, gdp_percap: 10095.0 },
    Row { country: "Norway", continent: "Europe", year: 2007, life_exp: 80.2, gdp_percap: 49357.0 },
    Row { country: "Portugal", continent: "Europe", year: 1952, life_exp: 59.8, gdp_percap: 3068.0 },
    Row { country: "Portugal", continent: "Europe", year: 2007, life_exp: 78.1, gdp_percap: 20510.0 },
];

fn metric(row: &Row, name: &str) -> Result<f64, ProduceError> {
    match name {
        "lifeExp" => Ok(row.life_exp),
        "gdpPercap" => Ok(row.gdp_percap),
        other => Err(format!("unknown metric '{other}'").into()),
    }
}

// =============================================================================
// KINDS
// =============================================================================

struct Kinds {
    div: Arc<ComponentKind>,
    h1: Arc<ComponentKind>,
    h3: Arc<ComponentKind>,
    p: Arc<ComponentKind>,
    graph: Arc<ComponentKind>,
    dropdown: Arc<ComponentKind>,
    card: Arc<ComponentKind>,
    accordion: Arc<ComponentKind>,
}

impl Kinds {
    fn new() -> Result<Self, PathError> {
        let html = |name: &str| ComponentKind::new("dash_html_components", name).shared();
        let dcc = |name: &str| ComponentKind::new("dash_core_components", name).shared();
        Ok(Self {
            div: html("Div"),
            h1: html("H1"),
            h3: html("H3"),
            p: html("P"),
            graph: dcc("Graph"),
            dropdown: dcc("Dropdown"),
            card: ComponentKind::new("dash_bootstrap_components", "Card")
                .with_slot(PropPath::parse("header")?)
                .with_slot(PropPath::parse("footer")?)
                .shared(),
            accordion: ComponentKind::new("dash_bootstrap_components", "Accordion")
                .with_slot(PropPath::parse("items[].content")?)
                .shared(),
        })
    }

    fn text(kind: &Arc<ComponentKind>, text: impl Into<String>) -> Component {
        let text: String = text.into();
        Component::new(kind).with_children(text)
    }
}

// =============================================================================
// LAYOUTS
// =============================================================================

/// Register every demo layout on `registry`.
///
/// # Errors
///
/// Fails if a layout id is already taken or a tree is malformed.
pub fn register_all(registry: &LayoutRegistry) -> Result<(), ShowcaseError> {
    let kinds = Arc::new(Kinds::new()?);

    registry.register(
        "home",
        home(&kinds),
        LayoutOptions::new()
            .name("Home")
            .description("Start page")
            .keywords(["start", "welcome"]),
    )?;
    registry.register(
        "settings",
        settings(&kinds),
        LayoutOptions::new().name("Settings").keywords(["preferences"]),
    )?;

    let k = Arc::clone(&kinds);
    register_lazy("greeting")
        .name("Greeting")
        .description("Say hello to someone")
        .apply(
            registry,
            LayoutFn::new(move |args: &Args| {
                let name = args.require("name")?;
                Ok(Kinds::text(&k.h3, format!("Hello, {name}!")).into())
            })
            .param(Param::required("name").annotated("str")),
        )?;

    let k = Arc::clone(&kinds);
    register_lazy("about")
        .name("About")
        .description("Dataset summary, computed once at start-up")
        .apply(
            registry,
            LayoutFn::new(move |_| {
                let countries = ROWS.iter().filter(|row| row.year == 2007).count();
                Ok(Component::new(&k.div)
                    .with_children(vec![
                        Kinds::text(&k.h3, "About this data"),
                        Kinds::text(&k.p, format!("{countries} countries, years 1952 and 2007.")),
                    ])
                    .into())
            }),
        )?;

    let k = Arc::clone(&kinds);
    register_lazy("country-explorer")
        .name("Country explorer")
        .description("Metrics for one country in one year")
        .keywords(["country", "gapminder"])
        .allow_multiple(true)
        .apply(
            registry,
            LayoutFn::new(move |args: &Args| country_explorer(&k, args))
                .param(Param::required("country").annotated("str"))
                .param(Param::optional("year", "2007").annotated("str")),
        )?;

    let k = Arc::clone(&kinds);
    register_lazy("continent-comparison")
        .name("Continent comparison")
        .description("Compare the countries of a continent")
        .keywords(["continent", "gapminder"])
        .allow_multiple(true)
        .preset("asia-life", "Asia, life expectancy", [("continent", json!("Asia"))])
        .preset(
            "europe-gdp",
            "Europe, GDP per capita",
            [("continent", json!("Europe")), ("metric", json!("gdpPercap"))],
        )
        .apply(
            registry,
            LayoutFn::new(move |args: &Args| continent_comparison(&k, args))
                .param(Param::required("continent").annotated("str"))
                .param(Param::optional("metric", "lifeExp").annotated("str")),
        )?;

    Ok(())
}

fn home(k: &Kinds) -> Node {
    Component::new(&k.div)
        .with_id("home")
        .with_children(vec![
            Kinds::text(&k.h1, "Kaleido"),
            Kinds::text(&k.p, "Open a layout from the picker to start a new tab."),
            Component::new(&k.card)
                .with_id("home-card")
                .with_prop("header", Kinds::text(&k.h3, "Getting started"))
                .with_children(Kinds::text(&k.p, "Parameterized layouts ask for their arguments first.")),
        ])
        .into()
}

fn settings(k: &Kinds) -> Node {
    Component::new(&k.div)
        .with_children(vec![
            Kinds::text(&k.h3, "Settings"),
            Component::new(&k.dropdown)
                .with_id("theme")
                .with_prop("options", Node::list(["light", "dark"]))
                .with_prop("value", "light"),
        ])
        .into()
}

fn country_explorer(k: &Kinds, args: &Args) -> Result<Node, ProduceError> {
    let country = args.require("country")?;
    let year: u16 = args.require("year")?.parse()?;

    let Some(row) = ROWS.iter().find(|row| row.country == country && row.year == year) else {
        return Ok(Kinds::text(&k.p, format!("No data for {country} in {year}.")).into());
    };

    let history: Vec<&Row> = ROWS.iter().filter(|r| r.country == country).collect();
    let figure = json!({
        "data": [{
            "type": "scatter",
            "x": history.iter().map(|r| r.year).collect::<Vec<_>>(),
            "y": history.iter().map(|r| r.life_exp).collect::<Vec<_>>(),
        }],
        "layout": {"title": format!("{country}: life expectancy")},
    });

    Ok(Component::new(&k.div)
        .with_children(vec![
            Kinds::text(&k.h3, format!("{country}, {year}")),
            Component::new(&k.card)
                .with_id("country-card")
                .with_prop("header", Kinds::text(&k.p, format!("Continent: {}", row.continent)))
                .with_prop(
                    "footer",
                    Kinds::text(&k.p, format!("GDP per capita: {:.0}", row.gdp_percap)).with_id("gdp"),
                )
                .with_children(Kinds::text(&k.p, format!("Life expectancy: {:.1}", row.life_exp))),
            Component::new(&k.graph)
                .with_id("country-graph")
                .with_prop("figure", figure),
            Component::new(&k.dropdown)
                .with_id("year-dropdown")
                .with_prop("options", Node::list(["1952", "2007"]))
                .with_prop("value", year.to_string()),
        ])
        .into())
}

fn continent_comparison(k: &Kinds, args: &Args) -> Result<Node, ProduceError> {
    let continent = args.require("continent")?;
    let metric_name = args.require("metric")?;

    let mut items = Vec::new();
    for row in ROWS.iter().filter(|r| r.continent == continent && r.year == 2007) {
        let value = metric(row, metric_name)?;
        let figure = json!({
            "data": [{"type": "bar", "x": [row.country], "y": [value]}],
            "layout": {"title": format!("{}: {metric_name}", row.country)},
        });
        items.push(Node::mapping([
            ("title", Node::from(row.country)),
            (
                "content",
                Component::new(&k.graph)
                    .with_id(format!("{}-graph", row.country.to_lowercase()))
                    .with_prop("figure", figure)
                    .into(),
            ),
        ]));
    }

    if items.is_empty() {
        return Ok(Kinds::text(&k.p, format!("No countries recorded for {continent}.")).into());
    }

    Ok(Component::new(&k.div)
        .with_children(vec![
            Kinds::text(&k.h3, format!("{continent} by {metric_name}")),
            Component::new(&k.accordion)
                .with_id("comparison")
                .with_prop("items", Node::list(items)),
        ])
        .into())
}

#[cfg(test)]
#[path = "showcase_test.rs"]
mod tests;
