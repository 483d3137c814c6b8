use super::*;
use serde_json::json;

struct Sig(Option<Vec<Param>>);

impl Introspect for Sig {
    fn signature(&self) -> Option<&[Param]> {
        self.0.as_deref()
    }
}

#[test]
fn extract_skips_catch_all_collectors() {
    // f(a, b=2, *args, **kwargs)
    let sig = Sig(Some(vec![
        Param::required("a"),
        Param::optional("b", 2),
        Param::var_positional("args"),
        Param::var_keyword("kwargs"),
    ]));

    let params = extract(&sig);
    assert_eq!(
        params,
        vec![
            ParameterInfo { name: "a".into(), has_default: false, default: None, annotation: None },
            ParameterInfo { name: "b".into(), has_default: true, default: Some(json!(2)), annotation: None },
        ]
    );
    assert!(params[0].is_required());
    assert!(!params[1].is_required());
}

#[test]
fn extract_keeps_keyword_only_and_annotations() {
    let sig = Sig(Some(vec![Param::optional("metric", "lifeExp").keyword().annotated("str")]));
    let params = extract(&sig);
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].annotation.as_deref(), Some("str"));
    assert_eq!(params[0].default, Some(json!("lifeExp")));
}

#[test]
fn unintrospectable_yields_empty_list() {
    assert!(extract(&Sig(None)).is_empty());
}

#[test]
fn explicit_null_default_counts_as_default() {
    let sig = Sig(Some(vec![Param::optional("x", Value::Null)]));
    let params = extract(&sig);
    assert!(params[0].has_default);
    assert_eq!(params[0].default, Some(Value::Null));
}

#[test]
fn stringify_forms() {
    assert_eq!(stringify(&json!("Asia")), "Asia");
    assert_eq!(stringify(&json!(10)), "10");
    assert_eq!(stringify(&json!(true)), "true");
    assert_eq!(stringify(&json!(null)), "null");
    assert_eq!(stringify(&json!(1.5)), "1.5");
}

#[test]
fn with_defaults_fills_only_absent_names() {
    let params = extract(&Sig(Some(vec![
        Param::required("country"),
        Param::optional("year", 2007),
        Param::optional("color", "blue"),
        Param::optional("note", Value::Null),
    ])));
    let args = Args::new().with("country", "Chile").with("color", "red");

    let filled = args.with_defaults(&params);
    assert_eq!(filled.get("country"), Some("Chile"));
    assert_eq!(filled.get("year"), Some("2007"));
    assert_eq!(filled.get("color"), Some("red"));
    assert!(!filled.contains("note"));
    // Source untouched.
    assert!(!args.contains("year"));
}

#[test]
fn missing_reports_required_names_only() {
    let params = extract(&Sig(Some(vec![
        Param::required("a"),
        Param::required("b"),
        Param::optional("c", 1),
    ])));
    let args = Args::new().with("b", "x");
    assert_eq!(args.missing(&params), vec!["a"]);
}

#[test]
fn require_returns_error_for_absent_name() {
    let args: Args = [("name", "Ada")].into_iter().collect();
    assert_eq!(args.require("name"), Ok("Ada"));
    assert_eq!(args.require("age"), Err(MissingArgument("age".into())));
}

#[test]
fn args_serialize_as_plain_object() {
    let args = Args::new().with("b", "2").with("a", "1");
    assert_eq!(serde_json::to_value(&args).unwrap(), json!({"a": "1", "b": "2"}));

    let parsed: Args = serde_json::from_value(json!({"year": "1952"})).unwrap();
    assert_eq!(parsed.get("year"), Some("1952"));
    assert_eq!(parsed.len(), 1);
}
