use http::Method;
use serde_json::json;
use std::collections::BTreeMap;
use viewful::error::{BuildError, HttpError, RuleError};
use viewful::map::UrlMap;
use viewful::rule::{Rule, RuleOptions, ViewArgs};

fn rule(path: &str, methods: &[&str], endpoint: &str) -> Rule {
    Rule::new(path, methods.iter().copied(), endpoint, RuleOptions::default()).unwrap()
}

fn zoo() -> UrlMap {
    let mut map = UrlMap::new();
    for (path, methods, endpoint) in [
        ("/", &["GET"][..], "root"),
        ("/zoo/animals", &["GET", "POST"][..], "animals"),
        ("/zoo/animals/<int:id>", &["GET", "PUT", "DELETE"][..], "animal"),
        ("/zoo/animals/latest", &["GET"][..], "latest"),
        ("/zoo/<category>/animals/<int:id>", &["GET"][..], "by_category"),
        ("/zoo/keepers/", &["GET"][..], "keepers"),
    ] {
        map.add(rule(path, methods, endpoint)).unwrap();
    }
    map
}

#[test]
fn test_match_and_arguments() {
    let map = zoo();
    let adapter = map.bind();

    let m = adapter.match_path("/", &Method::GET).unwrap();
    assert_eq!(m.rule.endpoint(), "root");

    let m = adapter.match_path("/zoo/animals/42", &Method::PUT).unwrap();
    assert_eq!(m.rule.endpoint(), "animal");
    assert_eq!(m.args.get_u64("id"), Some(42));

    let m = adapter
        .match_path("/zoo/reptiles/animals/3", &Method::GET)
        .unwrap();
    assert_eq!(m.rule.endpoint(), "by_category");
    assert_eq!(m.args.get_str("category"), Some("reptiles"));
}

#[test]
fn test_segments_are_percent_decoded() {
    let map = zoo();
    let adapter = map.bind();

    let m = adapter
        .match_path("/zoo/big%20cats/animals/1", &Method::GET)
        .unwrap();
    assert_eq!(m.args.get_str("category"), Some("big cats"));

    let m = adapter
        .match_path("/zoo/cats%2Fdogs/animals/1", &Method::GET)
        .unwrap();
    assert_eq!(m.args.get_str("category"), Some("cats/dogs"));

    let m = adapter.match_path("/zoo/animals/%34%32", &Method::GET).unwrap();
    assert_eq!(m.args.get_u64("id"), Some(42));

    assert!(matches!(
        adapter.match_path("/zoo/%FF/animals/1", &Method::GET),
        Err(HttpError::NotFound { .. })
    ));
}

#[test]
fn test_static_segment_wins() {
    let map = zoo();
    let m = map
        .bind()
        .match_path("/zoo/animals/latest", &Method::GET)
        .unwrap();
    assert_eq!(m.rule.endpoint(), "latest");
}

#[test]
fn test_not_found_and_not_allowed() {
    let map = zoo();
    let adapter = map.bind();

    assert_eq!(
        adapter.match_path("/does/not/exist", &Method::GET).unwrap_err(),
        HttpError::NotFound {
            path: "/does/not/exist".to_string()
        }
    );

    match adapter.match_path("/zoo/animals", &Method::DELETE) {
        Err(HttpError::MethodNotAllowed { allowed, .. }) => {
            assert_eq!(allowed, [Method::GET, Method::POST, Method::HEAD]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_strict_slash_redirect() {
    let map = zoo();
    let adapter = map.bind();
    assert_eq!(
        adapter.match_path("/zoo/keepers", &Method::GET).unwrap_err(),
        HttpError::Redirect {
            location: "/zoo/keepers/".to_string()
        }
    );
    assert!(matches!(
        adapter.match_path("/zoo/animals/", &Method::GET),
        Err(HttpError::NotFound { .. })
    ));
}

#[test]
fn test_lenient_slashes() {
    let mut map = UrlMap::with_strict_slashes(false);
    map.add(rule("/keepers/", &["GET"], "keepers")).unwrap();
    map.add(rule("/animals", &["GET"], "animals")).unwrap();
    let adapter = map.bind();

    assert_eq!(
        adapter.match_path("/keepers", &Method::GET).unwrap().rule.endpoint(),
        "keepers"
    );
    assert_eq!(
        adapter.match_path("/animals/", &Method::GET).unwrap().rule.endpoint(),
        "animals"
    );
}

#[test]
fn test_defaults_and_redirect_to() {
    let mut map = UrlMap::new();
    let mut defaults = BTreeMap::new();
    defaults.insert("page".to_string(), json!(1));
    map.add(
        Rule::new(
            "/pages",
            ["GET"],
            "pages",
            RuleOptions {
                defaults,
                ..RuleOptions::default()
            },
        )
        .unwrap(),
    )
    .unwrap();
    map.add(
        Rule::new(
            "/old/<int:id>",
            ["GET"],
            "old",
            RuleOptions {
                redirect_to: Some("/new/<id>".to_string()),
                ..RuleOptions::default()
            },
        )
        .unwrap(),
    )
    .unwrap();
    let adapter = map.bind();

    let m = adapter.match_path("/pages", &Method::GET).unwrap();
    assert_eq!(m.args.get_u64("page"), Some(1));
    assert_eq!(adapter.build("pages", &ViewArgs::new()).unwrap(), "/pages");

    assert_eq!(
        adapter.match_path("/old/9", &Method::GET).unwrap_err(),
        HttpError::Redirect {
            location: "/new/9".to_string()
        }
    );
}

#[test]
fn test_conflicts() {
    let mut map = zoo();
    let err = map
        .add(rule("/zoo/animals/<int:other>", &["DELETE"], "dup"))
        .unwrap_err();
    assert!(matches!(err, RuleError::Conflict { .. }));

    // a different converter is a different shape
    map.add(rule("/zoo/animals/<float:weight>", &["DELETE"], "by_weight"))
        .unwrap();
    // as is a trailing slash
    map.add(rule("/zoo/animals/", &["GET"], "animals_slash")).unwrap();
}

#[test]
fn test_build() {
    let map = zoo();
    let adapter = map.bind();

    assert_eq!(
        adapter.build("animal", &ViewArgs::new().with("id", 5)).unwrap(),
        "/zoo/animals/5"
    );
    assert_eq!(
        adapter
            .build("by_category", &ViewArgs::new().with("category", "big cats").with("id", 1))
            .unwrap(),
        "/zoo/big%20cats/animals/1"
    );
    assert_eq!(adapter.build("keepers", &ViewArgs::new()).unwrap(), "/zoo/keepers/");
    assert!(matches!(
        adapter.build("animal", &ViewArgs::new().with("id", "five")),
        Err(BuildError::InvalidArgument { .. })
    ));
    assert!(matches!(
        adapter.build("nope", &ViewArgs::new()),
        Err(BuildError::UnknownEndpoint { .. })
    ));
}

#[test]
fn test_iter_rules_in_insertion_order() {
    let map = zoo();
    let endpoints: Vec<&str> = map.iter_rules().map(|r| r.endpoint()).collect();
    assert_eq!(
        endpoints,
        ["root", "animals", "animal", "latest", "by_category", "keepers"]
    );
    assert_eq!(map.len(), 6);
}
