mod common;

use http::header::HeaderName;
use http::{HeaderValue, Method};
use serde_json::json;
use std::sync::Arc;
use viewful::app::{App, Blueprint, Body, Request, RequestContext};
use viewful::config::AppConfig;
use viewful::error::{BuildError, HttpError};
use viewful::rule::{Rule, RuleOptions, ViewArgs};
use viewful::view::{route, Handler, ViewClass};

use common::views::{text, Hooked, Plain};

fn app_with(class: &Arc<ViewClass<Plain>>) -> App {
    common::tracing_setup::init();
    let mut app = App::new("test");
    class.register(&mut app).unwrap();
    app
}

#[test]
fn test_special_routes() {
    let class = ViewClass::builder("Crud")
        .handler(text("index", "index"))
        .handler(text("post", "post"))
        .handler(Handler::new("get", |_v: &mut Plain, args: &ViewArgs| {
            format!("get {}", args.get_str("id").unwrap_or_default())
        }))
        .handler(text("put", "put"))
        .handler(text("patch", "patch"))
        .handler(text("delete", "delete"))
        .build()
        .unwrap();
    let app = app_with(&class);

    let cases = [
        (Method::GET, "/", "index"),
        (Method::POST, "/", "post"),
        (Method::GET, "/12", "get 12"),
        (Method::PUT, "/12", "put"),
        (Method::PATCH, "/12", "patch"),
        (Method::DELETE, "/12", "delete"),
    ];
    for (method, path, expected) in cases {
        let res = app.handle(&Request::new(method.clone(), path));
        assert_eq!(res.status(), 200, "{method} {path}");
        assert_eq!(res.body().as_text(), Some(expected), "{method} {path}");
    }
}

#[test]
fn test_blueprint_prefix() {
    let class = ViewClass::builder("MyExampleView")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let mut bp = Blueprint::new("bp").with_url_prefix("/bp-prefix");
    class.register(&mut bp).unwrap();
    let mut app = App::new("test");
    app.register_blueprint(bp).unwrap();

    let res = app.handle(&Request::get("/bp-prefix/example"));
    assert_eq!(res.status(), 200);
    assert_eq!(res.body().as_text(), Some("ok"));
    assert_eq!(app.handle(&Request::get("/example")).status(), 404);
}

#[test]
fn test_prefix_and_base_with_blueprint() {
    let class = ViewClass::builder("MyExampleView")
        .route_prefix("/view-prefix")
        .route_base("/view-base")
        .handler(route("/example").apply(text("example", "ok")))
        .handler(text("index", "root"))
        .build()
        .unwrap();
    let mut bp = Blueprint::new("bp").with_url_prefix("/bp-prefix");
    class.register(&mut bp).unwrap();
    let mut app = App::new("test");
    app.register_blueprint(bp).unwrap();

    let res = app.handle(&Request::get("/bp-prefix/view-prefix/view-base/example"));
    assert_eq!(res.body().as_text(), Some("ok"));
    let res = app.handle(&Request::get("/bp-prefix/view-prefix/view-base/"));
    assert_eq!(res.body().as_text(), Some("root"));
}

#[test]
fn test_same_class_on_app_and_blueprint() {
    let class = ViewClass::builder("Dual")
        .route_base("/base")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let mut app = App::new("test");
    let mut bp = Blueprint::new("bp").with_url_prefix("/prefix");
    class.register(&mut app).unwrap();
    class.register(&mut bp).unwrap();
    app.register_blueprint(bp).unwrap();

    for path in ["/base/example", "/prefix/base/example"] {
        let res = app.handle(&Request::get(path));
        assert_eq!(res.status(), 200, "{path}");
        assert_eq!(res.body().as_text(), Some("ok"), "{path}");
    }
}

#[test]
fn test_multi_level_inheritance() {
    let a = ViewClass::builder("A")
        .handler(route("/a").apply(text("a", "from a")))
        .build()
        .unwrap();
    let b = ViewClass::builder("B")
        .handler(route("/b").apply(text("b", "from b")))
        .extends(&a)
        .build()
        .unwrap();
    let c = ViewClass::builder("C")
        .handler(route("/c").apply(text("c", "from c")))
        .extends(&b)
        .build()
        .unwrap();
    let app = app_with(&c);

    for (path, expected) in [("/a", "from a"), ("/b", "from b"), ("/c", "from c")] {
        assert_eq!(app.handle(&Request::get(path)).body().as_text(), Some(expected));
    }
}

#[test]
fn test_overridden_handler_serves_child_body() {
    let base = ViewClass::builder("Base")
        .handler(route("/example").apply(text("example", "base")))
        .build()
        .unwrap();
    let child = ViewClass::builder("Child")
        .handler(route("/example").apply(text("example", "child")))
        .extends(&base)
        .build()
        .unwrap();
    let app = app_with(&child);
    assert_eq!(app.handle(&Request::get("/example")).body().as_text(), Some("child"));
}

#[test]
fn test_before_and_after_hooks() {
    let class = ViewClass::builder("Hooked")
        .handler(route("/").apply(Handler::new(
            "greet",
            |v: &mut Hooked, _a: &ViewArgs| {
                if v.before_ran {
                    v.greeting.clone()
                } else {
                    "before hook skipped".to_string()
                }
            },
        )))
        .build()
        .unwrap();
    let mut app = App::new("test");
    class.register(&mut app).unwrap();

    let res = app.handle(&Request::get("/"));
    assert_eq!(res.status(), 201);
    assert_eq!(res.body().as_text(), Some("hello world!"));

    let req = Request::get("/").with_header(
        HeaderName::from_static("x-greeting"),
        HeaderValue::from_static("goodbye"),
    );
    assert_eq!(app.handle(&req).body().as_text(), Some("goodbye world!"));
}

#[test]
fn test_default_and_explicit_status() {
    let class = ViewClass::builder("Status")
        .handler(route("/bare").apply(text("bare", "bare")))
        .handler(route("/created").methods(["POST"]).apply(Handler::new(
            "created",
            |_v: &mut Plain, _a: &ViewArgs| (json!({"id": 1}), 201),
        )))
        .handler(route("/gone").apply(Handler::new(
            "gone",
            |_v: &mut Plain, _a: &ViewArgs| -> Result<&'static str, HttpError> {
                Err(HttpError::abort(410, "gone"))
            },
        )))
        .build()
        .unwrap();
    let app = app_with(&class);

    assert_eq!(app.handle(&Request::get("/bare")).status(), 200);

    let res = app.handle(&Request::post("/created"));
    assert_eq!(res.status(), 201);
    assert_eq!(res.body(), &Body::Json(json!({"id": 1})));
    assert_eq!(res.header("content-type"), Some("application/json"));

    let res = app.handle(&Request::get("/gone"));
    assert_eq!(res.status(), 410);
    assert_eq!(res.body(), &Body::Json(json!({"error": "gone"})));
}

#[test]
fn test_method_not_allowed() {
    let class = ViewClass::builder("Only")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let app = app_with(&class);

    let res = app.handle(&Request::new(Method::DELETE, "/example"));
    assert_eq!(res.status(), 405);
    assert_eq!(res.header("allow"), Some("GET, HEAD, OPTIONS"));
}

#[test]
fn test_dispatch_with_unserved_method_is_not_allowed() {
    let class = ViewClass::builder("Only")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let app = app_with(&class);
    let view_func = app.view_function("Only:example").unwrap();

    // a rule that lets PUT reach the shared dispatch function
    let rule = Rule::new("/example", ["PUT"], "Only:example", RuleOptions::default()).unwrap();
    let request = Request::new(Method::PUT, "/example");
    let args = ViewArgs::new();
    let err = view_func(&RequestContext::new(&request, &rule, &args)).unwrap_err();
    assert!(matches!(err, HttpError::MethodNotAllowed { .. }));
}

#[test]
fn test_head_and_options() {
    let class = ViewClass::builder("Head")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let app = app_with(&class);

    let res = app.handle(&Request::new(Method::HEAD, "/example"));
    assert_eq!(res.status(), 200);
    assert!(res.body().is_empty());
    assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));

    let res = app.handle(&Request::new(Method::OPTIONS, "/example"));
    assert_eq!(res.status(), 200);
    assert_eq!(res.header("allow"), Some("GET, HEAD, OPTIONS"));
}

#[test]
fn test_path_arguments_are_converted() {
    let class = ViewClass::builder("Args")
        .handler(route("/items/<int:id>/<float:ratio>").apply(Handler::new(
            "item",
            |_v: &mut Plain, args: &ViewArgs| {
                json!({
                    "id": args.get_u64("id"),
                    "ratio": args.get_f64("ratio"),
                })
            },
        )))
        .build()
        .unwrap();
    let app = app_with(&class);

    let res = app.handle(&Request::get("/items/7/0.5"));
    assert_eq!(res.body(), &Body::Json(json!({"id": 7, "ratio": 0.5})));
    assert_eq!(app.handle(&Request::get("/items/seven/0.5")).status(), 404);
}

#[test]
fn test_url_for() {
    let class = ViewClass::builder("MyExampleView")
        .handler(route("/example").apply(text("example", "ok")))
        .handler(route("/items/<int:id>").apply(text("item", "item")))
        .build()
        .unwrap();
    let config = AppConfig {
        server_name: Some("example.com".to_string()),
        ..AppConfig::default()
    };
    let mut app = App::with_config("test", config);
    class.register(&mut app).unwrap();

    assert_eq!(
        app.url_for_external("MyExampleView:example", &ViewArgs::new()).unwrap(),
        "http://example.com/example"
    );
    assert_eq!(
        app.url_for("MyExampleView:item", &ViewArgs::new().with("id", 3).with("q", "a b"))
            .unwrap(),
        "/items/3?q=a%20b"
    );
    assert!(matches!(
        app.url_for("MyExampleView:item", &ViewArgs::new()),
        Err(BuildError::MissingArgument { .. })
    ));
}

#[test]
fn test_url_for_external_needs_server_name() {
    let class = ViewClass::builder("V")
        .handler(route("/example").apply(text("example", "ok")))
        .build()
        .unwrap();
    let app = app_with(&class);
    assert_eq!(
        app.url_for_external("V:example", &ViewArgs::new()),
        Err(BuildError::MissingServerName)
    );
}

#[test]
fn test_url_for_round_trips_through_handle() {
    let class = ViewClass::builder("Greeter")
        .route_base("/greet")
        .handler(route("/<name>").apply(Handler::new(
            "hello",
            |_v: &mut Plain, args: &ViewArgs| {
                format!("hello {}", args.get_str("name").unwrap_or_default())
            },
        )))
        .build()
        .unwrap();
    let app = app_with(&class);

    for name in ["a b", "a/b", "caf\u{e9}"] {
        let url = app
            .url_for("Greeter:hello", &ViewArgs::new().with("name", name))
            .unwrap();
        let res = app.handle(&Request::get(&url));
        assert_eq!(res.status(), 200, "{url}");
        assert_eq!(res.body().as_text(), Some(format!("hello {name}").as_str()), "{url}");
    }
    assert_eq!(
        app.url_for("Greeter:hello", &ViewArgs::new().with("name", "a b"))
            .unwrap(),
        "/greet/a%20b"
    );
    assert_eq!(app.handle(&Request::get("/greet/%FF")).status(), 404);
}

#[test]
fn test_prefix_stripping_is_literal() {
    // "/v" + "1" + "/<id>" composes to "/v1/<id>"; stripping the same
    // strings back off only works as a plain string trim
    let class = ViewClass::builder("Versioned")
        .route_prefix("/v")
        .route_base("1")
        .handler(route("/<id>").apply(text("one", "one")))
        .build()
        .unwrap();
    let app = app_with(&class);

    assert_eq!(app.url_map().iter_rules().next().unwrap().rule(), "/v1/<id>");
    let res = app.handle(&Request::get("/v1/5"));
    assert_eq!(res.status(), 200);
    assert_eq!(res.body().as_text(), Some("one"));
}
