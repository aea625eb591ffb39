use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::hint::black_box;
use viewful::app::{App, Blueprint, Request};
use viewful::rule::ViewArgs;
use viewful::view::{route, Handler, View, ViewClass};

struct Zoo;

impl View for Zoo {
    fn from_request(_request: &Request) -> Self {
        Zoo
    }
}

fn zoo_app() -> App {
    let ok = |name: &str| Handler::new(name, |_v: &mut Zoo, _a: &ViewArgs| "ok");
    let base = ViewClass::builder("Animals")
        .route_base("/zoo/animals")
        .handler(ok("index"))
        .handler(ok("post"))
        .handler(ok("get"))
        .handler(ok("put"))
        .handler(ok("delete"))
        .build()
        .expect("base class");
    let toys = ViewClass::builder("Toys")
        .route_base("/zoo/animals")
        .handler(route("/<int:id>/toys/<int:toy_id>").apply(ok("toy")))
        .handler(
            route("/<category>/habitats/<int:habitat_id>/sections/<int:section_id>")
                .apply(ok("section")),
        )
        .extends(&base)
        .build()
        .expect("child class");

    let mut app = App::new("bench");
    let mut bp = Blueprint::new("v1").with_url_prefix("/v1");
    toys.register(&mut bp).expect("register on blueprint");
    app.register_blueprint(bp).expect("register blueprint");
    toys.register(&mut app).expect("register on app");
    app
}

fn bench_dispatch(c: &mut Criterion) {
    let app = zoo_app();
    let requests = [
        Request::get("/zoo/animals/"),
        Request::new(Method::PUT, "/zoo/animals/123"),
        Request::get("/zoo/animals/123/toys/456"),
        Request::get("/v1/zoo/animals/cats/habitats/88/sections/5"),
        Request::new(Method::PATCH, "/zoo/animals/123"),
    ];
    c.bench_function("view_dispatch", |b| {
        b.iter(|| {
            for request in &requests {
                black_box(app.handle(request));
            }
        })
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("view_class_build_and_register", |b| {
        b.iter(|| black_box(zoo_app()))
    });
}

criterion_group!(benches, bench_dispatch, bench_build);
criterion_main!(benches);
