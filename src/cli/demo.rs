use crate::app::{App, Request};
use crate::config::AppConfig;
use crate::error::RuleError;
use crate::rule::ViewArgs;
use crate::view::{route, Handler, View, ViewClass};

/// View type shared by the demo classes.
pub struct DemoView;

impl View for DemoView {
    fn from_request(_request: &Request) -> Self {
        DemoView
    }
}

fn foo_handlers() -> [Handler<DemoView>; 3] {
    [
        route("/foo").apply(Handler::new("foo", |_v: &mut DemoView, _a: &ViewArgs| {
            ("bar", 200)
        })),
        route("/foo/<string:my_str>").apply(Handler::new(
            "foo_str",
            |_v: &mut DemoView, args: &ViewArgs| {
                (args.get_str("my_str").unwrap_or_default().to_string(), 200)
            },
        )),
        route("/foo")
            .methods(["POST"])
            .apply(Handler::new("foo_post", |_v: &mut DemoView, _a: &ViewArgs| {
                ("baz", 200)
            })),
    ]
}

/// Application served by the `viewful` binary: `MyView` at the root and
/// `MySecondView` under `/baz`, both exposing `/foo` (GET, POST) and
/// `/foo/<my_str>`.
pub fn demo_app(config: AppConfig) -> Result<App, RuleError> {
    let mut app = App::with_config("viewful-demo", config);

    let first = foo_handlers()
        .into_iter()
        .fold(ViewClass::builder("MyView"), |b, h| b.handler(h))
        .build()?;
    let second = foo_handlers()
        .into_iter()
        .fold(ViewClass::builder("MySecondView").route_base("/baz"), |b, h| {
            b.handler(h)
        })
        .build()?;

    first.register(&mut app)?;
    second.register(&mut app)?;
    Ok(app)
}
