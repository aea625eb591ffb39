use serde_json::Value;

use super::handler::Handler;
use crate::rule::RuleOptions;

/// One route declared on a handler: path template, methods and rule options.
///
/// Immutable once applied; the class builder turns each annotation into one
/// entry of the class route table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnnotation {
    path: String,
    methods: Vec<String>,
    options: RuleOptions,
}

impl RouteAnnotation {
    /// Path template, relative to the class base.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared methods as given; normalised when the rule is built.
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    #[must_use]
    pub fn options(&self) -> &RuleOptions {
        &self.options
    }
}

/// Start declaring a route on `path`. Methods default to `GET`.
///
/// ```rust
/// use viewful::view::{route, Handler};
/// use viewful::rule::ViewArgs;
///
/// struct Items;
///
/// let handler = route("/items/<int:id>")
///     .methods(["GET", "PUT"])
///     .apply(Handler::new("item", |_v: &mut Items, args: &ViewArgs| {
///         format!("item {}", args.get_u64("id").unwrap_or_default())
///     }));
/// assert_eq!(handler.route_meta()[0].path(), "/items/<int:id>");
/// ```
pub fn route(path: impl Into<String>) -> RouteAnnotator {
    RouteAnnotator {
        annotation: RouteAnnotation {
            path: path.into(),
            methods: vec!["GET".to_string()],
            options: RuleOptions::default(),
        },
    }
}

/// Builder returned by [`route`]; [`apply`](Self::apply) attaches the
/// finished annotation to a handler.
#[derive(Debug, Clone)]
#[must_use]
pub struct RouteAnnotator {
    annotation: RouteAnnotation,
}

impl RouteAnnotator {
    /// Replace the declared methods.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn strict_slashes(mut self, strict: bool) -> Self {
        self.annotation.options.strict_slashes = Some(strict);
        self
    }

    /// Default value for a view argument absent from the path.
    pub fn defaults(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.annotation
            .options
            .defaults
            .insert(name.into(), value.into());
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.annotation.options.redirect_to = Some(target.into());
        self
    }

    /// Free-form rule option, forwarded verbatim to the container.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.annotation
            .options
            .extra
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn annotation(&self) -> &RouteAnnotation {
        &self.annotation
    }

    /// Prepend the annotation to the handler's route metadata and return the
    /// same handler.
    pub fn apply<V>(self, mut handler: Handler<V>) -> Handler<V> {
        handler.prepend_annotation(self.annotation);
        handler
    }
}
