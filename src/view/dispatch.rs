use std::sync::Arc;
use tracing::debug;

use super::class::{View, ViewClass};
use super::handler::DEFAULT_STATUS;
use crate::app::{RequestContext, Response};
use crate::error::HttpError;

/// Remove `prefix` from the front of `text` when it is literally there.
///
/// This is a plain string trim, not a path-segment match: `/base` is also
/// removed from `/baseline/x`.
#[must_use]
pub fn strip_literal_prefix<'a>(text: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return text;
    }
    text.strip_prefix(prefix).unwrap_or(text)
}

/// What one registration of a class knows at request time: the class and the
/// mount prefix of the container it was registered on.
pub(crate) struct ViewBinding<V> {
    class: Arc<ViewClass<V>>,
    container_prefix: String,
}

impl<V: View> ViewBinding<V> {
    pub(crate) fn new(class: Arc<ViewClass<V>>, container_prefix: Option<&str>) -> Self {
        Self {
            class,
            container_prefix: container_prefix.unwrap_or_default().to_string(),
        }
    }

    /// Unprefixed template of the matched rule: container prefix, class
    /// prefix and class base are stripped in that order.
    pub(crate) fn relative_template<'a>(&self, template: &'a str) -> &'a str {
        [
            self.container_prefix.as_str(),
            self.class.route_prefix(),
            self.class.route_base(),
        ]
        .into_iter()
        .fold(template, strip_literal_prefix)
    }

    /// Shared entry point of every rule the class registered on one container.
    pub(crate) fn dispatch(&self, ctx: &RequestContext<'_>) -> Result<Response, HttpError> {
        let template = self.relative_template(ctx.url_rule().rule());
        let method = ctx.method();
        let name = self.class.route_table().resolve(template, method)?;
        let handler = self
            .class
            .handler(name)
            .ok_or_else(|| HttpError::MethodNotAllowed {
                method: method.clone(),
                allowed: Vec::new(),
            })?;

        debug!(
            class = %self.class.name(),
            handler = %name,
            template = %template,
            "Dispatching to handler"
        );

        let mut view = V::from_request(ctx.request());
        view.before_view_func();
        let (body, status) = handler.call(&mut view, ctx.view_args())?.into_parts();
        let (body, status) = view.after_view_func(body, status.unwrap_or(DEFAULT_STATUS));
        Ok(Response::new(status, body))
    }
}
