use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::annotation::{RouteAnnotation, RouteAnnotator};
use crate::app::Body;
use crate::error::HttpError;
use crate::rule::ViewArgs;

/// Status used when a handler returns a bare body.
pub const DEFAULT_STATUS: u16 = 200;

/// Handler return value normalised into a body and an optional status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    body: Body,
    status: Option<u16>,
}

impl Reply {
    #[must_use]
    pub fn new(body: impl Into<Body>) -> Self {
        Self {
            body: body.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Status set by the handler, `None` for a bare body.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn into_parts(self) -> (Body, Option<u16>) {
        (self.body, self.status)
    }
}

/// Values a handler may return.
///
/// A bare body becomes a reply without status (the dispatcher applies
/// [`DEFAULT_STATUS`]); a `(body, status)` pair keeps its status; an `Err`
/// aborts the request.
pub trait IntoReply {
    fn into_reply(self) -> Result<Reply, HttpError>;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Result<Reply, HttpError> {
        Ok(self)
    }
}

impl<T: IntoReply> IntoReply for Result<T, HttpError> {
    fn into_reply(self) -> Result<Reply, HttpError> {
        self.and_then(IntoReply::into_reply)
    }
}

macro_rules! impl_into_reply {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoReply for $ty {
                fn into_reply(self) -> Result<Reply, HttpError> {
                    Ok(Reply::new(self))
                }
            }

            impl IntoReply for ($ty, u16) {
                fn into_reply(self) -> Result<Reply, HttpError> {
                    Ok(Reply::new(self.0).with_status(self.1))
                }
            }
        )*
    };
}

impl_into_reply!(Body, String, &str, Value, ());

/// Type-erased handler function.
pub type HandlerFn<V> = Arc<dyn Fn(&mut V, &ViewArgs) -> Result<Reply, HttpError> + Send + Sync>;

/// A named method of a view: the function plus the route annotations applied
/// to it, newest first.
pub struct Handler<V> {
    name: String,
    func: HandlerFn<V>,
    route_meta: Vec<RouteAnnotation>,
}

impl<V> Clone for Handler<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
            route_meta: self.route_meta.clone(),
        }
    }
}

impl<V> fmt::Debug for Handler<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("route_meta", &self.route_meta)
            .finish_non_exhaustive()
    }
}

impl<V: 'static> Handler<V> {
    /// Create an unannotated handler.
    ///
    /// Unannotated handlers named `index`, `get`, `post`, `put`, `patch` or
    /// `delete` receive a conventional route when their class is built; any
    /// other unannotated handler is only reachable by direct call.
    pub fn new<F, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut V, &ViewArgs) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        Self {
            name: name.into(),
            func: Arc::new(move |view: &mut V, args: &ViewArgs| f(view, args).into_reply()),
            route_meta: Vec::new(),
        }
    }
}

impl<V> Handler<V> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route annotations, most recently applied first.
    #[must_use]
    pub fn route_meta(&self) -> &[RouteAnnotation] {
        &self.route_meta
    }

    #[must_use]
    pub fn is_annotated(&self) -> bool {
        !self.route_meta.is_empty()
    }

    /// Apply a route annotation (same as [`RouteAnnotator::apply`]).
    #[must_use]
    pub fn route(self, annotator: RouteAnnotator) -> Self {
        annotator.apply(self)
    }

    /// Invoke the handler on a view instance.
    pub fn call(&self, view: &mut V, args: &ViewArgs) -> Result<Reply, HttpError> {
        (self.func)(view, args)
    }

    pub(crate) fn prepend_annotation(&mut self, annotation: RouteAnnotation) {
        self.route_meta.insert(0, annotation);
    }
}
