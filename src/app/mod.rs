//! # App Module
//!
//! The host layer views are registered on: a top-level [`App`], prefixed
//! [`Blueprint`] groupings, and the request/response types passed between
//! them.
//!
//! ## Request Flow
//!
//! 1. [`App::handle`] opens a `request` span carrying the [`RequestId`](crate::ids::RequestId)
//! 2. The global [`UrlMap`](crate::map::UrlMap) matches path and method
//!    (404 / 405 / 308 are rendered straight away)
//! 3. Automatic `OPTIONS` is answered with the `Allow` header
//! 4. The endpoint's [`ViewFunc`] runs with a [`RequestContext`]
//! 5. `HEAD` responses lose their body
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use viewful::app::{view_fn, App, Blueprint, Container, Request, Response};
//! use viewful::rule::RuleOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bp = Blueprint::new("api").with_url_prefix("/api");
//! bp.add_url_rule(
//!     "/ping",
//!     "ping",
//!     view_fn(|_ctx| Ok(Response::ok("pong"))),
//!     &[Method::GET],
//!     RuleOptions::default(),
//! )?;
//!
//! let mut app = App::new("demo");
//! app.register_blueprint(bp)?;
//!
//! let res = app.handle(&Request::get("/api/ping"));
//! assert_eq!(res.status(), 200);
//! assert_eq!(app.url_for("api.ping", &Default::default())?, "/api/ping");
//! # Ok(())
//! # }
//! ```

mod blueprint;
mod container;
mod core;
mod request;

pub(crate) use blueprint::join_prefix;
pub use blueprint::Blueprint;
pub use container::{view_fn, Container, PendingRule, ViewFunc};
pub use core::App;
pub use request::{Body, Request, RequestContext, Response};
