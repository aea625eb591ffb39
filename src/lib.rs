//! # viewful
//!
//! **viewful** brings class-style views to request routing: one view type
//! exposes many routes, declared per handler, inherited and overridden across
//! view classes, and mounted under application, blueprint and class prefixes.
//!
//! ## Overview
//!
//! A view class is a set of named [`Handler`](view::Handler)s over a view type.
//! Handlers carry route annotations created with [`route`](view::route);
//! handlers named `index`, `get`, `post`, `put`, `patch` or `delete` are routed
//! by convention when left unannotated. Building the class computes its route
//! table once. Registering it on a container installs every entry at
//! `prefix + route_prefix + route_base + path` under the endpoint
//! `Class:handler`, all served by a single dispatch function.
//!
//! ## Architecture
//!
//! - **[`view`]** - annotator, handlers, view classes, dispatch and registration
//! - **[`app`]** - host containers ([`App`](app::App), [`Blueprint`](app::Blueprint)) and request/response types
//! - **[`map`]** - rule table with radix-tree matching and URL building
//! - **[`rule`]** - path templates, converters, rules and their options
//! - **[`config`]** - application configuration from environment or TOML
//! - **[`error`]** - configuration, request-time and URL-building errors
//! - **[`ids`]** - ULID request ids used for log correlation
//! - **[`logging`]** - `tracing-subscriber` setup for binaries
//! - **[`cli`]** - the `viewful` demo command line
//!
//! ## Quick Start
//!
//! ```rust
//! use viewful::app::{App, Blueprint, Request};
//! use viewful::rule::ViewArgs;
//! use viewful::view::{route, Handler, View, ViewClass};
//!
//! struct Users;
//!
//! impl View for Users {
//!     fn from_request(_request: &Request) -> Self {
//!         Users
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = ViewClass::builder("Users")
//!     .route_base("/users")
//!     .handler(Handler::new("index", |_v: &mut Users, _a: &ViewArgs| "all users"))
//!     .handler(route("/<int:id>/profile").apply(Handler::new(
//!         "profile",
//!         |_v: &mut Users, args: &ViewArgs| {
//!             format!("profile {}", args.get_u64("id").unwrap_or_default())
//!         },
//!     )))
//!     .build()?;
//!
//! let mut app = App::new("demo");
//! let mut api = Blueprint::new("api").with_url_prefix("/api");
//! users.register(&mut app)?;
//! users.register(&mut api)?;
//! app.register_blueprint(api)?;
//!
//! assert_eq!(app.handle(&Request::get("/users/")).body().as_text(), Some("all users"));
//! assert_eq!(
//!     app.handle(&Request::get("/api/users/7/profile")).body().as_text(),
//!     Some("profile 7")
//! );
//! assert_eq!(app.url_for("api.Users:index", &ViewArgs::new())?, "/api/users/");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod map;
pub mod rule;
pub mod view;

pub use app::{App, Blueprint, Request, Response};
pub use config::AppConfig;
pub use error::{BuildError, HttpError, RuleError};
pub use view::{route, Handler, View, ViewClass};
