//! # View Module
//!
//! Class-based views exposing several routes from one type.
//!
//! ## Pieces
//!
//! - [`route`] - annotator attaching `(path, methods, options)` to a
//!   [`Handler`], newest first
//! - [`ViewClass::builder`] - builds a class once: copies inherited handlers,
//!   turns annotations (and convention names such as `index` or `put`) into a
//!   [`RouteTable`]
//! - [`ViewClass::register`] - installs the table on an
//!   [`App`](crate::app::App) or [`Blueprint`](crate::app::Blueprint) under
//!   `prefix + route_prefix + route_base + path`, endpoint `Class:handler`
//! - the dispatch function shared by those rules strips the same prefixes from
//!   the matched template, resolves the handler in the class table and runs it
//!   between [`View::before_view_func`] and [`View::after_view_func`]
//!
//! ## Example
//!
//! ```rust
//! use viewful::app::{App, Request};
//! use viewful::rule::ViewArgs;
//! use viewful::view::{route, Handler, View, ViewClass};
//!
//! struct Greeter;
//!
//! impl View for Greeter {
//!     fn from_request(_request: &Request) -> Self {
//!         Greeter
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let class = ViewClass::builder("Greeter")
//!     .route_base("/greet")
//!     .handler(route("/<name>").apply(Handler::new(
//!         "hello",
//!         |_v: &mut Greeter, args: &ViewArgs| {
//!             format!("hello {}", args.get_str("name").unwrap_or_default())
//!         },
//!     )))
//!     .build()?;
//!
//! let mut app = App::new("demo");
//! class.register(&mut app)?;
//!
//! let res = app.handle(&Request::get("/greet/ferris"));
//! assert_eq!(res.body().as_text(), Some("hello ferris"));
//! # Ok(())
//! # }
//! ```

mod annotation;
mod class;
mod dispatch;
mod handler;
mod register;
mod table;

pub use annotation::{route, RouteAnnotation, RouteAnnotator};
pub use class::{View, ViewClass, ViewClassBuilder};
pub use dispatch::strip_literal_prefix;
pub use handler::{Handler, HandlerFn, IntoReply, Reply, DEFAULT_STATUS};
pub use register::RegisteredRoute;
pub use table::{convention_route, RouteEntry, RouteSource, RouteTable, CONVENTION_NAMES};
