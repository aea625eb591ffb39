//! # Map Module
//!
//! The rule table shared by applications and view classes.
//!
//! ## Overview
//!
//! A [`UrlMap`] stores [`Rule`](crate::rule::Rule)s and rejects conflicting
//! ones. Binding it yields a [`MapAdapter`] that:
//!
//! - matches a request path and method to a rule and its typed arguments
//! - distinguishes "no such path" (404) from "path exists, wrong method" (405)
//! - applies trailing-slash handling (308 redirect or lenient match)
//! - builds URLs back from an endpoint and its arguments
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use viewful::map::UrlMap;
//! use viewful::rule::{Rule, RuleOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut map = UrlMap::new();
//! map.add(Rule::new("/pets/<int:id>", ["GET"], "get_pet", RuleOptions::default())?)?;
//!
//! let matched = map.bind().match_path("/pets/42", &Method::GET)?;
//! assert_eq!(matched.rule.endpoint(), "get_pet");
//! assert_eq!(matched.args.get_u64("id"), Some(42));
//! # Ok(())
//! # }
//! ```

mod core;
mod radix;

pub use core::{MapAdapter, RouteMatch, UrlMap};
