//! # Rule Module
//!
//! A rule is the unit stored in every rule table: a parsed path template, the
//! HTTP methods it accepts, the endpoint it resolves to, and its options.
//!
//! ## Path templates
//!
//! ```text
//! /                        root
//! /example                 static
//! /example/<my_str>        string argument (default converter)
//! /items/<int:item_id>     integer argument
//! /prices/<float:amount>   float argument
//! /bp-prefix/              trailing slash is part of the rule
//! ```
//!
//! Templates are validated when the rule is created, so malformed rules surface
//! at startup rather than on the first request.

mod args;
mod core;
mod template;

pub use args::ViewArgs;
pub use core::{normalize_methods, MethodVec, Rule, RuleOptions, MAX_INLINE_METHODS};
pub use template::{Converter, PathTemplate, Segment};

pub(crate) use template::{split_path, substitute};
