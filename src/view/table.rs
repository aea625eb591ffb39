use http::Method;
use std::sync::Arc;

use crate::error::{HttpError, RuleError};
use crate::map::UrlMap;
use crate::rule::{Rule, RuleOptions};

/// Handler names that receive a route without being annotated.
pub const CONVENTION_NAMES: [&str; 6] = ["index", "get", "post", "put", "patch", "delete"];

/// Implicit route for a convention-named handler: `index` and `post` live at
/// `/`, the others at `/<id>`.
#[must_use]
pub fn convention_route(name: &str) -> Option<(&'static str, Method)> {
    match name {
        "index" => Some(("/", Method::GET)),
        "post" => Some(("/", Method::POST)),
        "get" => Some(("/<id>", Method::GET)),
        "put" => Some(("/<id>", Method::PUT)),
        "patch" => Some(("/<id>", Method::PATCH)),
        "delete" => Some(("/<id>", Method::DELETE)),
        _ => None,
    }
}

/// How a table entry came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// Declared with [`route`](super::route)
    Annotated,
    /// Implied by a convention handler name
    Convention,
}

/// One `(path, methods) -> handler` entry of a class route table.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    rule: Arc<Rule>,
    source: RouteSource,
    defined_in: String,
    inherited: bool,
}

impl RouteEntry {
    /// Rule relative to the class base; its endpoint is the handler name.
    #[must_use]
    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.rule.rule()
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        self.rule.methods()
    }

    #[must_use]
    pub fn handler_name(&self) -> &str {
        self.rule.endpoint()
    }

    #[must_use]
    pub fn options(&self) -> &RuleOptions {
        self.rule.options()
    }

    #[must_use]
    pub fn source(&self) -> RouteSource {
        self.source
    }

    /// Name of the class whose body defined the handler.
    #[must_use]
    pub fn defined_in(&self) -> &str {
        &self.defined_in
    }

    /// Whether the handler was copied from a base class.
    #[must_use]
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }
}

/// Route table of one view class, relative to no prefix.
///
/// Built once by [`ViewClassBuilder::build`](super::ViewClassBuilder::build)
/// and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    map: UrlMap,
}

impl RouteTable {
    pub(crate) fn push(
        &mut self,
        rule: Rule,
        source: RouteSource,
        defined_in: &str,
        inherited: bool,
    ) -> Result<(), RuleError> {
        let rule = self.map.add(rule)?;
        self.entries.push(RouteEntry {
            rule,
            source,
            defined_in: defined_in.to_string(),
            inherited,
        });
        Ok(())
    }

    /// Entries in build order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Entries routed to `handler`.
    pub fn entries_for<'a>(&'a self, handler: &'a str) -> impl Iterator<Item = &'a RouteEntry> {
        self.entries.iter().filter(move |e| e.handler_name() == handler)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry declared with exactly this template and serving `method`.
    #[must_use]
    pub fn lookup(&self, template: &str, method: &Method) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|e| e.path() == template && e.rule.allows(method))
    }

    /// Resolve the handler name for an unprefixed template and a method.
    ///
    /// The template is first looked up literally among the table's own
    /// templates, then matched as a path against them (a prefix that could not
    /// be stripped literally still resolves if the rest matches a rule).
    ///
    /// # Errors
    ///
    /// Always [`HttpError::MethodNotAllowed`] when nothing resolves; `allowed`
    /// lists what the template serves in this table, if anything.
    pub fn resolve(&self, template: &str, method: &Method) -> Result<&str, HttpError> {
        if let Some(entry) = self.lookup(template, method) {
            return Ok(entry.handler_name());
        }

        let mut allowed: Vec<Method> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.path() == template) {
            for m in entry.methods() {
                if !allowed.contains(m) {
                    allowed.push(m.clone());
                }
            }
        }
        if !allowed.is_empty() {
            return Err(HttpError::MethodNotAllowed {
                method: method.clone(),
                allowed,
            });
        }

        match self.map.bind().match_path(template, method) {
            Ok(matched) => {
                if let Some(entry) = self.entries.iter().find(|e| Arc::ptr_eq(&e.rule, &matched.rule)) {
                    return Ok(entry.handler_name());
                }
            }
            Err(HttpError::MethodNotAllowed { allowed: served, .. }) => allowed = served,
            Err(_) => {}
        }
        Err(HttpError::MethodNotAllowed {
            method: method.clone(),
            allowed,
        })
    }
}
