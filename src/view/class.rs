use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::handler::Handler;
use super::table::{convention_route, RouteSource, RouteTable};
use crate::app::{Body, Request};
use crate::error::RuleError;
use crate::rule::{Rule, RuleOptions};

/// Per-request view instance.
///
/// A fresh value is created with [`from_request`](Self::from_request) for
/// every dispatched request; the hooks run around the handler call.
pub trait View: Sized + 'static {
    fn from_request(request: &Request) -> Self;

    /// Runs before the handler.
    fn before_view_func(&mut self) {}

    /// Runs after the handler with its body and status (200 unless the
    /// handler returned one) and returns the final pair.
    fn after_view_func(&mut self, body: Body, status: u16) -> (Body, u16) {
        (body, status)
    }
}

/// Handler as held by a class, with the name of the class that defined it.
struct Member<V> {
    handler: Handler<V>,
    defined_in: String,
    inherited: bool,
}

impl<V> Clone for Member<V> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            defined_in: self.defined_in.clone(),
            inherited: self.inherited,
        }
    }
}

/// A view class: named handlers over the view type `V`, its route table and
/// the class-level `route_base` / `route_prefix`.
///
/// Created with [`ViewClass::builder`]; immutable once built. Subclasses are
/// built with [`ViewClassBuilder::extends`] and never modify their bases.
pub struct ViewClass<V> {
    name: String,
    route_base: String,
    route_prefix: String,
    members: Vec<Member<V>>,
    table: RouteTable,
}

impl<V> fmt::Debug for ViewClass<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewClass")
            .field("name", &self.name)
            .field("route_base", &self.route_base)
            .field("route_prefix", &self.route_prefix)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<V: View> ViewClass<V> {
    pub fn builder(name: impl Into<String>) -> ViewClassBuilder<V> {
        ViewClassBuilder {
            name: name.into(),
            route_base: None,
            route_prefix: None,
            handlers: Vec::new(),
            bases: Vec::new(),
        }
    }
}

impl<V> ViewClass<V> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn route_base(&self) -> &str {
        &self.route_base
    }

    #[must_use]
    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    #[must_use]
    pub fn route_table(&self) -> &RouteTable {
        &self.table
    }

    /// Handler named `name`, own or inherited.
    #[must_use]
    pub fn handler(&self, name: &str) -> Option<&Handler<V>> {
        self.member(name).map(|m| &m.handler)
    }

    /// All handlers in definition order, inherited ones last.
    pub fn handlers(&self) -> impl Iterator<Item = &Handler<V>> {
        self.members.iter().map(|m| &m.handler)
    }

    /// Endpoint id of `handler` when registered: `"{class}:{handler}"`.
    #[must_use]
    pub fn endpoint(&self, handler: &str) -> String {
        format!("{}:{}", self.name, handler)
    }

    fn member(&self, name: &str) -> Option<&Member<V>> {
        self.members.iter().find(|m| m.handler.name() == name)
    }
}

/// Builder for [`ViewClass`]; [`build`](Self::build) computes the route table.
#[must_use]
pub struct ViewClassBuilder<V> {
    name: String,
    route_base: Option<String>,
    route_prefix: Option<String>,
    handlers: Vec<Handler<V>>,
    bases: Vec<Arc<ViewClass<V>>>,
}

impl<V: View> ViewClassBuilder<V> {
    pub fn route_base(mut self, base: impl Into<String>) -> Self {
        self.route_base = Some(base.into());
        self
    }

    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// Define a handler. A second handler with the same name replaces the
    /// first in place.
    pub fn handler(mut self, handler: Handler<V>) -> Self {
        match self.handlers.iter_mut().find(|h| h.name() == handler.name()) {
            Some(slot) => *slot = handler,
            None => self.handlers.push(handler),
        }
        self
    }

    /// Add a base class. Bases are consulted in the order given.
    pub fn extends(mut self, base: &Arc<ViewClass<V>>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Build the class and its route table.
    ///
    /// Inherited handlers not redefined here are copied in first; then every
    /// annotation yields one entry and every unannotated convention-named
    /// handler yields its implicit entry.
    ///
    /// # Errors
    ///
    /// [`RuleError`] for an invalid template or method, or when two handlers
    /// claim the same path and method.
    pub fn build(self) -> Result<Arc<ViewClass<V>>, RuleError> {
        let mut members: Vec<Member<V>> = self
            .handlers
            .into_iter()
            .map(|handler| Member {
                handler,
                defined_in: self.name.clone(),
                inherited: false,
            })
            .collect();

        for base in &self.bases {
            for entry in base.table.entries() {
                let name = entry.handler_name();
                if members.iter().any(|m| m.handler.name() == name) {
                    continue;
                }
                if let Some(member) = base.member(name) {
                    debug!(
                        class = %self.name,
                        base = %base.name,
                        handler = %name,
                        "Inheriting handler"
                    );
                    members.push(Member {
                        inherited: true,
                        ..member.clone()
                    });
                }
            }
        }

        let mut table = RouteTable::default();
        for member in &members {
            let handler = &member.handler;
            if handler.is_annotated() {
                for annotation in handler.route_meta() {
                    let rule = Rule::new(
                        annotation.path(),
                        annotation.methods(),
                        handler.name(),
                        annotation.options().clone(),
                    )?;
                    table.push(rule, RouteSource::Annotated, &member.defined_in, member.inherited)?;
                }
            } else if let Some((path, method)) = convention_route(handler.name()) {
                let rule =
                    Rule::with_methods(path, &[method], handler.name(), RuleOptions::default())?;
                table.push(rule, RouteSource::Convention, &member.defined_in, member.inherited)?;
            }
        }

        let first_base = self.bases.first();
        let route_base = self
            .route_base
            .or_else(|| first_base.map(|b| b.route_base.clone()))
            .unwrap_or_default();
        let route_prefix = self
            .route_prefix
            .or_else(|| first_base.map(|b| b.route_prefix.clone()))
            .unwrap_or_default();

        info!(
            class = %self.name,
            route_base = %route_base,
            route_prefix = %route_prefix,
            handlers = members.len(),
            routes = table.len(),
            "View class built"
        );

        Ok(Arc::new(ViewClass {
            name: self.name,
            route_base,
            route_prefix,
            members,
            table,
        }))
    }
}
