use http::Method;
use std::sync::Arc;
use tracing::info;

use super::class::{View, ViewClass};
use super::dispatch::ViewBinding;
use crate::app::{join_prefix, view_fn, Container, PendingRule};
use crate::error::RuleError;
use crate::rule::RuleOptions;

/// A rule installed on a container by [`ViewClass::register`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredRoute {
    /// Full path as served: container mount prefix, then `route_prefix +
    /// route_base + path`
    pub rule: String,
    /// `"{class}:{handler}"`
    pub endpoint: String,
    pub methods: Vec<Method>,
    pub options: RuleOptions,
}

impl<V: View> ViewClass<V> {
    /// Install the route table on `container`.
    ///
    /// Every entry becomes a rule at `route_prefix + route_base + path` under
    /// the endpoint `"{class}:{handler}"`, all served by one dispatch function
    /// bound to the container's mount prefix. Registering on several
    /// containers gives each its own binding. The table is installed as one
    /// batch, so a rejected rule leaves the container untouched.
    ///
    /// # Errors
    ///
    /// Whatever the container rejects: conflicting rules, an endpoint bound
    /// to another function (for instance when the class is registered twice on
    /// the same application).
    pub fn register<C>(self: &Arc<Self>, container: &mut C) -> Result<Vec<RegisteredRoute>, RuleError>
    where
        C: Container + ?Sized,
    {
        let mount_prefix = container.mount_prefix().map(str::to_string);
        let binding = ViewBinding::new(Arc::clone(self), mount_prefix.as_deref());
        let view_func = view_fn(move |ctx| binding.dispatch(ctx));

        let mut pending = Vec::with_capacity(self.route_table().len());
        let mut installed = Vec::with_capacity(self.route_table().len());
        for entry in self.route_table().entries() {
            let rule = format!("{}{}{}", self.route_prefix(), self.route_base(), entry.path());
            let endpoint = self.endpoint(entry.handler_name());
            installed.push(RegisteredRoute {
                rule: join_prefix(mount_prefix.as_deref(), &rule),
                endpoint: endpoint.clone(),
                methods: entry.methods().to_vec(),
                options: entry.options().clone(),
            });
            pending.push(PendingRule {
                rule,
                endpoint,
                view_func: Arc::clone(&view_func),
                methods: entry.methods().to_vec(),
                options: entry.options().clone(),
            });
        }
        container.add_url_rules(pending)?;

        info!(
            class = %self.name(),
            mount_prefix = ?mount_prefix,
            routes = installed.len(),
            "View class registered"
        );
        Ok(installed)
    }
}
