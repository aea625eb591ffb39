use http::Method;
use std::sync::Arc;

use super::request::{RequestContext, Response};
use crate::error::{HttpError, RuleError};
use crate::rule::RuleOptions;

/// Function invoked by a container for every rule bound to its endpoint.
pub type ViewFunc = Arc<dyn Fn(&RequestContext<'_>) -> Result<Response, HttpError> + Send + Sync>;

/// Wrap a closure as a [`ViewFunc`].
pub fn view_fn<F>(f: F) -> ViewFunc
where
    F: Fn(&RequestContext<'_>) -> Result<Response, HttpError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One rule waiting to be installed on a container.
#[derive(Clone)]
pub struct PendingRule {
    pub rule: String,
    pub endpoint: String,
    pub view_func: ViewFunc,
    pub methods: Vec<Method>,
    pub options: RuleOptions,
}

/// Something rules can be registered on: the top-level [`App`](super::App) or
/// a prefixed [`Blueprint`](super::Blueprint).
pub trait Container {
    /// Prefix under which this container is mounted; `None` for a top-level
    /// application.
    fn mount_prefix(&self) -> Option<&str>;

    /// Register `rule` under `endpoint`, served by `view_func`.
    fn add_url_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        view_func: ViewFunc,
        methods: &[Method],
        options: RuleOptions,
    ) -> Result<(), RuleError>;

    /// Register every rule in `rules`, or none of them: on error the
    /// container is left as it was before the call.
    fn add_url_rules(&mut self, rules: Vec<PendingRule>) -> Result<(), RuleError>;
}
