use http::Method;
use tracing::debug;

use super::container::{Container, PendingRule, ViewFunc};
use crate::error::RuleError;
use crate::rule::{normalize_methods, PathTemplate, RuleOptions};

/// Prefixed grouping of rules.
///
/// Rules added to a blueprint are validated immediately but only reach an
/// application's rule table through
/// [`App::register_blueprint`](super::App::register_blueprint), which joins
/// them under the blueprint's URL prefix and namespaces their endpoints as
/// `"{blueprint}.{endpoint}"`.
#[derive(Clone)]
pub struct Blueprint {
    name: String,
    url_prefix: Option<String>,
    pub(crate) deferred: Vec<PendingRule>,
}

impl Blueprint {
    /// Create a blueprint without a URL prefix.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: None,
            deferred: Vec::new(),
        }
    }

    /// Set the URL prefix. A missing leading `/` is added and trailing `/`s
    /// are dropped; an empty prefix clears it.
    #[must_use]
    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_end_matches('/');
        self.url_prefix = if trimmed.is_empty() {
            None
        } else if trimmed.starts_with('/') {
            Some(trimmed.to_string())
        } else {
            Some(format!("/{trimmed}"))
        };
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url_prefix(&self) -> Option<&str> {
        self.url_prefix.as_deref()
    }

    /// `(rule, endpoint)` pairs recorded so far, unprefixed.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.deferred
            .iter()
            .map(|d| (d.rule.as_str(), d.endpoint.as_str()))
    }
}

impl Container for Blueprint {
    fn mount_prefix(&self) -> Option<&str> {
        self.url_prefix()
    }

    fn add_url_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        view_func: ViewFunc,
        methods: &[Method],
        options: RuleOptions,
    ) -> Result<(), RuleError> {
        self.add_url_rules(vec![PendingRule {
            rule: rule.to_string(),
            endpoint: endpoint.to_string(),
            view_func,
            methods: methods.to_vec(),
            options,
        }])
    }

    fn add_url_rules(&mut self, rules: Vec<PendingRule>) -> Result<(), RuleError> {
        // Validate the whole batch before recording any of it
        let mut validated = Vec::with_capacity(rules.len());
        for pending in rules {
            PathTemplate::parse(&pending.rule)?;
            let methods =
                normalize_methods(&pending.rule, pending.methods.iter().map(Method::as_str))?;
            validated.push(PendingRule {
                methods: methods.into_vec(),
                ..pending
            });
        }

        for pending in &validated {
            debug!(
                blueprint = %self.name,
                rule = %pending.rule,
                endpoint = %pending.endpoint,
                "Deferred blueprint rule"
            );
        }
        self.deferred.extend(validated);
        Ok(())
    }
}

/// Join a blueprint prefix and a rule the way a mount point does:
/// exactly one `/` between them.
pub(crate) fn join_prefix(prefix: Option<&str>, rule: &str) -> String {
    match prefix {
        None => rule.to_string(),
        Some(prefix) if rule.is_empty() => prefix.to_string(),
        Some(prefix) => format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            rule.trim_start_matches('/')
        ),
    }
}
