use http::header::{HeaderName, HeaderValue};
use http::Method;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

use super::blueprint::{join_prefix, Blueprint};
use super::container::{Container, PendingRule, ViewFunc};
use super::request::{Request, RequestContext, Response};
use crate::config::AppConfig;
use crate::error::{BuildError, HttpError, RuleError};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::map::UrlMap;
use crate::rule::{Rule, RuleOptions, ViewArgs};

/// Top-level application: owns the global rule table and the endpoint to
/// view function mapping, and turns requests into responses.
pub struct App {
    name: String,
    config: AppConfig,
    url_map: UrlMap,
    view_functions: HashMap<String, ViewFunc>,
    automatic_options: HashSet<String>,
    blueprints: Vec<String>,
}

impl App {
    /// Create an application with the default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, AppConfig::default())
    }

    #[must_use]
    pub fn with_config(name: impl Into<String>, config: AppConfig) -> Self {
        Self {
            name: name.into(),
            url_map: UrlMap::with_strict_slashes(config.strict_slashes),
            config,
            view_functions: HashMap::new(),
            automatic_options: HashSet::new(),
            blueprints: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The global rule table.
    #[must_use]
    pub fn url_map(&self) -> &UrlMap {
        &self.url_map
    }

    /// View function registered under `endpoint`.
    #[must_use]
    pub fn view_function(&self, endpoint: &str) -> Option<&ViewFunc> {
        self.view_functions.get(endpoint)
    }

    /// Install every rule recorded on `blueprint` under its URL prefix.
    ///
    /// Endpoints become `"{blueprint}.{endpoint}"`. A blueprint name can only
    /// be registered once per application. Installation is all or nothing:
    /// when one rule is rejected none of the blueprint's rules stay behind
    /// and the name is not taken.
    pub fn register_blueprint(&mut self, blueprint: Blueprint) -> Result<(), RuleError> {
        if self.blueprints.iter().any(|n| n == blueprint.name()) {
            return Err(RuleError::DuplicateBlueprint {
                name: blueprint.name().to_string(),
            });
        }

        let prefix = blueprint.url_prefix().map(str::to_string);
        let rules: Vec<PendingRule> = blueprint
            .deferred
            .iter()
            .map(|deferred| PendingRule {
                rule: join_prefix(prefix.as_deref(), &deferred.rule),
                endpoint: format!("{}.{}", blueprint.name(), deferred.endpoint),
                ..deferred.clone()
            })
            .collect();
        let count = rules.len();
        self.add_url_rules(rules)?;

        info!(
            app = %self.name,
            blueprint = %blueprint.name(),
            url_prefix = ?prefix,
            rules = count,
            "Blueprint registered"
        );
        self.blueprints.push(blueprint.name().to_string());
        Ok(())
    }

    /// Relative URL of `endpoint`.
    pub fn url_for(&self, endpoint: &str, args: &ViewArgs) -> Result<String, BuildError> {
        self.url_map.bind().build(endpoint, args)
    }

    /// Absolute URL of `endpoint`, using `server_name` and
    /// `preferred_url_scheme` from the configuration.
    pub fn url_for_external(&self, endpoint: &str, args: &ViewArgs) -> Result<String, BuildError> {
        let server = self
            .config
            .server_name
            .as_deref()
            .ok_or(BuildError::MissingServerName)?;
        let path = self.url_for(endpoint, args)?;
        Ok(format!(
            "{}://{}{}",
            self.config.preferred_url_scheme, server, path
        ))
    }

    /// Handle one request. Every failure is rendered into the response, and
    /// the request id is echoed in `x-request-id`.
    #[must_use]
    pub fn handle(&self, request: &Request) -> Response {
        let request_id = RequestId::from_headers(request.headers());
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.path()
        );
        let _entered = span.enter();
        let started = Instant::now();

        let mut response = match self.dispatch(request, request_id) {
            Ok(response) => response,
            Err(err) => {
                if err.status() >= 500 {
                    warn!(error = %err, "Request failed");
                } else {
                    debug!(error = %err, "Request rejected");
                }
                Response::from_error(&err)
            }
        };

        if request.method() == Method::HEAD {
            response.clear_body();
        }
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        info!(
            status = response.status(),
            duration_us = started.elapsed().as_micros(),
            "Request handled"
        );
        response
    }

    fn dispatch(&self, request: &Request, request_id: RequestId) -> Result<Response, HttpError> {
        let adapter = self.url_map.bind();
        let matched = adapter.match_path(request.path(), request.method())?;
        let endpoint = matched.rule.endpoint();

        if request.method() == Method::OPTIONS && self.automatic_options.contains(endpoint) {
            return Ok(Response::options(&adapter.allowed_methods(request.path())));
        }

        let view_func = self
            .view_functions
            .get(endpoint)
            .ok_or_else(|| HttpError::NotFound {
                path: request.path().to_string(),
            })?;

        debug!(endpoint = %endpoint, rule = %matched.rule.rule(), "Dispatching");
        let ctx = RequestContext {
            request,
            rule: &matched.rule,
            args: &matched.args,
            request_id,
        };
        view_func(&ctx)
    }
}

impl Container for App {
    fn mount_prefix(&self) -> Option<&str> {
        None
    }

    fn add_url_rule(
        &mut self,
        rule: &str,
        endpoint: &str,
        view_func: ViewFunc,
        methods: &[Method],
        options: RuleOptions,
    ) -> Result<(), RuleError> {
        if let Some(existing) = self.view_functions.get(endpoint) {
            if !Arc::ptr_eq(existing, &view_func) {
                return Err(RuleError::EndpointOverwrite {
                    endpoint: endpoint.to_string(),
                });
            }
        }

        let mut methods = methods.to_vec();
        let automatic_options =
            self.config.provide_automatic_options && !methods.contains(&Method::OPTIONS);
        if automatic_options {
            methods.push(Method::OPTIONS);
        }

        let rule = Rule::with_methods(rule, &methods, endpoint, options)?;
        let rule = self.url_map.add(rule)?;
        info!(
            app = %self.name,
            rule = %rule.rule(),
            endpoint = %endpoint,
            methods = ?rule.methods(),
            "Rule registered"
        );

        if automatic_options {
            self.automatic_options.insert(endpoint.to_string());
        }
        self.view_functions
            .entry(endpoint.to_string())
            .or_insert(view_func);
        Ok(())
    }

    fn add_url_rules(&mut self, rules: Vec<PendingRule>) -> Result<(), RuleError> {
        let url_map = self.url_map.clone();
        let view_functions = self.view_functions.clone();
        let automatic_options = self.automatic_options.clone();

        for pending in rules {
            if let Err(err) = self.add_url_rule(
                &pending.rule,
                &pending.endpoint,
                pending.view_func,
                &pending.methods,
                pending.options,
            ) {
                warn!(
                    app = %self.name,
                    rule = %pending.rule,
                    error = %err,
                    "Rule rejected, rolling back batch"
                );
                self.url_map = url_map;
                self.view_functions = view_functions;
                self.automatic_options = automatic_options;
                return Err(err);
            }
        }
        Ok(())
    }
}
