use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::radix::{Candidate, RadixTree};
use crate::error::{BuildError, HttpError, RuleError};
use crate::rule::{split_path, substitute, MethodVec, Rule, Segment, ViewArgs};

/// Methods that never make two rules conflict: both are added implicitly
/// (`HEAD` with `GET`, `OPTIONS` by the app) to many rules sharing a path.
const IMPLICIT_METHODS: [Method; 2] = [Method::HEAD, Method::OPTIONS];

/// Result of matching a request path against a rule table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched rule
    pub rule: Arc<Rule>,
    /// Converted path arguments merged with rule defaults
    pub args: ViewArgs,
}

/// Rule table keyed by path template and method.
///
/// Rules are kept in insertion order for [`iter_rules`](Self::iter_rules) and
/// indexed in a segment radix tree for matching.
#[derive(Clone)]
pub struct UrlMap {
    rules: Vec<Arc<Rule>>,
    tree: RadixTree,
    strict_slashes: bool,
}

impl Default for UrlMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UrlMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlMap")
            .field("rules", &self.rules)
            .field("strict_slashes", &self.strict_slashes)
            .finish()
    }
}

impl UrlMap {
    /// Create an empty map with strict trailing slashes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strict_slashes(true)
    }

    /// Create an empty map with the given default for `strict_slashes`.
    #[must_use]
    pub fn with_strict_slashes(strict_slashes: bool) -> Self {
        Self {
            rules: Vec::new(),
            tree: RadixTree::default(),
            strict_slashes,
        }
    }

    /// Add a rule.
    ///
    /// Fails with [`RuleError::Conflict`] when another rule matches exactly the
    /// same paths with an overlapping method (implicit `HEAD`/`OPTIONS`
    /// excluded).
    pub fn add(&mut self, rule: Rule) -> Result<Arc<Rule>, RuleError> {
        for existing in &self.rules {
            if !existing.same_shape(&rule) {
                continue;
            }
            let clash = rule
                .methods()
                .iter()
                .filter(|m| !IMPLICIT_METHODS.contains(m))
                .find(|m| existing.allows(m));
            if let Some(method) = clash {
                warn!(
                    rule = %rule.rule(),
                    method = %method,
                    endpoint = %rule.endpoint(),
                    existing = %existing.endpoint(),
                    "Rejected conflicting rule"
                );
                return Err(RuleError::Conflict {
                    rule: rule.rule().to_string(),
                    method: method.clone(),
                    endpoint: rule.endpoint().to_string(),
                    existing: existing.endpoint().to_string(),
                });
            }
        }

        debug!(
            rule = %rule.rule(),
            endpoint = %rule.endpoint(),
            methods = ?rule.methods(),
            "Rule added"
        );

        let rule = Arc::new(rule);
        self.tree.insert(Arc::clone(&rule));
        self.rules.push(Arc::clone(&rule));
        Ok(rule)
    }

    /// Rules in insertion order.
    pub fn iter_rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn strict_slashes(&self) -> bool {
        self.strict_slashes
    }

    /// Bind the map for matching and URL building.
    #[must_use]
    pub fn bind(&self) -> MapAdapter<'_> {
        MapAdapter { map: self }
    }
}

/// Matcher and URL builder over a [`UrlMap`].
#[derive(Clone, Copy)]
pub struct MapAdapter<'a> {
    map: &'a UrlMap,
}

impl MapAdapter<'_> {
    /// Match a request path and method. Segments are percent-decoded before
    /// their converters see them.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Redirect`] when only the slashed form of a strict rule
    ///   matches, or the matched rule carries `redirect_to`
    /// - [`HttpError::MethodNotAllowed`] when the path matches with other methods
    /// - [`HttpError::NotFound`] otherwise, including paths that do not
    ///   decode to UTF-8
    pub fn match_path(&self, path: &str, method: &Method) -> Result<RouteMatch, HttpError> {
        let Some((decoded, trailing_slash)) = split_path(path) else {
            debug!(path = %path, "Path does not decode to UTF-8");
            return Err(HttpError::NotFound {
                path: path.to_string(),
            });
        };
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let candidates = self.map.tree.candidates(&segments);

        let mut allowed = MethodVec::new();
        let mut redirect = None;

        // Rules whose trailing slash agrees with the request come first
        for exact in [true, false] {
            for candidate in &candidates {
                for rule in candidate.rules {
                    let slash_matches = rule.template().has_trailing_slash() == trailing_slash;
                    if slash_matches != exact {
                        continue;
                    }
                    if !exact && self.is_strict(rule) {
                        if rule.template().has_trailing_slash()
                            && rule.allows(method)
                            && redirect.is_none()
                        {
                            redirect = Some(format!("{path}/"));
                        }
                        continue;
                    }
                    if rule.allows(method) {
                        return self.finish(rule, candidate);
                    }
                    for m in rule.methods() {
                        if !allowed.contains(m) {
                            allowed.push(m.clone());
                        }
                    }
                }
            }
        }

        if let Some(location) = redirect {
            debug!(path = %path, location = %location, "Redirecting to slashed rule");
            return Err(HttpError::Redirect { location });
        }
        if !allowed.is_empty() {
            debug!(path = %path, method = %method, allowed = ?allowed, "Method not allowed");
            return Err(HttpError::MethodNotAllowed {
                method: method.clone(),
                allowed: allowed.into_vec(),
            });
        }
        debug!(path = %path, method = %method, "No rule matched");
        Err(HttpError::NotFound {
            path: path.to_string(),
        })
    }

    /// Methods accepted at `path` by rules matching it exactly.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let Some((decoded, trailing_slash)) = split_path(path) else {
            return Vec::new();
        };
        let segments: Vec<&str> = decoded.iter().map(AsRef::as_ref).collect();
        let mut allowed = MethodVec::new();
        for candidate in self.map.tree.candidates(&segments) {
            for rule in candidate.rules {
                if rule.template().has_trailing_slash() != trailing_slash {
                    continue;
                }
                for m in rule.methods() {
                    if !allowed.contains(m) {
                        allowed.push(m.clone());
                    }
                }
            }
        }
        allowed.into_vec()
    }

    /// Build the URL path of `endpoint` from `args`.
    ///
    /// Arguments not consumed by the template (and not rule defaults) are
    /// appended as a query string. When several rules share the endpoint the
    /// first one whose arguments are all available wins.
    pub fn build(&self, endpoint: &str, args: &ViewArgs) -> Result<String, BuildError> {
        let mut first_missing = None;
        for rule in self.map.rules.iter().filter(|r| r.endpoint() == endpoint) {
            let defaults = &rule.options().defaults;
            match rule
                .arguments()
                .find(|name| !args.contains(name) && !defaults.contains_key(*name))
            {
                Some(name) => {
                    first_missing.get_or_insert_with(|| name.to_string());
                }
                None => return build_path(rule, args),
            }
        }
        match first_missing {
            Some(argument) => Err(BuildError::MissingArgument {
                endpoint: endpoint.to_string(),
                argument,
            }),
            None => Err(BuildError::UnknownEndpoint {
                endpoint: endpoint.to_string(),
            }),
        }
    }

    fn is_strict(&self, rule: &Rule) -> bool {
        rule.options()
            .strict_slashes
            .unwrap_or(self.map.strict_slashes)
    }

    fn finish(&self, rule: &Arc<Rule>, candidate: &Candidate<'_>) -> Result<RouteMatch, HttpError> {
        let mut args: ViewArgs = rule
            .arguments()
            .map(str::to_string)
            .zip(candidate.values.iter().cloned())
            .collect();
        for (name, value) in &rule.options().defaults {
            if !args.contains(name) {
                args.insert(name.clone(), value.clone());
            }
        }

        if let Some(target) = &rule.options().redirect_to {
            return Err(HttpError::Redirect {
                location: substitute(target, &args),
            });
        }

        Ok(RouteMatch {
            rule: Arc::clone(rule),
            args,
        })
    }
}

fn build_path(rule: &Rule, args: &ViewArgs) -> Result<String, BuildError> {
    let defaults = &rule.options().defaults;
    let mut path = String::new();
    let mut used = Vec::new();

    for segment in rule.template().segments() {
        path.push('/');
        match segment {
            Segment::Static(text) => path.push_str(text),
            Segment::Param { name, converter } => {
                let value = args
                    .get(name)
                    .or_else(|| defaults.get(name))
                    .ok_or_else(|| BuildError::MissingArgument {
                        endpoint: rule.endpoint().to_string(),
                        argument: name.clone(),
                    })?;
                let rendered =
                    converter
                        .to_segment(value)
                        .ok_or_else(|| BuildError::InvalidArgument {
                            argument: name.clone(),
                            value: value.to_string(),
                        })?;
                path.push_str(&rendered);
                used.push(name.as_str());
            }
        }
    }
    if path.is_empty() || rule.template().has_trailing_slash() {
        path.push('/');
    }

    let query: Vec<String> = args
        .iter()
        .filter(|(name, _)| !used.contains(name) && !defaults.contains_key(*name))
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(&value)
            )
        })
        .collect();
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query.join("&"));
    }
    Ok(path)
}
