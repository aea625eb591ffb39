use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use super::template::{PathTemplate, Segment};
use crate::error::RuleError;

/// Maximum number of methods stored inline on a rule.
/// GET/HEAD/OPTIONS plus one write method covers nearly every rule.
pub const MAX_INLINE_METHODS: usize = 4;

/// Method set of a rule, kept in insertion order without duplicates.
pub type MethodVec = SmallVec<[Method; MAX_INLINE_METHODS]>;

/// Per-rule options understood by the rule table, plus an opaque passthrough.
///
/// The named fields change how a rule matches. Everything in `extra` is
/// carried through registration untouched so containers can read their own
/// keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Redirect/strict behaviour for trailing slashes; `None` uses the map default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_slashes: Option<bool>,
    /// Values injected into the view arguments when the path lacks them
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Value>,
    /// Redirect target template; matching the rule answers 308
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Container-specific keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RuleOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a list of method names into a normalised method set.
///
/// Names are upper-cased and de-duplicated; `HEAD` is added whenever `GET` is
/// present.
pub fn normalize_methods<I, S>(rule: &str, methods: I) -> Result<MethodVec, RuleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = MethodVec::new();
    for name in methods {
        let upper = name.as_ref().trim().to_ascii_uppercase();
        let method = Method::from_bytes(upper.as_bytes()).map_err(|_| RuleError::InvalidMethod {
            method: name.as_ref().to_string(),
        })?;
        if !out.contains(&method) {
            out.push(method);
        }
    }
    if out.is_empty() {
        return Err(RuleError::NoMethods {
            rule: rule.to_string(),
        });
    }
    if out.contains(&Method::GET) && !out.contains(&Method::HEAD) {
        out.push(Method::HEAD);
    }
    Ok(out)
}

/// A single entry of a rule table: template, methods, endpoint and options.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    template: PathTemplate,
    methods: MethodVec,
    endpoint: String,
    options: RuleOptions,
}

impl Rule {
    /// Create a rule, validating the template and the method names.
    pub fn new<I, S>(
        path: &str,
        methods: I,
        endpoint: impl Into<String>,
        options: RuleOptions,
    ) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let template = PathTemplate::parse(path)?;
        let methods = normalize_methods(path, methods)?;
        Ok(Self {
            template,
            methods,
            endpoint: endpoint.into(),
            options,
        })
    }

    /// Create a rule from an already normalised method set.
    pub fn with_methods(
        path: &str,
        methods: &[Method],
        endpoint: impl Into<String>,
        options: RuleOptions,
    ) -> Result<Self, RuleError> {
        Self::new(path, methods.iter().map(Method::as_str), endpoint, options)
    }

    /// Raw template text, e.g. `/example/<string:my_str>`.
    #[must_use]
    pub fn rule(&self) -> &str {
        self.template.as_str()
    }

    #[must_use]
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// A leaf rule does not end in a slash.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.template.has_trailing_slash()
    }

    /// Argument names in path order.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.template.arguments()
    }

    /// Two rules overlap when they match exactly the same set of paths.
    pub(crate) fn same_shape(&self, other: &Rule) -> bool {
        let a = self.template.segments();
        let b = other.template.segments();
        self.template.has_trailing_slash() == other.template.has_trailing_slash()
            && a.len() == b.len()
            && a.iter().zip(b).all(|pair| match pair {
                (Segment::Static(x), Segment::Static(y)) => x == y,
                (
                    Segment::Param { converter: x, .. },
                    Segment::Param { converter: y, .. },
                ) => x == y,
                _ => false,
            })
    }
}
