//! # Error Module
//!
//! Error types for the three phases a route goes through:
//!
//! - [`RuleError`] - configuration failures while building route tables or
//!   installing rules into a container. These surface at startup.
//! - [`HttpError`] - request-time conditions (no route, wrong method, slash
//!   redirect, handler abort). The [`App`](crate::app::App) renders them into
//!   responses.
//! - [`BuildError`] - failures while reversing an endpoint into a URL.

use http::Method;
use thiserror::Error;

/// Configuration error raised while creating rules, building a view class
/// route table, or registering rules on a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The path template could not be parsed
    #[error("invalid path template '{rule}': {reason}")]
    InvalidTemplate {
        /// The offending template
        rule: String,
        /// What is wrong with it
        reason: String,
    },
    /// A placeholder names a converter that does not exist
    #[error("unknown converter '{converter}' in path template '{rule}'")]
    UnknownConverter {
        /// The offending template
        rule: String,
        /// The converter name as written
        converter: String,
    },
    /// A method name is not a valid HTTP token
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod {
        /// The method name as written
        method: String,
    },
    /// A rule was declared without any method
    #[error("rule '{rule}' does not accept any method")]
    NoMethods {
        /// The offending template
        rule: String,
    },
    /// Two rules claim the same path and method
    #[error("rule '{rule}' ({method}) for endpoint '{endpoint}' conflicts with endpoint '{existing}'")]
    Conflict {
        /// Template of the rule being added
        rule: String,
        /// First overlapping method
        method: Method,
        /// Endpoint of the rule being added
        endpoint: String,
        /// Endpoint already holding the path and method
        existing: String,
    },
    /// An endpoint is already bound to a different view function
    #[error("view function mapping is overwriting an existing endpoint function: {endpoint}")]
    EndpointOverwrite {
        /// The endpoint id
        endpoint: String,
    },
    /// A blueprint with the same name was already registered on the app
    #[error("a blueprint named '{name}' is already registered")]
    DuplicateBlueprint {
        /// The blueprint name
        name: String,
    },
}

/// Request-time condition, modelled after the HTTP exceptions a router raises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// No rule matches the requested path
    #[error("404 Not Found: {path}")]
    NotFound {
        /// The requested path
        path: String,
    },
    /// The path matches but not with this method
    #[error("405 Method Not Allowed: {method}")]
    MethodNotAllowed {
        /// The requested method
        method: Method,
        /// Methods served at the path (may be empty when unknown)
        allowed: Vec<Method>,
    },
    /// The request must be repeated at another location
    #[error("308 Permanent Redirect: {location}")]
    Redirect {
        /// Target URL
        location: String,
    },
    /// Explicit abort from a handler
    #[error("{status} {message}")]
    Abort {
        /// HTTP status code
        status: u16,
        /// Message placed in the response body
        message: String,
    },
}

impl HttpError {
    /// Abort the current request with an arbitrary status.
    #[must_use]
    pub fn abort(status: u16, message: impl Into<String>) -> Self {
        HttpError::Abort {
            status,
            message: message.into(),
        }
    }

    /// Status code the error renders with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            HttpError::NotFound { .. } => 404,
            HttpError::MethodNotAllowed { .. } => 405,
            HttpError::Redirect { .. } => 308,
            HttpError::Abort { status, .. } => *status,
        }
    }
}

/// Error while building a URL for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No rule is registered under the endpoint
    #[error("could not build url for endpoint '{endpoint}'")]
    UnknownEndpoint {
        /// The requested endpoint
        endpoint: String,
    },
    /// The rule needs an argument that was not supplied
    #[error("could not build url for endpoint '{endpoint}': missing argument '{argument}'")]
    MissingArgument {
        /// The requested endpoint
        endpoint: String,
        /// Name of the missing argument
        argument: String,
    },
    /// A supplied value is not accepted by the argument's converter
    #[error("value {value} is not valid for argument '{argument}'")]
    InvalidArgument {
        /// Name of the argument
        argument: String,
        /// The rejected value, rendered as JSON
        value: String,
    },
    /// External URLs need a configured server name
    #[error("building an external url requires a server name")]
    MissingServerName,
}
