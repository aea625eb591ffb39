use http::header::{HeaderName, HeaderValue, ALLOW, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, Method};
use serde_json::{json, Value};

use crate::error::HttpError;
use crate::ids::RequestId;
use crate::rule::{Rule, ViewArgs};

/// Response or request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    /// `text/plain` body
    Text(String),
    /// `application/json` body
    Json(Value),
}

impl Body {
    /// Text content, if this is a text body.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON content, if this is a JSON body.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Render the body as bytes the way it would go on the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Body::Empty => Vec::new(),
            Body::Text(s) => s.as_bytes().to_vec(),
            Body::Json(v) => v.to_string().into_bytes(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Empty => None,
            Body::Text(_) => Some("text/plain; charset=utf-8"),
            Body::Json(_) => Some("application/json"),
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<Value> for Body {
    fn from(v: Value) -> Self {
        Body::Json(v)
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

/// Incoming request as seen by the app.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Create a request for `target`, which may carry a query string
    /// (`/items?page=2`).
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    #[must_use]
    pub fn get(target: &str) -> Self {
        Self::new(Method::GET, target)
    }

    #[must_use]
    pub fn post(target: &str) -> Self {
        Self::new(Method::POST, target)
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decoded value of the last query parameter called `name`.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let decode = |s: &str| {
            let s = s.replace('+', " ");
            urlencoding::decode(&s).map(|c| c.into_owned()).unwrap_or(s)
        };
        self.query
            .as_deref()?
            .split('&')
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(k) == name).then(|| decode(v))
            })
            .last()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Create a response; `content-type` follows the body kind.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Body>) -> Self {
        let body = body.into();
        let mut headers = HeaderMap::new();
        if let Some(ct) = body.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        Self {
            status,
            headers,
            body,
        }
    }

    /// `200 OK` with the given body.
    #[must_use]
    pub fn ok(body: impl Into<Body>) -> Self {
        Self::new(200, body)
    }

    /// Render a request-time error.
    #[must_use]
    pub fn from_error(err: &HttpError) -> Self {
        match err {
            HttpError::NotFound { .. } => Self::new(404, json!({ "error": "Not Found" })),
            HttpError::MethodNotAllowed { allowed, .. } => {
                let mut res = Self::new(405, json!({ "error": "Method Not Allowed" }));
                res.set_allow(allowed);
                res
            }
            HttpError::Redirect { location } => {
                let mut res = Self::new(308, Body::Empty);
                if let Ok(value) = HeaderValue::from_str(location) {
                    res.headers.insert(LOCATION, value);
                }
                res
            }
            HttpError::Abort { status, message } => {
                Self::new(*status, json!({ "error": message }))
            }
        }
    }

    /// Automatic `OPTIONS` answer listing the allowed methods.
    #[must_use]
    pub fn options(allowed: &[Method]) -> Self {
        let mut res = Self::new(200, Body::Empty);
        res.set_allow(allowed);
        res
    }

    fn set_allow(&mut self, allowed: &[Method]) {
        let mut names: Vec<&str> = allowed.iter().map(Method::as_str).collect();
        names.sort_unstable();
        if let Ok(value) = HeaderValue::from_str(&names.join(", ")) {
            self.headers.insert(ALLOW, value);
        }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Drop the body, keeping status and headers (used for `HEAD`).
    pub fn clear_body(&mut self) {
        self.body = Body::Empty;
    }

    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }
}

/// Everything a view function can see about the request it serves.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub(crate) request: &'a Request,
    pub(crate) rule: &'a Rule,
    pub(crate) args: &'a ViewArgs,
    pub(crate) request_id: RequestId,
}

impl<'a> RequestContext<'a> {
    /// Assemble a context by hand, e.g. to drive a view function in tests.
    #[must_use]
    pub fn new(request: &'a Request, rule: &'a Rule, args: &'a ViewArgs) -> Self {
        Self {
            request,
            rule,
            args,
            request_id: RequestId::from_headers(request.headers()),
        }
    }

    #[must_use]
    pub fn request(&self) -> &'a Request {
        self.request
    }

    #[must_use]
    pub fn method(&self) -> &'a Method {
        self.request.method()
    }

    /// The matched rule; `url_rule().rule()` is the raw path template.
    #[must_use]
    pub fn url_rule(&self) -> &'a Rule {
        self.rule
    }

    /// Arguments extracted from the path.
    #[must_use]
    pub fn view_args(&self) -> &'a ViewArgs {
        self.args
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}
