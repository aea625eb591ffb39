//! Path template parsing.
//!
//! Templates use angle-bracket placeholders: `/users/<id>`,
//! `/example/<string:my_str>`, `/items/<int:item_id>`. A placeholder occupies a
//! whole segment; the converter in front of the colon decides which segment
//! values it accepts and how they are typed in the view arguments.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

use super::ViewArgs;
use crate::error::RuleError;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<(?:(?P<conv>[A-Za-z_][A-Za-z0-9_]*):)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)>$")
        .expect("Failed to compile placeholder regex")
});

static INLINE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:[A-Za-z_][A-Za-z0-9_]*:)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)>")
        .expect("Failed to compile placeholder regex")
});

/// Converter attached to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Converter {
    /// Any non-empty segment (the default)
    String,
    /// Non-negative integer
    Int,
    /// Non-negative decimal with a fractional part, e.g. `1.5`
    Float,
}

impl Converter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" | "default" => Some(Converter::String),
            "int" => Some(Converter::Int),
            "float" => Some(Converter::Float),
            _ => None,
        }
    }

    /// Name as written in templates.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Converter::String => "string",
            Converter::Int => "int",
            Converter::Float => "float",
        }
    }

    /// Convert a raw path segment, or `None` when the segment is rejected.
    #[must_use]
    pub fn to_value(self, segment: &str) -> Option<Value> {
        if segment.is_empty() {
            return None;
        }
        match self {
            Converter::String => Some(Value::String(segment.to_string())),
            Converter::Int => {
                if !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                segment.parse::<u64>().ok().map(Value::from)
            }
            Converter::Float => {
                let (whole, frac) = segment.split_once('.')?;
                let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
                if !digits(whole) || !digits(frac) {
                    return None;
                }
                segment.parse::<f64>().ok().map(Value::from)
            }
        }
    }

    /// Render a value back into a path segment, or `None` when the value does
    /// not fit the converter.
    #[must_use]
    pub fn to_segment(self, value: &Value) -> Option<String> {
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        self.to_value(&raw)?;
        Some(urlencoding::encode(&raw).into_owned())
    }
}

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// `<converter:name>` placeholder
    Param {
        /// Argument name
        name: String,
        /// Converter applied to the segment
        converter: Converter,
    },
}

/// Parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl PathTemplate {
    /// Parse a template such as `/users/<int:id>/`.
    pub fn parse(raw: &str) -> Result<Self, RuleError> {
        let invalid = |reason: &str| RuleError::InvalidTemplate {
            rule: raw.to_string(),
            reason: reason.to_string(),
        };

        if !raw.starts_with('/') {
            return Err(invalid("templates must start with '/'"));
        }

        let trailing_slash = raw.len() > 1 && raw.ends_with('/');
        let body = &raw[1..];
        let body = if trailing_slash {
            &body[..body.len() - 1]
        } else {
            body
        };
        if trailing_slash && body.is_empty() {
            return Err(invalid("empty path segment"));
        }

        let mut segments = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        if !body.is_empty() {
            for piece in body.split('/') {
                if piece.is_empty() {
                    return Err(invalid("empty path segment"));
                }
                if !piece.contains('<') && !piece.contains('>') {
                    segments.push(Segment::Static(piece.to_string()));
                    continue;
                }
                let caps = PLACEHOLDER
                    .captures(piece)
                    .ok_or_else(|| invalid("placeholders must occupy a whole segment"))?;
                let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
                let converter = match caps.name("conv") {
                    Some(conv) => Converter::from_name(conv.as_str()).ok_or_else(|| {
                        RuleError::UnknownConverter {
                            rule: raw.to_string(),
                            converter: conv.as_str().to_string(),
                        }
                    })?,
                    None => Converter::String,
                };
                if names.contains(&name) {
                    return Err(invalid("duplicate argument name"));
                }
                names.push(name);
                segments.push(Segment::Param {
                    name: name.to_string(),
                    converter,
                });
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            trailing_slash,
        })
    }

    /// Template text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template ends in `/` (the root template does not count).
    #[must_use]
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Argument names in path order.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Static(_) => None,
        })
    }
}

/// Replace every `<name>` / `<conv:name>` in `target` with the matching
/// argument. Placeholders without an argument are left as written.
pub(crate) fn substitute(target: &str, args: &ViewArgs) -> String {
    INLINE_PLACEHOLDER
        .replace_all(target, |caps: &regex::Captures<'_>| {
            let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
            match args.get(name) {
                Some(Value::String(s)) => urlencoding::encode(s).into_owned(),
                Some(other) => other.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Split a request path into percent-decoded segments plus its
/// trailing-slash flag. Splitting happens before decoding, so `%2F` stays
/// inside its segment. `None` when a segment does not decode to UTF-8.
pub(crate) fn split_path(path: &str) -> Option<(Vec<Cow<'_, str>>, bool)> {
    let trailing_slash = path.len() > 1 && path.ends_with('/');
    let segments = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).ok())
        .collect::<Option<Vec<_>>>()?;
    Some((segments, trailing_slash))
}
