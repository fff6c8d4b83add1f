//! Scalar values and their canonical textual representation

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DecodeError;

/// Canonical boolean literals per the rights-management convention
pub const TRUE_LITERAL: &str = "True";
/// See [`TRUE_LITERAL`]
pub const FALSE_LITERAL: &str = "False";

/// RFC 3986 scheme prefix: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid regex"));

/// The supported scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// Free-form text
    Text,
    /// "True" / "False"
    Boolean,
    /// Base-10 signed 64-bit integer
    Integer,
    /// ISO 8601 date-time
    Date,
    /// Text with an RFC 3986 scheme prefix
    Url,
}

impl ScalarKind {
    /// Annotation-style label for this kind (e.g. "Boolean", "URL")
    pub fn label(&self) -> &'static str {
        match self {
            ScalarKind::Text => "Text",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Integer => "Integer",
            ScalarKind::Date => "Date",
            ScalarKind::Url => "URL",
        }
    }

    /// Parse an annotation-style label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Text" | "ProperName" | "AgentName" | "MIMEType" => Some(ScalarKind::Text),
            "Boolean" => Some(ScalarKind::Boolean),
            "Integer" => Some(ScalarKind::Integer),
            "Date" => Some(ScalarKind::Date),
            "URL" | "URI" => Some(ScalarKind::Url),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A typed scalar value
///
/// Each variant has a canonical textual form produced by [`encode`] and
/// recovered by [`decode`]; the pair is a lossless round trip for every
/// value the codec itself produced.
///
/// [`encode`]: XmpValue::encode
/// [`decode`]: XmpValue::decode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum XmpValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Date(DateTime<FixedOffset>),
    Url(String),
}

impl XmpValue {
    /// The scalar kind of this value
    pub fn kind(&self) -> ScalarKind {
        match self {
            XmpValue::Text(_) => ScalarKind::Text,
            XmpValue::Boolean(_) => ScalarKind::Boolean,
            XmpValue::Integer(_) => ScalarKind::Integer,
            XmpValue::Date(_) => ScalarKind::Date,
            XmpValue::Url(_) => ScalarKind::Url,
        }
    }

    /// Encode this value into its canonical textual form
    ///
    /// Never fails for values constructed through this module.
    pub fn encode(&self) -> String {
        match self {
            XmpValue::Text(text) => text.clone(),
            XmpValue::Boolean(true) => TRUE_LITERAL.to_string(),
            XmpValue::Boolean(false) => FALSE_LITERAL.to_string(),
            XmpValue::Integer(value) => value.to_string(),
            XmpValue::Date(value) => value.to_rfc3339(),
            XmpValue::Url(url) => url.clone(),
        }
    }

    /// Decode a value of the given kind from text
    pub fn decode(kind: ScalarKind, text: &str) -> Result<Self, DecodeError> {
        match kind {
            ScalarKind::Text => Ok(XmpValue::Text(text.to_string())),
            ScalarKind::Boolean => match text {
                TRUE_LITERAL => Ok(XmpValue::Boolean(true)),
                FALSE_LITERAL => Ok(XmpValue::Boolean(false)),
                _ => Err(DecodeError::malformed(kind, text)),
            },
            ScalarKind::Integer => text.parse::<i64>().map(XmpValue::Integer).map_err(|e| {
                use std::num::IntErrorKind;
                match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        DecodeError::out_of_range(kind, text)
                    }
                    _ => DecodeError::malformed(kind, text),
                }
            }),
            ScalarKind::Date => decode_date(text),
            ScalarKind::Url => {
                if URL_SCHEME.is_match(text) {
                    Ok(XmpValue::Url(text.to_string()))
                } else {
                    Err(DecodeError::malformed(kind, text))
                }
            }
        }
    }

    /// Get the text payload, if this is a Text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmpValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the boolean payload, if this is a Boolean value
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            XmpValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the integer payload, if this is an Integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            XmpValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the date payload, if this is a Date value
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            XmpValue::Date(value) => Some(value),
            _ => None,
        }
    }

    /// Get the URL payload, if this is a Url value
    pub fn as_url(&self) -> Option<&str> {
        match self {
            XmpValue::Url(url) => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for XmpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Decode an ISO 8601 date
///
/// Accepts full RFC 3339 date-times and the reduced date-only `YYYY-MM-DD`
/// form (taken as midnight UTC), matching what metadata producers emit.
fn decode_date(text: &str) -> Result<XmpValue, DecodeError> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Ok(XmpValue::Date(value));
    }
    if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() {
        let expanded = format!("{text}T00:00:00+00:00");
        return DateTime::parse_from_rfc3339(&expanded)
            .map(XmpValue::Date)
            .map_err(|_| DecodeError::malformed(ScalarKind::Date, text));
    }
    Err(DecodeError::malformed(ScalarKind::Date, text))
}
