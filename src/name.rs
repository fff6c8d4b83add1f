//! Qualified property names

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::XmpError;

/// Separator between a namespace prefix and a local name
pub const PREFIX_SEPARATOR: char = ':';

/// A namespace-qualified property name (e.g. `xmpRights:Marked`)
///
/// Unique within one property tree. The prefix resolves to a namespace URI
/// through the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace prefix (e.g. "xmpRights")
    prefix: String,
    /// Local property name (e.g. "Marked")
    local: String,
}

impl QualifiedName {
    /// Create a qualified name from its two segments
    pub fn new(prefix: impl Into<String>, local: impl Into<String>) -> Result<Self, XmpError> {
        let prefix = prefix.into();
        let local = local.into();
        if prefix.is_empty() || local.is_empty() {
            return Err(XmpError::InvalidName(format!(
                "{}{}{}",
                prefix, PREFIX_SEPARATOR, local
            )));
        }
        if prefix.contains(PREFIX_SEPARATOR) || local.contains(PREFIX_SEPARATOR) {
            return Err(XmpError::InvalidName(format!(
                "{}{}{}",
                prefix, PREFIX_SEPARATOR, local
            )));
        }
        Ok(Self { prefix, local })
    }

    /// Parse a name of the form `prefix:LocalName`
    ///
    /// Splits on the first separator; both segments must be non-empty.
    pub fn parse(name: &str) -> Result<Self, XmpError> {
        match name.split_once(PREFIX_SEPARATOR) {
            Some((prefix, local)) => Self::new(prefix, local),
            None => Err(XmpError::InvalidName(name.to_string())),
        }
    }

    /// The namespace prefix segment
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The local name segment
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, PREFIX_SEPARATOR, self.local)
    }
}

impl std::str::FromStr for QualifiedName {
    type Err = XmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
