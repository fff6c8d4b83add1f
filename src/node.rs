//! Property nodes and structural kinds

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, XmpError};
use crate::name::QualifiedName;
use crate::value::{ScalarKind, XmpValue};

/// Language tag of the distinguished default entry in a lang-alt property
pub const DEFAULT_LANG: &str = "x-default";

/// The shape of a property's value, as declared by the schema registry
///
/// Carried on every node and immutable once the node is constructed. The
/// scalar type is part of the kind, so a registry entry declaring a
/// property as Boolean can reject a Text node of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralKind {
    /// A single typed scalar
    Scalar(ScalarKind),
    /// Unordered collection; adds are idempotent, insertion order retained
    Bag(ScalarKind),
    /// Ordered collection; duplicates preserved
    Sequence(ScalarKind),
    /// Language tag to text mapping with an `x-default` entry
    LangAlt,
}

impl StructuralKind {
    /// Annotation-style label (e.g. "Boolean", "bag ProperName", "Lang Alt")
    pub fn label(&self) -> String {
        match self {
            StructuralKind::Scalar(kind) => kind.label().to_string(),
            StructuralKind::Bag(kind) => format!("bag {}", kind.label()),
            StructuralKind::Sequence(kind) => format!("seq {}", kind.label()),
            StructuralKind::LangAlt => "Lang Alt".to_string(),
        }
    }

    /// Parse an annotation-style label
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "Lang Alt" => Some(StructuralKind::LangAlt),
            rest => {
                if let Some(item) = rest.strip_prefix("bag ") {
                    ScalarKind::from_label(item.trim()).map(StructuralKind::Bag)
                } else if let Some(item) = rest.strip_prefix("seq ") {
                    ScalarKind::from_label(item.trim()).map(StructuralKind::Sequence)
                } else {
                    ScalarKind::from_label(rest).map(StructuralKind::Scalar)
                }
            }
        }
    }

    /// The scalar type carried by this kind, if it has one
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            StructuralKind::Scalar(kind)
            | StructuralKind::Bag(kind)
            | StructuralKind::Sequence(kind) => Some(*kind),
            StructuralKind::LangAlt => None,
        }
    }

    fn is_collection(&self) -> bool {
        matches!(self, StructuralKind::Bag(_) | StructuralKind::Sequence(_))
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Value payload of a node; always matches the node's declared kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Payload {
    Scalar(XmpValue),
    Collection(Vec<XmpValue>),
    LangAlt(Vec<(String, String)>),
}

/// A single named, typed metadata entry
///
/// Created by a typed constructor, mutated through the operations matching
/// its structural kind, and owned by the property tree it is inserted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    name: QualifiedName,
    kind: StructuralKind,
    payload: Payload,
}

impl PropertyNode {
    /// Create a scalar node from an already-typed value
    pub fn from_scalar(name: QualifiedName, value: XmpValue) -> Self {
        Self {
            name,
            kind: StructuralKind::Scalar(value.kind()),
            payload: Payload::Scalar(value),
        }
    }

    /// Create a Text scalar node
    pub fn text(name: QualifiedName, value: impl Into<String>) -> Self {
        Self::from_scalar(name, XmpValue::Text(value.into()))
    }

    /// Create a Boolean scalar node
    pub fn boolean(name: QualifiedName, value: bool) -> Self {
        Self::from_scalar(name, XmpValue::Boolean(value))
    }

    /// Create an Integer scalar node
    pub fn integer(name: QualifiedName, value: i64) -> Self {
        Self::from_scalar(name, XmpValue::Integer(value))
    }

    /// Create a Date scalar node
    pub fn date(name: QualifiedName, value: DateTime<FixedOffset>) -> Self {
        Self::from_scalar(name, XmpValue::Date(value))
    }

    /// Create a URL scalar node, validating the scheme prefix
    pub fn url(name: QualifiedName, url: &str) -> Result<Self> {
        let value = XmpValue::decode(ScalarKind::Url, url)?;
        Ok(Self::from_scalar(name, value))
    }

    /// Create an empty bag node holding scalars of the given type
    pub fn bag(name: QualifiedName, item_kind: ScalarKind) -> Self {
        Self {
            name,
            kind: StructuralKind::Bag(item_kind),
            payload: Payload::Collection(Vec::new()),
        }
    }

    /// Create an empty sequence node holding scalars of the given type
    pub fn sequence(name: QualifiedName, item_kind: ScalarKind) -> Self {
        Self {
            name,
            kind: StructuralKind::Sequence(item_kind),
            payload: Payload::Collection(Vec::new()),
        }
    }

    /// Create an empty language-alternative node
    pub fn lang_alt(name: QualifiedName) -> Self {
        Self {
            name,
            kind: StructuralKind::LangAlt,
            payload: Payload::LangAlt(Vec::new()),
        }
    }

    /// The qualified name this node is stored under
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The declared structural kind; immutable for the node's lifetime
    pub fn kind(&self) -> StructuralKind {
        self.kind
    }

    /// Replace the payload of a scalar node
    pub fn set_scalar(&mut self, value: XmpValue) -> Result<()> {
        match self.kind {
            StructuralKind::Scalar(kind) if kind == value.kind() => {
                self.payload = Payload::Scalar(value);
                Ok(())
            }
            _ => Err(self.type_mismatch("set_scalar")),
        }
    }

    /// The scalar payload, if this is a scalar node
    pub fn scalar(&self) -> Option<&XmpValue> {
        match &self.payload {
            Payload::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Append a value to a bag or sequence node
    ///
    /// Bag adds are idempotent: an exact duplicate of an existing value is
    /// dropped. Sequences preserve duplicates and insertion order.
    pub fn add_value(&mut self, value: XmpValue) -> Result<()> {
        if !self.kind.is_collection() || self.kind.scalar_kind() != Some(value.kind()) {
            return Err(self.type_mismatch("add_value"));
        }
        let deduplicate = matches!(self.kind, StructuralKind::Bag(_));
        if let Payload::Collection(values) = &mut self.payload {
            if deduplicate && values.contains(&value) {
                return Ok(());
            }
            values.push(value);
        }
        Ok(())
    }

    /// Remove the first matching value from a bag or sequence node
    ///
    /// Returns whether a value was removed; an absent value is a no-op.
    pub fn remove_value(&mut self, value: &XmpValue) -> Result<bool> {
        if !self.kind.is_collection() {
            return Err(self.type_mismatch("remove_value"));
        }
        if let Payload::Collection(values) = &mut self.payload {
            if let Some(position) = values.iter().position(|v| v == value) {
                values.remove(position);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The collection payload, if this is a bag or sequence node
    pub fn values(&self) -> Option<&[XmpValue]> {
        match &self.payload {
            Payload::Collection(values) => Some(values),
            _ => None,
        }
    }

    /// Upsert the entry for a language tag on a lang-alt node
    ///
    /// `None` means the distinguished default tag. Tags compare
    /// case-insensitively and are stored lowercase.
    pub fn set_lang_value(&mut self, lang: Option<&str>, text: impl Into<String>) -> Result<()> {
        if self.kind != StructuralKind::LangAlt {
            return Err(self.type_mismatch("set_lang_value"));
        }
        let tag = normalize_lang(lang);
        let text = text.into();
        if let Payload::LangAlt(entries) = &mut self.payload {
            match entries.iter_mut().find(|(existing, _)| *existing == tag) {
                Some((_, value)) => *value = text,
                None => entries.push((tag, text)),
            }
        }
        Ok(())
    }

    /// The text for a language tag, if present
    pub fn lang_value(&self, lang: Option<&str>) -> Option<&str> {
        let tag = normalize_lang(lang);
        match &self.payload {
            Payload::LangAlt(entries) => entries
                .iter()
                .find(|(existing, _)| *existing == tag)
                .map(|(_, text)| text.as_str()),
            _ => None,
        }
    }

    /// All language tags defined on a lang-alt node, in insertion order
    pub fn lang_tags(&self) -> Vec<&str> {
        match &self.payload {
            Payload::LangAlt(entries) => entries.iter().map(|(tag, _)| tag.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    fn type_mismatch(&self, operation: &'static str) -> XmpError {
        XmpError::TypeMismatch {
            name: self.name.to_string(),
            kind: self.kind.label(),
            operation,
        }
    }
}

fn normalize_lang(lang: Option<&str>) -> String {
    match lang {
        Some(tag) if !tag.is_empty() => tag.to_ascii_lowercase(),
        _ => DEFAULT_LANG.to_string(),
    }
}
