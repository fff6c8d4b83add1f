//! Schema registry
//!
//! Maps a namespace URI and its preferred prefix to the set of known
//! property names and their declared structural kinds. Populated once at
//! process start (built-in catalog plus optional configuration additions)
//! and read-only afterwards; the property tree consults it when validating
//! insertions.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::name::QualifiedName;
use crate::node::StructuralKind;
use crate::value::ScalarKind;

/// XMP Rights Management namespace URI
pub const RIGHTS_NAMESPACE: &str = "http://ns.adobe.com/xap/1.0/rights/";
/// Preferred prefix for the rights management namespace
pub const RIGHTS_PREFIX: &str = "xmpRights";

/// Dublin Core namespace URI
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
/// Preferred prefix for the Dublin Core namespace
pub const DC_PREFIX: &str = "dc";

/// XMP Basic namespace URI
pub const XMP_BASIC_NAMESPACE: &str = "http://ns.adobe.com/xap/1.0/";
/// Preferred prefix for the XMP Basic namespace
pub const XMP_BASIC_PREFIX: &str = "xmp";

/// Declared properties of one namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Namespace URI the descriptor covers
    pub namespace_uri: String,
    /// Prefix used when forming qualified names in this namespace
    pub preferred_prefix: String,
    /// Local property name to declared structural kind
    pub property_kinds: HashMap<String, StructuralKind>,
}

impl SchemaDescriptor {
    /// Create an empty descriptor
    pub fn new(namespace_uri: impl Into<String>, preferred_prefix: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            preferred_prefix: preferred_prefix.into(),
            property_kinds: HashMap::new(),
        }
    }

    /// Declare a property
    pub fn with_property(mut self, local: impl Into<String>, kind: StructuralKind) -> Self {
        self.property_kinds.insert(local.into(), kind);
        self
    }

    /// The declared kind of a local property name, if known
    pub fn declared_kind(&self, local: &str) -> Option<StructuralKind> {
        self.property_kinds.get(local).copied()
    }

    /// Declared property names, sorted for deterministic listings
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.property_kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// The schema registry: namespace URI to descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    descriptors: HashMap<String, SchemaDescriptor>,
    /// Prefix to namespace URI, kept in sync with `descriptors`
    prefixes: HashMap<String, String>,
}

impl SchemaRegistry {
    /// Create a registry with no namespaces
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in namespace catalog
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(rights_descriptor());
        registry.register(dublin_core_descriptor());
        registry.register(xmp_basic_descriptor());
        registry
    }

    /// The process-wide registry (built-in catalog)
    ///
    /// Initialized on first use and never mutated afterwards; trees hold a
    /// shared handle to it.
    pub fn global() -> Arc<SchemaRegistry> {
        static GLOBAL: Lazy<Arc<SchemaRegistry>> =
            Lazy::new(|| Arc::new(SchemaRegistry::builtin()));
        Arc::clone(&GLOBAL)
    }

    /// Register a descriptor, replacing any prior entry for its URI
    ///
    /// Only meaningful during startup, before the registry is shared.
    pub fn register(&mut self, descriptor: SchemaDescriptor) {
        self.prefixes.insert(
            descriptor.preferred_prefix.clone(),
            descriptor.namespace_uri.clone(),
        );
        self.descriptors
            .insert(descriptor.namespace_uri.clone(), descriptor);
    }

    /// Look up a descriptor by namespace URI
    pub fn lookup(&self, namespace_uri: &str) -> Option<&SchemaDescriptor> {
        self.descriptors.get(namespace_uri)
    }

    /// Look up a descriptor by preferred prefix
    pub fn lookup_prefix(&self, prefix: &str) -> Option<&SchemaDescriptor> {
        self.prefixes
            .get(prefix)
            .and_then(|uri| self.descriptors.get(uri))
    }

    /// The declared kind of a property in a namespace, if known
    pub fn declared_kind(&self, namespace_uri: &str, local: &str) -> Option<StructuralKind> {
        self.lookup(namespace_uri)
            .and_then(|descriptor| descriptor.declared_kind(local))
    }

    /// The declared kind for a qualified name, resolved through its prefix
    pub fn declared_kind_for(&self, name: &QualifiedName) -> Option<StructuralKind> {
        self.lookup_prefix(name.prefix())
            .and_then(|descriptor| descriptor.declared_kind(name.local()))
    }

    /// All descriptors, sorted by namespace URI for deterministic listings
    pub fn namespaces(&self) -> Vec<&SchemaDescriptor> {
        let mut all: Vec<_> = self.descriptors.values().collect();
        all.sort_unstable_by(|a, b| a.namespace_uri.cmp(&b.namespace_uri));
        all
    }
}

fn rights_descriptor() -> SchemaDescriptor {
    SchemaDescriptor::new(RIGHTS_NAMESPACE, RIGHTS_PREFIX)
        .with_property("Certificate", StructuralKind::Scalar(ScalarKind::Url))
        .with_property("Marked", StructuralKind::Scalar(ScalarKind::Boolean))
        .with_property("Owner", StructuralKind::Bag(ScalarKind::Text))
        .with_property("UsageTerms", StructuralKind::LangAlt)
        .with_property("WebStatement", StructuralKind::Scalar(ScalarKind::Url))
}

fn dublin_core_descriptor() -> SchemaDescriptor {
    SchemaDescriptor::new(DC_NAMESPACE, DC_PREFIX)
        .with_property("contributor", StructuralKind::Bag(ScalarKind::Text))
        .with_property("coverage", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("creator", StructuralKind::Sequence(ScalarKind::Text))
        .with_property("date", StructuralKind::Sequence(ScalarKind::Date))
        .with_property("description", StructuralKind::LangAlt)
        .with_property("format", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("identifier", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("language", StructuralKind::Bag(ScalarKind::Text))
        .with_property("publisher", StructuralKind::Bag(ScalarKind::Text))
        .with_property("relation", StructuralKind::Bag(ScalarKind::Text))
        .with_property("rights", StructuralKind::LangAlt)
        .with_property("source", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("subject", StructuralKind::Bag(ScalarKind::Text))
        .with_property("title", StructuralKind::LangAlt)
        .with_property("type", StructuralKind::Bag(ScalarKind::Text))
}

fn xmp_basic_descriptor() -> SchemaDescriptor {
    SchemaDescriptor::new(XMP_BASIC_NAMESPACE, XMP_BASIC_PREFIX)
        .with_property("CreateDate", StructuralKind::Scalar(ScalarKind::Date))
        .with_property("CreatorTool", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("Identifier", StructuralKind::Bag(ScalarKind::Text))
        .with_property("Label", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("MetadataDate", StructuralKind::Scalar(ScalarKind::Date))
        .with_property("ModifyDate", StructuralKind::Scalar(ScalarKind::Date))
        .with_property("Nickname", StructuralKind::Scalar(ScalarKind::Text))
        .with_property("Rating", StructuralKind::Scalar(ScalarKind::Integer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let registry = SchemaRegistry::builtin();

        let rights = registry.lookup(RIGHTS_NAMESPACE).unwrap();
        assert_eq!(rights.preferred_prefix, RIGHTS_PREFIX);
        assert_eq!(
            rights.declared_kind("Marked"),
            Some(StructuralKind::Scalar(ScalarKind::Boolean))
        );
        assert_eq!(
            rights.declared_kind("Owner"),
            Some(StructuralKind::Bag(ScalarKind::Text))
        );
        assert_eq!(rights.declared_kind("Unknown"), None);
    }

    #[test]
    fn test_prefix_resolution() {
        let registry = SchemaRegistry::builtin();
        let name = QualifiedName::parse("xmpRights:UsageTerms").unwrap();
        assert_eq!(
            registry.declared_kind_for(&name),
            Some(StructuralKind::LangAlt)
        );

        let unknown = QualifiedName::parse("custom:Field").unwrap();
        assert_eq!(registry.declared_kind_for(&unknown), None);
    }

    #[test]
    fn test_register_replaces_by_uri() {
        let mut registry = SchemaRegistry::empty();
        registry.register(
            SchemaDescriptor::new("http://example.com/ns/", "ex")
                .with_property("Flag", StructuralKind::Scalar(ScalarKind::Boolean)),
        );
        registry.register(
            SchemaDescriptor::new("http://example.com/ns/", "ex")
                .with_property("Flag", StructuralKind::Scalar(ScalarKind::Text)),
        );

        assert_eq!(registry.namespaces().len(), 1);
        assert_eq!(
            registry.declared_kind("http://example.com/ns/", "Flag"),
            Some(StructuralKind::Scalar(ScalarKind::Text))
        );
    }

    #[test]
    fn test_namespaces_are_sorted() {
        let registry = SchemaRegistry::builtin();
        let uris: Vec<_> = registry
            .namespaces()
            .iter()
            .map(|d| d.namespace_uri.as_str())
            .collect();
        let mut sorted = uris.clone();
        sorted.sort_unstable();
        assert_eq!(uris, sorted);
    }
}
