//! Rights management schema accessors
//!
//! The typed accessor surface for the XMP Rights Management namespace,
//! composed over [`PropertyTree`]. Other schema namespaces follow the same
//! pattern: a thin facade that resolves qualified names and delegates to
//! the tree's typed operations.

use crate::error::Result;
use crate::name::{QualifiedName, PREFIX_SEPARATOR};
use crate::node::PropertyNode;
use crate::registry::{RIGHTS_NAMESPACE, RIGHTS_PREFIX};
use crate::tree::PropertyTree;

/// Certificate URL property
pub const CERTIFICATE: &str = "Certificate";
/// Rights-marked flag property
pub const MARKED: &str = "Marked";
/// Legal owners bag property
pub const OWNER: &str = "Owner";
/// Usage terms language-alternative property
pub const USAGE_TERMS: &str = "UsageTerms";
/// Web statement URL property
pub const WEB_STATEMENT: &str = "WebStatement";

/// Typed accessors for the rights management properties of one document
#[derive(Debug, Clone)]
pub struct RightsSchema {
    tree: PropertyTree,
    prefix: String,
}

impl RightsSchema {
    /// Create an empty schema instance under the preferred prefix
    pub fn new() -> Self {
        Self::with_tree(PropertyTree::new())
    }

    /// Attach to an existing tree (e.g. one populated by a parser)
    pub fn with_tree(tree: PropertyTree) -> Self {
        Self {
            tree,
            prefix: RIGHTS_PREFIX.to_string(),
        }
    }

    /// Attach to an existing tree under a non-preferred prefix
    pub fn with_prefix(tree: PropertyTree, prefix: impl Into<String>) -> Self {
        Self {
            tree,
            prefix: prefix.into(),
        }
    }

    /// The namespace URI this schema instance covers
    pub fn namespace_uri(&self) -> &'static str {
        RIGHTS_NAMESPACE
    }

    /// The prefix qualified names are formed with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The underlying property tree
    pub fn tree(&self) -> &PropertyTree {
        &self.tree
    }

    /// Mutable access to the underlying property tree
    pub fn tree_mut(&mut self) -> &mut PropertyTree {
        &mut self.tree
    }

    /// Unwrap into the underlying property tree (e.g. for serialization)
    pub fn into_tree(self) -> PropertyTree {
        self.tree
    }

    /// Add a legal owner for the described resource
    pub fn add_owner(&mut self, owner: &str) -> Result<()> {
        self.tree.add_bag_value(&self.qualified(OWNER), owner)
    }

    /// Remove a legal owner; absent owners are a no-op
    pub fn remove_owner(&mut self, owner: &str) -> Result<bool> {
        self.tree.remove_bag_value(&self.qualified(OWNER), owner)
    }

    /// The defined owners, in insertion order
    pub fn owners(&self) -> Vec<String> {
        self.tree.get_bag_values(&self.qualified(OWNER))
    }

    /// Set whether the resource is rights-managed
    pub fn set_marked(&mut self, marked: bool) -> Result<()> {
        let name = QualifiedName::new(&self.prefix, MARKED)?;
        self.tree.add_property(PropertyNode::boolean(name, marked))
    }

    /// Whether the resource is rights-managed, if set
    pub fn marked(&self) -> Option<bool> {
        self.tree
            .get_property(&self.qualified(MARKED))?
            .scalar()?
            .as_boolean()
    }

    /// Set the usage terms for a language (`None` for the default entry)
    pub fn add_usage_terms(&mut self, lang: Option<&str>, terms: &str) -> Result<()> {
        self.tree
            .set_lang_value(&self.qualified(USAGE_TERMS), lang, terms)
    }

    /// Set the default usage terms for this resource
    pub fn set_usage_terms(&mut self, terms: &str) -> Result<()> {
        self.add_usage_terms(None, terms)
    }

    /// The usage terms for a language (`None` for the default entry)
    pub fn usage_terms(&self, lang: Option<&str>) -> Option<&str> {
        self.tree.get_lang_value(&self.qualified(USAGE_TERMS), lang)
    }

    /// The languages usage terms are defined for
    pub fn usage_terms_languages(&self) -> Vec<&str> {
        self.tree.get_lang_tags(&self.qualified(USAGE_TERMS))
    }

    /// Set the web statement URL
    pub fn set_web_statement(&mut self, url: &str) -> Result<()> {
        self.set_url_property(WEB_STATEMENT, url)
    }

    /// The web statement URL, if set
    pub fn web_statement(&self) -> Option<&str> {
        self.url_property(WEB_STATEMENT)
    }

    /// Set the certificate URL
    pub fn set_certificate(&mut self, url: &str) -> Result<()> {
        self.set_url_property(CERTIFICATE, url)
    }

    /// The certificate URL, if set
    pub fn certificate(&self) -> Option<&str> {
        self.url_property(CERTIFICATE)
    }

    fn qualified(&self, local: &str) -> String {
        format!("{}{}{}", self.prefix, PREFIX_SEPARATOR, local)
    }

    fn set_url_property(&mut self, local: &str, url: &str) -> Result<()> {
        let name = QualifiedName::new(&self.prefix, local)?;
        let node = PropertyNode::url(name, url)?;
        self.tree.add_property(node)
    }

    /// URL-valued scalar, tolerating Text nodes from lenient parses
    fn url_property(&self, local: &str) -> Option<&str> {
        let value = self.tree.get_property(&self.qualified(local))?.scalar()?;
        value.as_url().or_else(|| value.as_text())
    }
}

impl Default for RightsSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use crate::error::XmpError;

    #[test]
    fn test_owner_bag() {
        let mut schema = RightsSchema::new();
        schema.add_owner("Alice").unwrap();
        schema.add_owner("Bob").unwrap();
        assert_eq!(schema.owners(), vec!["Alice", "Bob"]);

        assert!(schema.remove_owner("Alice").unwrap());
        assert_eq!(schema.owners(), vec!["Bob"]);
        assert!(!schema.remove_owner("Alice").unwrap());
    }

    #[test]
    fn test_marked_flag() {
        let mut schema = RightsSchema::new();
        assert_eq!(schema.marked(), None);

        schema.set_marked(true).unwrap();
        assert_eq!(schema.marked(), Some(true));

        schema.set_marked(false).unwrap();
        assert_eq!(schema.marked(), Some(false));
    }

    #[test]
    fn test_usage_terms_languages() {
        let mut schema = RightsSchema::new();
        schema.set_usage_terms("All rights reserved").unwrap();
        schema
            .add_usage_terms(Some("fr"), "Tous droits réservés")
            .unwrap();

        assert_eq!(schema.usage_terms(None), Some("All rights reserved"));
        assert_eq!(schema.usage_terms(Some("fr")), Some("Tous droits réservés"));
        assert_eq!(schema.usage_terms(Some("de")), None);
        assert_eq!(schema.usage_terms_languages(), vec!["x-default", "fr"]);
    }

    #[test]
    fn test_url_properties() {
        let mut schema = RightsSchema::new();
        schema
            .set_web_statement("https://example.com/rights")
            .unwrap();
        schema.set_certificate("https://example.com/cert").unwrap();

        assert_eq!(schema.web_statement(), Some("https://example.com/rights"));
        assert_eq!(schema.certificate(), Some("https://example.com/cert"));

        let err = schema.set_web_statement("no scheme here").unwrap_err();
        assert!(matches!(err, XmpError::Decode(_)));
    }

    #[test]
    fn test_custom_prefix() {
        let tree = PropertyTree::with_mode(ValidationMode::Lenient);
        let mut schema = RightsSchema::with_prefix(tree, "xr");
        schema.add_owner("Alice").unwrap();

        assert_eq!(schema.owners(), vec!["Alice"]);
        assert!(schema.tree().get_property("xr:Owner").is_some());
        assert!(schema.tree().get_property("xmpRights:Owner").is_none());
    }
}
