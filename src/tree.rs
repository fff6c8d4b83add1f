//! Property tree
//!
//! The container holding the property nodes of one metadata document:
//! add/get/remove/list under unique qualified names, plus the get-or-create
//! composites the schema accessor layers drive. Insertions are validated
//! against the schema registry in strict or lenient mode.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ValidationMode;
use crate::error::{Result, XmpError};
use crate::name::QualifiedName;
use crate::node::{PropertyNode, StructuralKind};
use crate::registry::SchemaRegistry;
use crate::value::{ScalarKind, XmpValue};

/// Insertion-ordered container of property nodes for one document
///
/// Keys are unique within a tree; inserting under an existing name replaces
/// the prior node in place, so listing order stays stable across edits and
/// re-serialization is reproducible. The tree exclusively owns its nodes;
/// callers receive references.
///
/// All mutation goes through `&mut self`, so the get-or-create composites
/// cannot race. A tree shared across threads needs an external lock.
#[derive(Debug, Clone)]
pub struct PropertyTree {
    nodes: Vec<PropertyNode>,
    index: HashMap<QualifiedName, usize>,
    registry: Arc<SchemaRegistry>,
    mode: ValidationMode,
}

impl PropertyTree {
    /// Create an empty tree using the process-wide registry, lenient mode
    pub fn new() -> Self {
        Self::with_registry(SchemaRegistry::global(), ValidationMode::default())
    }

    /// Create an empty tree using the process-wide registry
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self::with_registry(SchemaRegistry::global(), mode)
    }

    /// Create an empty tree against an explicit registry
    pub fn with_registry(registry: Arc<SchemaRegistry>, mode: ValidationMode) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            registry,
            mode,
        }
    }

    /// The validation mode insertions are checked under
    pub fn validation_mode(&self) -> ValidationMode {
        self.mode
    }

    /// The registry insertions are validated against
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Number of properties in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no properties
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node under its qualified name, replacing any prior node
    ///
    /// In strict mode a node whose kind conflicts with the registry's
    /// declared kind for that name fails with `SchemaViolation`; lenient
    /// mode accepts it with a warning. Names in unregistered namespaces
    /// pass in both modes.
    pub fn add_property(&mut self, node: PropertyNode) -> Result<()> {
        self.validate_kind(node.name(), node.kind())?;
        match self.index.get(node.name()) {
            Some(&position) => {
                self.nodes[position] = node;
            }
            None => {
                self.index.insert(node.name().clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        Ok(())
    }

    /// Look up a node by qualified name; absence is not an error
    pub fn get_property(&self, name: &str) -> Option<&PropertyNode> {
        let qname = QualifiedName::parse(name).ok()?;
        self.index.get(&qname).map(|&position| &self.nodes[position])
    }

    /// Remove a node by qualified name
    ///
    /// Returns whether a node was removed; removing an absent name is an
    /// idempotent no-op.
    pub fn remove_property(&mut self, name: &str) -> bool {
        let Ok(qname) = QualifiedName::parse(name) else {
            return false;
        };
        let Some(position) = self.index.remove(&qname) else {
            return false;
        };
        self.nodes.remove(position);
        for node in &self.nodes[position..] {
            if let Some(entry) = self.index.get_mut(node.name()) {
                *entry -= 1;
            }
        }
        true
    }

    /// All `(qualified name, node)` pairs in insertion order
    ///
    /// The order is stable and deterministic so re-serialization of an
    /// unchanged document reproduces itself.
    pub fn list_properties(&self) -> impl Iterator<Item = (&QualifiedName, &PropertyNode)> {
        self.nodes.iter().map(|node| (node.name(), node))
    }

    // ---- get-or-create composites -----------------------------------------

    /// Append a value to the bag under `name`, creating the bag if absent
    ///
    /// The value text is decoded per the bag's item type (declared by the
    /// registry, Text otherwise). Exact duplicates collapse.
    pub fn add_bag_value(&mut self, name: &str, value: &str) -> Result<()> {
        self.add_collection_value(name, value, false)
    }

    /// Append a value to the sequence under `name`, creating it if absent
    ///
    /// Sequences preserve duplicates and insertion order.
    pub fn add_sequence_value(&mut self, name: &str, value: &str) -> Result<()> {
        self.add_collection_value(name, value, true)
    }

    /// Remove the first matching value from the bag under `name`
    ///
    /// A missing node or value is a no-op returning `false`; the node is
    /// never created by a removal.
    pub fn remove_bag_value(&mut self, name: &str, value: &str) -> Result<bool> {
        self.remove_collection_value(name, value)
    }

    /// Remove the first matching value from the sequence under `name`
    pub fn remove_sequence_value(&mut self, name: &str, value: &str) -> Result<bool> {
        self.remove_collection_value(name, value)
    }

    /// The encoded values of the bag under `name`, empty when absent
    pub fn get_bag_values(&self, name: &str) -> Vec<String> {
        self.collection_values(name)
    }

    /// The encoded values of the sequence under `name`, empty when absent
    pub fn get_sequence_values(&self, name: &str) -> Vec<String> {
        self.collection_values(name)
    }

    /// Upsert a language entry under `name`, creating the node if absent
    ///
    /// `None` addresses the distinguished default entry.
    pub fn set_lang_value(&mut self, name: &str, lang: Option<&str>, text: &str) -> Result<()> {
        let qname = QualifiedName::parse(name)?;
        if !self.index.contains_key(&qname) {
            debug!(name = %qname, "creating language-alternative property");
            self.add_property(PropertyNode::lang_alt(qname.clone()))?;
        }
        self.node_mut(&qname).set_lang_value(lang, text)
    }

    /// The text for a language tag under `name`, if present
    pub fn get_lang_value(&self, name: &str, lang: Option<&str>) -> Option<&str> {
        self.get_property(name)?.lang_value(lang)
    }

    /// The language tags defined under `name`, empty when absent
    pub fn get_lang_tags(&self, name: &str) -> Vec<&str> {
        self.get_property(name)
            .map(|node| node.lang_tags())
            .unwrap_or_default()
    }

    // ---- internals ---------------------------------------------------------

    fn add_collection_value(&mut self, name: &str, value: &str, sequence: bool) -> Result<()> {
        let qname = QualifiedName::parse(name)?;
        let existing = self
            .index
            .get(&qname)
            .map(|&position| self.nodes[position].kind());
        let kind = existing.unwrap_or_else(|| self.creation_kind(&qname, sequence));
        let item_kind = kind.scalar_kind().unwrap_or(ScalarKind::Text);
        // Decode before get-or-create so a failed add leaves no node behind
        let value = XmpValue::decode(item_kind, value)?;
        if existing.is_none() {
            debug!(name = %qname, kind = %kind, "creating collection property");
            let node = match kind {
                StructuralKind::Sequence(item) => PropertyNode::sequence(qname.clone(), item),
                StructuralKind::Bag(item) => PropertyNode::bag(qname.clone(), item),
                // creation_kind only yields collection kinds
                _ => PropertyNode::bag(qname.clone(), ScalarKind::Text),
            };
            self.add_property(node)?;
        }
        self.node_mut(&qname).add_value(value)
    }

    fn remove_collection_value(&mut self, name: &str, value: &str) -> Result<bool> {
        let Ok(qname) = QualifiedName::parse(name) else {
            return Ok(false);
        };
        let Some(&position) = self.index.get(&qname) else {
            return Ok(false);
        };
        let item_kind = self.nodes[position]
            .kind()
            .scalar_kind()
            .unwrap_or(ScalarKind::Text);
        // Text that does not decode to the item type cannot match anything
        let Ok(value) = XmpValue::decode(item_kind, value) else {
            return Ok(false);
        };
        self.nodes[position].remove_value(&value)
    }

    fn collection_values(&self, name: &str) -> Vec<String> {
        self.get_property(name)
            .and_then(|node| node.values())
            .map(|values| values.iter().map(XmpValue::encode).collect())
            .unwrap_or_default()
    }

    /// Pick the kind for an implicitly created collection node
    ///
    /// The registry's declared item type wins when the declared shape
    /// matches the requested one; otherwise Text, and `add_property`
    /// decides whether the shape conflict is fatal.
    fn creation_kind(&self, qname: &QualifiedName, sequence: bool) -> StructuralKind {
        match (self.registry.declared_kind_for(qname), sequence) {
            (Some(kind @ StructuralKind::Bag(_)), false) => kind,
            (Some(kind @ StructuralKind::Sequence(_)), true) => kind,
            (_, false) => StructuralKind::Bag(ScalarKind::Text),
            (_, true) => StructuralKind::Sequence(ScalarKind::Text),
        }
    }

    fn validate_kind(&self, name: &QualifiedName, actual: StructuralKind) -> Result<()> {
        let Some(declared) = self.registry.declared_kind_for(name) else {
            return Ok(());
        };
        if declared == actual {
            return Ok(());
        }
        match self.mode {
            ValidationMode::Strict => Err(XmpError::SchemaViolation {
                name: name.to_string(),
                declared: declared.label(),
                actual: actual.label(),
            }),
            ValidationMode::Lenient => {
                warn!(
                    name = %name,
                    declared = %declared,
                    actual = %actual,
                    "accepting property whose kind conflicts with the registry"
                );
                Ok(())
            }
        }
    }

    /// Mutable access to a node known to be present
    fn node_mut(&mut self, qname: &QualifiedName) -> &mut PropertyNode {
        let position = self.index[qname];
        &mut self.nodes[position]
    }
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaDescriptor;

    fn strict_tree() -> PropertyTree {
        PropertyTree::with_mode(ValidationMode::Strict)
    }

    fn qname(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    #[test]
    fn test_add_get_remove_round_trip() {
        let mut tree = PropertyTree::new();
        let node = PropertyNode::boolean(qname("xmpRights:Marked"), true);
        tree.add_property(node.clone()).unwrap();

        assert_eq!(tree.get_property("xmpRights:Marked"), Some(&node));
        assert!(tree.remove_property("xmpRights:Marked"));
        assert_eq!(tree.get_property("xmpRights:Marked"), None);
        // Second removal is a no-op
        assert!(!tree.remove_property("xmpRights:Marked"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut tree = PropertyTree::new();
        tree.add_property(PropertyNode::text(qname("custom:First"), "1"))
            .unwrap();
        tree.add_property(PropertyNode::text(qname("custom:Second"), "2"))
            .unwrap();
        tree.add_property(PropertyNode::text(qname("custom:First"), "replaced"))
            .unwrap();

        let names: Vec<_> = tree
            .list_properties()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(names, vec!["custom:First", "custom:Second"]);
        let first = tree.get_property("custom:First").unwrap();
        assert_eq!(first.scalar().unwrap().encode(), "replaced");
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut tree = PropertyTree::new();
        for local in ["A", "B", "C"] {
            tree.add_property(PropertyNode::text(qname(&format!("custom:{local}")), local))
                .unwrap();
        }
        assert!(tree.remove_property("custom:A"));

        assert_eq!(tree.len(), 2);
        assert_eq!(
            tree.get_property("custom:C").unwrap().scalar().unwrap().encode(),
            "C"
        );
        let names: Vec<_> = tree
            .list_properties()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(names, vec!["custom:B", "custom:C"]);
    }

    #[test]
    fn test_strict_mode_rejects_kind_conflict() {
        let mut tree = strict_tree();
        // Registry declares xmpRights:Marked as Boolean
        let err = tree
            .add_property(PropertyNode::text(qname("xmpRights:Marked"), "yes"))
            .unwrap_err();
        assert!(matches!(err, XmpError::SchemaViolation { .. }));

        tree.add_property(PropertyNode::boolean(qname("xmpRights:Marked"), true))
            .unwrap();
    }

    #[test]
    fn test_lenient_mode_accepts_kind_conflict() {
        let mut tree = PropertyTree::new();
        tree.add_property(PropertyNode::text(qname("xmpRights:Marked"), "yes"))
            .unwrap();
        assert!(tree.get_property("xmpRights:Marked").is_some());
    }

    #[test]
    fn test_unregistered_namespace_passes_strict() {
        let mut tree = strict_tree();
        tree.add_property(PropertyNode::text(qname("custom:Anything"), "x"))
            .unwrap();
    }

    #[test]
    fn test_bag_composite_creates_single_node() {
        let mut tree = PropertyTree::new();
        tree.add_bag_value("xmpRights:Owner", "Alice").unwrap();
        tree.add_bag_value("xmpRights:Owner", "Bob").unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get_bag_values("xmpRights:Owner"), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_remove_bag_value_absent_name_creates_nothing() {
        let mut tree = PropertyTree::new();
        let removed = tree.remove_bag_value("xmpRights:Owner", "Alice").unwrap();
        assert!(!removed);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_failed_typed_first_add_creates_nothing() {
        let mut tree = PropertyTree::new();
        // dc:date is declared seq Date in the builtin catalog
        let err = tree.add_sequence_value("dc:date", "garbage").unwrap_err();
        assert!(matches!(err, XmpError::Decode(_)));
        assert!(tree.get_property("dc:date").is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_collection_item_type_follows_registry() {
        let registry = Arc::new(
            {
                let mut registry = SchemaRegistry::builtin();
                registry.register(
                    SchemaDescriptor::new("http://example.com/ns/", "ex")
                        .with_property("Dates", StructuralKind::Sequence(ScalarKind::Date)),
                );
                registry
            },
        );
        let mut tree = PropertyTree::with_registry(registry, ValidationMode::Strict);

        tree.add_sequence_value("ex:Dates", "2024-03-01").unwrap();
        let err = tree.add_sequence_value("ex:Dates", "not a date").unwrap_err();
        assert!(matches!(err, XmpError::Decode(_)));

        assert_eq!(
            tree.get_sequence_values("ex:Dates"),
            vec!["2024-03-01T00:00:00+00:00"]
        );
    }

    #[test]
    fn test_lang_composites() {
        let mut tree = PropertyTree::new();
        tree.set_lang_value("xmpRights:UsageTerms", None, "All rights reserved")
            .unwrap();
        tree.set_lang_value("xmpRights:UsageTerms", Some("fr"), "Tous droits réservés")
            .unwrap();

        assert_eq!(
            tree.get_lang_value("xmpRights:UsageTerms", None),
            Some("All rights reserved")
        );
        assert_eq!(tree.get_lang_value("xmpRights:UsageTerms", Some("de")), None);
        assert_eq!(
            tree.get_lang_tags("xmpRights:UsageTerms"),
            vec!["x-default", "fr"]
        );
        assert_eq!(tree.get_lang_tags("xmpRights:Absent"), Vec::<&str>::new());
    }

    #[test]
    fn test_lang_composite_strict_conflict() {
        let mut tree = strict_tree();
        // Marked is declared Boolean, not Lang Alt
        let err = tree
            .set_lang_value("xmpRights:Marked", None, "text")
            .unwrap_err();
        assert!(matches!(err, XmpError::SchemaViolation { .. }));
        assert!(tree.is_empty());
    }
}
