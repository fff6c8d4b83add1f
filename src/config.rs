//! Configuration for the property tree core
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (xmptree.toml)
//! - Environment variables (XMPTREE_*)
//!
//! ## Example config file (xmptree.toml):
//! ```toml
//! [validation]
//! mode = "strict"
//!
//! [[namespaces]]
//! uri = "http://example.com/ns/product/"
//! prefix = "prod"
//!
//! [namespaces.properties]
//! Serial = "Text"
//! Released = "Date"
//! Tags = "bag Text"
//! Revisions = "seq Integer"
//! Notice = "Lang Alt"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::XmpError;
use crate::node::StructuralKind;
use crate::registry::{SchemaDescriptor, SchemaRegistry};

/// Strict-vs-lenient schema validation
///
/// Lenient is the default: the underlying format tolerates unknown and
/// loosely-typed fields in practice, so strict conformance is opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Kind conflicts with the registry fail with `SchemaViolation`
    Strict,
    /// Kind conflicts are accepted and logged
    #[default]
    Lenient,
}

/// Main configuration for the property tree core
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct XmpConfig {
    /// Validation settings
    #[serde(default)]
    pub validation: ValidationSettings,

    /// Extra namespaces merged into the registry at startup
    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,
}

/// Validation settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ValidationSettings {
    /// Mode applied by trees constructed from this configuration
    #[serde(default)]
    pub mode: ValidationMode,
}

/// One configured namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Namespace URI
    pub uri: String,

    /// Preferred prefix
    pub prefix: String,

    /// Local property name to kind label ("Boolean", "bag Text", "Lang Alt", ...)
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl NamespaceConfig {
    /// Convert into a registry descriptor, parsing the kind labels
    pub fn to_descriptor(&self) -> Result<SchemaDescriptor, XmpError> {
        let mut descriptor = SchemaDescriptor::new(&self.uri, &self.prefix);
        for (local, label) in &self.properties {
            let kind = StructuralKind::parse(label).ok_or_else(|| {
                XmpError::Config(format!(
                    "unknown property kind {:?} for {}:{}",
                    label, self.prefix, local
                ))
            })?;
            descriptor.property_kinds.insert(local.clone(), kind);
        }
        Ok(descriptor)
    }
}

impl XmpConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["xmptree.toml", ".xmptree.toml", "config/xmptree.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "xmptree") {
            let xdg_config = config_dir.config_dir().join("xmptree.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (XMPTREE_*)
        builder = builder.add_source(
            Environment::with_prefix("XMPTREE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Build the schema registry: built-in catalog plus configured namespaces
    pub fn build_registry(&self) -> Result<SchemaRegistry, XmpError> {
        let mut registry = SchemaRegistry::builtin();
        for namespace in &self.namespaces {
            registry.register(namespace.to_descriptor()?);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ScalarKind;

    #[test]
    fn test_default_config() {
        let config = XmpConfig::default();
        assert_eq!(config.validation.mode, ValidationMode::Lenient);
        assert!(config.namespaces.is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let mut config = XmpConfig::default();
        config.validation.mode = ValidationMode::Strict;
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[validation]"));
        assert!(toml_str.contains("mode = \"strict\""));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xmptree.toml");

        let config = XmpConfig {
            validation: ValidationSettings {
                mode: ValidationMode::Strict,
            },
            namespaces: vec![NamespaceConfig {
                uri: "http://example.com/ns/".to_string(),
                prefix: "ex".to_string(),
                properties: HashMap::from([("Flag".to_string(), "Boolean".to_string())]),
            }],
        };
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = XmpConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.validation.mode, ValidationMode::Strict);
        assert_eq!(loaded.namespaces.len(), 1);
        assert_eq!(loaded.namespaces[0].prefix, "ex");
    }

    #[test]
    fn test_build_registry_merges_namespaces() {
        let config = XmpConfig {
            validation: ValidationSettings::default(),
            namespaces: vec![NamespaceConfig {
                uri: "http://example.com/ns/".to_string(),
                prefix: "ex".to_string(),
                properties: HashMap::from([
                    ("Flag".to_string(), "Boolean".to_string()),
                    ("Dates".to_string(), "seq Date".to_string()),
                ]),
            }],
        };

        let registry = config.build_registry().unwrap();
        assert_eq!(
            registry.declared_kind("http://example.com/ns/", "Flag"),
            Some(StructuralKind::Scalar(ScalarKind::Boolean))
        );
        assert_eq!(
            registry.declared_kind("http://example.com/ns/", "Dates"),
            Some(StructuralKind::Sequence(ScalarKind::Date))
        );
        // Built-ins still present
        assert!(registry.lookup_prefix("xmpRights").is_some());
    }

    #[test]
    fn test_bad_kind_label_fails() {
        let namespace = NamespaceConfig {
            uri: "http://example.com/ns/".to_string(),
            prefix: "ex".to_string(),
            properties: HashMap::from([("Flag".to_string(), "bag of stuff".to_string())]),
        };
        assert!(matches!(
            namespace.to_descriptor().unwrap_err(),
            XmpError::Config(_)
        ));
    }
}
