// packages/interpose/src/utils/config.rs
//! Configuration loading
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML/YAML/JSON file
//! 3. `INTERPOSE_*` environment variables (`__` separates nested keys,
//!    e.g. `INTERPOSE_LOGGING__LEVEL=debug`; `registry.wrap_types` takes a
//!    comma-separated list, e.g. `INTERPOSE_REGISTRY__WRAP_TYPES=Element,Node`)
//!
//! Processor tables are file-only: the environment cannot express a tagged
//! transform.

use crate::interception::transforms::{PostTransform, PreTransform};
use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterposeConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Declarative processor registry
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Processor registry described by name
///
/// The `config` crate lowercases map keys, so processor tables arrive keyed
/// by lowercased member names. [`ProcessorRegistry::from_config`] maps them
/// back onto the declared member names.
///
/// [`ProcessorRegistry::from_config`]: crate::interception::registry::ProcessorRegistry::from_config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Names of the types whose instances get wrapped
    #[serde(default)]
    pub wrap_types: Vec<String>,

    /// Pre-processors keyed by method name
    #[serde(default)]
    pub pre_processors: BTreeMap<String, PreTransform>,

    /// Post-processors keyed by method or property name
    #[serde(default)]
    pub post_processors: BTreeMap<String, PostTransform>,
}

impl RegistryConfig {
    pub fn is_empty(&self) -> bool {
        self.wrap_types.is_empty()
            && self.pre_processors.is_empty()
            && self.post_processors.is_empty()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl InterposeConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading configuration file {}", path);
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("INTERPOSE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("registry.wrap_types")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Serializes tests that load from the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = InterposeConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(config.registry.is_empty());
    }

    #[test]
    fn test_load_without_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = InterposeConfig::load(None).unwrap();
        assert!(config.registry.wrap_types.is_empty());
    }

    #[test]
    fn test_load_registry_from_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = write_config(
            r#"
[logging]
level = "debug"

[registry]
wrap_types = ["Element"]

[registry.pre_processors.get]
kind = "replace_args"
args = ["intercepted"]

[registry.post_processors.text]
kind = "stringify"

[registry.post_processors.find_text]
kind = "default_if_null"
value = ""
"#,
        );

        let config = InterposeConfig::load(file.path().to_str()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.registry.wrap_types, vec!["Element".to_string()]);
        assert_eq!(
            config.registry.pre_processors["get"],
            PreTransform::ReplaceArgs {
                args: vec![serde_json::json!("intercepted")],
                kwargs: BTreeMap::new(),
            }
        );
        assert_eq!(
            config.registry.post_processors["text"],
            PostTransform::Stringify
        );
        assert_eq!(
            config.registry.post_processors["find_text"],
            PostTransform::DefaultIfNull {
                value: serde_json::json!("")
            }
        );
    }

    #[test]
    fn test_unknown_transform_kind_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = write_config(
            r#"
[registry.post_processors.text]
kind = "reverse"
"#,
        );

        assert!(InterposeConfig::load(file.path().to_str()).is_err());
    }

    #[test]
    fn test_wrap_types_from_environment() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("INTERPOSE_REGISTRY__WRAP_TYPES", "Element,Node");
        let loaded = InterposeConfig::load(None);
        std::env::remove_var("INTERPOSE_REGISTRY__WRAP_TYPES");

        let config = loaded.unwrap();
        assert_eq!(
            config.registry.wrap_types,
            vec!["Element".to_string(), "Node".to_string()]
        );
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(InterposeConfig::load(Some("/nonexistent/interpose.toml")).is_err());
    }
}
