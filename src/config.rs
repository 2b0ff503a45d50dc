//! Configuration for the flattener.
//!
//! Layered configuration with three sources, later ones winning:
//! - Default values
//! - `codeflat.toml` in the working directory (or an explicit path)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Variables are prefixed with `CF_` and use double underscores to separate
//! nested levels:
//! - `CF_IMPORT_KEYWORD=use` sets `import_keyword`
//! - `CF_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::FlattenResult;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlattenConfig {
    /// Namespace prefixes whose declarations are never inlined: a match is
    /// kept as an import line instead. Ordered; checked first to last.
    #[serde(default = "default_keep_namespaces")]
    pub keep_namespaces: Vec<String>,

    /// Keyword used when rendering retained import lines.
    #[serde(default = "default_import_keyword")]
    pub import_keyword: String,

    /// Upper bound on the number of declarations the closure may visit.
    /// Densely interconnected projects have no natural iteration cap, so a
    /// runaway closure fails fast instead of running unbounded.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default log level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides (module name -> level)
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_keep_namespaces() -> Vec<String> {
    vec!["java".to_string(), "kotlin".to_string()]
}
fn default_import_keyword() -> String {
    "import".to_string()
}
fn default_max_nodes() -> usize {
    100_000
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            keep_namespaces: default_keep_namespaces(),
            import_keyword: default_import_keyword(),
            max_nodes: default_max_nodes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl FlattenConfig {
    /// Load configuration from all sources, layering `codeflat.toml` and
    /// `CF_`-prefixed environment variables over the defaults.
    pub fn load() -> FlattenResult<Self> {
        Self::load_from(Path::new("codeflat.toml"))
    }

    /// Load configuration with an explicit config file path.
    pub fn load_from(config_path: &Path) -> FlattenResult<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(FlattenConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("CF_").map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".") // Double underscore becomes dot
                    .into()
            }))
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Check that a configuration file exists and parses cleanly.
    pub fn check(config_path: &Path) -> Result<(), String> {
        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }
        match std::fs::read_to_string(config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<FlattenConfig>(&content) {
                    return Err(format!("Configuration file is corrupted: {e}"));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FlattenConfig::default();
        assert_eq!(config.keep_namespaces, vec!["java", "kotlin"]);
        assert_eq!(config.import_keyword, "import");
        assert_eq!(config.max_nodes, 100_000);
        assert_eq!(config.logging.default, "warn");
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("codeflat.toml");
        fs::write(
            &config_path,
            r#"
keep_namespaces = ["std", "core"]
max_nodes = 500

[logging]
default = "info"
"#,
        )
        .unwrap();

        let config = FlattenConfig::load_from(&config_path).unwrap();
        assert_eq!(config.keep_namespaces, vec!["std", "core"]);
        assert_eq!(config.max_nodes, 500);
        // Untouched fields keep their defaults
        assert_eq!(config.import_keyword, "import");
        assert_eq!(config.logging.default, "info");
    }

    #[test]
    fn test_corrupt_file_surfaces_as_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("codeflat.toml");
        fs::write(&config_path, "keep_namespaces = 42").unwrap();

        let err = FlattenConfig::load_from(&config_path).unwrap_err();
        assert!(matches!(err, crate::error::FlattenError::Config(_)));
    }

    #[test]
    fn test_check_rejects_missing_and_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("codeflat.toml");
        assert!(FlattenConfig::check(&config_path).is_err());

        fs::write(&config_path, "keep_namespaces = 42").unwrap();
        assert!(FlattenConfig::check(&config_path).is_err());

        fs::write(&config_path, "keep_namespaces = [\"std\"]").unwrap();
        assert!(FlattenConfig::check(&config_path).is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = FlattenConfig::load_from(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.keep_namespaces, vec!["java", "kotlin"]);
    }
}
