use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Settings shared by every declaration in a generation run.
///
/// Loaded from a TOML table; every key is optional.
///
/// ```toml
/// module = "SwiftModule"
/// package = "com.example.swift"
/// interface-method = "apply"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Origin module name; the enclosing scope of free functions.
    pub module: String,

    /// Target runtime package that generated interfaces live in.
    pub package: String,

    /// Name of the single abstract method on every generated interface.
    pub interface_method: String,

    /// Prefix of the synthetic origin-side capability.
    pub capability_prefix: String,

    /// Prefix of the concrete origin-side adapter.
    pub adapter_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module: "SwiftModule".to_string(),
            package: "com.example.swift".to_string(),
            interface_method: "apply".to_string(),
            capability_prefix: "_SwiftClosure".to_string(),
            adapter_prefix: "_SwiftClosureWrapper".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading generator configuration from {}", path.display());
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier(&self.module) {
            return Err(ConfigError::InvalidValue {
                key: "module",
                message: format!("`{}` is not an identifier", self.module),
            });
        }
        if !self.package.is_empty() && !self.package.split('.').all(is_identifier) {
            return Err(ConfigError::InvalidValue {
                key: "package",
                message: format!("`{}` is not a dotted package name", self.package),
            });
        }
        for (key, value) in [
            ("interface-method", &self.interface_method),
            ("capability-prefix", &self.capability_prefix),
            ("adapter-prefix", &self.adapter_prefix),
        ] {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: format!("`{}` is not an identifier", value),
                });
            }
        }
        Ok(())
    }

    /// Package in JNI path form (`com/example/swift`).
    pub fn package_path(&self) -> String {
        self.package.replace('.', "/")
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
