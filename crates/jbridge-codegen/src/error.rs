use jbridge_model::InvalidSignatureError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// A closure-valued property asks for overwrite semantics on a store that
/// holds many closures.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("Property `{site}` requests overwrite semantics on a collection-backed store")]
#[diagnostic(
    code("GEN-001"),
    help("Collection stores add and remove-all; declare the property as a single slot to overwrite")
)]
pub struct LifetimePlanConflictError {
    pub site: String,
}

/// Errors that fail generation for a single declaration.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidSignature(#[from] InvalidSignatureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    LifetimePlanConflict(#[from] LifetimePlanConflictError),

    #[error("Type `{ty}` in {site} has no target runtime mapping")]
    #[diagnostic(
        code("GEN-002"),
        help("This indicates a signature that skipped validation")
    )]
    UnmappedType { site: String, ty: String },
}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors loading a [`GeneratorConfig`](crate::GeneratorConfig).
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read generator configuration {path}")]
    #[diagnostic(code("CFG-001"), help("Check that the file exists and is readable"))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid generator configuration: {0}")]
    #[diagnostic(code("CFG-002"), help("Check the TOML syntax and key names"))]
    Parse(String),

    #[error("Invalid value for `{key}`: {message}")]
    #[diagnostic(code("CFG-003"))]
    InvalidValue { key: &'static str, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
