use std::path::PathBuf;

use jbridge_codegen::ConfigError;
use jbridge_model::InvalidSignatureError;
use jbridge_syntax::SyntaxError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Syntax error: {message}")]
    #[diagnostic(code(jbridge::cli::syntax_error))]
    Syntax {
        #[source_code]
        src: String,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
        #[source]
        source: SyntaxError,
    },

    #[error("Failed to read file {path}")]
    #[diagnostic(code(jbridge::cli::io_error))]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}")]
    #[diagnostic(code(jbridge::cli::io_error))]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Signature(#[from] InvalidSignatureError),

    #[error("Failed to render descriptors")]
    #[diagnostic(code(jbridge::cli::emit_error))]
    Emit(#[from] toml::ser::Error),

    #[error("{failed} of {total} declaration(s) cannot be bridged")]
    #[diagnostic(
        code(jbridge::cli::generation_failed),
        help("Run with -v to see each failure")
    )]
    GenerationFailed { failed: usize, total: usize },
}

/// Source text a syntax error points into.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext<'a> {
    pub source: &'a str,
}

pub fn convert_syntax_error(error: SyntaxError, ctx: ErrorContext) -> CliError {
    let (span, message) = match &error {
        SyntaxError::Lexer { span, message } | SyntaxError::Parser { span, message } => {
            (*span, message.clone())
        }
        SyntaxError::UnexpectedEof { expected } => (
            (ctx.source.len(), 0).into(),
            format!("expected {}", expected),
        ),
        SyntaxError::NotAClosure { ty } => (
            (0, ctx.source.len()).into(),
            format!("`{}` is not a closure type", ty),
        ),
    };

    CliError::Syntax {
        src: ctx.source.to_string(),
        span,
        message,
        source: error,
    }
}

pub fn convert_io_error(error: std::io::Error, path: PathBuf) -> CliError {
    CliError::IoError {
        path,
        source: error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_keeps_lexer_span() {
        let source = "public func f(x: Int) { let c = 'x' }";
        let error = jbridge_syntax::parse_declarations(source, "M").unwrap_err();
        match convert_syntax_error(error, ErrorContext { source }) {
            CliError::Syntax { span, src, .. } => {
                assert_eq!(span.offset(), 32);
                assert_eq!(src, source);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_eof_points_at_end_of_input() {
        let source = "public func f(callback: @escaping (Int32) -> ";
        let error = jbridge_syntax::parse_declarations(source, "M").unwrap_err();
        match convert_syntax_error(error, ErrorContext { source }) {
            CliError::Syntax { span, .. } => assert_eq!(span.offset(), source.len()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
