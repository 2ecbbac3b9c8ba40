use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SyntaxError {
    #[error("Lexer error: {message}")]
    #[diagnostic(code("SYN-001"))]
    Lexer {
        #[label("here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code("SYN-002"))]
    Parser {
        #[label("here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected end of input; expected {expected}")]
    #[diagnostic(code("SYN-003"), help("the declaration is cut off; check for an unbalanced bracket"))]
    UnexpectedEof { expected: String },

    #[error("`{ty}` is not a closure type")]
    #[diagnostic(code("SYN-004"))]
    NotAClosure { ty: String },
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
