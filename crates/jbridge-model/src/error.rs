use miette::Diagnostic;
use thiserror::Error;

/// A closure signature that cannot be bridged.
///
/// Raised before any synthesis starts. Only the offending declaration fails;
/// the rest of a generation run carries on.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum InvalidSignatureError {
    #[error("Unsupported type `{ty}` for closure parameter #{index}")]
    #[diagnostic(
        code("SIG-001"),
        help("Closure parameters must be integers, Bool, String or a nominal object type")
    )]
    UnsupportedParameterType { index: usize, ty: String },

    #[error("Unsupported closure return type `{ty}`")]
    #[diagnostic(
        code("SIG-002"),
        help("Closure results must be integers, Bool, Void, String or a nominal object type")
    )]
    UnsupportedReturnType { ty: String },

    #[error("Variadic closure parameter #{index} (`{ty}...`) is not supported")]
    #[diagnostic(code("SIG-003"), help("Pass an array-typed wrapper object instead"))]
    VariadicParameter { index: usize, ty: String },

    #[error("Throwing closure `{signature}` is not supported")]
    #[diagnostic(code("SIG-004"), help("Return a result object instead of throwing"))]
    ThrowingClosure { signature: String },

    #[error("Closure `{signature}` returns a closure")]
    #[diagnostic(code("SIG-005"), help("Closures returning closures cannot be bridged"))]
    ClosureReturningClosure { signature: String },

    #[error("Property `{property}` holds a closure returning a closure")]
    #[diagnostic(
        code("SIG-006"),
        help("Closure-valued properties must hold closures with a plain result type")
    )]
    PropertyClosureReturnsClosure { property: String },
}

pub type SignatureResult<T> = Result<T, InvalidSignatureError>;
