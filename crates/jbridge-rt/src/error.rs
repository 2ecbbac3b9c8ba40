use miette::Diagnostic;
use thiserror::Error;

/// A target future completed exceptionally. Surfaced at the await point.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Target future completed exceptionally: {payload}")]
#[diagnostic(
    code("RT-001"),
    help("the payload is the target runtime's exception, passed through unchanged")
)]
pub struct AsyncBridgeFailure {
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum BridgeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    AsyncFailure(#[from] AsyncBridgeFailure),

    #[error("Cannot carry {found} as {expected}")]
    #[diagnostic(code("RT-002"))]
    TypeMismatch { expected: String, found: String },

    #[error("Closure takes {expected} argument(s), got {found}")]
    #[diagnostic(code("RT-003"))]
    ArityMismatch { expected: usize, found: usize },

    #[error("Call through {callable} failed: {message}")]
    #[diagnostic(code("RT-004"))]
    Call { callable: String, message: String },

    #[error("{site} has no {expected} plan")]
    #[diagnostic(
        code("RT-005"),
        help("slots need a single-valued plan and stores a collection plan")
    )]
    PlanMismatch { site: String, expected: &'static str },

    #[error("Synchronous invocation of async closure {callable}")]
    #[diagnostic(code("RT-006"), help("use the async entry point"))]
    RequiresAwait { callable: String },
}

pub type BridgeResult<T> = Result<T, BridgeError>;
