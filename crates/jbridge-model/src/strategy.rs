use serde::Serialize;
use std::fmt;

/// Which generation path a closure takes.
///
/// Always derived from a [`ClosureSignature`](crate::ClosureSignature); never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GenerationStrategy {
    /// Invoked only within the receiving call. No lifetime management.
    SyncNonEscaping,
    /// May be invoked after the receiving call returns.
    SyncEscaping,
    /// Suspends; always escaping.
    AsyncEscaping,
    /// An async closure declared without `@escaping`. Only produced by
    /// [`GenerationStrategy::declared`]; [`normalized`](Self::normalized) folds it into
    /// `AsyncEscaping`.
    AsyncNonEscapingNormalized,
}

impl GenerationStrategy {
    /// The tag exactly as the declaration spells it, before normalization.
    pub fn declared(escaping: bool, is_async: bool) -> Self {
        match (escaping, is_async) {
            (false, false) => GenerationStrategy::SyncNonEscaping,
            (true, false) => GenerationStrategy::SyncEscaping,
            (true, true) => GenerationStrategy::AsyncEscaping,
            (false, true) => GenerationStrategy::AsyncNonEscapingNormalized,
        }
    }

    /// Any suspension point outlives the triggering call, so async is escaping.
    pub fn normalized(self) -> Self {
        match self {
            GenerationStrategy::AsyncNonEscapingNormalized => GenerationStrategy::AsyncEscaping,
            other => other,
        }
    }

    pub fn is_async(self) -> bool {
        matches!(
            self,
            GenerationStrategy::AsyncEscaping | GenerationStrategy::AsyncNonEscapingNormalized
        )
    }

    pub fn is_escaping(self) -> bool {
        !matches!(self, GenerationStrategy::SyncNonEscaping)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStrategy::SyncNonEscaping => "SYNC_NONESCAPING",
            GenerationStrategy::SyncEscaping => "SYNC_ESCAPING",
            GenerationStrategy::AsyncEscaping => "ASYNC_ESCAPING",
            GenerationStrategy::AsyncNonEscapingNormalized => "ASYNC_NONESCAPING_NORMALIZED",
        }
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total, pure classification of a closure's declared flags.
pub fn classify(declared_escaping: bool, declared_async: bool) -> GenerationStrategy {
    GenerationStrategy::declared(declared_escaping, declared_async).normalized()
}
