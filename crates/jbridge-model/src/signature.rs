use serde::Serialize;
use std::fmt;

use crate::error::{InvalidSignatureError, SignatureResult};
use crate::strategy::{classify, GenerationStrategy};
use crate::types::SourceType;

/// One positional parameter of a closure type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParameterType {
    pub ty: SourceType,
    pub variadic: bool,
}

impl ParameterType {
    pub fn new(ty: SourceType) -> Self {
        Self { ty, variadic: false }
    }

    pub fn variadic(ty: SourceType) -> Self {
        Self { ty, variadic: true }
    }
}

impl From<SourceType> for ParameterType {
    fn from(ty: SourceType) -> Self {
        ParameterType::new(ty)
    }
}

/// Normalized, language-neutral shape of a closure type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClosureSignature {
    pub params: Vec<ParameterType>,
    pub ret: SourceType,
    /// The flag as declared. Use [`ClosureSignature::is_escaping`] for the effective value.
    pub escaping: bool,
    pub is_async: bool,
    pub throws: bool,
}

impl ClosureSignature {
    /// A synchronous, non-escaping, non-throwing closure.
    pub fn new(params: impl IntoIterator<Item = SourceType>, ret: SourceType) -> Self {
        Self {
            params: params.into_iter().map(ParameterType::new).collect(),
            ret,
            escaping: false,
            is_async: false,
            throws: false,
        }
    }

    pub fn escaping(mut self) -> Self {
        self.escaping = true;
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn strategy(&self) -> GenerationStrategy {
        classify(self.escaping, self.is_async)
    }

    /// Declared `@escaping`, or implied by `async`.
    pub fn is_escaping(&self) -> bool {
        self.strategy().is_escaping()
    }

    pub fn returns_void(&self) -> bool {
        self.ret.is_void()
    }

    /// Rejects every construct outside the bridgeable set.
    ///
    /// Checks run in a fixed order (throwing, closure result, parameters, result)
    /// so the same signature always reports the same error.
    pub fn validate(&self) -> SignatureResult<()> {
        if self.throws {
            return Err(InvalidSignatureError::ThrowingClosure {
                signature: self.to_string(),
            });
        }
        if self.ret.as_closure().is_some() {
            return Err(InvalidSignatureError::ClosureReturningClosure {
                signature: self.to_string(),
            });
        }
        for (index, param) in self.params.iter().enumerate() {
            if param.variadic {
                return Err(InvalidSignatureError::VariadicParameter {
                    index,
                    ty: param.ty.to_string(),
                });
            }
            if !param.ty.is_supported() || param.ty.is_void() {
                return Err(InvalidSignatureError::UnsupportedParameterType {
                    index,
                    ty: param.ty.to_string(),
                });
            }
        }
        if !self.ret.is_supported() {
            return Err(InvalidSignatureError::UnsupportedReturnType {
                ty: self.ret.to_string(),
            });
        }
        Ok(())
    }
}

/// Free-function form of [`ClosureSignature::validate`].
pub fn validate(signature: &ClosureSignature) -> SignatureResult<()> {
    signature.validate()
}

impl fmt::Display for ClosureSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.escaping {
            write!(f, "@escaping ")?;
        }
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.ty)?;
            if param.variadic {
                write!(f, "...")?;
            }
        }
        write!(f, ")")?;
        if self.is_async {
            write!(f, " async")?;
        }
        if self.throws {
            write!(f, " throws")?;
        }
        write!(f, " -> {}", self.ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_display_matches_declaration_syntax() {
        let sig = ClosureSignature::new([SourceType::Int64], SourceType::Int64)
            .escaping()
            .asynchronous();
        expect!["@escaping (Int64) async -> Int64"].assert_eq(&sig.to_string());

        let sig = ClosureSignature::new([], SourceType::Void);
        expect!["() -> Void"].assert_eq(&sig.to_string());
    }

    #[test]
    fn test_validate_accepts_supported_shapes() {
        let sig = ClosureSignature::new(
            [SourceType::Int64, SourceType::Bool, SourceType::String],
            SourceType::Nominal("CustomResult".into()),
        )
        .escaping();
        assert_eq!(sig.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_throwing() {
        let sig = ClosureSignature::new([], SourceType::Void).throwing();
        assert!(matches!(
            sig.validate(),
            Err(InvalidSignatureError::ThrowingClosure { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_variadic_with_index() {
        let mut sig = ClosureSignature::new([SourceType::Int32], SourceType::Void);
        sig.params.push(ParameterType::variadic(SourceType::Int64));
        assert_eq!(
            sig.validate(),
            Err(InvalidSignatureError::VariadicParameter {
                index: 1,
                ty: "Int64".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_unsupported_types() {
        let sig = ClosureSignature::new([SourceType::Double], SourceType::Void);
        assert_eq!(
            sig.validate(),
            Err(InvalidSignatureError::UnsupportedParameterType {
                index: 0,
                ty: "Double".to_string()
            })
        );

        let sig = ClosureSignature::new(
            [],
            SourceType::Tuple(vec![SourceType::Int64, SourceType::Int64]),
        );
        assert_eq!(
            sig.validate(),
            Err(InvalidSignatureError::UnsupportedReturnType {
                ty: "(Int64, Int64)".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_void_parameter() {
        let sig = ClosureSignature::new([SourceType::Void], SourceType::Void);
        assert!(matches!(
            sig.validate(),
            Err(InvalidSignatureError::UnsupportedParameterType { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_closure_result() {
        let inner = ClosureSignature::new([], SourceType::Void);
        let sig = ClosureSignature::new([], SourceType::Closure(Box::new(inner)));
        assert!(matches!(
            sig.validate(),
            Err(InvalidSignatureError::ClosureReturningClosure { .. })
        ));
    }

    #[test]
    fn test_async_non_escaping_is_effectively_escaping() {
        let sig = ClosureSignature::new([], SourceType::Void).asynchronous();
        assert!(!sig.escaping);
        assert!(sig.is_escaping());
        assert_eq!(sig.strategy(), GenerationStrategy::AsyncEscaping);
    }
}
