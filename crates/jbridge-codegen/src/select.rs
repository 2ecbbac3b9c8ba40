use jbridge_model::{BindingSite, GenerationStrategy, InvalidSignatureError, SiteKind};
use serde::Serialize;

/// Outcome of strategy selection for one binding site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// The strategy downstream synthesis runs with (always normalized).
    pub strategy: GenerationStrategy,
    /// The strategy as declared, before async normalization.
    pub declared: GenerationStrategy,
    /// Whether the closure lands in a storage location that outlives the call.
    pub has_storage: bool,
}

/// Validates the site's signature and picks its generation strategy.
///
/// Property sites holding a closure that returns a closure are rejected here,
/// before the general signature checks, so the error names the property.
pub fn select(site: &BindingSite) -> Result<GenerationStrategy, InvalidSignatureError> {
    select_site(site).map(|selection| selection.strategy)
}

pub fn select_site(site: &BindingSite) -> Result<Selection, InvalidSignatureError> {
    let signature = &site.signature;
    if let SiteKind::Property(_) = site.kind {
        if signature.ret.as_closure().is_some() {
            return Err(InvalidSignatureError::PropertyClosureReturnsClosure {
                property: site.to_string(),
            });
        }
    }
    signature.validate()?;

    let declared = GenerationStrategy::declared(signature.escaping, signature.is_async);
    let selection = Selection {
        strategy: declared.normalized(),
        declared,
        has_storage: site.has_storage(),
    };
    if declared != selection.strategy {
        log::debug!("{}: {} normalized to {}", site, declared, selection.strategy);
    }
    log::debug!("{}: selected {}", site, selection.strategy);
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jbridge_model::{ClosureSignature, PropertyAccessors, SourceType};

    #[test]
    fn test_select_parameter_strategies() {
        let sync = ClosureSignature::new([], SourceType::Void);
        let site = BindingSite::parameter("M", "call", "closure", 0, sync.clone());
        assert_eq!(select(&site), Ok(GenerationStrategy::SyncNonEscaping));

        let site = BindingSite::parameter("M", "call", "closure", 0, sync.asynchronous());
        let selection = select_site(&site).unwrap();
        assert_eq!(selection.declared, GenerationStrategy::AsyncNonEscapingNormalized);
        assert_eq!(selection.strategy, GenerationStrategy::AsyncEscaping);
        assert!(selection.has_storage);
    }

    #[test]
    fn test_property_closure_returning_closure_rejected() {
        let inner = ClosureSignature::new([], SourceType::Void);
        let sig = ClosureSignature::new([], SourceType::Closure(Box::new(inner)));
        let site = BindingSite::property(
            "CallbackManager",
            "factory",
            sig.clone(),
            PropertyAccessors::single("setFactory"),
        );
        assert_eq!(
            select(&site),
            Err(InvalidSignatureError::PropertyClosureReturnsClosure {
                property: "CallbackManager.factory".to_string()
            })
        );

        let param = BindingSite::parameter("M", "f", "c", 0, sig);
        assert!(matches!(
            select(&param),
            Err(InvalidSignatureError::ClosureReturningClosure { .. })
        ));
    }

    #[test]
    fn test_invalid_signature_fails_selection() {
        let sig = ClosureSignature::new([SourceType::Float], SourceType::Void).escaping();
        let site = BindingSite::parameter("M", "f", "c", 0, sig);
        assert!(select(&site).is_err());
    }
}
