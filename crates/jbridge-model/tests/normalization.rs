use jbridge_model::{classify, ClosureSignature, GenerationStrategy, SourceType};

fn every_supported_type() -> Vec<SourceType> {
    vec![
        SourceType::Bool,
        SourceType::Int8,
        SourceType::Int16,
        SourceType::Int32,
        SourceType::Int64,
        SourceType::UInt8,
        SourceType::UInt16,
        SourceType::UInt32,
        SourceType::UInt64,
        SourceType::Int,
        SourceType::UInt,
        SourceType::String,
        SourceType::Nominal("CustomResult".to_string()),
    ]
}

#[test]
fn test_async_signatures_always_classify_as_async_escaping() {
    for ty in every_supported_type() {
        for escaping in [false, true] {
            let mut sig = ClosureSignature::new([ty.clone()], ty.clone()).asynchronous();
            sig.escaping = escaping;
            assert_eq!(sig.validate(), Ok(()), "{} should validate", sig);
            assert_eq!(sig.strategy(), GenerationStrategy::AsyncEscaping, "{}", sig);
            assert_eq!(classify(sig.escaping, sig.is_async), sig.strategy());
        }
    }
}

#[test]
fn test_sync_signatures_follow_declared_escaping() {
    for ty in every_supported_type() {
        let sig = ClosureSignature::new([ty.clone()], SourceType::Void);
        assert_eq!(sig.strategy(), GenerationStrategy::SyncNonEscaping);
        assert_eq!(sig.escaping().strategy(), GenerationStrategy::SyncEscaping);
    }
}
