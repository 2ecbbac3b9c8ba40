#![allow(dead_code)]

use jbridge_codegen::{BindingArtifacts, GenerationReport, Generator, GeneratorConfig};
use jbridge_model::BindingSite;

pub const FIXTURE: &str = include_str!("../../../jbridge-syntax/tests/fixtures/escaping_closures.swift");

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sites(source: &str) -> Vec<BindingSite> {
    jbridge_syntax::parse_declarations(source, "SwiftModule").unwrap()
}

pub fn generate(source: &str) -> GenerationReport {
    init_logging();
    Generator::new(GeneratorConfig::default()).run(&sites(source))
}

/// Generates a single declaration and returns its only artifact set.
pub fn generate_one(source: &str) -> BindingArtifacts {
    let mut report = generate(source);
    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.artifacts.len(), 1);
    report.artifacts.remove(0)
}
