//! Reads Swift-shaped declaration source and extracts closure binding sites.
//!
//! Only declaration headers matter here: type names, function signatures and
//! property types. Bodies and initializer expressions are skipped by bracket
//! matching, so anything that lexes and balances is accepted.

pub mod ast;
mod error;
pub mod lexer;
pub mod parser;
mod sites;

pub use error::{SyntaxError, SyntaxResult};
pub use sites::extract_sites;

use jbridge_model::{BindingSite, ClosureSignature, SourceType};

/// Parses `input` and returns its binding sites. Free functions are scoped to
/// `module`.
pub fn parse_declarations(input: &str, module: &str) -> SyntaxResult<Vec<BindingSite>> {
    let file = parser::parse(input)?;
    Ok(extract_sites(&file, module))
}

/// Parses a written closure type such as `@escaping (Int64) async -> Int64`.
pub fn parse_closure_type(input: &str) -> SyntaxResult<ClosureSignature> {
    match parser::parse_type(input)? {
        SourceType::Closure(signature) => Ok(*signature),
        other => Err(SyntaxError::NotAClosure {
            ty: other.to_string(),
        }),
    }
}
