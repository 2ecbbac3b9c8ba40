pub mod parser;

pub use parser::*;

use crate::ast::SourceFile;
use crate::lexer::lex;
use crate::SyntaxResult;
use jbridge_model::SourceType;

/// Parses a whole source file into its declarations.
pub fn parse(input: &str) -> SyntaxResult<SourceFile> {
    let tokens = lex(input)?;
    Parser::new(tokens).parse_file()
}

/// Parses a single written type, e.g. `@escaping (Int64) async -> Int64`.
pub fn parse_type(input: &str) -> SyntaxResult<SourceType> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(tokens);
    let ty = parser.parse_type()?;
    parser.finish()?;
    Ok(ty)
}
