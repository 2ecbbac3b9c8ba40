use super::token::*;
use crate::{SyntaxError, SyntaxResult};
use logos::Logos;
use miette::SourceSpan;

/// Lexes the input string into a vector of tokens.
pub fn lex(input: &str) -> SyntaxResult<Vec<Token<'_>>> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let range = lexer.span();
        let lexeme = &input[range.clone()];
        let span = SourceSpan::new(range.start.into(), range.len());

        match kind {
            TokenKind::Error => {
                return Err(SyntaxError::Lexer {
                    span,
                    message: format!("Unrecognized token: '{}'", lexeme),
                });
            }
            _ => tokens.push(Token { kind, lexeme, span }),
        }
    }

    log::trace!("Lexed {} token(s)", tokens.len());
    Ok(tokens)
}
