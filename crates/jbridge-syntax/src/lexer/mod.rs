pub mod lexer;
pub mod token;

pub use lexer::*;
pub use token::*;

#[cfg(test)]
mod tests {
    use crate::lexer::{lex, TokenKind};

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_closure_type() {
        assert_eq!(
            kinds("callback: @escaping (Int64) async -> Int64"),
            vec![
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Escaping,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Async,
                TokenKind::Arrow,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_versus_identifiers() {
        assert_eq!(
            kinds("func funcs var variable asyncWork"),
            vec![
                TokenKind::Func,
                TokenKind::Ident,
                TokenKind::Var,
                TokenKind::Ident,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_variadic_and_operators() {
        assert_eq!(
            kinds("Int... = a >= b"),
            vec![
                TokenKind::Ident,
                TokenKind::Ellipsis,
                TokenKind::Operator,
                TokenKind::Ident,
                TokenKind::Operator,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_lex_skips_comments() {
        assert_eq!(
            kinds("// a comment\nvar /* inline */ x"),
            vec![TokenKind::Var, TokenKind::Ident]
        );
    }

    #[test]
    fn test_lex_string_with_interpolation() {
        let tokens = lex(r#"print("value \(x)")"#).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::StringLit);
        assert_eq!(tokens[2].lexeme, r#""value \(x)""#);
    }

    #[test]
    fn test_lex_invalid_token() {
        assert!(lex("var x = 'a'").is_err());
    }

    #[test]
    fn test_lex_empty_input() {
        assert!(lex("").unwrap().is_empty());
    }
}
