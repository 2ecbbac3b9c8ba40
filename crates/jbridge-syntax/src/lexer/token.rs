use logos::Logos;
use miette::SourceSpan;

/// A token spans from `start` to `end` within the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: SourceSpan,
}

/// The subset of Swift declaration syntax the reader cares about. Everything
/// else inside bodies only needs to lex and balance.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Keywords
    #[token("func")]
    Func,
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("class")]
    Class,
    #[token("struct")]
    Struct,
    #[token("async")]
    Async,
    #[token("throws")]
    Throws,
    #[token("@escaping")]
    Escaping,

    // Punctuation
    #[token("->")]
    Arrow,
    #[token("...")]
    Ellipsis,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("@")]
    At,

    // Operator runs, including `=`, `<` and `>`
    #[regex(r"[+\-*/%=<>!&|^~#\\]+")]
    Operator,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[error]
    Error,
}
