use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use crate::{SyntaxError, SyntaxResult};
use jbridge_model::{ClosureSignature, ParameterType, SourceType};
use miette::SourceSpan;

/// Declaration modifiers that carry no information for binding generation.
const IGNORED_MODIFIERS: &[&str] = &[
    "final",
    "override",
    "mutating",
    "nonmutating",
    "nonisolated",
    "lazy",
    "weak",
    "unowned",
    "convenience",
    "required",
    "dynamic",
    "indirect",
    "open",
];

/// Tokens that may start an item; used to resynchronize after skipped code.
fn starts_item(tok: &Token<'_>) -> bool {
    match tok.kind {
        TokenKind::Func
        | TokenKind::Var
        | TokenKind::Let
        | TokenKind::Class
        | TokenKind::Struct
        | TokenKind::At
        | TokenKind::RBrace => true,
        TokenKind::Ident => matches!(
            tok.lexeme,
            "public"
                | "private"
                | "fileprivate"
                | "internal"
                | "static"
                | "init"
                | "enum"
                | "actor"
                | "extension"
                | "protocol"
                | "import"
                | "typealias"
                | "deinit"
                | "subscript"
        ) || IGNORED_MODIFIERS.contains(&tok.lexeme),
        _ => false,
    }
}

/// Our hand-rolled parser structure.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct Modifiers {
    visibility: Visibility,
    is_static: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn at_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::Ident && t.lexeme == word)
    }

    /// Consume and return the current token.
    fn next(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Expect the next token to be of a specific kind.
    fn expect(&mut self, expected: TokenKind) -> SyntaxResult<Token<'a>> {
        match self.next() {
            Some(t) if t.kind == expected => Ok(t),
            Some(t) => Err(SyntaxError::Parser {
                span: t.span,
                message: format!("Expected {:?}, found '{}'", expected, t.lexeme),
            }),
            None => Err(SyntaxError::UnexpectedEof {
                expected: format!("{:?}", expected),
            }),
        }
    }

    fn expect_ident(&mut self) -> SyntaxResult<Token<'a>> {
        self.expect(TokenKind::Ident)
    }

    fn current_span(&self) -> SourceSpan {
        self.peek()
            .map(|t| t.span)
            .unwrap_or_else(|| SourceSpan::new(0.into(), 0usize))
    }

    /// Fails if any token is left unconsumed.
    pub fn finish(&self) -> SyntaxResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(SyntaxError::Parser {
                span: t.span,
                message: format!("Unexpected trailing '{}'", t.lexeme),
            }),
        }
    }

    //--------------------------------------------------------------------------
    // Items
    //--------------------------------------------------------------------------

    pub fn parse_file(&mut self) -> SyntaxResult<SourceFile> {
        let items = self.parse_items(false)?;
        Ok(SourceFile { items })
    }

    /// Parses items until end of input, or until the closing brace of a type
    /// body when `nested` is set.
    fn parse_items(&mut self, nested: bool) -> SyntaxResult<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                None if nested => {
                    return Err(SyntaxError::UnexpectedEof {
                        expected: "'}'".to_string(),
                    })
                }
                None => return Ok(items),
                Some(TokenKind::RBrace) if nested => return Ok(items),
                Some(TokenKind::RBrace) => {
                    return Err(SyntaxError::Parser {
                        span: self.current_span(),
                        message: "Unbalanced '}'".to_string(),
                    })
                }
                Some(_) => {
                    if let Some(item) = self.parse_item()? {
                        items.push(item);
                    }
                }
            }
        }
    }

    fn parse_modifiers(&mut self) -> SyntaxResult<Modifiers> {
        let mut modifiers = Modifiers::default();
        loop {
            let Some(tok) = self.peek() else { break };
            match tok.kind {
                TokenKind::At | TokenKind::Escaping => self.skip_attribute()?,
                TokenKind::Ident => match tok.lexeme {
                    "public" => {
                        modifiers.visibility = Visibility::Public;
                        self.pos += 1;
                    }
                    "private" | "fileprivate" => {
                        self.pos += 1;
                        // `private(set)` only restricts the setter
                        if !self.skip_modifier_argument()? {
                            modifiers.visibility = Visibility::Private;
                        }
                    }
                    "internal" => {
                        self.pos += 1;
                        if !self.skip_modifier_argument()? {
                            modifiers.visibility = Visibility::Internal;
                        }
                    }
                    "static" => {
                        modifiers.is_static = true;
                        self.pos += 1;
                    }
                    word if IGNORED_MODIFIERS.contains(&word) => self.pos += 1,
                    _ => break,
                },
                // `class func` / `class var`
                TokenKind::Class
                    if matches!(
                        self.peek_nth(1).map(|t| t.kind),
                        Some(TokenKind::Func | TokenKind::Var | TokenKind::Let)
                    ) =>
                {
                    modifiers.is_static = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        Ok(modifiers)
    }

    /// Skips the `(set)` of `private(set)`; returns whether one was present.
    fn skip_modifier_argument(&mut self) -> SyntaxResult<bool> {
        if self.peek_kind() == Some(TokenKind::LParen) {
            self.skip_balanced()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn skip_attribute(&mut self) -> SyntaxResult<()> {
        if self.eat(TokenKind::Escaping) {
            return Ok(());
        }
        self.expect(TokenKind::At)?;
        self.expect_ident()?;
        if self.peek_kind() == Some(TokenKind::LParen) {
            self.skip_balanced()?;
        }
        Ok(())
    }

    fn parse_item(&mut self) -> SyntaxResult<Option<Item>> {
        let modifiers = self.parse_modifiers()?;
        let Some(tok) = self.peek().cloned() else {
            return Ok(None);
        };

        match tok.kind {
            TokenKind::Class => self.parse_type_decl(TypeKind::Class, modifiers).map(Some),
            TokenKind::Struct => self.parse_type_decl(TypeKind::Struct, modifiers).map(Some),
            TokenKind::Func => self.parse_func(modifiers).map(|f| Some(Item::Func(f))),
            TokenKind::Var | TokenKind::Let => self.parse_var(modifiers).map(|v| v.map(Item::Var)),
            TokenKind::RBrace => Ok(None),
            TokenKind::Ident => match tok.lexeme {
                "enum" => self.parse_type_decl(TypeKind::Enum, modifiers).map(Some),
                "actor" => self.parse_type_decl(TypeKind::Actor, modifiers).map(Some),
                "extension" => self.parse_type_decl(TypeKind::Extension, modifiers).map(Some),
                "init" => self.parse_func(modifiers).map(|f| Some(Item::Func(f))),
                "protocol" | "deinit" | "subscript" => {
                    self.skip_until_block()?;
                    Ok(None)
                }
                _ => {
                    self.skip_statement()?;
                    Ok(None)
                }
            },
            _ => {
                self.skip_statement()?;
                Ok(None)
            }
        }
    }

    fn parse_type_decl(&mut self, kind: TypeKind, modifiers: Modifiers) -> SyntaxResult<Item> {
        self.next();
        let name = self.parse_dotted_name()?;
        // Generic parameters, conformances and where clauses.
        while !matches!(self.peek_kind(), Some(TokenKind::LBrace) | None) {
            self.next();
        }
        self.expect(TokenKind::LBrace)?;
        let items = self.parse_items(true)?;
        self.expect(TokenKind::RBrace)?;
        log::trace!("Parsed {:?} {} with {} member(s)", kind, name, items.len());
        Ok(Item::Type(TypeDecl {
            kind,
            name,
            visibility: modifiers.visibility,
            items,
        }))
    }

    fn parse_dotted_name(&mut self) -> SyntaxResult<String> {
        let mut name = self.expect_ident()?.lexeme.to_string();
        while self.peek_kind() == Some(TokenKind::Dot)
            && self.peek_nth(1).map(|t| t.kind) == Some(TokenKind::Ident)
        {
            self.next();
            name.push('.');
            name.push_str(self.expect_ident()?.lexeme);
        }
        Ok(name)
    }

    /// `func name<T>(params) async throws -> Ret { body }`, also `init(...)`.
    fn parse_func(&mut self, modifiers: Modifiers) -> SyntaxResult<FuncDecl> {
        let Some(head) = self.next() else {
            return Err(SyntaxError::UnexpectedEof {
                expected: "'func'".to_string(),
            });
        };
        let name = if head.kind == TokenKind::Ident && head.lexeme == "init" {
            // failable `init?`
            self.eat(TokenKind::Question);
            "init".to_string()
        } else {
            // identifiers, or operator runs for operator functions
            match self.next() {
                Some(t) => t.lexeme.to_string(),
                None => {
                    return Err(SyntaxError::UnexpectedEof {
                        expected: "function name".to_string(),
                    })
                }
            }
        };
        self.skip_generic_clause()?;
        let params = self.parse_params()?;

        let mut is_async = false;
        let mut throws = false;
        loop {
            if self.eat(TokenKind::Async) {
                is_async = true;
            } else if self.eat(TokenKind::Throws) || self.eat_ident("rethrows") {
                throws = true;
            } else {
                break;
            }
        }

        let ret = if self.eat(TokenKind::Arrow) {
            self.parse_type()?
        } else {
            SourceType::Void
        };

        if self.at_ident("where") {
            while !matches!(self.peek_kind(), Some(TokenKind::LBrace) | None) {
                self.next();
            }
        }
        if self.peek_kind() == Some(TokenKind::LBrace) {
            self.skip_balanced()?;
        }

        Ok(FuncDecl {
            name,
            visibility: modifiers.visibility,
            is_static: modifiers.is_static,
            params,
            is_async,
            throws,
            ret,
            span: head.span,
        })
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if self.at_ident(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_params(&mut self) -> SyntaxResult<Vec<Param>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while self.peek_kind() != Some(TokenKind::RParen) {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// `label name: Type`, `name: Type`, `_ name: Type...`, with optional default.
    fn parse_param(&mut self) -> SyntaxResult<Param> {
        let first = self.expect_ident()?.lexeme;
        let (label, name) = if self.peek_kind() == Some(TokenKind::Ident) {
            let second = self.expect_ident()?.lexeme;
            ((first != "_").then(|| first.to_string()), second.to_string())
        } else {
            (Some(first.to_string()), first.to_string())
        };
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let variadic = self.eat(TokenKind::Ellipsis);

        if matches!(self.peek(), Some(t) if t.kind == TokenKind::Operator && t.lexeme == "=") {
            self.skip_until(|t| matches!(t.kind, TokenKind::Comma | TokenKind::RParen))?;
        }

        Ok(Param {
            label,
            name,
            ty,
            variadic,
        })
    }

    /// `var name: Type = value`, `let name = value`, `var name: Type { get }`.
    ///
    /// Tuple patterns yield nothing.
    fn parse_var(&mut self, modifiers: Modifiers) -> SyntaxResult<Option<VarDecl>> {
        let Some(keyword) = self.next() else {
            return Ok(None);
        };
        let mutable = keyword.kind == TokenKind::Var;
        if self.peek_kind() != Some(TokenKind::Ident) {
            self.skip_statement()?;
            return Ok(None);
        }
        let name = self.expect_ident()?.lexeme.to_string();

        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        if matches!(self.peek(), Some(t) if t.kind == TokenKind::Operator && t.lexeme == "=") {
            self.next();
            self.skip_expression()?;
        }

        let mut computed = false;
        if self.peek_kind() == Some(TokenKind::LBrace) {
            computed = !self.block_is_observers();
            self.skip_balanced()?;
        }

        Ok(Some(VarDecl {
            name,
            visibility: modifiers.visibility,
            is_static: modifiers.is_static,
            mutable,
            ty,
            computed,
            span: keyword.span,
        }))
    }

    /// A `{ didSet ... }` / `{ willSet ... }` block keeps the property stored.
    fn block_is_observers(&self) -> bool {
        matches!(
            self.peek_nth(1),
            Some(t) if t.kind == TokenKind::Ident && matches!(t.lexeme, "didSet" | "willSet")
        )
    }

    //--------------------------------------------------------------------------
    // Types
    //--------------------------------------------------------------------------

    pub fn parse_type(&mut self) -> SyntaxResult<SourceType> {
        let mut escaping = false;
        loop {
            match self.peek() {
                Some(t) if t.kind == TokenKind::Escaping => {
                    escaping = true;
                    self.next();
                }
                Some(t) if t.kind == TokenKind::At => self.skip_attribute()?,
                Some(t)
                    if t.kind == TokenKind::Ident
                        && matches!(
                            t.lexeme,
                            "inout" | "some" | "any" | "borrowing" | "consuming" | "sending"
                        ) =>
                {
                    self.next();
                }
                _ => break,
            }
        }

        let mut ty = self.parse_type_primary(escaping)?;
        loop {
            if self.eat(TokenKind::Question) {
                ty = SourceType::Optional(Box::new(ty));
            } else if matches!(self.peek(), Some(t) if t.kind == TokenKind::Operator && t.lexeme == "!")
            {
                self.next();
                ty = SourceType::Optional(Box::new(ty));
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn parse_type_primary(&mut self, escaping: bool) -> SyntaxResult<SourceType> {
        match self.peek_kind() {
            Some(TokenKind::LParen) => self.parse_paren_type(escaping),
            Some(TokenKind::LBracket) => {
                self.next();
                let element = self.parse_type()?;
                let ty = if self.eat(TokenKind::Colon) {
                    // Dictionaries are read as arrays of pairs; both are
                    // rejected when validated.
                    let value = self.parse_type()?;
                    SourceType::Array(Box::new(SourceType::Tuple(vec![element, value])))
                } else {
                    SourceType::Array(Box::new(element))
                };
                self.expect(TokenKind::RBracket)?;
                Ok(ty)
            }
            Some(TokenKind::Ident) => {
                let name = self.parse_dotted_name()?;
                if self.at_open_angle() {
                    let args = self.parse_generic_args()?;
                    return Ok(match (name.as_str(), args.as_slice()) {
                        ("Optional", [inner]) => SourceType::Optional(Box::new(inner.clone())),
                        ("Array", [inner]) => SourceType::Array(Box::new(inner.clone())),
                        _ => SourceType::Nominal(format!(
                            "{}<{}>",
                            name,
                            args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
                        )),
                    });
                }
                Ok(SourceType::from_name(&name))
            }
            Some(_) => {
                let tok = self.next();
                Err(SyntaxError::Parser {
                    span: tok.as_ref().map(|t| t.span).unwrap_or_else(|| self.current_span()),
                    message: format!(
                        "Expected a type, found '{}'",
                        tok.map(|t| t.lexeme).unwrap_or_default()
                    ),
                })
            }
            None => Err(SyntaxError::UnexpectedEof {
                expected: "a type".to_string(),
            }),
        }
    }

    /// `( ... )` is a closure when followed by effects or `->`, otherwise a
    /// tuple, a parenthesized type, or `()`.
    fn parse_paren_type(&mut self, escaping: bool) -> SyntaxResult<SourceType> {
        self.expect(TokenKind::LParen)?;
        let mut elements = Vec::new();
        while self.peek_kind() != Some(TokenKind::RParen) {
            self.skip_element_labels();
            let ty = self.parse_type()?;
            let variadic = self.eat(TokenKind::Ellipsis);
            elements.push(ParameterType { ty, variadic });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let mut is_async = false;
        let mut throws = false;
        loop {
            if self.eat(TokenKind::Async) {
                is_async = true;
            } else if self.eat(TokenKind::Throws) || self.eat_ident("rethrows") {
                throws = true;
            } else {
                break;
            }
        }

        if is_async || throws || self.peek_kind() == Some(TokenKind::Arrow) {
            self.expect(TokenKind::Arrow)?;
            let ret = self.parse_type()?;
            return Ok(SourceType::Closure(Box::new(ClosureSignature {
                params: elements,
                ret,
                escaping,
                is_async,
                throws,
            })));
        }

        Ok(match elements.len() {
            0 => SourceType::Void,
            1 if !elements[0].variadic => elements.remove(0).ty,
            _ => SourceType::Tuple(elements.into_iter().map(|p| p.ty).collect()),
        })
    }

    /// Drops `name:` or `_ name:` in front of a tuple or closure element.
    fn skip_element_labels(&mut self) {
        let kind = |n: usize| self.peek_nth(n).map(|t| t.kind);
        if kind(0) == Some(TokenKind::Ident) && kind(1) == Some(TokenKind::Colon) {
            self.pos += 2;
        } else if kind(0) == Some(TokenKind::Ident)
            && kind(1) == Some(TokenKind::Ident)
            && kind(2) == Some(TokenKind::Colon)
        {
            self.pos += 3;
        }
    }

    fn at_open_angle(&self) -> bool {
        matches!(self.peek(), Some(t) if t.kind == TokenKind::Operator && t.lexeme.starts_with('<'))
    }

    fn parse_generic_args(&mut self) -> SyntaxResult<Vec<SourceType>> {
        self.split_operator_head('<')?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.split_operator_head('>')?;
        Ok(args)
    }

    /// Consumes a single `<` or `>` from the front of an operator run, so that
    /// `>>` closes two generic argument lists.
    fn split_operator_head(&mut self, head: char) -> SyntaxResult<()> {
        let Some(tok) = self.tokens.get_mut(self.pos) else {
            return Err(SyntaxError::UnexpectedEof {
                expected: format!("'{}'", head),
            });
        };
        if tok.kind != TokenKind::Operator || !tok.lexeme.starts_with(head) {
            return Err(SyntaxError::Parser {
                span: tok.span,
                message: format!("Expected '{}', found '{}'", head, tok.lexeme),
            });
        }
        if tok.lexeme.len() == 1 {
            self.pos += 1;
        } else {
            tok.lexeme = &tok.lexeme[1..];
            tok.span = SourceSpan::new((tok.span.offset() + 1).into(), tok.span.len() - 1);
        }
        Ok(())
    }

    //--------------------------------------------------------------------------
    // Skipping
    //--------------------------------------------------------------------------

    /// Skips one bracketed group starting at the current token.
    fn skip_balanced(&mut self) -> SyntaxResult<()> {
        let Some(open) = self.next() else {
            return Err(SyntaxError::UnexpectedEof {
                expected: "a bracket".to_string(),
            });
        };
        let mut stack = vec![open];
        while let Some(top) = stack.last().cloned() {
            let Some(tok) = self.next() else {
                return Err(SyntaxError::UnexpectedEof {
                    expected: format!("closing bracket for '{}'", top.lexeme),
                });
            };
            match tok.kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => stack.push(tok),
                TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                    if closes(top.kind) != Some(tok.kind) {
                        return Err(SyntaxError::Parser {
                            span: tok.span,
                            message: format!("'{}' does not close '{}'", tok.lexeme, top.lexeme),
                        });
                    }
                    stack.pop();
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Skips tokens until `stop` matches at bracket depth zero.
    fn skip_until(&mut self, stop: impl Fn(&Token<'a>) -> bool) -> SyntaxResult<()> {
        while let Some(tok) = self.peek() {
            if stop(tok) {
                break;
            }
            match tok.kind {
                TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => self.skip_balanced()?,
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    /// Skips an initializer expression up to the next item.
    fn skip_expression(&mut self) -> SyntaxResult<()> {
        if !self.skip_operand()? {
            return Ok(());
        }
        loop {
            match self.peek_kind() {
                // trailing call or subscript on the previous operand
                Some(TokenKind::LParen | TokenKind::LBracket) => self.skip_balanced()?,
                Some(TokenKind::Dot) => {
                    self.pos += 1;
                    self.eat(TokenKind::Ident);
                }
                Some(TokenKind::Operator | TokenKind::Question) => {
                    self.pos += 1;
                    if !self.skip_operand()? {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skips a bracketed group, an implicit member (`.none`) or a single token.
    /// Returns false at end of input.
    fn skip_operand(&mut self) -> SyntaxResult<bool> {
        match self.peek_kind() {
            Some(TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket) => self.skip_balanced()?,
            Some(TokenKind::Dot) => {
                self.pos += 1;
                self.eat(TokenKind::Ident);
            }
            Some(_) => self.pos += 1,
            None => return Ok(false),
        }
        Ok(true)
    }

    /// Skips a statement outside any known declaration form.
    fn skip_statement(&mut self) -> SyntaxResult<()> {
        match self.peek_kind() {
            Some(TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket) => self.skip_balanced()?,
            Some(_) => self.pos += 1,
            None => return Ok(()),
        }
        self.skip_until(starts_item)
    }

    /// Skips a header and its block, for declarations we never bind.
    fn skip_until_block(&mut self) -> SyntaxResult<()> {
        self.next();
        while !matches!(self.peek_kind(), Some(TokenKind::LBrace) | None) {
            self.next();
        }
        if self.peek_kind() == Some(TokenKind::LBrace) {
            self.skip_balanced()?;
        }
        Ok(())
    }

    fn skip_generic_clause(&mut self) -> SyntaxResult<()> {
        if !self.at_open_angle() {
            return Ok(());
        }
        let mut depth = 0i32;
        while let Some(tok) = self.next() {
            if tok.kind == TokenKind::Operator {
                depth += tok.lexeme.matches('<').count() as i32;
                depth -= tok.lexeme.matches('>').count() as i32;
                if depth <= 0 {
                    return Ok(());
                }
            }
        }
        Err(SyntaxError::UnexpectedEof {
            expected: "'>'".to_string(),
        })
    }
}

fn closes(open: TokenKind) -> Option<TokenKind> {
    match open {
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBrace => Some(TokenKind::RBrace),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        _ => None,
    }
}
