pub mod ast;
mod types;

use crate::diagnostics::SyntaxError;
use crate::lexer::{self, token::Token};
use crate::line_index::LineIndex;
use crate::span::{Position, Span, Spanned};
use ast::*;

/// Parse one file's text into its top-level declarations.
pub fn parse(source: &str) -> ParseResult {
    parse_with_diagnostics(source).0
}

/// Like `parse`, but also returns the declarations that were skipped because
/// they started with a declaration keyword and then did not match.
pub fn parse_with_diagnostics(source: &str) -> (ParseResult, Vec<SyntaxError>) {
    let tokens = lexer::lex(source);
    let mut parser = Parser::new(&tokens, source);
    let result = parser.parse_file();
    (result, parser.into_recovered())
}

/// The region owned by the construct being parsed: every token on its first
/// line, plus every later token indented past its first token. A closing
/// bracket also belongs to it while a bracket opened inside is unclosed.
#[derive(Debug, Clone, Copy)]
struct Layout {
    line: usize,
    column: usize,
}

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    positions: Vec<Position>,
    pos: usize,
    layout: Option<Layout>,
    /// Brackets opened and not yet closed in the current construct.
    depth: usize,
    recovered: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        let index = LineIndex::new(source);
        let positions = tokens.iter().map(|t| index.position(t.span.start)).collect();
        Self { tokens, source, positions, pos: 0, layout: None, depth: 0, recovered: Vec::new() }
    }

    pub fn into_recovered(self) -> Vec<SyntaxError> {
        self.recovered
    }

    fn in_layout(&self, i: usize, depth: usize) -> bool {
        match self.layout {
            None => true,
            Some(layout) => {
                let p = self.positions[i];
                p.line == layout.line
                    || p.column > layout.column
                    || (depth > 0 && is_closer(&self.tokens[i].node))
            }
        }
    }

    /// Index of the n-th significant token from the cursor. Newlines are
    /// skipped; tokens outside the current layout count as end of input.
    fn lookahead(&self, n: usize) -> Option<usize> {
        let mut seen = 0;
        let mut depth = self.depth;
        for i in self.pos..self.tokens.len() {
            let tok = &self.tokens[i].node;
            if matches!(tok, Token::Newline) {
                continue;
            }
            if !self.in_layout(i, depth) {
                return None;
            }
            if seen == n {
                return Some(i);
            }
            depth = nested_depth(depth, tok);
            seen += 1;
        }
        None
    }

    fn peek(&self) -> Option<&'a Spanned<Token>> {
        let tokens = self.tokens;
        self.lookahead(0).map(|i| &tokens[i])
    }

    fn at(&self, expected: &Token) -> bool {
        self.at_nth(0, expected)
    }

    fn at_nth(&self, n: usize, expected: &Token) -> bool {
        let tokens = self.tokens;
        self.lookahead(n)
            .is_some_and(|i| same_kind(&tokens[i].node, expected))
    }

    fn advance(&mut self) -> Option<&'a Spanned<Token>> {
        let tokens = self.tokens;
        let i = self.lookahead(0)?;
        self.pos = i + 1;
        self.depth = nested_depth(self.depth, &tokens[i].node);
        Some(&tokens[i])
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.at(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.pos < self.tokens.len() && matches!(self.tokens[self.pos].node, Token::Newline) {
            self.pos += 1;
        }
    }

    /// Catch-all: consume everything through the next newline, or to end of input.
    fn skip_line(&mut self) {
        while let Some(tok) = self.tokens.get(self.pos) {
            self.pos += 1;
            if matches!(tok.node, Token::Newline) {
                break;
            }
        }
    }

    fn text(&self, span: Span) -> &'a str {
        let source = self.source;
        &source[span.start..span.end]
    }

    fn end_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(last) => Span::new(last.span.end, last.span.end),
            None => Span::dummy(),
        }
    }

    fn unexpected_end(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(format!("expected {expected}, found end of declaration"), self.end_span())
    }

    fn expect(&mut self, expected: &Token) -> Result<Span, SyntaxError> {
        match self.peek() {
            Some(tok) if same_kind(&tok.node, expected) => {
                self.advance();
                Ok(tok.span)
            }
            Some(tok) => Err(SyntaxError::new(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(self.unexpected_end(&expected.to_string())),
        }
    }

    fn expect_upper(&mut self) -> Result<Spanned<String>, SyntaxError> {
        let span = self.expect(&Token::UpperIdent)?;
        Ok(Spanned::new(self.text(span).to_string(), span))
    }

    fn expect_lower(&mut self) -> Result<String, SyntaxError> {
        match self.peek() {
            Some(tok) if is_lower_name(&tok.node) => {
                self.advance();
                Ok(self.text(tok.span).to_string())
            }
            Some(tok) => Err(SyntaxError::new(
                format!("expected lowercase name, found {}", tok.node),
                tok.span,
            )),
            None => Err(self.unexpected_end("lowercase name")),
        }
    }

    /// `Foo.Bar.Baz`: uppercase segments joined by dots with no whitespace.
    fn expect_upper_path(&mut self) -> Result<String, SyntaxError> {
        let first = self.expect_upper()?;
        let mut path = first.node;
        let mut end = first.span.end;
        // Use raw tokens: a path never spans whitespace, let alone lines
        while let (Some(dot), Some(segment)) = (self.tokens.get(self.pos), self.tokens.get(self.pos + 1)) {
            let joined = matches!(dot.node, Token::Dot)
                && dot.span.start == end
                && matches!(segment.node, Token::UpperIdent)
                && segment.span.start == dot.span.end;
            if !joined {
                break;
            }
            path.push('.');
            path.push_str(self.text(segment.span));
            end = segment.span.end;
            self.pos += 2;
        }
        Ok(path)
    }

    /// Parse the whole file. Each iteration starts a new construct at the next
    /// token; if no statement form matches, the rest of the line is skipped.
    pub fn parse_file(&mut self) -> ParseResult {
        let mut statements = Vec::new();
        loop {
            self.layout = None;
            self.skip_newlines();
            let start = self.pos;
            if start >= self.tokens.len() {
                break;
            }
            let first = self.positions[start];
            self.layout = Some(Layout { line: first.line, column: first.column });
            self.depth = 0;

            match self.parse_statement(first) {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {
                    self.pos = start;
                    self.skip_line();
                }
                Err(err) => {
                    self.recovered.push(err);
                    self.pos = start;
                    self.skip_line();
                }
            }

            if self.pos <= start {
                self.layout = None;
                return ParseResult::Failed;
            }
        }
        self.layout = None;
        ParseResult::Parsed(statements)
    }

    /// Ordered alternatives, first match wins. Each alternative is keyed by a
    /// distinct leading keyword and returns Ok(None) without consuming anything
    /// when that keyword is absent, so a committed alternative that fails goes
    /// straight to the line skip.
    fn parse_statement(&mut self, position: Position) -> Result<Option<Statement>, SyntaxError> {
        if let Some(module) = self.parse_module(position)? {
            return Ok(Some(Statement::Module(module)));
        }
        if let Some(import) = self.parse_import(position)? {
            return Ok(Some(Statement::Import(import)));
        }
        if let Some(decl) = self.parse_type_decl(position)? {
            return Ok(Some(Statement::Type(decl)));
        }
        if let Some(alias) = self.parse_type_alias(position)? {
            return Ok(Some(Statement::TypeAlias(alias)));
        }
        Ok(None)
    }

    fn parse_module(&mut self, position: Position) -> Result<Option<ModuleDecl>, SyntaxError> {
        let kind = match self.peek().map(|t| &t.node) {
            Some(Token::Module) => ModuleKind::Plain,
            Some(Token::Port) if self.at_nth(1, &Token::Module) => ModuleKind::Port,
            Some(Token::Effect) if self.at_nth(1, &Token::Module) => ModuleKind::Effect,
            _ => return Ok(None),
        };
        if kind != ModuleKind::Plain {
            self.advance();
        }
        self.expect(&Token::Module)?;
        let name = self.expect_upper_path()?;
        if kind == ModuleKind::Effect && self.eat(&Token::Where) {
            self.skip_braced()?;
        }
        let exposing = self.parse_exposing()?;
        Ok(Some(ModuleDecl { kind, name, exposing, position }))
    }

    /// Skip a balanced `{ ... }` block, e.g. an effect module's `where` clause.
    fn skip_braced(&mut self) -> Result<(), SyntaxError> {
        self.expect(&Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().map(|t| &t.node) {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err(self.unexpected_end("}")),
            }
        }
        Ok(())
    }

    fn parse_import(&mut self, position: Position) -> Result<Option<ImportDecl>, SyntaxError> {
        if !self.eat(&Token::Import) {
            return Ok(None);
        }
        let module = self.expect_upper_path()?;
        let alias = if self.eat(&Token::As) {
            Some(self.expect_upper()?.node)
        } else {
            None
        };
        let exposing = self.parse_exposing()?;
        Ok(Some(ImportDecl { module, alias, exposing, position }))
    }

    fn parse_exposing(&mut self) -> Result<Exposing, SyntaxError> {
        if !self.eat(&Token::Exposing) {
            return Ok(Exposing::None);
        }
        self.expect(&Token::LParen)?;
        if self.eat(&Token::DotDot) {
            self.expect(&Token::RParen)?;
            return Ok(Exposing::All);
        }
        let mut items = vec![self.parse_exposed_item()?];
        while self.eat(&Token::Comma) {
            items.push(self.parse_exposed_item()?);
        }
        self.expect(&Token::RParen)?;
        Ok(Exposing::List(items))
    }

    fn parse_exposed_item(&mut self) -> Result<ExposedItem, SyntaxError> {
        let Some(tok) = self.peek() else {
            return Err(self.unexpected_end("exposed name"));
        };
        match &tok.node {
            Token::UpperIdent => {
                let name = self.expect_upper()?.node;
                let constructors = self.at(&Token::LParen) && self.at_nth(1, &Token::DotDot);
                if constructors {
                    self.advance();
                    self.advance();
                    self.expect(&Token::RParen)?;
                }
                Ok(ExposedItem::Type { name, constructors })
            }
            Token::LParen => {
                self.advance();
                let op = self.expect(&Token::Operator)?;
                self.expect(&Token::RParen)?;
                Ok(ExposedItem::Operator { symbol: self.text(op).to_string() })
            }
            t if is_lower_name(t) => Ok(ExposedItem::Value { name: self.expect_lower()? }),
            other => Err(SyntaxError::new(
                format!("expected exposed name, found {other}"),
                tok.span,
            )),
        }
    }

    fn parse_type_decl(&mut self, position: Position) -> Result<Option<TypeDecl>, SyntaxError> {
        if !self.at(&Token::Type) || self.at_nth(1, &Token::Alias) {
            return Ok(None);
        }
        self.advance();
        let name = self.parse_type_lhs()?;
        let mut constructors = vec![self.parse_constructor()?];
        while self.eat(&Token::Pipe) {
            constructors.push(self.parse_constructor()?);
        }
        Ok(Some(TypeDecl { name, constructors, position }))
    }

    fn parse_type_alias(&mut self, position: Position) -> Result<Option<TypeAliasDecl>, SyntaxError> {
        if !(self.at(&Token::Type) && self.at_nth(1, &Token::Alias)) {
            return Ok(None);
        }
        self.advance();
        self.advance();
        let name = self.parse_type_lhs()?;
        let annotation = self.parse_type()?;
        Ok(Some(TypeAliasDecl { name, annotation, position }))
    }

    /// `Name a b =`. The type variables are consumed but only the name is kept.
    fn parse_type_lhs(&mut self) -> Result<String, SyntaxError> {
        let name = self.expect_upper()?.node;
        while self.peek().is_some_and(|t| is_lower_name(&t.node)) {
            self.advance();
        }
        self.expect(&Token::Eq)?;
        Ok(name)
    }
}

fn is_closer(tok: &Token) -> bool {
    matches!(tok, Token::RParen | Token::RBrace | Token::RBracket)
}

fn nested_depth(depth: usize, tok: &Token) -> usize {
    match tok {
        Token::LParen | Token::LBrace | Token::LBracket => depth + 1,
        t if is_closer(t) => depth.saturating_sub(1),
        _ => depth,
    }
}

fn same_kind(a: &Token, b: &Token) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// Keywords that only mean something at the start of a declaration are still
/// valid names for record fields and type variables.
fn is_lower_name(tok: &Token) -> bool {
    matches!(
        tok,
        Token::LowerIdent
            | Token::As
            | Token::Exposing
            | Token::Port
            | Token::Effect
            | Token::Where
            | Token::Alias
    )
}
