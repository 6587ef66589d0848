pub mod token;
pub use token::is_keyword;

use logos::Logos;
use crate::span::{Span, Spanned};
use token::Token;

/// Tokenize Elm source. Lexing never fails: characters no rule accepts become
/// `Token::Unknown` so the declaration parser can skip them like any other
/// unrecognized text. Comments are dropped.
pub fn lex(source: &str) -> Vec<Spanned<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let tok = result.unwrap_or(Token::Unknown);
        // Skip comments
        if matches!(tok, Token::Comment) {
            continue;
        }
        tokens.push(Spanned::new(tok, Span::new(span.start, span.end)));
    }

    tokens
}
