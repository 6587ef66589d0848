use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Keywords
    #[token("module")]
    Module,
    #[token("port")]
    Port,
    #[token("effect")]
    Effect,
    #[token("where")]
    Where,
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("exposing")]
    Exposing,
    #[token("type")]
    Type,
    #[token("alias")]
    Alias,

    // Identifiers
    #[regex(r"[a-z][a-zA-Z0-9_]*")]
    LowerIdent,
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    UpperIdent,
    #[token("_")]
    Underscore,

    // Literals
    #[regex(r"[0-9][0-9a-zA-Z_]*")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[token("\"\"\"", triple_quoted)]
    StringLit,
    #[regex(r"'([^'\\\n]|\\[^\n][^'\n]*)'")]
    CharLit,

    // Punctuation
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
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,
    #[token("->")]
    Arrow,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,

    // Any other run of symbol characters: `|>`, `==`, `::`, `<|`, `++` ...
    #[regex(r"[+\-*/<>=|&^!?~%@#$\\:.]+", priority = 1)]
    Operator,

    // Newline (significant for the line-skipping fallback)
    #[regex(r"\n[\n]*")]
    Newline,

    // Comments (skip)
    #[regex(r"--[^\n]*")]
    #[token("{-", block_comment)]
    Comment,

    /// A character no other rule accepts. Produced by `lex`, never by logos.
    Unknown,
}

/// Consume a `{- ... -}` comment body, honoring nesting. An unterminated
/// comment runs to the end of input.
fn block_comment(lex: &mut Lexer<Token>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(b"{-") {
            depth += 1;
            i += 2;
        } else if rest[i..].starts_with(b"-}") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(rest.len());
    true
}

/// Consume a `"""` string body up to the closing `"""`, skipping escapes.
fn triple_quoted(lex: &mut Lexer<Token>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i] == b'\\' {
            i += 2;
        } else if rest[i..].starts_with(b"\"\"\"") {
            lex.bump(i + 3);
            return true;
        } else {
            i += 1;
        }
    }
    lex.bump(rest.len());
    true
}

/// Returns true if the given string is reserved by the declaration grammar.
pub fn is_keyword(s: &str) -> bool {
    matches!(s, "module" | "port" | "effect" | "where" | "import" | "as"
        | "exposing" | "type" | "alias")
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Module => write!(f, "module"),
            Token::Port => write!(f, "port"),
            Token::Effect => write!(f, "effect"),
            Token::Where => write!(f, "where"),
            Token::Import => write!(f, "import"),
            Token::As => write!(f, "as"),
            Token::Exposing => write!(f, "exposing"),
            Token::Type => write!(f, "type"),
            Token::Alias => write!(f, "alias"),
            Token::LowerIdent => write!(f, "lowercase identifier"),
            Token::UpperIdent => write!(f, "uppercase identifier"),
            Token::Underscore => write!(f, "_"),
            Token::Number => write!(f, "number"),
            Token::StringLit => write!(f, "string literal"),
            Token::CharLit => write!(f, "char literal"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Eq => write!(f, "="),
            Token::Pipe => write!(f, "|"),
            Token::Arrow => write!(f, "->"),
            Token::DotDot => write!(f, ".."),
            Token::Dot => write!(f, "."),
            Token::Operator => write!(f, "operator"),
            Token::Newline => write!(f, "newline"),
            Token::Comment => write!(f, "comment"),
            Token::Unknown => write!(f, "unrecognized character"),
        }
    }
}
