use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

/// A declaration that started with a recognized keyword but did not match the
/// grammar. The parser recovers from these by skipping the line, so they never
/// fail a parse; they are kept for `elmdef check`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error: {msg}")]
pub struct SyntaxError {
    pub msg: String,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(msg: impl Into<String>, span: Span) -> Self {
        Self { msg: msg.into(), span }
    }
}

/// Failures of project discovery and file loading. None of these reach the
/// resolver: an unreadable file is excluded, a bad manifest falls back to
/// walking the project root.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("project root '{}' is not a directory", path.display())]
    MissingRoot { path: PathBuf },

    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest error: {msg}")]
    Manifest { msg: String, path: PathBuf },
}

impl WorkspaceError {
    pub fn missing_root(path: impl Into<PathBuf>) -> Self {
        Self::MissingRoot { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn manifest(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Manifest { msg: msg.into(), path }
    }
}

/// Render a recovered SyntaxError with ariadne for nice terminal output.
pub fn render_syntax_error(source: &str, filename: &str, err: &SyntaxError) -> std::io::Result<()> {
    use ariadne::{Label, Report, ReportKind, Source};

    // ariadne counts characters, spans count bytes
    let start = char_offset(source, err.span.start);
    let end = char_offset(source, err.span.end).max(start);

    Report::build(ReportKind::Warning, (), start)
        .with_message(format!("unrecognized declaration in {filename}"))
        .with_label(Label::new(start..end).with_message(&err.msg))
        .with_note("this line was skipped; it contributes no definitions")
        .finish()
        .eprint(Source::from(source))
}

fn char_offset(source: &str, byte_offset: usize) -> usize {
    let clamped = byte_offset.min(source.len());
    source
        .get(..clamped)
        .map_or(clamped, |prefix| prefix.chars().count())
}
