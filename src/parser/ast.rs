use serde::Serialize;

use crate::span::Position;

/// Outcome of parsing one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "statements", rename_all = "snake_case")]
pub enum ParseResult {
    /// The whole input was consumed. Statements are in source order.
    Parsed(Vec<Statement>),
    /// The parser could not advance; the file contributes nothing.
    Failed,
}

impl ParseResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, ParseResult::Parsed(_))
    }

    pub fn statements(&self) -> &[Statement] {
        match self {
            ParseResult::Parsed(stmts) => stmts,
            ParseResult::Failed => &[],
        }
    }

    pub fn into_statements(self) -> Vec<Statement> {
        match self {
            ParseResult::Parsed(stmts) => stmts,
            ParseResult::Failed => Vec::new(),
        }
    }
}

/// A recognized top-level construct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Module(ModuleDecl),
    Import(ImportDecl),
    Type(TypeDecl),
    TypeAlias(TypeAliasDecl),
}

impl Statement {
    /// Position of the construct's first token.
    pub fn position(&self) -> Position {
        match self {
            Statement::Module(m) => m.position,
            Statement::Import(i) => i.position,
            Statement::Type(t) => t.position,
            Statement::TypeAlias(a) => a.position,
        }
    }

    /// The type name introduced by a `type` or `type alias` declaration.
    pub fn declared_type(&self) -> Option<&str> {
        match self {
            Statement::Type(t) => Some(&t.name),
            Statement::TypeAlias(a) => Some(&a.name),
            Statement::Module(_) | Statement::Import(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Plain,
    Port,
    Effect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDecl {
    pub kind: ModuleKind,
    pub name: String,
    pub exposing: Exposing,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDecl {
    pub module: String,
    pub alias: Option<String>,
    pub exposing: Exposing,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDecl {
    pub name: String,
    pub constructors: Vec<Constructor>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub annotation: TypeExpr,
    pub position: Position,
}

/// One alternative of a `type` declaration: `Name arg arg ...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constructor {
    pub name: String,
    pub args: Vec<TypeExpr>,
}

/// The `exposing` clause of a module header or import.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "form", content = "items", rename_all = "snake_case")]
pub enum Exposing {
    /// `exposing (..)`
    All,
    /// `exposing (a, B, C(..), (<|))`
    List(Vec<ExposedItem>),
    /// No clause.
    #[default]
    None,
}

impl Exposing {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Exposing::List(items) => items.iter().map(ExposedItem::name).collect(),
            Exposing::All | Exposing::None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExposedItem {
    Value { name: String },
    /// `constructors` is set for `Name(..)`.
    Type { name: String, constructors: bool },
    Operator { symbol: String },
}

impl ExposedItem {
    pub fn name(&self) -> &str {
        match self {
            ExposedItem::Value { name } | ExposedItem::Type { name, .. } => name,
            ExposedItem::Operator { symbol } => symbol,
        }
    }
}

/// A type annotation. Parenthesized groups are not represented; they yield the
/// inner expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Var { name: String },
    Constructor { name: String, args: Vec<TypeExpr> },
    Record { fields: Vec<RecordField> },
    ExtensibleRecord { base: String, fields: Vec<RecordField> },
    /// The empty tuple is the unit type `()`.
    Tuple { items: Vec<TypeExpr> },
    /// `a -> b -> c` as a flat list, right-associative by convention.
    Function { parts: Vec<TypeExpr> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub ty: TypeExpr,
}

impl TypeExpr {
    fn fmt_atom(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Constructor { args, .. } if !args.is_empty() => write!(f, "({self})"),
            TypeExpr::Function { .. } => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

fn fmt_fields(fields: &[RecordField], f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, " {} : {}", field.name, field.ty)?;
    }
    write!(f, " }}")
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeExpr::Var { name } => write!(f, "{name}"),
            TypeExpr::Constructor { name, args } => {
                write!(f, "{name}")?;
                for arg in args {
                    write!(f, " ")?;
                    arg.fmt_atom(f)?;
                }
                Ok(())
            }
            TypeExpr::Record { fields } if fields.is_empty() => write!(f, "{{}}"),
            TypeExpr::Record { fields } => {
                write!(f, "{{")?;
                fmt_fields(fields, f)
            }
            TypeExpr::ExtensibleRecord { base, fields } => {
                write!(f, "{{ {base} |")?;
                fmt_fields(fields, f)
            }
            TypeExpr::Tuple { items } if items.is_empty() => write!(f, "()"),
            TypeExpr::Tuple { items } => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {item}")?;
                }
                write!(f, " )")
            }
            TypeExpr::Function { parts } => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    match part {
                        TypeExpr::Function { .. } => write!(f, "({part})")?,
                        _ => write!(f, "{part}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " ")?;
            arg.fmt_atom(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for ExposedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExposedItem::Value { name } => write!(f, "{name}"),
            ExposedItem::Type { name, constructors: true } => write!(f, "{name}(..)"),
            ExposedItem::Type { name, constructors: false } => write!(f, "{name}"),
            ExposedItem::Operator { symbol } => write!(f, "({symbol})"),
        }
    }
}

/// Renders the clause with a leading space, or nothing for `None`.
impl std::fmt::Display for Exposing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exposing::All => write!(f, " exposing (..)"),
            Exposing::List(items) => {
                write!(f, " exposing (")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Exposing::None => Ok(()),
        }
    }
}

/// One-line summary. Type parameters are not kept, so they are not shown.
impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Module(m) => {
                let prefix = match m.kind {
                    ModuleKind::Plain => "",
                    ModuleKind::Port => "port ",
                    ModuleKind::Effect => "effect ",
                };
                write!(f, "{prefix}module {}{}", m.name, m.exposing)
            }
            Statement::Import(i) => {
                write!(f, "import {}", i.module)?;
                if let Some(alias) = &i.alias {
                    write!(f, " as {alias}")?;
                }
                write!(f, "{}", i.exposing)
            }
            Statement::Type(t) => {
                write!(f, "type {} =", t.name)?;
                for (i, ctor) in t.constructors.iter().enumerate() {
                    if i > 0 {
                        write!(f, " |")?;
                    }
                    write!(f, " {ctor}")?;
                }
                Ok(())
            }
            Statement::TypeAlias(a) => write!(f, "type alias {} = {}", a.name, a.annotation),
        }
    }
}
