//! guniset: evaluate set expressions over Unicode code points.
//!
//! An expression such as `cat:Lu,Ll + eaw:W - U+0041..U+005A` is lexed,
//! parsed into an AST, and evaluated against a loaded Unicode Character
//! Database snapshot, producing a canonical set of code points that can be
//! emitted as `{ first, last }` ranges, sampled, or probed per code point.
//!
//! # Module Organization
//!
//! - `set`: the code-point set primitive and its bulk builder
//! - `property`: property kinds, fixed enums, open-kind definitions, aliases
//! - `load`: UCD text-file loaders
//! - `context`: the loaded snapshot plus per-code-point queries
//! - `expr`: lexer, parser, and AST evaluation

pub mod context;
pub mod expr;
pub mod load;
pub mod property;
pub mod set;

#[cfg(test)]
mod testdata;

pub use context::{DirSource, EvalContext, QueryResult, UcdSource};
pub use expr::{parse, Node};
pub use load::DataHeader;
pub use property::{AliasMap, AliasSet, EastAsianWidth, GeneralCategory, PropertyDef, PropertyKind};
pub use set::{CodePointSet, CodePointSetBuilder, RuneRange};

use std::fmt;

/// Errors produced while lexing, parsing, loading UCD data, or writing output.
#[derive(Debug)]
pub enum GunisetError {
    /// The expression contains a tail no lexeme matches.
    Lex { remainder: String },
    /// The token stream does not match the grammar.
    Syntax { message: String },
    /// An identifier after `:` is not a value of the selected property kind.
    UnknownPropertyValue { kind: &'static str, value: String },
    /// A hex literal does not denote a scalar in `[0, 0x10FFFF]`.
    InvalidRune { text: String },
    /// A UCD file could not be read or parsed.
    Load {
        file: String,
        line: usize,
        cause: String,
    },
    /// Output could not be written.
    Io(std::io::Error),
}

impl fmt::Display for GunisetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GunisetError::Lex { remainder } => write!(f, "invalid token: {}", remainder),
            GunisetError::Syntax { message } => write!(f, "{}", message),
            GunisetError::UnknownPropertyValue { kind, value } => {
                write!(f, "unknown {}: {}", kind, value)
            }
            GunisetError::InvalidRune { text } => write!(f, "invalid rune: {}", text),
            GunisetError::Load { file, line, cause } => {
                write!(f, "{}:{}: [load error] {}", file, line, cause)
            }
            GunisetError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GunisetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GunisetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GunisetError {
    fn from(err: std::io::Error) -> Self {
        GunisetError::Io(err)
    }
}
