//! The set-expression language: lexer, parser, and AST evaluation.
//!
//! Operators, loosest-binding first: `+` union and `-` difference
//! (left-associative peers), `*` intersection, `!` complement. Parentheses
//! group; code points are written `U+HHHH` or bare hex with a leading
//! decimal digit; properties are selected as `prefix:name,name`.
//!
//! ```no_run
//! # use guniset::{EvalContext, expr};
//! # fn demo(ctx: &EvalContext) -> Result<(), guniset::GunisetError> {
//! let node = expr::parse("(cat:Lu + cat:Ll) - U+0041..U+005A", ctx)?;
//! let set = node.eval(ctx);
//! for range in set.ranges() {
//!     println!("{{ 0x{:04X}, 0x{:04X} }},", range.first, range.last);
//! }
//! # Ok(())
//! # }
//! ```

mod lexer;
mod node;
mod parser;

// Re-export the public API
pub use lexer::{tokenize, Token, TokenKind};
pub use node::Node;
pub use parser::parse;
