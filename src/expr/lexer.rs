//! Tokenizer for the set-expression language.
//!
//! Scanning is greedy longest-match against an ordered lexeme table; the
//! first entry that matches wins, so `U+...` code points are claimed before
//! the identifier rule can take the `U`. Whitespace is kept in the stream as
//! [`TokenKind::Space`] tokens (the parser skips them), which makes the
//! token texts concatenate back to the exact input.
//!
//! Bare hex requires a *leading decimal digit*: in `0..f` the `f` lexes as
//! an identifier and range parsing fails. `0..0f` and `0..U+f` spell that
//! range. This asymmetry is part of the grammar, not an accident.

use crate::GunisetError;

/// The token alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Hex,
    Colon,
    Comma,
    LParen,
    RParen,
    Negate,
    Plus,
    Minus,
    Times,
    Range,
    Space,
}

impl TokenKind {
    /// Display name used in parse errors.
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Hex => "codePoint",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Negate => "!",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Times => "*",
            TokenKind::Range => "..",
            TokenKind::Space => "space",
        }
    }
}

/// One lexed token with its exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    #[cfg(test)]
    pub fn new(kind: TokenKind, text: &str) -> Self {
        Token {
            kind,
            text: text.to_string(),
        }
    }
}

type Matcher = fn(&str) -> Option<usize>;

fn match_unicode_hex(s: &str) -> Option<usize> {
    let rest = s.strip_prefix("U+")?;
    let digits = rest.bytes().take_while(u8::is_ascii_hexdigit).count();
    if digits == 0 {
        return None;
    }
    Some(2 + digits)
}

fn match_bare_hex(s: &str) -> Option<usize> {
    if !s.as_bytes().first()?.is_ascii_digit() {
        return None;
    }
    Some(s.bytes().take_while(u8::is_ascii_hexdigit).count())
}

fn match_ident(s: &str) -> Option<usize> {
    let first = *s.as_bytes().first()?;
    if !first.is_ascii_alphabetic() && first != b'_' {
        return None;
    }
    Some(
        s.bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count(),
    )
}

fn match_range(s: &str) -> Option<usize> {
    s.starts_with("..").then_some(2)
}

fn match_space(s: &str) -> Option<usize> {
    let n = s
        .bytes()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\n'))
        .count();
    (n > 0).then_some(n)
}

fn match_byte(s: &str, byte: u8) -> Option<usize> {
    (*s.as_bytes().first()? == byte).then_some(1)
}

/// Ordered lexeme table; entry order resolves overlaps (`U+` before ident,
/// `..` has no overlap with `-`).
const LEXEMES: [(TokenKind, Matcher); 13] = [
    (TokenKind::Hex, match_unicode_hex),
    (TokenKind::Hex, match_bare_hex),
    (TokenKind::Ident, match_ident),
    (TokenKind::Colon, |s| match_byte(s, b':')),
    (TokenKind::Comma, |s| match_byte(s, b',')),
    (TokenKind::LParen, |s| match_byte(s, b'(')),
    (TokenKind::RParen, |s| match_byte(s, b')')),
    (TokenKind::Negate, |s| match_byte(s, b'!')),
    (TokenKind::Plus, |s| match_byte(s, b'+')),
    (TokenKind::Minus, |s| match_byte(s, b'-')),
    (TokenKind::Times, |s| match_byte(s, b'*')),
    (TokenKind::Range, match_range),
    (TokenKind::Space, match_space),
];

/// Tokenize the whole input, or fail with the unmatched tail.
pub fn tokenize(src: &str) -> Result<Vec<Token>, GunisetError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    'scan: while pos < src.len() {
        let rest = &src[pos..];
        for (kind, matcher) in LEXEMES {
            if let Some(len) = matcher(rest) {
                tokens.push(Token {
                    kind,
                    text: rest[..len].to_string(),
                });
                pos += len;
                continue 'scan;
            }
        }
        return Err(GunisetError::Lex {
            remainder: rest.to_string(),
        });
    }
    Ok(tokens)
}
