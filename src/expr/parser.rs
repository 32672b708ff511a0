//! Recursive-descent parser for the set-expression language.
//!
//! ```text
//! union_or_diff := intersect ((PLUS | MINUS) intersect)*         left-assoc
//! intersect     := complement (TIMES complement)*                left-assoc
//! complement    := NEGATE complement | primary
//! primary       := range_literal
//!                | prefix COLON id (COMMA id)*
//!                | "fold" LPAREN union_or_diff RPAREN
//!                | LPAREN union_or_diff RPAREN
//! range_literal := hex (RANGE hex)?
//! ```
//!
//! Property names are resolved against the context's registries while
//! parsing, so a selector node carries resolved enum values or open-kind
//! indices, never raw strings. A chain of `!` collapses into a single
//! complement node carrying the chain's parity. Errors are threaded upward
//! as `Result`s and stop the parse at the first failure.

use crate::context::EvalContext;
use crate::expr::lexer::{tokenize, Token, TokenKind};
use crate::expr::node::Node;
use crate::property::{prefix_to_kind, EastAsianWidth, GeneralCategory, PropertyKind};
use crate::set::{parse_code_point, RuneRange};
use crate::GunisetError;

/// Parse one expression against a loaded context.
pub fn parse(src: &str, ctx: &EvalContext) -> Result<Node, GunisetError> {
    Parser::new(ctx).run(src)
}

struct Parser<'a> {
    ctx: &'a EvalContext,
    tokens: Vec<Token>,
    pos: usize,
}

fn syntax(message: String) -> GunisetError {
    GunisetError::Syntax { message }
}

impl<'a> Parser<'a> {
    fn new(ctx: &'a EvalContext) -> Self {
        Parser {
            ctx,
            tokens: Vec::new(),
            pos: 0,
        }
    }

    fn run(&mut self, src: &str) -> Result<Node, GunisetError> {
        self.tokens = tokenize(src)?;
        self.pos = 0;
        self.skip_space();
        let node = self.parse_union_or_diff()?;
        if self.has_next() {
            return Err(syntax(format!(
                "unexpected token: {}",
                self.fetch()?.kind.label()
            )));
        }
        Ok(node)
    }

    fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    fn fetch(&self) -> Result<&Token, GunisetError> {
        self.tokens
            .get(self.pos)
            .ok_or_else(|| syntax("unexpected end of token".to_string()))
    }

    fn consume(&mut self) {
        self.pos += 1;
        self.skip_space();
    }

    fn skip_space(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind == TokenKind::Space)
        {
            self.pos += 1;
        }
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| t.kind == kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<String, GunisetError> {
        let token = self.fetch()?;
        if token.kind != kind {
            return Err(syntax(format!(
                "token mismatched, expect: {}, actual: {}",
                kind.label(),
                token.kind.label()
            )));
        }
        let text = token.text.clone();
        self.consume();
        Ok(text)
    }

    fn parse_union_or_diff(&mut self) -> Result<Node, GunisetError> {
        let mut left = self.parse_intersect()?;
        while self.has_next() {
            match self.fetch()?.kind {
                TokenKind::Plus => {
                    self.consume();
                    let right = self.parse_intersect()?;
                    left = Node::Union(Box::new(left), Box::new(right));
                }
                TokenKind::Minus => {
                    self.consume();
                    let right = self.parse_intersect()?;
                    left = Node::Difference(Box::new(left), Box::new(right));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_intersect(&mut self) -> Result<Node, GunisetError> {
        let mut left = self.parse_complement()?;
        while self.next_is(TokenKind::Times) {
            self.consume();
            let right = self.parse_complement()?;
            left = Node::Intersection(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_complement(&mut self) -> Result<Node, GunisetError> {
        let mut negations = 0usize;
        while self.next_is(TokenKind::Negate) {
            self.consume();
            negations += 1;
        }
        let primary = self.parse_primary()?;
        if negations == 0 {
            return Ok(primary);
        }
        Ok(Node::Complement {
            negate: negations % 2 == 1,
            child: Box::new(primary),
        })
    }

    fn parse_primary(&mut self) -> Result<Node, GunisetError> {
        match self.fetch()?.kind {
            TokenKind::Ident => self.parse_selector(),
            TokenKind::Hex => self.parse_range_literal(),
            TokenKind::LParen => {
                self.consume();
                let node = self.parse_union_or_diff()?;
                self.expect(TokenKind::RParen)?;
                Ok(node)
            }
            kind => Err(syntax(format!("unknown token: {}", kind.label()))),
        }
    }

    fn parse_range_literal(&mut self) -> Result<Node, GunisetError> {
        let first = self.parse_rune()?;
        let mut last = first;
        if self.next_is(TokenKind::Range) {
            self.consume();
            last = self.parse_rune()?;
        }
        Ok(Node::Range(RuneRange::new(first, last)))
    }

    fn parse_rune(&mut self) -> Result<u32, GunisetError> {
        let text = self.expect(TokenKind::Hex)?;
        parse_code_point(&text)
    }

    fn parse_selector(&mut self) -> Result<Node, GunisetError> {
        let ctx = self.ctx;
        let prefix = self.expect(TokenKind::Ident)?;

        if prefix == "fold" && self.next_is(TokenKind::LParen) {
            self.consume();
            let node = self.parse_union_or_diff()?;
            self.expect(TokenKind::RParen)?;
            return Ok(Node::Fold(Box::new(node)));
        }

        let kind = prefix_to_kind(&prefix)
            .ok_or_else(|| syntax(format!("unknown property prefix: {}", prefix)))?;
        self.expect(TokenKind::Colon)?;

        match kind {
            PropertyKind::GeneralCategory => {
                let mut values: Vec<GeneralCategory> = Vec::new();
                self.parse_property_seq(|s| {
                    values.push(GeneralCategory::parse(s, Some(&ctx.aliases().gc))?);
                    Ok(())
                })?;
                values.sort();
                values.dedup();
                Ok(Node::Category(values))
            }
            PropertyKind::EastAsianWidth => {
                let mut values: Vec<EastAsianWidth> = Vec::new();
                self.parse_property_seq(|s| {
                    values.push(EastAsianWidth::parse(s, Some(&ctx.aliases().ea))?);
                    Ok(())
                })?;
                values.sort();
                values.dedup();
                Ok(Node::Width(values))
            }
            PropertyKind::Script | PropertyKind::ScriptExtension => {
                let mut indices: Vec<usize> = Vec::new();
                self.parse_property_seq(|s| {
                    indices.push(ctx.script_def().parse(s, Some(&ctx.aliases().sc))?);
                    Ok(())
                })?;
                indices.sort_unstable();
                indices.dedup();
                Ok(Node::Open { kind, indices })
            }
            open_kind => {
                let Some(table) = ctx.open_table(open_kind) else {
                    return Err(syntax(format!("unknown property prefix: {}", prefix)));
                };
                let mut indices: Vec<usize> = Vec::new();
                self.parse_property_seq(|s| {
                    indices.push(table.def.parse(s, None)?);
                    Ok(())
                })?;
                indices.sort_unstable();
                indices.dedup();
                Ok(Node::Open {
                    kind: open_kind,
                    indices,
                })
            }
        }
    }

    fn parse_property_seq(
        &mut self,
        mut consumer: impl FnMut(&str) -> Result<(), GunisetError>,
    ) -> Result<(), GunisetError> {
        let token = self.expect(TokenKind::Ident)?;
        consumer(&token)?;
        while self.next_is(TokenKind::Comma) {
            self.consume();
            let token = self.expect(TokenKind::Ident)?;
            consumer(&token)?;
        }
        Ok(())
    }
}
