//! The expression AST and its evaluation semantics.
//!
//! Every node evaluates to a fresh [`CodePointSet`] read off the context.
//! Union and difference take over the left operand's buffer instead of
//! copying it; children evaluate left to right. The only context mutation an
//! evaluation can trigger is the one-shot materialization of the
//! East_Asian_Width `N` and Script `Unknown` complement buckets.

use crate::context::EvalContext;
use crate::property::{EastAsianWidth, GeneralCategory, PropertyKind};
use crate::set::{CodePointSet, CodePointSetBuilder, RuneRange};

/// A parsed set expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `U+0041..U+005A` or a single code point.
    Range(RuneRange),
    /// `cat:Lu,L` — base values union directly, umbrellas expand first.
    Category(Vec<GeneralCategory>),
    /// `eaw:W,N` — `N` pulls the lazily materialized default bucket.
    Width(Vec<EastAsianWidth>),
    /// Selector over an open kind (`sc:`, `scx:`, `prop:`, ...), holding
    /// indices into that kind's definition.
    Open {
        kind: PropertyKind,
        indices: Vec<usize>,
    },
    /// A `!` chain, folded to its parity at parse time.
    Complement { negate: bool, child: Box<Node> },
    /// `a + b`
    Union(Box<Node>, Box<Node>),
    /// `a - b`
    Difference(Box<Node>, Box<Node>),
    /// `a * b`
    Intersection(Box<Node>, Box<Node>),
    /// `fold(a)` — simple case folding through the CaseFolding table.
    Fold(Box<Node>),
}

impl Node {
    /// Evaluate against a loaded context.
    pub fn eval(&self, ctx: &EvalContext) -> CodePointSet {
        match self {
            Node::Range(range) => {
                let mut builder = CodePointSetBuilder::new();
                builder.add_range(*range);
                builder.build()
            }
            Node::Category(values) => {
                let mut builder = CodePointSetBuilder::new();
                for value in values {
                    if let Some(set) = ctx.category_set(*value) {
                        builder.add_set(set);
                    } else {
                        // umbrella values are not keyed in the map
                        for base in value.combinations() {
                            if let Some(set) = ctx.category_set(*base) {
                                builder.add_set(set);
                            }
                        }
                    }
                }
                builder.build()
            }
            Node::Width(values) => {
                let mut builder = CodePointSetBuilder::new();
                for value in values {
                    if let Some(set) = ctx.width_set(*value) {
                        builder.add_set(set);
                    } else if *value == EastAsianWidth::N {
                        builder.add_set(&ctx.eaw_default());
                    }
                }
                builder.build()
            }
            Node::Open { kind, indices } => {
                let mut builder = CodePointSetBuilder::new();
                match kind {
                    PropertyKind::Script => {
                        for &idx in indices {
                            if let Some(set) = ctx.script_set(idx) {
                                builder.add_set(set);
                            } else if idx == ctx.script_unknown_index() {
                                builder.add_set(&ctx.script_unknown());
                            }
                        }
                    }
                    PropertyKind::ScriptExtension => {
                        for &idx in indices {
                            if let Some(set) = ctx.script_extension_set(idx) {
                                builder.add_set(set);
                            }
                        }
                    }
                    open_kind => {
                        if let Some(table) = ctx.open_table(*open_kind) {
                            for &idx in indices {
                                if let Some(set) = table.set(idx) {
                                    builder.add_set(set);
                                }
                            }
                        }
                    }
                }
                builder.build()
            }
            Node::Complement { negate, child } => {
                let set = child.eval(ctx);
                if !negate {
                    return set;
                }
                let mut universe = CodePointSet::all();
                universe.remove_set(&set);
                universe
            }
            Node::Union(left, right) => {
                let mut left_set = left.eval(ctx);
                let right_set = right.eval(ctx);
                left_set.add_set(&right_set);
                left_set
            }
            Node::Difference(left, right) => {
                let mut left_set = left.eval(ctx);
                let right_set = right.eval(ctx);
                left_set.remove_set(&right_set);
                left_set
            }
            Node::Intersection(left, right) => {
                let left_set = left.eval(ctx);
                let right_set = right.eval(ctx);
                left_set.intersect(&right_set)
            }
            Node::Fold(child) => {
                let source = child.eval(ctx);
                if !ctx.has_fold_table() {
                    tracing::warn!("CaseFolding.txt was not loaded; fold() is the identity");
                }
                let mut builder = CodePointSetBuilder::new();
                for r in source.iter() {
                    builder.add(ctx.fold(r));
                }
                builder.build()
            }
        }
    }
}
