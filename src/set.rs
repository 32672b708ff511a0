//! Ordered sets of Unicode code points.
//!
//! A [`CodePointSet`] is a canonical (sorted, duplicate-free) subset of
//! `[0, 0x10FFFF]`, stored as a flat vector of scalar values. The surrogate
//! range is part of the representation space: these sets describe code point
//! *tables*, not well-formed text, so only values above [`MAX_CODE_POINT`]
//! are rejected.
//!
//! Bulk construction goes through [`CodePointSetBuilder`], which accepts
//! unordered appends and pays a single sort+dedup at build time instead of a
//! binary-search insert per element.

use std::fmt;

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::GunisetError;

/// Highest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Returns true for scalar values inside the code-point universe.
#[inline]
pub fn is_valid_code_point(r: u32) -> bool {
    r <= MAX_CODE_POINT
}

/// Returns true for code points in the Basic Multilingual Plane.
#[inline]
pub fn is_bmp(r: u32) -> bool {
    r <= 0xFFFF
}

/// Returns true for code points above the BMP.
#[inline]
pub fn is_supplementary(r: u32) -> bool {
    r > 0xFFFF
}

/// Parse a code point written as `U+HHHH` or bare hex.
pub fn parse_code_point(s: &str) -> Result<u32, GunisetError> {
    let digits = s.strip_prefix("U+").unwrap_or(s);
    let value = u32::from_str_radix(digits, 16).map_err(|_| GunisetError::InvalidRune {
        text: s.to_string(),
    })?;
    if !is_valid_code_point(value) {
        return Err(GunisetError::InvalidRune {
            text: s.to_string(),
        });
    }
    Ok(value)
}

/// An inclusive range of code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuneRange {
    pub first: u32,
    pub last: u32,
}

impl RuneRange {
    pub fn new(first: u32, last: u32) -> Self {
        RuneRange { first, last }
    }
}

/// A canonical, sorted set of Unicode code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePointSet {
    runes: Vec<u32>,
}

impl CodePointSet {
    /// Create an empty set.
    pub fn new() -> Self {
        CodePointSet::default()
    }

    /// Create a set from individual code points; invalid values are dropped.
    pub fn from_points<I: IntoIterator<Item = u32>>(points: I) -> Self {
        let mut set = CodePointSet::new();
        for r in points {
            set.add(r);
        }
        set
    }

    /// The full code-point universe `[0, 0x10FFFF]`.
    pub fn all() -> Self {
        let mut builder = CodePointSetBuilder::new();
        builder.add_range(RuneRange::new(0, MAX_CODE_POINT));
        builder.build()
    }

    /// Insert one code point. Returns whether it was newly added; values
    /// outside the universe are rejected.
    pub fn add(&mut self, r: u32) -> bool {
        if !is_valid_code_point(r) {
            return false;
        }
        match self.runes.binary_search(&r) {
            Ok(_) => false,
            Err(pos) => {
                self.runes.insert(pos, r);
                true
            }
        }
    }

    /// Insert an inclusive range. Swapped endpoints are normalized and
    /// out-of-universe endpoints are clamped.
    pub fn add_range(&mut self, range: RuneRange) {
        let mut builder = CodePointSetBuilder::take_from(self);
        builder.add_range(range);
        *self = builder.build();
    }

    /// Union with `other`.
    pub fn add_set(&mut self, other: &CodePointSet) {
        if other.is_empty() {
            return;
        }
        let mut builder = CodePointSetBuilder::take_from(self);
        builder.add_set(other);
        *self = builder.build();
    }

    /// Remove one code point. Returns whether it was present.
    pub fn remove(&mut self, r: u32) -> bool {
        match self.runes.binary_search(&r) {
            Ok(pos) => {
                self.runes.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove an inclusive range; swapped endpoints are normalized.
    pub fn remove_range(&mut self, range: RuneRange) {
        let first = range.first.min(range.last);
        let last = range.first.max(range.last);
        self.runes.retain(|&r| r < first || r > last);
    }

    /// Remove every code point of `other`.
    pub fn remove_set(&mut self, other: &CodePointSet) {
        if other.is_empty() {
            return;
        }
        self.runes.retain(|&r| !other.contains(r));
    }

    /// Return a new set with the code points present in both sets.
    pub fn intersect(&self, other: &CodePointSet) -> CodePointSet {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut builder = CodePointSetBuilder::new();
        for &r in &small.runes {
            if large.contains(r) {
                builder.add(r);
            }
        }
        builder.build()
    }

    /// Retain only the code points satisfying `predicate`.
    pub fn filter(&mut self, predicate: impl Fn(u32) -> bool) {
        self.runes.retain(|&r| predicate(r));
    }

    /// Membership test.
    #[inline]
    pub fn contains(&self, r: u32) -> bool {
        self.runes.binary_search(&r).is_ok()
    }

    /// Cardinality.
    #[inline]
    pub fn len(&self) -> usize {
        self.runes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runes.is_empty()
    }

    /// Iterate code points in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.runes.iter().copied()
    }

    /// Iterate maximal contiguous ranges in ascending order. Consecutive
    /// ranges are never adjacent: each range ends because the next stored
    /// scalar is not `last + 1`.
    pub fn ranges(&self) -> Ranges<'_> {
        Ranges { runes: &self.runes }
    }

    /// Draw a uniform sample without replacement of `min(limit, len)` code
    /// points. A `limit` of zero yields the empty set; a limit at or above
    /// the cardinality yields a full copy. Duplicate draws are rejected and
    /// redrawn, so the expected number of draws stays near
    /// `limit * len / (len - limit)`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, limit: usize) -> CodePointSet {
        if limit == 0 || self.runes.is_empty() {
            return CodePointSet::new();
        }
        if limit >= self.runes.len() {
            return self.clone();
        }
        let mut drawn: FxHashSet<u32> = FxHashSet::default();
        while drawn.len() < limit {
            let idx = rng.gen_range(0..self.runes.len());
            drawn.insert(self.runes[idx]);
        }
        let mut builder = CodePointSetBuilder::new();
        for r in drawn {
            builder.add(r);
        }
        builder.build()
    }
}

impl fmt::Display for CodePointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, range) in self.ranges().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "0x{:04x}..0x{:04x}", range.first, range.last)?;
        }
        f.write_str("}")
    }
}

/// Iterator over the maximal contiguous ranges of a [`CodePointSet`].
pub struct Ranges<'a> {
    runes: &'a [u32],
}

impl Iterator for Ranges<'_> {
    type Item = RuneRange;

    fn next(&mut self) -> Option<RuneRange> {
        let first = *self.runes.first()?;
        let mut last = first;
        let mut idx = 1;
        while idx < self.runes.len() && self.runes[idx] == last + 1 {
            last = self.runes[idx];
            idx += 1;
        }
        self.runes = &self.runes[idx..];
        Some(RuneRange { first, last })
    }
}

/// Accumulates unordered code points and produces a canonical set in one
/// sort+dedup step. The buffer of an existing set can be taken over with
/// [`CodePointSetBuilder::take_from`], which is how the evaluator reuses the
/// left operand's allocation for union and difference.
#[derive(Debug, Default)]
pub struct CodePointSetBuilder {
    runes: Vec<u32>,
}

impl CodePointSetBuilder {
    pub fn new() -> Self {
        CodePointSetBuilder::default()
    }

    /// Move `set`'s buffer into a fresh builder, leaving `set` empty.
    pub fn take_from(set: &mut CodePointSet) -> Self {
        CodePointSetBuilder {
            runes: std::mem::take(&mut set.runes),
        }
    }

    /// Append one code point. Callers pass values already known to be valid;
    /// range appends clamp instead.
    #[inline]
    pub fn add(&mut self, r: u32) {
        self.runes.push(r);
    }

    /// Append an inclusive range, normalizing swapped endpoints and clamping
    /// to the universe.
    pub fn add_range(&mut self, range: RuneRange) {
        let first = range.first.min(range.last);
        let last = range.first.max(range.last).min(MAX_CODE_POINT);
        if first > last {
            return;
        }
        self.runes.reserve((last - first + 1) as usize);
        for r in first..=last {
            self.runes.push(r);
        }
    }

    /// Append every code point of `set`.
    pub fn add_set(&mut self, set: &CodePointSet) {
        self.runes.extend_from_slice(&set.runes);
    }

    /// Sort, deduplicate, and hand the buffer to a canonical set.
    pub fn build(mut self) -> CodePointSet {
        self.runes.sort_unstable();
        self.runes.dedup();
        CodePointSet { runes: self.runes }
    }
}
