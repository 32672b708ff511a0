//! Property kinds, fixed value enumerations, open-kind definitions, and
//! alias resolution.
//!
//! Two fixed kinds (General_Category, East_Asian_Width) have compile-time
//! value enums with known abbreviations and long names. The remaining kinds
//! are *open*: their values are discovered from the data files at load time
//! and live in a [`PropertyDef`], which assigns each long name a dense index
//! stable for the lifetime of the context.

use rustc_hash::FxHashMap;

use crate::set::CodePointSet;
use crate::GunisetError;

/// The closed enumeration of property kinds the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    GeneralCategory,
    EastAsianWidth,
    Script,
    ScriptExtension,
    PropList,
    DerivedCoreProperty,
    Emoji,
    DerivedBinaryProperty,
    DerivedNormalizationProp,
    GraphemeBreak,
    WordBreak,
    SentenceBreak,
}

impl PropertyKind {
    /// Human-readable kind name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::GeneralCategory => "general category",
            PropertyKind::EastAsianWidth => "east asian width",
            PropertyKind::Script => "script",
            PropertyKind::ScriptExtension => "script extension",
            PropertyKind::PropList => "property list value",
            PropertyKind::DerivedCoreProperty => "derived core property",
            PropertyKind::Emoji => "emoji property",
            PropertyKind::DerivedBinaryProperty => "derived binary property",
            PropertyKind::DerivedNormalizationProp => "derived normalization property",
            PropertyKind::GraphemeBreak => "grapheme break property",
            PropertyKind::WordBreak => "word break property",
            PropertyKind::SentenceBreak => "sentence break property",
        }
    }
}

/// Resolve a user-facing expression prefix (`cat:`, `eaw:`, `sc:`, ...) to
/// its property kind.
pub fn prefix_to_kind(prefix: &str) -> Option<PropertyKind> {
    match prefix {
        "cat" | "gc" => Some(PropertyKind::GeneralCategory),
        "eaw" | "ea" => Some(PropertyKind::EastAsianWidth),
        "sc" => Some(PropertyKind::Script),
        "scx" => Some(PropertyKind::ScriptExtension),
        "prop" => Some(PropertyKind::PropList),
        "dcp" => Some(PropertyKind::DerivedCoreProperty),
        "emoji" => Some(PropertyKind::Emoji),
        "dbp" => Some(PropertyKind::DerivedBinaryProperty),
        "dnp" => Some(PropertyKind::DerivedNormalizationProp),
        "gbp" => Some(PropertyKind::GraphemeBreak),
        "wbp" => Some(PropertyKind::WordBreak),
        "sbp" => Some(PropertyKind::SentenceBreak),
        _ => None,
    }
}

/// General_Category values: 30 base categories plus 8 umbrella values that
/// expand to the union of their constituents at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum GeneralCategory {
    Lu,
    Ll,
    Lt,
    Lm,
    Lo,
    Mn,
    Mc,
    Me,
    Nd,
    Nl,
    No,
    Sm,
    Sc,
    Sk,
    So,
    Pc,
    Pd,
    Ps,
    Pe,
    Pi,
    Pf,
    Po,
    Zs,
    Zl,
    Zp,
    Cc,
    Cf,
    Cs,
    Co,
    Cn,
    // umbrella values
    LC,
    L,
    M,
    N,
    P,
    S,
    Z,
    C,
}

impl GeneralCategory {
    /// The 30 base categories, whose sets partition the universe.
    pub const BASE: [GeneralCategory; 30] = [
        GeneralCategory::Lu,
        GeneralCategory::Ll,
        GeneralCategory::Lt,
        GeneralCategory::Lm,
        GeneralCategory::Lo,
        GeneralCategory::Mn,
        GeneralCategory::Mc,
        GeneralCategory::Me,
        GeneralCategory::Nd,
        GeneralCategory::Nl,
        GeneralCategory::No,
        GeneralCategory::Sm,
        GeneralCategory::Sc,
        GeneralCategory::Sk,
        GeneralCategory::So,
        GeneralCategory::Pc,
        GeneralCategory::Pd,
        GeneralCategory::Ps,
        GeneralCategory::Pe,
        GeneralCategory::Pi,
        GeneralCategory::Pf,
        GeneralCategory::Po,
        GeneralCategory::Zs,
        GeneralCategory::Zl,
        GeneralCategory::Zp,
        GeneralCategory::Cc,
        GeneralCategory::Cf,
        GeneralCategory::Cs,
        GeneralCategory::Co,
        GeneralCategory::Cn,
    ];

    /// All values including the umbrellas.
    pub const ALL: [GeneralCategory; 38] = [
        GeneralCategory::Lu,
        GeneralCategory::Ll,
        GeneralCategory::Lt,
        GeneralCategory::Lm,
        GeneralCategory::Lo,
        GeneralCategory::Mn,
        GeneralCategory::Mc,
        GeneralCategory::Me,
        GeneralCategory::Nd,
        GeneralCategory::Nl,
        GeneralCategory::No,
        GeneralCategory::Sm,
        GeneralCategory::Sc,
        GeneralCategory::Sk,
        GeneralCategory::So,
        GeneralCategory::Pc,
        GeneralCategory::Pd,
        GeneralCategory::Ps,
        GeneralCategory::Pe,
        GeneralCategory::Pi,
        GeneralCategory::Pf,
        GeneralCategory::Po,
        GeneralCategory::Zs,
        GeneralCategory::Zl,
        GeneralCategory::Zp,
        GeneralCategory::Cc,
        GeneralCategory::Cf,
        GeneralCategory::Cs,
        GeneralCategory::Co,
        GeneralCategory::Cn,
        GeneralCategory::LC,
        GeneralCategory::L,
        GeneralCategory::M,
        GeneralCategory::N,
        GeneralCategory::P,
        GeneralCategory::S,
        GeneralCategory::Z,
        GeneralCategory::C,
    ];

    /// Canonical abbreviation (`Lu`, `LC`, ...).
    pub fn abbr(&self) -> &'static str {
        match self {
            GeneralCategory::Lu => "Lu",
            GeneralCategory::Ll => "Ll",
            GeneralCategory::Lt => "Lt",
            GeneralCategory::Lm => "Lm",
            GeneralCategory::Lo => "Lo",
            GeneralCategory::Mn => "Mn",
            GeneralCategory::Mc => "Mc",
            GeneralCategory::Me => "Me",
            GeneralCategory::Nd => "Nd",
            GeneralCategory::Nl => "Nl",
            GeneralCategory::No => "No",
            GeneralCategory::Sm => "Sm",
            GeneralCategory::Sc => "Sc",
            GeneralCategory::Sk => "Sk",
            GeneralCategory::So => "So",
            GeneralCategory::Pc => "Pc",
            GeneralCategory::Pd => "Pd",
            GeneralCategory::Ps => "Ps",
            GeneralCategory::Pe => "Pe",
            GeneralCategory::Pi => "Pi",
            GeneralCategory::Pf => "Pf",
            GeneralCategory::Po => "Po",
            GeneralCategory::Zs => "Zs",
            GeneralCategory::Zl => "Zl",
            GeneralCategory::Zp => "Zp",
            GeneralCategory::Cc => "Cc",
            GeneralCategory::Cf => "Cf",
            GeneralCategory::Cs => "Cs",
            GeneralCategory::Co => "Co",
            GeneralCategory::Cn => "Cn",
            GeneralCategory::LC => "LC",
            GeneralCategory::L => "L",
            GeneralCategory::M => "M",
            GeneralCategory::N => "N",
            GeneralCategory::P => "P",
            GeneralCategory::S => "S",
            GeneralCategory::Z => "Z",
            GeneralCategory::C => "C",
        }
    }

    /// Canonical long name (`Uppercase_Letter`, ...).
    pub fn long_name(&self) -> &'static str {
        match self {
            GeneralCategory::Lu => "Uppercase_Letter",
            GeneralCategory::Ll => "Lowercase_Letter",
            GeneralCategory::Lt => "Titlecase_Letter",
            GeneralCategory::Lm => "Modifier_Letter",
            GeneralCategory::Lo => "Other_Letter",
            GeneralCategory::Mn => "Nonspacing_Mark",
            GeneralCategory::Mc => "Spacing_Mark",
            GeneralCategory::Me => "Enclosing_Mark",
            GeneralCategory::Nd => "Decimal_Number",
            GeneralCategory::Nl => "Letter_Number",
            GeneralCategory::No => "Other_Number",
            GeneralCategory::Sm => "Math_Symbol",
            GeneralCategory::Sc => "Currency_Symbol",
            GeneralCategory::Sk => "Modifier_Symbol",
            GeneralCategory::So => "Other_Symbol",
            GeneralCategory::Pc => "Connector_Punctuation",
            GeneralCategory::Pd => "Dash_Punctuation",
            GeneralCategory::Ps => "Open_Punctuation",
            GeneralCategory::Pe => "Close_Punctuation",
            GeneralCategory::Pi => "Initial_Punctuation",
            GeneralCategory::Pf => "Final_Punctuation",
            GeneralCategory::Po => "Other_Punctuation",
            GeneralCategory::Zs => "Space_Separator",
            GeneralCategory::Zl => "Line_Separator",
            GeneralCategory::Zp => "Paragraph_Separator",
            GeneralCategory::Cc => "Control",
            GeneralCategory::Cf => "Format",
            GeneralCategory::Cs => "Surrogate",
            GeneralCategory::Co => "Private_Use",
            GeneralCategory::Cn => "Unassigned",
            GeneralCategory::LC => "Cased_Letter",
            GeneralCategory::L => "Letter",
            GeneralCategory::M => "Mark",
            GeneralCategory::N => "Number",
            GeneralCategory::P => "Punctuation",
            GeneralCategory::S => "Symbol",
            GeneralCategory::Z => "Separator",
            GeneralCategory::C => "Other",
        }
    }

    /// Base categories an umbrella value expands to; empty for base values.
    pub fn combinations(&self) -> &'static [GeneralCategory] {
        use GeneralCategory::*;
        match self {
            LC => &[Lu, Ll, Lt],
            L => &[Lu, Ll, Lt, Lm, Lo],
            M => &[Mn, Mc, Me],
            N => &[Nd, Nl, No],
            P => &[Pc, Pd, Ps, Pe, Pi, Pf, Po],
            S => &[Sm, Sc, Sk, So],
            Z => &[Zs, Zl, Zp],
            C => &[Cc, Cf, Cs, Co, Cn],
            _ => &[],
        }
    }

    fn from_abbr(s: &str) -> Option<GeneralCategory> {
        GeneralCategory::ALL.iter().copied().find(|c| c.abbr() == s)
    }

    fn from_long(s: &str) -> Option<GeneralCategory> {
        GeneralCategory::ALL
            .iter()
            .copied()
            .find(|c| c.long_name() == s)
    }

    /// Resolve an abbreviation or long name, consulting `alias` for long
    /// forms beyond the compiled-in table.
    pub fn parse(s: &str, alias: Option<&AliasMap>) -> Result<GeneralCategory, GunisetError> {
        if let Some(cat) = GeneralCategory::from_abbr(s) {
            return Ok(cat);
        }
        if let Some(cat) = GeneralCategory::from_long(s) {
            return Ok(cat);
        }
        if let Some(alias) = alias {
            if let Some(cat) = alias.abbr(s).and_then(GeneralCategory::from_abbr) {
                return Ok(cat);
            }
        }
        Err(GunisetError::UnknownPropertyValue {
            kind: PropertyKind::GeneralCategory.label(),
            value: s.to_string(),
        })
    }

    /// `"Lu, Uppercase_Letter"` — the form the query output uses.
    pub fn format(&self, alias: &AliasMap) -> String {
        let abbr = self.abbr();
        let long = alias
            .longs(abbr)
            .first()
            .map(String::as_str)
            .unwrap_or(self.long_name());
        format!("{}, {}", abbr, long)
    }
}

/// East_Asian_Width values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EastAsianWidth {
    W,
    F,
    A,
    N,
    Na,
    H,
}

impl EastAsianWidth {
    pub const ALL: [EastAsianWidth; 6] = [
        EastAsianWidth::W,
        EastAsianWidth::F,
        EastAsianWidth::A,
        EastAsianWidth::N,
        EastAsianWidth::Na,
        EastAsianWidth::H,
    ];

    pub fn abbr(&self) -> &'static str {
        match self {
            EastAsianWidth::W => "W",
            EastAsianWidth::F => "F",
            EastAsianWidth::A => "A",
            EastAsianWidth::N => "N",
            EastAsianWidth::Na => "Na",
            EastAsianWidth::H => "H",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            EastAsianWidth::W => "Wide",
            EastAsianWidth::F => "Fullwidth",
            EastAsianWidth::A => "Ambiguous",
            EastAsianWidth::N => "Neutral",
            EastAsianWidth::Na => "Narrow",
            EastAsianWidth::H => "Halfwidth",
        }
    }

    fn from_abbr(s: &str) -> Option<EastAsianWidth> {
        EastAsianWidth::ALL.iter().copied().find(|w| w.abbr() == s)
    }

    /// Resolve an abbreviation or long name, consulting `alias` as for
    /// [`GeneralCategory::parse`].
    pub fn parse(s: &str, alias: Option<&AliasMap>) -> Result<EastAsianWidth, GunisetError> {
        if let Some(width) = EastAsianWidth::from_abbr(s) {
            return Ok(width);
        }
        if let Some(width) = EastAsianWidth::ALL.iter().copied().find(|w| w.long_name() == s) {
            return Ok(width);
        }
        if let Some(alias) = alias {
            if let Some(width) = alias.abbr(s).and_then(EastAsianWidth::from_abbr) {
                return Ok(width);
            }
        }
        Err(GunisetError::UnknownPropertyValue {
            kind: PropertyKind::EastAsianWidth.label(),
            value: s.to_string(),
        })
    }

    /// `"Na, Narrow"` — the form the query output uses.
    pub fn format(&self, alias: &AliasMap) -> String {
        let abbr = self.abbr();
        let long = alias
            .longs(abbr)
            .first()
            .map(String::as_str)
            .unwrap_or(self.long_name());
        format!("{}, {}", abbr, long)
    }
}

/// Abbreviation/long-name pairs for one property kind, populated from
/// `PropertyValueAliases.txt`. Lookups accept either form.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    abbr_to_long: FxHashMap<String, Vec<String>>,
    long_to_abbr: FxHashMap<String, String>,
}

impl AliasMap {
    pub fn new() -> Self {
        AliasMap::default()
    }

    pub fn add(&mut self, abbr: &str, long: &str) {
        self.abbr_to_long
            .entry(abbr.to_string())
            .or_default()
            .push(long.to_string());
        self.long_to_abbr
            .insert(long.to_string(), abbr.to_string());
    }

    pub fn add_all(&mut self, abbr: &str, longs: &[&str]) {
        for long in longs {
            self.add(abbr, long);
        }
    }

    /// Long names registered for an abbreviation.
    pub fn longs(&self, abbr: &str) -> &[String] {
        self.abbr_to_long
            .get(abbr)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Abbreviation registered for a long name.
    pub fn abbr(&self, long: &str) -> Option<&str> {
        self.long_to_abbr.get(long).map(String::as_str)
    }
}

/// The alias maps the loader recognizes, keyed by the short kind names used
/// in `PropertyValueAliases.txt`.
#[derive(Debug, Clone, Default)]
pub struct AliasSet {
    pub gc: AliasMap,
    pub ea: AliasMap,
    pub sc: AliasMap,
}

impl AliasSet {
    pub fn new() -> Self {
        AliasSet::default()
    }

    /// The alias map a `PropertyValueAliases.txt` line targets, if the kind
    /// is one the engine keeps.
    pub fn get_mut(&mut self, target: &str) -> Option<&mut AliasMap> {
        match target {
            "gc" => Some(&mut self.gc),
            "ea" => Some(&mut self.ea),
            "sc" => Some(&mut self.sc),
            _ => None,
        }
    }
}

/// Value table for an open property kind: canonical long names in discovery
/// order, with a dense index per name.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    kind: PropertyKind,
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl PropertyDef {
    pub fn new(kind: PropertyKind) -> Self {
        PropertyDef {
            kind,
            names: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Number of registered values; indices are dense over `[0, len)`.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of `name`, registering it if unseen.
    pub fn register(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Long name at `index`.
    pub fn name(&self, index: usize) -> &str {
        self.names.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Iterate the registered indices.
    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.names.len()
    }

    /// Resolve a caller-supplied value name: exact long-name match first,
    /// then any long name `alias` registers for it as an abbreviation.
    pub fn parse(&self, s: &str, alias: Option<&AliasMap>) -> Result<usize, GunisetError> {
        if let Some(idx) = self.lookup(s) {
            return Ok(idx);
        }
        if let Some(alias) = alias {
            for long in alias.longs(s) {
                if let Some(idx) = self.lookup(long) {
                    return Ok(idx);
                }
            }
        }
        Err(GunisetError::UnknownPropertyValue {
            kind: self.kind.label(),
            value: s.to_string(),
        })
    }

    /// Abbreviation for the value at `index`. When the alias table has no
    /// entry for the long name the long name itself is returned, with a
    /// diagnostic, rather than the empty string.
    pub fn abbr<'a>(&'a self, index: usize, alias: &'a AliasMap) -> &'a str {
        let long = self.name(index);
        match alias.abbr(long) {
            Some(abbr) => abbr,
            None => {
                tracing::debug!(value = long, "no abbreviation registered; using long name");
                long
            }
        }
    }
}

/// An open kind's definition together with its loaded sets, keyed by the
/// definition's indices.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    pub def: PropertyDef,
    pub sets: FxHashMap<usize, CodePointSet>,
}

impl PropertyTable {
    pub fn set(&self, index: usize) -> Option<&CodePointSet> {
        self.sets.get(&index)
    }
}
