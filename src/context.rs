//! The loaded UCD snapshot the evaluator runs against.
//!
//! An [`EvalContext`] is built once by sequencing the loaders over a UCD
//! directory (or any [`UcdSource`]) and is immutable afterwards, except for
//! two lazily materialized complement buckets: East_Asian_Width `N` and
//! Script `Unknown` are defined by the UCD as "everything the data file does
//! not declare", so they are computed on first use and cached behind a
//! one-shot mutex latch. That latch is the only synchronization in the
//! crate; a context can therefore be shared across threads even though the
//! tool itself evaluates on one.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::load::{
    load_alias_set, load_case_folding, load_east_asian_width, load_general_category,
    load_open_kind, load_script_extensions, DataHeader, DataLoader,
};
use crate::property::{
    AliasSet, EastAsianWidth, GeneralCategory, PropertyDef, PropertyKind, PropertyTable,
};
use crate::set::{CodePointSet, CodePointSetBuilder};
use crate::GunisetError;

/// UCD file paths relative to the snapshot root.
pub const GENERAL_CATEGORY_FILE: &str = "extracted/DerivedGeneralCategory.txt";
pub const EAST_ASIAN_WIDTH_FILE: &str = "EastAsianWidth.txt";
pub const PROPERTY_VALUE_ALIASES_FILE: &str = "PropertyValueAliases.txt";
pub const SCRIPTS_FILE: &str = "Scripts.txt";
pub const SCRIPT_EXTENSIONS_FILE: &str = "ScriptExtensions.txt";
pub const CASE_FOLDING_FILE: &str = "CaseFolding.txt";

pub const PROP_LIST_FILE: &str = "PropList.txt";
pub const DERIVED_CORE_PROPERTIES_FILE: &str = "DerivedCoreProperties.txt";
pub const EMOJI_DATA_FILE: &str = "emoji/emoji-data.txt";
pub const DERIVED_BINARY_PROPERTIES_FILE: &str = "extracted/DerivedBinaryProperties.txt";
pub const DERIVED_NORMALIZATION_PROPS_FILE: &str = "DerivedNormalizationProps.txt";
pub const GRAPHEME_BREAK_FILE: &str = "auxiliary/GraphemeBreakProperty.txt";
pub const WORD_BREAK_FILE: &str = "auxiliary/WordBreakProperty.txt";
pub const SENTENCE_BREAK_FILE: &str = "auxiliary/SentenceBreakProperty.txt";

const SCRIPT_UNKNOWN: &str = "Unknown";

/// Where UCD files come from. The trait seam lets tests feed in-memory
/// excerpts through the same loaders the CLI drives over a directory.
pub trait UcdSource {
    /// Open a file by its UCD-relative path; `Ok(None)` means the file does
    /// not exist (fatal for required files, fine for CaseFolding.txt).
    fn open(&self, path: &str) -> Result<Option<Box<dyn BufRead>>, GunisetError>;
}

/// A UCD snapshot unpacked under a directory, the layout
/// `https://www.unicode.org/Public/<rev>/ucd/` ships.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl UcdSource for DirSource {
    fn open(&self, path: &str) -> Result<Option<Box<dyn BufRead>>, GunisetError> {
        let full = self.dir.join(path);
        match File::open(&full) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(GunisetError::Load {
                file: full.display().to_string(),
                line: 0,
                cause: err.to_string(),
            }),
        }
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn required(
    source: &dyn UcdSource,
    path: &str,
) -> Result<DataLoader<Box<dyn BufRead>>, GunisetError> {
    match source.open(path)? {
        Some(reader) => Ok(DataLoader::new(base_name(path), reader)),
        None => Err(GunisetError::Load {
            file: path.to_string(),
            line: 0,
            cause: "file not found".to_string(),
        }),
    }
}

/// A single code point's values under every loaded kind. Open-kind values
/// are indices into the corresponding [`PropertyDef`].
#[derive(Debug)]
pub struct QueryResult {
    pub code_point: u32,
    pub general_category: GeneralCategory,
    pub east_asian_width: EastAsianWidth,
    pub script: usize,
    pub script_extensions: SmallVec<[usize; 4]>,
    pub emoji: SmallVec<[usize; 4]>,
    pub grapheme_break: Option<usize>,
    pub word_break: Option<usize>,
    pub sentence_break: Option<usize>,
}

/// The loaded snapshot: per-kind value sets, registries, aliases, file
/// headers, and the optional simple case-fold map.
#[derive(Debug)]
pub struct EvalContext {
    headers: Vec<DataHeader>,
    aliases: AliasSet,
    cat_map: FxHashMap<GeneralCategory, CodePointSet>,
    eaw_map: FxHashMap<EastAsianWidth, CodePointSet>,
    script: PropertyTable,
    script_unknown_index: usize,
    script_x: FxHashMap<usize, CodePointSet>,
    prop_list: PropertyTable,
    derived_core: PropertyTable,
    emoji: PropertyTable,
    derived_binary: PropertyTable,
    derived_norm: PropertyTable,
    grapheme_break: PropertyTable,
    word_break: PropertyTable,
    sentence_break: PropertyTable,
    fold: FxHashMap<u32, u32>,
    has_fold_table: bool,
    eaw_default: Mutex<Option<CodePointSet>>,
    script_unknown: Mutex<Option<CodePointSet>>,
}

impl EvalContext {
    /// Load a snapshot from a UCD directory.
    pub fn from_dir(dir: &Path) -> Result<Self, GunisetError> {
        EvalContext::load(&DirSource::new(dir))
    }

    /// Load a snapshot from any source, sequencing every loader; the first
    /// failure aborts construction.
    pub fn load(source: &dyn UcdSource) -> Result<Self, GunisetError> {
        let mut headers = Vec::new();

        let (cat_map, header) = load_general_category(required(source, GENERAL_CATEGORY_FILE)?)?;
        headers.push(header);

        let (eaw_map, header) = load_east_asian_width(required(source, EAST_ASIAN_WIDTH_FILE)?)?;
        headers.push(header);

        let (aliases, header) = load_alias_set(required(source, PROPERTY_VALUE_ALIASES_FILE)?)?;
        headers.push(header);

        let (mut script, header) = load_open_kind(
            PropertyKind::Script,
            false,
            required(source, SCRIPTS_FILE)?,
        )?;
        headers.push(header);
        // The published Scripts.txt never declares Unknown; register it so
        // the lazily filled default bucket has a stable index.
        let script_unknown_index = script.def.register(SCRIPT_UNKNOWN);

        let (script_x, header) = load_script_extensions(
            &script.def,
            &aliases.sc,
            required(source, SCRIPT_EXTENSIONS_FILE)?,
        )?;
        headers.push(header);

        // join_values only for DerivedCoreProperties (`InCB; Extend` ->
        // `InCB_Extend`); everywhere else field 1 alone names the value.
        let mut open = |kind: PropertyKind,
                        path: &str,
                        join_values: bool|
         -> Result<PropertyTable, GunisetError> {
            let (table, header) = load_open_kind(kind, join_values, required(source, path)?)?;
            headers.push(header);
            Ok(table)
        };
        let prop_list = open(PropertyKind::PropList, PROP_LIST_FILE, false)?;
        let derived_core = open(
            PropertyKind::DerivedCoreProperty,
            DERIVED_CORE_PROPERTIES_FILE,
            true,
        )?;
        let emoji = open(PropertyKind::Emoji, EMOJI_DATA_FILE, false)?;
        let derived_binary = open(
            PropertyKind::DerivedBinaryProperty,
            DERIVED_BINARY_PROPERTIES_FILE,
            false,
        )?;
        let derived_norm = open(
            PropertyKind::DerivedNormalizationProp,
            DERIVED_NORMALIZATION_PROPS_FILE,
            false,
        )?;
        let grapheme_break = open(PropertyKind::GraphemeBreak, GRAPHEME_BREAK_FILE, false)?;
        let word_break = open(PropertyKind::WordBreak, WORD_BREAK_FILE, false)?;
        let sentence_break = open(PropertyKind::SentenceBreak, SENTENCE_BREAK_FILE, false)?;

        let (fold, has_fold_table) = match source.open(CASE_FOLDING_FILE)? {
            Some(reader) => {
                let loader = DataLoader::new(base_name(CASE_FOLDING_FILE), reader);
                let (fold, header) = load_case_folding(loader)?;
                headers.push(header);
                (fold, true)
            }
            None => (FxHashMap::default(), false),
        };

        Ok(EvalContext {
            headers,
            aliases,
            cat_map,
            eaw_map,
            script,
            script_unknown_index,
            script_x,
            prop_list,
            derived_core,
            emoji,
            derived_binary,
            derived_norm,
            grapheme_break,
            word_break,
            sentence_break,
            fold,
            has_fold_table,
            eaw_default: Mutex::new(None),
            script_unknown: Mutex::new(None),
        })
    }

    /// Headers of the loaded files, in load order.
    pub fn headers(&self) -> &[DataHeader] {
        &self.headers
    }

    pub fn aliases(&self) -> &AliasSet {
        &self.aliases
    }

    pub fn category_set(&self, cat: GeneralCategory) -> Option<&CodePointSet> {
        self.cat_map.get(&cat)
    }

    pub fn width_set(&self, width: EastAsianWidth) -> Option<&CodePointSet> {
        self.eaw_map.get(&width)
    }

    pub fn script_def(&self) -> &PropertyDef {
        &self.script.def
    }

    pub fn script_set(&self, index: usize) -> Option<&CodePointSet> {
        self.script.set(index)
    }

    pub fn script_unknown_index(&self) -> usize {
        self.script_unknown_index
    }

    pub fn script_extension_set(&self, index: usize) -> Option<&CodePointSet> {
        self.script_x.get(&index)
    }

    /// The table for an open kind; `None` for the fixed kinds and for
    /// ScriptExtension, which shares the Script definition.
    pub fn open_table(&self, kind: PropertyKind) -> Option<&PropertyTable> {
        match kind {
            PropertyKind::Script => Some(&self.script),
            PropertyKind::PropList => Some(&self.prop_list),
            PropertyKind::DerivedCoreProperty => Some(&self.derived_core),
            PropertyKind::Emoji => Some(&self.emoji),
            PropertyKind::DerivedBinaryProperty => Some(&self.derived_binary),
            PropertyKind::DerivedNormalizationProp => Some(&self.derived_norm),
            PropertyKind::GraphemeBreak => Some(&self.grapheme_break),
            PropertyKind::WordBreak => Some(&self.word_break),
            PropertyKind::SentenceBreak => Some(&self.sentence_break),
            PropertyKind::GeneralCategory
            | PropertyKind::EastAsianWidth
            | PropertyKind::ScriptExtension => None,
        }
    }

    /// Whether `CaseFolding.txt` was present at load time.
    pub fn has_fold_table(&self) -> bool {
        self.has_fold_table
    }

    /// Simple case fold of one code point; identity when unmapped.
    pub fn fold(&self, r: u32) -> u32 {
        self.fold.get(&r).copied().unwrap_or(r)
    }

    /// East_Asian_Width `N`: the complement of the five declared buckets,
    /// computed on first use and cached.
    pub fn eaw_default(&self) -> MappedMutexGuard<'_, CodePointSet> {
        let mut guard = self.eaw_default.lock();
        if guard.is_none() {
            let mut universe = CodePointSet::all();
            let mut builder = CodePointSetBuilder::new();
            for width in EastAsianWidth::ALL {
                if width == EastAsianWidth::N {
                    continue;
                }
                if let Some(set) = self.eaw_map.get(&width) {
                    builder.add_set(set);
                }
            }
            let declared = builder.build();
            universe.remove_set(&declared);
            *guard = Some(universe);
        }
        MutexGuard::map(guard, |slot| slot.get_or_insert_with(CodePointSet::new))
    }

    /// Script `Unknown`: the complement of every declared script bucket,
    /// computed on first use and cached.
    pub fn script_unknown(&self) -> MappedMutexGuard<'_, CodePointSet> {
        let mut guard = self.script_unknown.lock();
        if guard.is_none() {
            let mut universe = CodePointSet::all();
            let mut builder = CodePointSetBuilder::new();
            for set in self.script.sets.values() {
                builder.add_set(set);
            }
            let declared = builder.build();
            universe.remove_set(&declared);
            *guard = Some(universe);
        }
        MutexGuard::map(guard, |slot| slot.get_or_insert_with(CodePointSet::new))
    }

    /// Report `r`'s value under each loaded kind. The loaded GC buckets are
    /// exhaustive (`Cn` backs an impossible miss); the East_Asian_Width and
    /// Script defaults come from the lazily materialized complement buckets,
    /// so a query can be the first use that fills them. The extension list
    /// falls back to the primary script, and the break kinds to `Other`
    /// (rendered by the writer).
    pub fn query(&self, r: u32) -> QueryResult {
        let general_category = self
            .cat_map
            .iter()
            .find(|(_, set)| set.contains(r))
            .map(|(&cat, _)| cat)
            .unwrap_or(GeneralCategory::Cn);
        let east_asian_width = self
            .eaw_map
            .iter()
            .find(|(_, set)| set.contains(r))
            .map(|(&width, _)| width)
            .or_else(|| self.eaw_default().contains(r).then_some(EastAsianWidth::N))
            .unwrap_or(EastAsianWidth::N);
        let script = self
            .script
            .sets
            .iter()
            .find(|(_, set)| set.contains(r))
            .map(|(&idx, _)| idx)
            .or_else(|| {
                self.script_unknown()
                    .contains(r)
                    .then_some(self.script_unknown_index)
            })
            .unwrap_or(self.script_unknown_index);

        let mut script_extensions: SmallVec<[usize; 4]> = self
            .script_x
            .iter()
            .filter(|(_, set)| set.contains(r))
            .map(|(&idx, _)| idx)
            .collect();
        script_extensions.sort_unstable();
        if script_extensions.is_empty() {
            script_extensions.push(script);
        }

        let mut emoji: SmallVec<[usize; 4]> = self
            .emoji
            .sets
            .iter()
            .filter(|(_, set)| set.contains(r))
            .map(|(&idx, _)| idx)
            .collect();
        emoji.sort_unstable();

        let probe = |table: &PropertyTable| -> Option<usize> {
            table
                .sets
                .iter()
                .find(|(_, set)| set.contains(r))
                .map(|(&idx, _)| idx)
        };

        QueryResult {
            code_point: r,
            general_category,
            east_asian_width,
            script,
            script_extensions,
            emoji,
            grapheme_break: probe(&self.grapheme_break),
            word_break: probe(&self.word_break),
            sentence_break: probe(&self.sentence_break),
        }
    }

    /// Write the query block for `r` in the stable key-colon-value format.
    pub fn write_query<W: Write>(&self, r: u32, writer: &mut W) -> io::Result<()> {
        let q = self.query(r);
        writeln!(writer, "CodePoint: U+{:04X}", q.code_point)?;
        writeln!(
            writer,
            "GeneralCategory: {}",
            q.general_category.format(&self.aliases.gc)
        )?;
        writeln!(
            writer,
            "EastAsianWidth: {}",
            q.east_asian_width.format(&self.aliases.ea)
        )?;
        writeln!(
            writer,
            "Script: {}, {}",
            self.script.def.abbr(q.script, &self.aliases.sc),
            self.script.def.name(q.script)
        )?;
        let scx: Vec<&str> = q
            .script_extensions
            .iter()
            .map(|&idx| self.script.def.abbr(idx, &self.aliases.sc))
            .collect();
        writeln!(writer, "ScriptExtension: [{}]", scx.join(", "))?;
        let emoji: Vec<&str> = q.emoji.iter().map(|&idx| self.emoji.def.name(idx)).collect();
        writeln!(writer, "Emoji: [{}]", emoji.join(", "))?;
        writeln!(
            writer,
            "GraphemeBreak: {}",
            q.grapheme_break
                .map(|idx| self.grapheme_break.def.name(idx))
                .unwrap_or("Other")
        )?;
        writeln!(
            writer,
            "WordBreak: {}",
            q.word_break
                .map(|idx| self.word_break.def.name(idx))
                .unwrap_or("Other")
        )?;
        writeln!(
            writer,
            "SentenceBreak: {}",
            q.sentence_break
                .map(|idx| self.sentence_break.def.name(idx))
                .unwrap_or("Other")
        )?;
        Ok(())
    }
}
