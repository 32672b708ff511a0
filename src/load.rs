//! Loaders for the UCD text files.
//!
//! All UCD data files share one line grammar: `#` comments, blank lines, and
//! data lines of the form `FIRST[..LAST] ; VALUE [; MORE...] [# comment]`.
//! [`DataLoader`] walks any `BufRead` line by line, captures the two-line
//! header most files start with, strips comments, and hands parsed
//! `(range, value)` pairs to a per-file callback. Parse failures surface as
//! [`GunisetError::Load`] carrying the file name and line number.

use std::io::BufRead;

use rustc_hash::FxHashMap;

use crate::property::{
    AliasMap, AliasSet, EastAsianWidth, GeneralCategory, PropertyDef, PropertyKind, PropertyTable,
};
use crate::set::{parse_code_point, CodePointSet, CodePointSetBuilder, RuneRange};
use crate::GunisetError;

/// The `Filename`/`Date` header a UCD file starts with, surfaced by the
/// `info` command.
#[derive(Debug, Clone, Default)]
pub struct DataHeader {
    pub filename: String,
    pub created: String,
}

/// Line-oriented reader shared by every UCD loader.
pub struct DataLoader<R: BufRead> {
    file: String,
    reader: R,
    lineno: usize,
    header: DataHeader,
}

impl<R: BufRead> DataLoader<R> {
    pub fn new(file: impl Into<String>, reader: R) -> Self {
        DataLoader {
            file: file.into(),
            reader,
            lineno: 0,
            header: DataHeader::default(),
        }
    }

    fn err(&self, cause: String) -> GunisetError {
        GunisetError::Load {
            file: self.file.clone(),
            line: self.lineno,
            cause,
        }
    }

    /// Feed every data line to `callback`. The first two comment lines (when
    /// present) populate the header instead; other comments and blank lines
    /// are skipped. The callback reports failures as a cause string, which
    /// comes back annotated with file and line.
    pub fn load<F>(mut self, mut callback: F) -> Result<DataHeader, GunisetError>
    where
        F: FnMut(&str) -> Result<(), String>,
    {
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = self
                .reader
                .read_line(&mut buf)
                .map_err(|e| self.err(e.to_string()))?;
            if n == 0 {
                break;
            }
            self.lineno += 1;
            let line = buf.trim_end_matches(['\n', '\r']);
            if self.lineno == 1 && line.starts_with('#') {
                self.header.filename = line.strip_prefix("# ").unwrap_or(line).to_string();
                continue;
            }
            if self.lineno == 2 && line.starts_with('#') {
                self.header.created = line.strip_prefix("# ").unwrap_or(line).to_string();
                continue;
            }
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            callback(line).map_err(|cause| self.err(cause))?;
        }
        Ok(self.header)
    }

    /// Like [`DataLoader::load`], with the shared `RANGE ; VALUE` parsing
    /// applied first. With `join_values` the fields after the range are
    /// concatenated with `_` (`InCB; Extend` becomes `InCB_Extend`);
    /// otherwise only the first value field names the property.
    pub fn load_properties<F>(
        self,
        join_values: bool,
        mut callback: F,
    ) -> Result<DataHeader, GunisetError>
    where
        F: FnMut(RuneRange, &str) -> Result<(), String>,
    {
        self.load(|line| {
            let (range, value) = parse_entry(line, join_values)?;
            callback(range, &value)
        })
    }
}

fn parse_entry(line: &str, join_values: bool) -> Result<(RuneRange, String), String> {
    let data = line.split('#').next().unwrap_or(line);
    let mut fields = data.split(';');

    let range_field = fields.next().unwrap_or("").trim();
    let mut ends = range_field.split("..");
    let first = parse_code_point(ends.next().unwrap_or("")).map_err(|e| e.to_string())?;
    let last = match ends.next() {
        Some(s) => parse_code_point(s).map_err(|e| e.to_string())?,
        None => first,
    };

    let values: Vec<&str> = fields
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if values.is_empty() {
        return Err("missing property field".to_string());
    }
    let value = if join_values {
        values.join("_")
    } else {
        values[0].to_string()
    };
    Ok((RuneRange::new(first, last), value))
}

/// `extracted/DerivedGeneralCategory.txt` into the 30 base buckets, all of
/// them allocated up front.
pub fn load_general_category<R: BufRead>(
    loader: DataLoader<R>,
) -> Result<(FxHashMap<GeneralCategory, CodePointSet>, DataHeader), GunisetError> {
    let mut builders: FxHashMap<GeneralCategory, CodePointSetBuilder> = GeneralCategory::BASE
        .iter()
        .map(|&c| (c, CodePointSetBuilder::new()))
        .collect();
    let header = loader.load_properties(false, |range, value| {
        let cat = GeneralCategory::parse(value, None).map_err(|e| e.to_string())?;
        match builders.get_mut(&cat) {
            Some(builder) => {
                builder.add_range(range);
                Ok(())
            }
            None => Err(format!("not a base general category: {}", value)),
        }
    })?;
    let map = builders.into_iter().map(|(c, b)| (c, b.build())).collect();
    Ok((map, header))
}

/// `EastAsianWidth.txt` into the five non-default buckets. `N` entries are
/// skipped: that bucket is the complement of the others and the context
/// materializes it lazily.
pub fn load_east_asian_width<R: BufRead>(
    loader: DataLoader<R>,
) -> Result<(FxHashMap<EastAsianWidth, CodePointSet>, DataHeader), GunisetError> {
    let mut builders: FxHashMap<EastAsianWidth, CodePointSetBuilder> = EastAsianWidth::ALL
        .iter()
        .filter(|&&w| w != EastAsianWidth::N)
        .map(|&w| (w, CodePointSetBuilder::new()))
        .collect();
    let header = loader.load_properties(false, |range, value| {
        let width = EastAsianWidth::parse(value, None).map_err(|e| e.to_string())?;
        if let Some(builder) = builders.get_mut(&width) {
            builder.add_range(range);
        }
        Ok(())
    })?;
    let map = builders.into_iter().map(|(w, b)| (w, b.build())).collect();
    Ok((map, header))
}

/// `PropertyValueAliases.txt`. Only the gc/ea/sc kinds are registered; every
/// other line is silently skipped.
pub fn load_alias_set<R: BufRead>(
    loader: DataLoader<R>,
) -> Result<(AliasSet, DataHeader), GunisetError> {
    let mut aliases = AliasSet::new();
    let header = loader.load(|line| {
        if let Some((target, abbr, longs)) = parse_alias_entry(line) {
            if let Some(map) = aliases.get_mut(target) {
                map.add_all(abbr, &longs);
            }
        }
        Ok(())
    })?;
    Ok((aliases, header))
}

fn parse_alias_entry(line: &str) -> Option<(&str, &str, Vec<&str>)> {
    let data = line.split('#').next().unwrap_or(line);
    let mut fields = data.split(';').map(str::trim);
    let target = fields.next()?;
    let abbr = fields.next()?;
    let longs: Vec<&str> = fields.filter(|s| !s.is_empty()).collect();
    if abbr.is_empty() || longs.is_empty() {
        return None;
    }
    Some((target, abbr, longs))
}

/// Generic loader for the open kinds: value names are registered as they
/// first appear, receiving dense indices in discovery order.
pub fn load_open_kind<R: BufRead>(
    kind: PropertyKind,
    join_values: bool,
    loader: DataLoader<R>,
) -> Result<(PropertyTable, DataHeader), GunisetError> {
    let mut def = PropertyDef::new(kind);
    let mut builders: FxHashMap<usize, CodePointSetBuilder> = FxHashMap::default();
    let header = loader.load_properties(join_values, |range, value| {
        let idx = def.register(value);
        builders.entry(idx).or_default().add_range(range);
        Ok(())
    })?;
    let sets = builders.into_iter().map(|(i, b)| (i, b.build())).collect();
    Ok((PropertyTable { def, sets }, header))
}

/// `ScriptExtensions.txt`: the value field is a space-separated list of
/// script abbreviations; each one receives the line's range. Buckets are
/// created lazily since any script may appear.
pub fn load_script_extensions<R: BufRead>(
    script_def: &PropertyDef,
    alias: &AliasMap,
    loader: DataLoader<R>,
) -> Result<(FxHashMap<usize, CodePointSet>, DataHeader), GunisetError> {
    let mut builders: FxHashMap<usize, CodePointSetBuilder> = FxHashMap::default();
    let header = loader.load_properties(false, |range, value| {
        for token in value.split_whitespace() {
            let idx = script_def
                .parse(token, Some(alias))
                .map_err(|e| e.to_string())?;
            builders.entry(idx).or_default().add_range(range);
        }
        Ok(())
    })?;
    let sets = builders.into_iter().map(|(i, b)| (i, b.build())).collect();
    Ok((sets, header))
}

/// `CaseFolding.txt` into a simple-fold map. Only the `C` (common) and `S`
/// (simple) statuses contribute; `F` (full) and `T` (Turkic) lines are
/// skipped.
pub fn load_case_folding<R: BufRead>(
    loader: DataLoader<R>,
) -> Result<(FxHashMap<u32, u32>, DataHeader), GunisetError> {
    let mut map: FxHashMap<u32, u32> = FxHashMap::default();
    let header = loader.load(|line| {
        let data = line.split('#').next().unwrap_or(line);
        let mut fields = data.split(';').map(str::trim);
        let (Some(code), Some(status), Some(mapping)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err("malformed case folding entry".to_string());
        };
        if status != "C" && status != "S" {
            return Ok(());
        }
        let from = parse_code_point(code).map_err(|e| e.to_string())?;
        let to = parse_code_point(mapping).map_err(|e| e.to_string())?;
        map.insert(from, to);
        Ok(())
    })?;
    Ok((map, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn loader(content: &str) -> DataLoader<Cursor<&[u8]>> {
        DataLoader::new("Test.txt", Cursor::new(content.as_bytes()))
    }

    #[test]
    fn test_header_extraction() {
        let content = "# SomeFile-16.0.0.txt\n# Date: 2024-04-30\n# a later comment\n\n0041 ; X\n";
        let mut seen = Vec::new();
        let header = loader(content)
            .load_properties(false, |range, value| {
                seen.push((range, value.to_string()));
                Ok(())
            })
            .unwrap();
        assert_eq!(header.filename, "SomeFile-16.0.0.txt");
        assert_eq!(header.created, "Date: 2024-04-30");
        assert_eq!(seen, vec![(RuneRange::new(0x41, 0x41), "X".to_string())]);
    }

    #[test]
    fn test_data_lines_without_header() {
        let content = "0041..005A ; Alpha # comment\n0061 ; Beta\n";
        let mut seen = Vec::new();
        let header = loader(content)
            .load_properties(false, |range, value| {
                seen.push((range, value.to_string()));
                Ok(())
            })
            .unwrap();
        assert!(header.filename.is_empty());
        assert_eq!(
            seen,
            vec![
                (RuneRange::new(0x41, 0x5A), "Alpha".to_string()),
                (RuneRange::new(0x61, 0x61), "Beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_join_values() {
        let content = "0915..0939 ; InCB; Consonant # Lo  [37] ...\n0300 ; InCB; Extend\n";
        let mut seen = Vec::new();
        loader(content)
            .load_properties(true, |_, value| {
                seen.push(value.to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec!["InCB_Consonant", "InCB_Extend"]);
    }

    #[test]
    fn test_non_join_takes_first_field() {
        let content = "0340..0341 ; NFC_QC; N\n";
        let mut seen = Vec::new();
        loader(content)
            .load_properties(false, |_, value| {
                seen.push(value.to_string());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec!["NFC_QC"]);
    }

    #[test]
    fn test_bad_hex_reports_file_and_line() {
        let content = "# Header\n# Date\n0041 ; Ok\nZZZZ ; Bad\n";
        let err = loader(content)
            .load_properties(false, |_, _| Ok(()))
            .unwrap_err();
        match err {
            GunisetError::Load { file, line, .. } => {
                assert_eq!(file, "Test.txt");
                assert_eq!(line, 4);
            }
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_general_category_buckets() {
        let content = "# DerivedGeneralCategory-16.0.0.txt\n# Date: test\n\
                       0041..005A ; Lu\n0061..007A ; Ll\n0020 ; Zs\n";
        let (map, _) = load_general_category(loader(content)).unwrap();
        // every base bucket exists even when the excerpt never mentions it
        assert_eq!(map.len(), GeneralCategory::BASE.len());
        assert!(map[&GeneralCategory::Lu].contains(0x41));
        assert!(map[&GeneralCategory::Ll].contains(0x7A));
        assert!(map[&GeneralCategory::Zs].contains(0x20));
        assert!(map[&GeneralCategory::Cn].is_empty());
    }

    #[test]
    fn test_load_general_category_rejects_umbrella() {
        let content = "0041..005A ; L\n";
        assert!(load_general_category(loader(content)).is_err());
    }

    #[test]
    fn test_load_east_asian_width_skips_default() {
        let content = "0020..007E ; Na\n3041..3096 ; W\n0000..001F ; N\n";
        let (map, _) = load_east_asian_width(loader(content)).unwrap();
        assert!(!map.contains_key(&EastAsianWidth::N));
        assert!(map[&EastAsianWidth::Na].contains(0x41));
        assert!(map[&EastAsianWidth::W].contains(0x3041));
        assert!(map[&EastAsianWidth::F].is_empty());
    }

    #[test]
    fn test_load_alias_set_filters_targets() {
        let content = "gc ; Lu ; Uppercase_Letter\n\
                       ea ; Na ; Narrow\n\
                       sc ; Latn ; Latin\n\
                       blk ; ASCII ; Basic_Latin\n";
        let (aliases, _) = load_alias_set(loader(content)).unwrap();
        assert_eq!(aliases.gc.abbr("Uppercase_Letter"), Some("Lu"));
        assert_eq!(aliases.ea.longs("Na"), &["Narrow".to_string()]);
        assert_eq!(aliases.sc.abbr("Latin"), Some("Latn"));
        assert_eq!(aliases.sc.abbr("Basic_Latin"), None);
    }

    #[test]
    fn test_load_open_kind_dense_indices() {
        let content = "0041..0046 ; Hex_Digit\n0009..000D ; White_Space\n0030..0039 ; Hex_Digit\n";
        let (table, _) = load_open_kind(PropertyKind::PropList, false, loader(content)).unwrap();
        assert_eq!(table.def.len(), 2);
        let hex = table.def.lookup("Hex_Digit").unwrap();
        let ws = table.def.lookup("White_Space").unwrap();
        assert_eq!(hex, 0);
        assert_eq!(ws, 1);
        assert!(table.set(hex).unwrap().contains(0x30));
        assert!(table.set(hex).unwrap().contains(0x41));
        assert!(table.set(ws).unwrap().contains(0x0A));
    }

    #[test]
    fn test_load_script_extensions_fans_out() {
        let mut def = PropertyDef::new(PropertyKind::Script);
        let han = def.register("Han");
        let hira = def.register("Hiragana");
        let mut alias = AliasMap::new();
        alias.add("Hani", "Han");
        alias.add("Hira", "Hiragana");

        let content = "3031..3035 ; Hani Hira\n";
        let (sets, _) = load_script_extensions(&def, &alias, loader(content)).unwrap();
        assert!(sets[&han].contains(0x3031));
        assert!(sets[&hira].contains(0x3035));
    }

    #[test]
    fn test_load_script_extensions_unknown_abbr_fails() {
        let def = PropertyDef::new(PropertyKind::Script);
        let alias = AliasMap::new();
        let content = "3031 ; Qaai\n";
        assert!(load_script_extensions(&def, &alias, loader(content)).is_err());
    }

    #[test]
    fn test_load_case_folding_statuses() {
        let content = "0041; C; 0061; # LATIN CAPITAL LETTER A\n\
                       00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S\n\
                       0049; T; 0131; # LATIN CAPITAL LETTER I\n\
                       1E9E; S; 00DF; # LATIN CAPITAL LETTER SHARP S\n";
        let (map, _) = load_case_folding(loader(content)).unwrap();
        assert_eq!(map.get(&0x41), Some(&0x61));
        assert_eq!(map.get(&0x1E9E), Some(&0xDF));
        assert!(!map.contains_key(&0xDF));
        assert!(!map.contains_key(&0x49));
    }
}
