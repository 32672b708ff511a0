//! In-memory UCD excerpts for tests.
//!
//! The excerpts are internally consistent the way the real snapshot is: the
//! general-category lines partition the whole universe, scripts and widths
//! only cover code points that exist in the category data, and the alias
//! table carries the abbreviations the other fixtures rely on. Tests build a
//! full [`EvalContext`] from these through the same loaders the CLI uses.

use std::io::{BufRead, Cursor};

use rustc_hash::FxHashMap;

use crate::context::{
    EvalContext, UcdSource, CASE_FOLDING_FILE, DERIVED_BINARY_PROPERTIES_FILE,
    DERIVED_CORE_PROPERTIES_FILE, DERIVED_NORMALIZATION_PROPS_FILE, EAST_ASIAN_WIDTH_FILE,
    EMOJI_DATA_FILE, GENERAL_CATEGORY_FILE, GRAPHEME_BREAK_FILE, PROPERTY_VALUE_ALIASES_FILE,
    PROP_LIST_FILE, SCRIPTS_FILE, SCRIPT_EXTENSIONS_FILE, SENTENCE_BREAK_FILE, WORD_BREAK_FILE,
};
use crate::GunisetError;

const GENERAL_CATEGORY: &str = "\
# DerivedGeneralCategory-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0000..001F    ; Cc #  [32] <control-0000>..<control-001F>
0020          ; Zs #       SPACE
0021..0040    ; Po
0041..005A    ; Lu #  [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
005B..0060    ; Sm
0061..007A    ; Ll #  [26] LATIN SMALL LETTER A..LATIN SMALL LETTER Z
007B..00BF    ; So
00C0..01BF    ; Lu
01C0..01C3    ; Lo
01C4..01CC    ; Lt
01CD..02FF    ; Ll
0300..036F    ; Mn
0370..0390    ; Lm
0391..03A9    ; Lu
03AA..08FF    ; So
0900..0914    ; Mc
0915..0939    ; Lo
093A..0961    ; Mn
0962..1FFF    ; So
2000..20FF    ; Sm
2100..2FFF    ; So
3000          ; Zs #       IDEOGRAPHIC SPACE
3001..3003    ; Po
3004..303F    ; So
3040..309F    ; Lo
30A0..4DFF    ; Lo
4E00..9FFF    ; Lo
A000..D7FF    ; Lo
D800..DFFF    ; Cs
E000..F8FF    ; Co
F900..FFFF    ; Lo
10000..1F5FF  ; So
1F600..1F64F  ; So
1F650..10FFFF ; Cn
";

const EAST_ASIAN_WIDTH: &str = "\
# EastAsianWidth-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0000..001F    ; N  # Cc    [32] <control-0000>..<control-001F>
0020..007E    ; Na
0391..03A9    ; A
1100..115F    ; W
20A9          ; H
3000          ; F
3041..33FF    ; W
4E00..9FFF    ; W
A000..A4CF    ; W
F900..FAFF    ; W
FF00..FF60    ; F
FF61..FFDC    ; H
";

const PROPERTY_VALUE_ALIASES: &str = "\
# PropertyValueAliases-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

gc ; Ll ; Lowercase_Letter
gc ; Lu ; Uppercase_Letter
gc ; Zs ; Space_Separator
ea ; A  ; Ambiguous
ea ; F  ; Fullwidth
ea ; H  ; Halfwidth
ea ; N  ; Neutral
ea ; Na ; Narrow
ea ; W  ; Wide
sc ; Grek ; Greek
sc ; Hani ; Han
sc ; Hira ; Hiragana
sc ; Latn ; Latin
sc ; Zzzz ; Unknown
ccc;   0 ; NR ; Not_Reordered
blk ; ASCII ; Basic_Latin
";

const SCRIPTS: &str = "\
# Scripts-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0041..005A    ; Latin # L&  [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
0061..007A    ; Latin
00C0..01BF    ; Latin
0391..03A9    ; Greek
3041..3096    ; Hiragana
4E00..9FFF    ; Han
";

const SCRIPT_EXTENSIONS: &str = "\
# ScriptExtensions-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0363..036F    ; Latn
3031..3035    ; Hani Hira
30FC          ; Hira
";

const PROP_LIST: &str = "\
# PropList-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0009..000D    ; White_Space # Cc   [5] <control-0009>..<control-000D>
0020          ; White_Space
0030..0039    ; Hex_Digit
0041..0046    ; Hex_Digit
0061..0066    ; Hex_Digit
";

const DERIVED_CORE_PROPERTIES: &str = "\
# DerivedCoreProperties-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0041..005A    ; Alphabetic
0061..007A    ; Alphabetic
3041..3096    ; Alphabetic
4E00..9FFF    ; Alphabetic
0300..036F    ; InCB; Extend
0915..0939    ; InCB; Consonant
";

const EMOJI_DATA: &str = "\
# emoji-data-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0023          ; Emoji # E0.0   [1] (#\u{fe0f})
002A          ; Emoji
1F600..1F64F  ; Emoji
1F600..1F64F  ; Emoji_Presentation
";

const DERIVED_BINARY_PROPERTIES: &str = "\
# DerivedBinaryProperties-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0028          ; Bidi_Mirrored
0029          ; Bidi_Mirrored
2045..2046    ; Bidi_Mirrored
";

const DERIVED_NORMALIZATION_PROPS: &str = "\
# DerivedNormalizationProps-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0340..0341    ; NFC_QC; N
0374          ; NFC_QC; N
FB1D          ; NFKC_QC; N
";

const GRAPHEME_BREAK: &str = "\
# GraphemeBreakProperty-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

000D          ; CR
000A          ; LF
0000..0009    ; Control
200D          ; ZWJ
0300..036F    ; Extend
";

const WORD_BREAK: &str = "\
# WordBreakProperty-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0030..0039    ; Numeric
0041..005A    ; ALetter
0061..007A    ; ALetter
";

const SENTENCE_BREAK: &str = "\
# SentenceBreakProperty-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0030..0039    ; Numeric
0041..005A    ; Upper
0061..007A    ; Lower
";

const CASE_FOLDING: &str = "\
# CaseFolding-16.0.0.txt
# Date: 2024-04-30, 21:48:40 GMT

0041; C; 0061; # LATIN CAPITAL LETTER A
0042; C; 0062; # LATIN CAPITAL LETTER B
0043; C; 0063; # LATIN CAPITAL LETTER C
00DF; F; 0073 0073; # LATIN SMALL LETTER SHARP S
0130; T; 0069; # LATIN CAPITAL LETTER I WITH DOT ABOVE
1E9E; S; 00DF; # LATIN CAPITAL LETTER SHARP S
";

/// A [`UcdSource`] over in-memory files.
pub(crate) struct MapSource(FxHashMap<&'static str, &'static str>);

impl MapSource {
    pub(crate) fn empty() -> Self {
        MapSource(FxHashMap::default())
    }

    pub(crate) fn full() -> Self {
        let mut files = FxHashMap::default();
        files.insert(GENERAL_CATEGORY_FILE, GENERAL_CATEGORY);
        files.insert(EAST_ASIAN_WIDTH_FILE, EAST_ASIAN_WIDTH);
        files.insert(PROPERTY_VALUE_ALIASES_FILE, PROPERTY_VALUE_ALIASES);
        files.insert(SCRIPTS_FILE, SCRIPTS);
        files.insert(SCRIPT_EXTENSIONS_FILE, SCRIPT_EXTENSIONS);
        files.insert(PROP_LIST_FILE, PROP_LIST);
        files.insert(DERIVED_CORE_PROPERTIES_FILE, DERIVED_CORE_PROPERTIES);
        files.insert(EMOJI_DATA_FILE, EMOJI_DATA);
        files.insert(DERIVED_BINARY_PROPERTIES_FILE, DERIVED_BINARY_PROPERTIES);
        files.insert(DERIVED_NORMALIZATION_PROPS_FILE, DERIVED_NORMALIZATION_PROPS);
        files.insert(GRAPHEME_BREAK_FILE, GRAPHEME_BREAK);
        files.insert(WORD_BREAK_FILE, WORD_BREAK);
        files.insert(SENTENCE_BREAK_FILE, SENTENCE_BREAK);
        files.insert(CASE_FOLDING_FILE, CASE_FOLDING);
        MapSource(files)
    }
}

impl UcdSource for MapSource {
    fn open(&self, path: &str) -> Result<Option<Box<dyn BufRead>>, GunisetError> {
        Ok(self
            .0
            .get(path)
            .map(|content| Box::new(Cursor::new(content.as_bytes())) as Box<dyn BufRead>))
    }
}

/// A context loaded from the full fixture snapshot.
pub(crate) fn test_context() -> EvalContext {
    EvalContext::load(&MapSource::full()).expect("fixture snapshot loads")
}
