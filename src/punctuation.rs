//! Spoken punctuation phrases for dictated text.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::settings::{self, PUNCTUATION_FILE};

/// Built-in phrase table. User overrides merge on top of these.
const BUILTIN: &[(&str, &str)] = &[
    ("comma", ","),
    ("period", "."),
    ("dot", "."),
    ("dots", "..."),
    ("ellipsis", "..."),
    ("question mark", "?"),
    ("exclamation mark", "!"),
    ("semicolon", ";"),
    ("colon", ":"),
    ("open parenthesis", "("),
    ("close parenthesis", ")"),
    ("open bracket", "["),
    ("close bracket", "]"),
    ("open brace", "{"),
    ("close brace", "}"),
    ("dash", "-"),
    ("hyphen", "-"),
    ("underscore", "_"),
    ("quote", "\""),
    ("double quote", "\""),
    ("single quote", "'"),
    ("forward slash", "/"),
    ("backslash", "\\"),
    ("greater than", ">"),
    ("less than", "<"),
    ("ampersand", "&"),
    ("at sign", "@"),
    ("dollar sign", "$"),
    ("percent sign", "%"),
    ("number sign", "#"),
    ("star", "*"),
    ("plus sign", "+"),
    ("minus sign", "-"),
    ("equal sign", "="),
    ("vertical bar", "|"),
    ("caret", "^"),
    ("tilda", "~"),
    ("grave accent", "`"),
];

/// Phrase-to-symbol table applied to final transcripts.
///
/// Matching is case-insensitive and word-bounded, so "dot" never fires
/// inside "dotted". Longer phrases are tried first, which keeps "dots"
/// ahead of "dot" and "question mark" ahead of any overlap.
#[derive(Clone, Debug)]
pub struct PunctuationMap {
    replacements: HashMap<String, String>,
    sorted_keys: Vec<String>,
}

impl Default for PunctuationMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PunctuationMap {
    pub fn builtin() -> Self {
        Self::from_map(
            BUILTIN
                .iter()
                .map(|&(phrase, symbol)| (phrase.to_string(), symbol.to_string()))
                .collect(),
        )
    }

    pub fn from_map(replacements: HashMap<String, String>) -> Self {
        let mut map = Self {
            replacements,
            sorted_keys: Vec::new(),
        };
        map.rebuild_sorted_keys();
        map
    }

    /// Built-in table merged with any user overrides on disk.
    pub fn load_or_default() -> Self {
        let mut map = Self::builtin();
        let path = Self::default_path();
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(user) => map.merge(user.replacements),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable punctuation overrides");
                }
            }
        }
        map
    }

    pub fn default_path() -> PathBuf {
        settings::settings_dir().join(PUNCTUATION_FILE)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let replacements: HashMap<String, String> = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        Ok(Self::from_map(replacements))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        settings::save_json_to(path, &self.replacements)
    }

    pub fn add(&mut self, phrase: impl Into<String>, symbol: impl Into<String>) {
        self.replacements.insert(phrase.into(), symbol.into());
        self.rebuild_sorted_keys();
    }

    /// Overlay `overrides` onto the table; existing phrases are
    /// replaced, new ones added.
    pub fn merge(&mut self, overrides: HashMap<String, String>) {
        self.replacements.extend(overrides);
        self.rebuild_sorted_keys();
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    fn rebuild_sorted_keys(&mut self) {
        self.sorted_keys = self.replacements.keys().cloned().collect();
        self.sorted_keys.sort_unstable();
        self.sorted_keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    }

    /// Replace every spoken punctuation phrase in `text` with its
    /// symbol, then tidy the spacing around sentence punctuation.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for key in &self.sorted_keys {
            if key.is_empty() {
                continue;
            }
            let Some(symbol) = self.replacements.get(key) else {
                continue;
            };
            result = replace_phrase(&result, key, symbol);
        }
        tidy(&result)
    }
}

/// Replace word-bounded, case-insensitive occurrences of `phrase`.
fn replace_phrase(text: &str, phrase: &str, symbol: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if matches_at(text, i, phrase)
            && boundary_before(text, i)
            && boundary_after(text, i + phrase.len())
        {
            out.push_str(symbol);
            i += phrase.len();
            continue;
        }
        match text[i..].chars().next() {
            Some(ch) => {
                out.push(ch);
                i += ch.len_utf8();
            }
            None => break,
        }
    }
    out
}

fn matches_at(text: &str, i: usize, phrase: &str) -> bool {
    text.len() - i >= phrase.len()
        && text.as_bytes()[i..i + phrase.len()].eq_ignore_ascii_case(phrase.as_bytes())
}

fn boundary_before(text: &str, i: usize) -> bool {
    text[..i]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn boundary_after(text: &str, i: usize) -> bool {
    text[i..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}

/// Pull replaced symbols against their neighbors: no space before
/// closing punctuation, none after an opening bracket, and collapse
/// doubled spaces left behind.
fn tidy(text: &str) -> String {
    lazy_static! {
        static ref SPACE_BEFORE_MARK: Regex = Regex::new(r"\s+([.,!?;:)\]}])").unwrap();
        static ref SPACE_AFTER_OPEN: Regex = Regex::new(r"([(\[{])\s+").unwrap();
        static ref DOUBLE_SPACE: Regex = Regex::new(r" {2,}").unwrap();
    }
    let out = SPACE_BEFORE_MARK.replace_all(text, "$1");
    let out = SPACE_AFTER_OPEN.replace_all(&out, "$1");
    DOUBLE_SPACE.replace_all(&out, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_comma_phrase() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("hello comma world"), "hello, world");
    }

    #[test]
    fn replaces_sentence_end() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("stop period"), "stop.");
        assert_eq!(map.apply("really question mark"), "really?");
        assert_eq!(map.apply("wow exclamation mark"), "wow!");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("Hello COMMA world"), "Hello, world");
        assert_eq!(map.apply("done Question Mark"), "done?");
    }

    #[test]
    fn phrases_only_match_whole_words() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("a dotted line"), "a dotted line");
        assert_eq!(map.apply("polka dot"), "polka.");
        assert_eq!(map.apply("starry night"), "starry night");
    }

    #[test]
    fn longer_phrases_win() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("wait dots"), "wait...");
        assert_eq!(map.apply("one double quote"), "one \"");
    }

    #[test]
    fn brackets_hug_their_contents() {
        let map = PunctuationMap::builtin();
        assert_eq!(
            map.apply("open parenthesis note close parenthesis"),
            "(note)"
        );
        assert_eq!(map.apply("open bracket x close bracket"), "[x]");
    }

    #[test]
    fn replaces_every_occurrence() {
        let map = PunctuationMap::builtin();
        assert_eq!(
            map.apply("one comma two comma three"),
            "one, two, three"
        );
    }

    #[test]
    fn symbol_phrases_keep_their_space() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("five percent sign"), "five %");
        assert_eq!(map.apply("a at sign b"), "a @ b");
    }

    #[test]
    fn collapses_doubled_spaces() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("a comma  b"), "a, b");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(PunctuationMap::builtin().apply(""), "");
    }

    #[test]
    fn text_without_phrases_is_unchanged() {
        let map = PunctuationMap::builtin();
        assert_eq!(map.apply("just plain words"), "just plain words");
    }

    #[test]
    fn merge_overrides_and_extends() {
        let mut map = PunctuationMap::builtin();
        map.merge(HashMap::from([
            ("comma".to_string(), ";".to_string()),
            ("arrow".to_string(), "->".to_string()),
        ]));
        assert_eq!(map.apply("a comma b"), "a; b");
        assert_eq!(map.apply("left arrow right"), "left -> right");
    }

    #[test]
    fn add_rebuilds_ordering() {
        let mut map = PunctuationMap::from_map(HashMap::new());
        map.add("dot", ".");
        map.add("dot dot", "..");
        assert_eq!(map.apply("dot dot"), "..");
    }

    #[test]
    fn empty_phrase_is_ignored() {
        let map = PunctuationMap::from_map(HashMap::from([(String::new(), "x".to_string())]));
        assert_eq!(map.apply("ab"), "ab");
    }

    #[test]
    fn round_trip_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("punctuation.json");
        let mut map = PunctuationMap::builtin();
        map.add("new line", "\n");
        map.save_to_file(&path).unwrap();
        let loaded = PunctuationMap::load_from_file(&path).unwrap();
        assert_eq!(loaded.replacements, map.replacements);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(PunctuationMap::load_from_file(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn builtin_table_has_no_duplicate_phrases() {
        assert_eq!(PunctuationMap::builtin().len(), BUILTIN.len());
    }
}
