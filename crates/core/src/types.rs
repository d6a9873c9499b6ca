use serde::{Deserialize, Serialize};

/// One phonetic unit, e.g. "カ", "キャ", "ー".
pub type Mora = String;

/// A `[start, end)` slice of the reference mora sequence.
///
/// `start == end` marks an elided segment with no reference counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} past end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Solver output: one span per input segment, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Sum of the phonetic distances of every chosen span
    pub cost: f64,
    pub spans: Vec<Span>,
}

/// A tokenized word with its pronunciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedWord {
    pub surface: String,
    /// Katakana pronunciation
    pub pronunciation: String,
    /// Starts a phrase (reference side only)
    #[serde(default)]
    pub is_phrase_start: bool,
}

impl AnalyzedWord {
    pub fn new(surface: &str, pronunciation: &str, is_phrase_start: bool) -> Self {
        Self {
            surface: surface.to_string(),
            pronunciation: pronunciation.to_string(),
            is_phrase_start,
        }
    }
}

/// One aligned row: a parody mora (or word) and the original moras it
/// was matched to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedMora {
    pub parody_mora: String,
    pub is_parody_word_start: bool,
    pub is_parody_word_end: bool,
    /// Empty when the parody unit was elided
    pub original_mora: String,
    pub is_original_phrase_start: bool,
    pub is_original_phrase_end: bool,
    pub is_original_word_start: bool,
    pub is_original_word_end: bool,
    /// Parody word label, set only on the first mora of a word
    #[serde(default)]
    pub parody_word_surface: String,
    /// Original word label(s) starting inside the matched span
    #[serde(default)]
    pub original_word_surface: String,
    #[serde(default)]
    pub parody_consonant: String,
    #[serde(default)]
    pub parody_vowel: String,
    #[serde(default)]
    pub original_consonant: String,
    #[serde(default)]
    pub original_vowel: String,
    /// Line index within the source lyrics
    #[serde(default)]
    pub line_id: String,
    #[serde(default)]
    pub input_file_path: Option<String>,
}

impl AlignedMora {
    /// True when the parody unit matched no reference moras.
    pub fn is_elided(&self) -> bool {
        self.original_mora.is_empty()
    }
}
