//! Phonetic-search dataset built from word-level alignments.
//!
//! Each query is an original phrase-initial word; its positives are the
//! parody words that repeatedly replaced it and also appear in the
//! candidate wordlist.

use std::collections::{HashMap, HashSet};
use std::io;

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::types::AlignedMora;

/// Word-table `type` values kept in the wordlist.
pub const ALLOWED_WORD_TYPES: [&str; 3] = ["full", "family", "registered"];

/// Minimum chars in an original word for it to become a query.
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub query_id: usize,
    pub query: String,
    pub positive: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticSearchDataset {
    pub queries: Vec<Query>,
    pub wordlist: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WordTableRow {
    #[serde(default)]
    pronunciation: String,
    #[serde(rename = "type", default)]
    word_type: String,
}

/// Original-side text plus its boundary flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversionKey {
    pub original: String,
    pub word_start: bool,
    pub phrase_start: bool,
    pub word_end: bool,
    pub phrase_end: bool,
}

impl ConversionKey {
    fn of(row: &AlignedMora) -> Self {
        Self {
            original: row.original_mora.clone(),
            word_start: row.is_original_word_start,
            phrase_start: row.is_original_phrase_start,
            word_end: row.is_original_word_end,
            phrase_end: row.is_original_phrase_end,
        }
    }
}

/// How often each parody text replaced one original key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub key: ConversionKey,
    /// `(parody text, count)` in first-seen order
    pub parody_counts: Vec<(String, usize)>,
}

/// Keep only full-width katakana and the long-vowel mark.
fn katakana_only(text: &str) -> String {
    text.chars()
        .filter(|&c| ('ァ'..='ン').contains(&c) || c == 'ー')
        .collect()
}

/// Unique katakana pronunciations of allowed rows, first-seen order.
pub fn load_wordlist<R: io::Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut seen = HashSet::new();
    let mut wordlist = Vec::new();

    for record in rdr.deserialize::<WordTableRow>() {
        let row = record.map_err(|e| AlignError::csv("reading word table", e))?;
        if !ALLOWED_WORD_TYPES.contains(&row.word_type.as_str()) {
            continue;
        }
        let pronunciation = katakana_only(&row.pronunciation);
        if seen.insert(pronunciation.clone()) {
            wordlist.push(pronunciation);
        }
    }

    log::debug!("wordlist: {} unique pronunciations", wordlist.len());
    Ok(wordlist)
}

/// Group rows by original key and count the parody texts of each.
pub fn count_conversions(rows: &[AlignedMora]) -> Vec<Conversion> {
    let mut conversions: Vec<Conversion> = Vec::new();
    let mut index: HashMap<ConversionKey, usize> = HashMap::new();

    for row in rows {
        let key = ConversionKey::of(row);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            conversions.push(Conversion {
                key,
                parody_counts: Vec::new(),
            });
            conversions.len() - 1
        });

        let counts = &mut conversions[slot].parody_counts;
        match counts.iter_mut().find(|(text, _)| *text == row.parody_mora) {
            Some((_, n)) => *n += 1,
            None => counts.push((row.parody_mora.clone(), 1)),
        }
    }

    conversions
}

/// Phrase-initial, word-final originals of two or more chars, each with
/// its parody texts seen more than once, most frequent first.
///
/// Keys that share original text collapse onto the first one's slot,
/// with the later key's parody list winning.
pub fn create_queries(conversions: &[Conversion]) -> Vec<(String, Vec<String>)> {
    let mut queries: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for conversion in conversions {
        let key = &conversion.key;
        if !(key.phrase_start && key.word_end) {
            continue;
        }
        if key.original.chars().count() < MIN_QUERY_CHARS {
            continue;
        }

        let mut ranked = conversion.parody_counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let parody: Vec<String> = ranked
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(text, _)| text)
            .collect();
        if parody.is_empty() {
            continue;
        }

        match index.get(key.original.as_str()) {
            Some(&slot) => queries[slot].1 = parody,
            None => {
                index.insert(&key.original, queries.len());
                queries.push((key.original.clone(), parody));
            }
        }
    }

    queries
}

/// Attach sequential ids and restrict positives to the wordlist.
pub fn combine(
    queries: Vec<(String, Vec<String>)>,
    wordlist: Vec<String>,
) -> PhoneticSearchDataset {
    let words: HashSet<&str> = wordlist.iter().map(String::as_str).collect();
    let queries = queries
        .into_iter()
        .enumerate()
        .map(|(query_id, (query, parody))| {
            let positive = parody
                .into_iter()
                .filter(|w| words.contains(w.as_str()) && *w != query)
                .collect();
            Query {
                query_id,
                query,
                positive,
            }
        })
        .collect();

    PhoneticSearchDataset { queries, wordlist }
}

/// Build the dataset from aligned word rows and a wordlist.
pub fn build_dataset(rows: &[AlignedMora], wordlist: Vec<String>) -> PhoneticSearchDataset {
    let conversions = count_conversions(rows);
    let queries = create_queries(&conversions);
    log::info!(
        "{} conversion keys, {} queries, {} words",
        conversions.len(),
        queries.len(),
        wordlist.len()
    );
    combine(queries, wordlist)
}
