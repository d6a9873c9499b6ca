//! Parse analyzed lyric blocks.
//!
//! A block is four non-empty lines per lyric line: parody surfaces, parody
//! pronunciations, original surfaces, original pronunciations. Tokens are
//! whitespace separated. An original pronunciation written `カゼ/p` marks
//! a word that starts a phrase.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};
use crate::types::AnalyzedWord;

/// Suffix tag on an original pronunciation marking a phrase start.
const PHRASE_START_TAG: &str = "p";

/// Parallel parody/original lines, already split into words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedLyrics {
    pub parody: Vec<Vec<AnalyzedWord>>,
    pub original: Vec<Vec<AnalyzedWord>>,
}

impl AnalyzedLyrics {
    pub fn new(parody: Vec<Vec<AnalyzedWord>>, original: Vec<Vec<AnalyzedWord>>) -> Result<Self> {
        if parody.len() != original.len() {
            return Err(AlignError::lyrics(format!(
                "{} parody lines but {} original lines",
                parody.len(),
                original.len()
            )));
        }
        Ok(Self { parody, original })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() % 4 != 0 {
            return Err(AlignError::lyrics(format!(
                "expected groups of 4 lines, got {} lines",
                lines.len()
            )));
        }

        let mut parody = Vec::with_capacity(lines.len() / 4);
        let mut original = Vec::with_capacity(lines.len() / 4);
        for (block, group) in lines.chunks(4).enumerate() {
            parody.push(parse_parody_line(group[0], group[1], block)?);
            original.push(parse_original_line(group[2], group[3], block)?);
        }

        Self::new(parody, original)
    }

    /// Number of aligned line pairs.
    pub fn len(&self) -> usize {
        self.parody.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parody.is_empty()
    }

    /// `(parody, original)` word lists, line by line.
    pub fn lines(&self) -> impl Iterator<Item = (&[AnalyzedWord], &[AnalyzedWord])> {
        self.parody
            .iter()
            .zip(&self.original)
            .map(|(p, o)| (p.as_slice(), o.as_slice()))
    }
}

fn paired_tokens<'a>(
    surfaces: &'a str,
    pronunciations: &'a str,
    block: usize,
    side: &str,
) -> Result<Vec<(&'a str, &'a str)>> {
    let surfaces: Vec<&str> = surfaces.split_whitespace().collect();
    let pronunciations: Vec<&str> = pronunciations.split_whitespace().collect();
    if surfaces.len() != pronunciations.len() {
        return Err(AlignError::lyrics(format!(
            "line {}: {} {} surfaces but {} pronunciations",
            block,
            side,
            surfaces.len(),
            pronunciations.len()
        )));
    }
    Ok(surfaces.into_iter().zip(pronunciations).collect())
}

fn parse_parody_line(
    surfaces: &str,
    pronunciations: &str,
    block: usize,
) -> Result<Vec<AnalyzedWord>> {
    Ok(paired_tokens(surfaces, pronunciations, block, "parody")?
        .into_iter()
        .map(|(surface, pronunciation)| AnalyzedWord::new(surface, pronunciation, false))
        .collect())
}

fn parse_original_line(
    surfaces: &str,
    pronunciations: &str,
    block: usize,
) -> Result<Vec<AnalyzedWord>> {
    Ok(paired_tokens(surfaces, pronunciations, block, "original")?
        .into_iter()
        .map(|(surface, token)| {
            let mut parts = token.split('/');
            let pronunciation = parts.next().unwrap_or_default();
            let is_phrase_start = parts.next() == Some(PHRASE_START_TAG);
            AnalyzedWord::new(surface, pronunciation, is_phrase_start)
        })
        .collect())
}
