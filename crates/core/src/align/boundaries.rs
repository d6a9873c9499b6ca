//! Mora-level word/phrase boundary arrays and the elided-row repair pass.

use crate::error::MoraParseError;
use crate::language::mora::parse_moras;
use crate::types::{AlignedMora, AnalyzedWord, Mora, Span};

/// Boundary flags of a reference span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundaryFlags {
    pub phrase_start: bool,
    pub phrase_end: bool,
    pub word_start: bool,
    pub word_end: bool,
}

/// Original-lyric line flattened to moras, with parallel boundary arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLine {
    pub moras: Vec<Mora>,
    /// Surface of the word each mora belongs to
    pub surfaces: Vec<String>,
    pub word_starts: Vec<bool>,
    pub word_ends: Vec<bool>,
    pub phrase_starts: Vec<bool>,
    pub phrase_ends: Vec<bool>,
}

impl ReferenceLine {
    /// Build from pre-computed parallel arrays.
    ///
    /// # Panics
    ///
    /// If any array differs in length from `moras`.
    pub fn from_parts(
        moras: Vec<Mora>,
        surfaces: Vec<String>,
        word_starts: Vec<bool>,
        word_ends: Vec<bool>,
        phrase_starts: Vec<bool>,
        phrase_ends: Vec<bool>,
    ) -> Self {
        let n = moras.len();
        assert_eq!(surfaces.len(), n, "surfaces must parallel moras");
        assert_eq!(word_starts.len(), n, "word_starts must parallel moras");
        assert_eq!(word_ends.len(), n, "word_ends must parallel moras");
        assert_eq!(phrase_starts.len(), n, "phrase_starts must parallel moras");
        assert_eq!(phrase_ends.len(), n, "phrase_ends must parallel moras");
        Self {
            moras,
            surfaces,
            word_starts,
            word_ends,
            phrase_starts,
            phrase_ends,
        }
    }

    /// Flatten analyzed words into moras and mark word/phrase edges.
    ///
    /// Every word's last mora is provisionally a phrase end; a following
    /// word that does not start a phrase clears it. Words without moras
    /// contribute nothing except a pending phrase start, which moves to
    /// the next word that has moras.
    pub fn from_words(words: &[AnalyzedWord]) -> Result<Self, MoraParseError> {
        let mut line = Self::default();
        let mut pending_phrase_start = false;

        for word in words {
            let moras = parse_moras(&word.pronunciation)?;
            let phrase_start = word.is_phrase_start || pending_phrase_start;
            if moras.is_empty() {
                pending_phrase_start = phrase_start;
                continue;
            }
            pending_phrase_start = false;

            if !phrase_start {
                if let Some(last) = line.phrase_ends.last_mut() {
                    *last = false;
                }
            }

            let n = moras.len();
            for i in 0..n {
                line.surfaces.push(word.surface.clone());
                line.word_starts.push(i == 0);
                line.word_ends.push(i == n - 1);
                line.phrase_starts.push(phrase_start && i == 0);
                line.phrase_ends.push(i == n - 1);
            }
            line.moras.extend(moras);
        }

        Ok(line)
    }

    pub fn len(&self) -> usize {
        self.moras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moras.is_empty()
    }

    /// Concatenated moras under `span`.
    pub fn text(&self, span: Span) -> String {
        self.moras[span.start..span.end].concat()
    }

    /// Start flags from the span's first mora, end flags from its last.
    /// An elided span has no boundaries.
    pub fn flags(&self, span: Span) -> BoundaryFlags {
        if span.is_empty() {
            return BoundaryFlags::default();
        }
        let last = span.end - 1;
        BoundaryFlags {
            phrase_start: self.phrase_starts[span.start],
            phrase_end: self.phrase_ends[last],
            word_start: self.word_starts[span.start],
            word_end: self.word_ends[last],
        }
    }

    /// Surface of the word under the span's first mora, followed by every
    /// word that starts inside the span.
    pub fn surfaces_within(&self, span: Span) -> String {
        if span.is_empty() {
            return String::new();
        }
        let mut out = self.surfaces[span.start].clone();
        for i in span.start + 1..span.end {
            if self.word_starts[i] {
                out.push_str(&self.surfaces[i]);
            }
        }
        out
    }
}

/// Parody line flattened to moras with word-edge flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateLine {
    pub moras: Vec<Mora>,
    pub surfaces: Vec<String>,
    pub word_starts: Vec<bool>,
    pub word_ends: Vec<bool>,
}

impl CandidateLine {
    /// Build from pre-computed parallel arrays.
    ///
    /// # Panics
    ///
    /// If any array differs in length from `moras`.
    pub fn from_parts(
        moras: Vec<Mora>,
        surfaces: Vec<String>,
        word_starts: Vec<bool>,
        word_ends: Vec<bool>,
    ) -> Self {
        let n = moras.len();
        assert_eq!(surfaces.len(), n, "surfaces must parallel moras");
        assert_eq!(word_starts.len(), n, "word_starts must parallel moras");
        assert_eq!(word_ends.len(), n, "word_ends must parallel moras");
        Self {
            moras,
            surfaces,
            word_starts,
            word_ends,
        }
    }

    /// Words without moras are skipped.
    pub fn from_words(words: &[AnalyzedWord]) -> Result<Self, MoraParseError> {
        let mut line = Self::default();
        for word in words {
            let moras = parse_moras(&word.pronunciation)?;
            let n = moras.len();
            for i in 0..n {
                line.surfaces.push(word.surface.clone());
                line.word_starts.push(i == 0);
                line.word_ends.push(i == n - 1);
            }
            line.moras.extend(moras);
        }
        Ok(line)
    }
}

/// Give elided rows the boundary flags of their neighbours.
///
/// Walking backwards, an elided row takes its start flags from the next
/// row; walking forwards, it takes its end flags from the previous row.
/// Runs of elided rows inherit through each other.
pub fn repair_elided(rows: &mut [AlignedMora]) {
    for i in (0..rows.len().saturating_sub(1)).rev() {
        if rows[i].is_elided() {
            rows[i].is_original_phrase_start = rows[i + 1].is_original_phrase_start;
            rows[i].is_original_word_start = rows[i + 1].is_original_word_start;
        }
    }
    for i in 1..rows.len() {
        if rows[i].is_elided() {
            rows[i].is_original_phrase_end = rows[i - 1].is_original_phrase_end;
            rows[i].is_original_word_end = rows[i - 1].is_original_word_end;
        }
    }
}
