//! Turn solver spans into boundary-annotated alignment rows.
//!
//! Mora granularity submits every parody mora as its own segment; word
//! granularity submits each parody word whole. The original side is
//! always flattened to moras.

use std::fmt;
use std::str::FromStr;

use crate::align::boundaries::{repair_elided, CandidateLine, ReferenceLine};
use crate::align::phonetic_distance::{split_consonant_vowel, PhoneticDistance};
use crate::align::solver::solve;
use crate::config::AlignConfig;
use crate::error::{AlignError, MoraParseError, Result};
use crate::language::mora::parse_moras;
use crate::lyrics::AnalyzedLyrics;
use crate::types::{AlignedMora, AnalyzedWord, Mora};

/// Unit submitted to the solver for the parody side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Mora,
    Word,
}

impl FromStr for Granularity {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mora" => Ok(Self::Mora),
            "word" => Ok(Self::Word),
            other => Err(AlignError::config(format!(
                "unknown granularity {:?} (expected \"mora\" or \"word\")",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mora => "mora",
            Self::Word => "word",
        })
    }
}

/// Rows for one lyric line and the solver's total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAlignment {
    pub cost: f64,
    pub rows: Vec<AlignedMora>,
}

/// Aligns parody lines against original lines.
#[derive(Debug, Clone)]
pub struct LineAligner {
    metric: PhoneticDistance,
    window: usize,
}

impl Default for LineAligner {
    fn default() -> Self {
        Self::new(&AlignConfig::default())
    }
}

impl LineAligner {
    pub fn new(config: &AlignConfig) -> Self {
        Self {
            metric: PhoneticDistance::new(config.distance.clone()),
            window: config.solver.window,
        }
    }

    /// One row per parody mora.
    pub fn align_moras(
        &self,
        parody: &[AnalyzedWord],
        original: &[AnalyzedWord],
    ) -> Result<LineAlignment, MoraParseError> {
        let candidate = CandidateLine::from_words(parody)?;
        let reference = ReferenceLine::from_words(original)?;
        self.align_candidate(&candidate, &reference)
    }

    /// Align a flattened parody line mora by mora against `reference`.
    ///
    /// Rows carry consonant/vowel fields: the parody side from its own
    /// mora, the original side from the first mora of its span.
    pub fn align_candidate(
        &self,
        candidate: &CandidateLine,
        reference: &ReferenceLine,
    ) -> Result<LineAlignment, MoraParseError> {
        let segments: Vec<&[Mora]> = candidate.moras.iter().map(std::slice::from_ref).collect();
        let result = solve(&reference.moras, &segments, self.window, |a, b| {
            self.metric.distance(a, b)
        })?;

        let mut rows = Vec::with_capacity(result.spans.len());
        for (i, &span) in result.spans.iter().enumerate() {
            let parody_mora = candidate.moras[i].clone();
            let original_mora = reference.text(span);
            let flags = reference.flags(span);

            let parody_word_surface = if candidate.word_starts[i] && !parody_mora.is_empty() {
                candidate.surfaces[i].clone()
            } else {
                String::new()
            };
            let original_word_surface = if flags.word_start && !original_mora.is_empty() {
                reference.surfaces[span.start].clone()
            } else {
                String::new()
            };

            let (parody_consonant, parody_vowel) = split_consonant_vowel(&parody_mora)?;
            let first_original = if span.is_empty() {
                ""
            } else {
                reference.moras[span.start].as_str()
            };
            let (original_consonant, original_vowel) = split_consonant_vowel(first_original)?;

            rows.push(AlignedMora {
                parody_mora,
                is_parody_word_start: candidate.word_starts[i],
                is_parody_word_end: candidate.word_ends[i],
                original_mora,
                is_original_phrase_start: flags.phrase_start,
                is_original_phrase_end: flags.phrase_end,
                is_original_word_start: flags.word_start,
                is_original_word_end: flags.word_end,
                parody_word_surface,
                original_word_surface,
                parody_consonant,
                parody_vowel,
                original_consonant,
                original_vowel,
                ..Default::default()
            });
        }

        repair_elided(&mut rows);
        Ok(LineAlignment {
            cost: result.cost,
            rows,
        })
    }

    /// One row per parody word. Words without moras become elided rows.
    pub fn align_words(
        &self,
        parody: &[AnalyzedWord],
        original: &[AnalyzedWord],
    ) -> Result<LineAlignment, MoraParseError> {
        let segments = parody
            .iter()
            .map(|w| parse_moras(&w.pronunciation))
            .collect::<Result<Vec<_>, _>>()?;
        let surfaces: Vec<String> = parody.iter().map(|w| w.surface.clone()).collect();
        let reference = ReferenceLine::from_words(original)?;
        self.align_segments(&segments, &surfaces, &reference)
    }

    /// Align whole-word segments against `reference`, one row per segment.
    ///
    /// # Panics
    ///
    /// If `surfaces` differs in length from `segments`.
    pub fn align_segments(
        &self,
        segments: &[Vec<Mora>],
        surfaces: &[String],
        reference: &ReferenceLine,
    ) -> Result<LineAlignment, MoraParseError> {
        assert_eq!(surfaces.len(), segments.len(), "surfaces must parallel segments");

        let result = solve(&reference.moras, segments, self.window, |a, b| {
            self.metric.distance(a, b)
        })?;

        let mut rows: Vec<AlignedMora> = result
            .spans
            .iter()
            .zip(segments.iter().zip(surfaces))
            .map(|(&span, (moras, surface))| {
                let flags = reference.flags(span);
                AlignedMora {
                    parody_mora: moras.concat(),
                    is_parody_word_start: true,
                    is_parody_word_end: true,
                    original_mora: reference.text(span),
                    is_original_phrase_start: flags.phrase_start,
                    is_original_phrase_end: flags.phrase_end,
                    is_original_word_start: flags.word_start,
                    is_original_word_end: flags.word_end,
                    parody_word_surface: surface.clone(),
                    original_word_surface: reference.surfaces_within(span),
                    ..Default::default()
                }
            })
            .collect();

        repair_elided(&mut rows);
        Ok(LineAlignment {
            cost: result.cost,
            rows,
        })
    }

    pub fn align_line(
        &self,
        parody: &[AnalyzedWord],
        original: &[AnalyzedWord],
        granularity: Granularity,
    ) -> Result<LineAlignment, MoraParseError> {
        match granularity {
            Granularity::Mora => self.align_moras(parody, original),
            Granularity::Word => self.align_words(parody, original),
        }
    }

    /// Align every line of `lyrics`, tagging rows with their line index.
    ///
    /// Any failing line aborts the whole block.
    pub fn align_lyrics(
        &self,
        lyrics: &AnalyzedLyrics,
        granularity: Granularity,
    ) -> Result<Vec<AlignedMora>> {
        let mut all_rows = Vec::new();
        for (line_id, (parody, original)) in lyrics.lines().enumerate() {
            let LineAlignment { cost, mut rows } = self.align_line(parody, original, granularity)?;
            log::debug!(
                "line {}: {} {} rows, cost {:.2}",
                line_id,
                rows.len(),
                granularity,
                cost
            );

            for row in &mut rows {
                row.line_id = line_id.to_string();
            }
            all_rows.extend(rows);
        }
        Ok(all_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KURUUN: &str = "
    阿部 クルーン 伊勢 工藤 中野
    アベ クルーン イセ クドウ ナカノ
    荒れ 狂う 季節 の 中 を
    アレ/p クルウ/p キセツ/p ノ ナカ/p オ";

    const DONDON: &str = "
    丼丼 藤
    ドンドン ト
    外 夜
    ソト/p ヨ/p";

    fn align(text: &str, granularity: Granularity) -> Vec<AlignedMora> {
        let lyrics = AnalyzedLyrics::from_text(text).unwrap();
        LineAligner::default().align_lyrics(&lyrics, granularity).unwrap()
    }

    /// (parody, original, [p_cons, p_vowel, o_cons, o_vowel],
    ///  [p_ws, p_we, o_ps, o_pe, o_ws, o_we], parody surface, original surface)
    type Expected = (
        &'static str,
        &'static str,
        [&'static str; 4],
        [bool; 6],
        &'static str,
        &'static str,
    );

    fn expected_row(e: &Expected) -> AlignedMora {
        let (parody, original, [pc, pv, oc, ov], f, ps, os) = *e;
        AlignedMora {
            parody_mora: parody.into(),
            is_parody_word_start: f[0],
            is_parody_word_end: f[1],
            original_mora: original.into(),
            is_original_phrase_start: f[2],
            is_original_phrase_end: f[3],
            is_original_word_start: f[4],
            is_original_word_end: f[5],
            parody_word_surface: ps.into(),
            original_word_surface: os.into(),
            parody_consonant: pc.into(),
            parody_vowel: pv.into(),
            original_consonant: oc.into(),
            original_vowel: ov.into(),
            line_id: "0".into(),
            input_file_path: None,
        }
    }

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn test_align_moras_full_line() {
        let expected: [Expected; 14] = [
            ("ア", "ア", ["", "a", "", "a"], [T, F, T, F, T, F], "阿部", "荒れ"),
            ("ベ", "レ", ["b", "e", "r", "e"], [F, T, F, T, F, T], "", ""),
            ("ク", "ク", ["k", "u", "k", "u"], [T, F, T, F, T, F], "クルーン", "狂う"),
            ("ル", "ル", ["r", "u", "r", "u"], [F, F, F, F, F, F], "", ""),
            ("ー", "", ["", ":", "", ""], [F, F, F, F, F, F], "", ""),
            ("ン", "ウ", ["", "N", "", "u"], [F, T, F, T, F, T], "", ""),
            ("イ", "キ", ["", "i", "kj", "i"], [T, F, T, F, T, F], "伊勢", "季節"),
            ("セ", "セ", ["s", "e", "s", "e"], [F, T, F, F, F, F], "", ""),
            ("ク", "ツ", ["k", "u", "ts", "u"], [T, F, F, F, F, T], "工藤", ""),
            ("ド", "ノ", ["d", "o", "n", "o"], [F, F, F, T, T, T], "", "の"),
            ("ウ", "", ["", "u", "", ""], [F, T, T, T, T, T], "", ""),
            ("ナ", "ナ", ["n", "a", "n", "a"], [T, F, T, F, T, F], "中野", "中"),
            ("カ", "カ", ["k", "a", "k", "a"], [F, F, F, F, F, T], "", ""),
            ("ノ", "オ", ["n", "o", "", "o"], [F, T, F, T, T, T], "", "を"),
        ];

        let rows = align(KURUUN, Granularity::Mora);
        assert_eq!(rows.len(), expected.len());
        for (i, (row, e)) in rows.iter().zip(&expected).enumerate() {
            assert_eq!(row, &expected_row(e), "row {}", i);
        }
    }

    #[test]
    fn test_align_moras_repairs_elisions() {
        let rows = align(DONDON, Granularity::Mora);
        let summary: Vec<(&str, &str, [bool; 4])> = rows
            .iter()
            .map(|r| {
                (
                    r.parody_mora.as_str(),
                    r.original_mora.as_str(),
                    [
                        r.is_original_phrase_start,
                        r.is_original_phrase_end,
                        r.is_original_word_start,
                        r.is_original_word_end,
                    ],
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("ド", "ソ", [T, F, T, F]),
                ("ン", "", [F, F, F, F]),
                ("ド", "ト", [F, T, F, T]),
                ("ン", "", [T, T, T, T]),
                ("ト", "ヨ", [T, T, T, T]),
            ]
        );
    }

    #[test]
    fn test_align_words() {
        let rows = align(KURUUN, Granularity::Word);
        let summary: Vec<(&str, &str, [bool; 4], &str, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r.parody_mora.as_str(),
                    r.original_mora.as_str(),
                    [
                        r.is_original_phrase_start,
                        r.is_original_phrase_end,
                        r.is_original_word_start,
                        r.is_original_word_end,
                    ],
                    r.parody_word_surface.as_str(),
                    r.original_word_surface.as_str(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("アベ", "アレ", [T, T, T, T], "阿部", "荒れ"),
                ("クルーン", "クルウ", [T, T, T, T], "クルーン", "狂う"),
                ("イセ", "キセ", [T, F, T, F], "伊勢", "季節"),
                ("クドウ", "ツノ", [F, T, F, T], "工藤", "季節の"),
                ("ナカノ", "ナカオ", [T, T, T, T], "中野", "中を"),
            ]
        );
        for row in &rows {
            assert!(row.is_parody_word_start);
            assert!(row.is_parody_word_end);
            assert_eq!(row.line_id, "0");
            assert!(row.parody_vowel.is_empty());
            assert!(row.original_consonant.is_empty());
        }
    }

    #[test]
    fn test_align_words_keeps_empty_word() {
        let parody = vec![
            AnalyzedWord::new("風", "カゼ", false),
            AnalyzedWord::new("、", "", false),
            AnalyzedWord::new("野", "ノ", false),
        ];
        let original = vec![
            AnalyzedWord::new("風", "カゼ", true),
            AnalyzedWord::new("の", "ノ", false),
        ];
        let line = LineAligner::default().align_words(&parody, &original).unwrap();
        assert_eq!(line.cost, 0.0);
        assert_eq!(line.rows.len(), 3);
        assert!(line.rows[1].is_elided());
        assert_eq!(line.rows[1].parody_word_surface, "、");
        // Start flags come from the ノ row, end flags from the カゼ row
        let elided = &line.rows[1];
        assert!(elided.is_original_word_start);
        assert!(!elided.is_original_phrase_start);
        assert!(elided.is_original_word_end);
        assert!(!elided.is_original_phrase_end);
    }

    #[test]
    fn test_line_ids_and_cost() {
        let text = format!("{}\n{}", KURUUN, DONDON);
        let lyrics = AnalyzedLyrics::from_text(&text).unwrap();
        let aligner = LineAligner::default();
        let rows = aligner.align_lyrics(&lyrics, Granularity::Mora).unwrap();
        assert_eq!(rows.len(), 14 + 5);
        assert!(rows[..14].iter().all(|r| r.line_id == "0"));
        assert!(rows[14..].iter().all(|r| r.line_id == "1"));

        let line = aligner.align_moras(&lyrics.parody[1], &lyrics.original[1]).unwrap();
        assert!(line.cost > 0.0);
    }

    #[test]
    fn test_identical_line_costs_nothing() {
        let words = vec![
            AnalyzedWord::new("風", "カゼ", true),
            AnalyzedWord::new("の", "ノ", false),
        ];
        let aligner = LineAligner::default();
        for granularity in [Granularity::Mora, Granularity::Word] {
            let line = aligner.align_line(&words, &words, granularity).unwrap();
            assert_eq!(line.cost, 0.0);
            assert!(line.rows.iter().all(|r| r.parody_mora == r.original_mora));
        }
    }

    #[test]
    fn test_align_candidate_from_parts() {
        let reference = ReferenceLine::from_parts(
            vec!["ソ".into(), "ト".into(), "ヨ".into()],
            vec!["外".into(), "外".into(), "夜".into()],
            vec![true, false, true],
            vec![false, true, true],
            vec![true, false, true],
            vec![false, true, true],
        );
        let candidate = CandidateLine::from_parts(
            vec!["ソ".into(), "ト".into()],
            vec!["外".into(), "外".into()],
            vec![true, false],
            vec![false, true],
        );

        let line = LineAligner::default().align_candidate(&candidate, &reference).unwrap();
        assert_eq!(line.rows.len(), 2);
        assert_eq!(line.rows[0].original_mora, "ソ");
        assert_eq!(line.rows[1].original_mora, "トヨ");
        assert!(line.rows[1].is_original_phrase_end);
        assert_eq!(line.rows[0].parody_word_surface, "外");
        assert_eq!(line.rows[1].original_consonant, "t");
        assert_eq!(line.rows[1].original_vowel, "o");
    }

    #[test]
    fn test_align_segments_from_parts() {
        let reference = ReferenceLine::from_words(&[
            AnalyzedWord::new("風", "カゼ", true),
            AnalyzedWord::new("の", "ノ", false),
        ])
        .unwrap();
        let segments = vec![vec!["カ".to_string(), "ゼ".to_string()], vec![], vec!["ノ".to_string()]];
        let surfaces = vec!["風".to_string(), "、".to_string(), "野".to_string()];

        let line = LineAligner::default()
            .align_segments(&segments, &surfaces, &reference)
            .unwrap();
        assert_eq!(line.cost, 0.0);
        assert_eq!(line.rows[0].original_mora, "カゼ");
        assert!(line.rows[1].is_elided());
        assert_eq!(line.rows[2].parody_word_surface, "野");
    }

    #[test]
    #[should_panic(expected = "surfaces must parallel segments")]
    fn test_align_segments_length_mismatch() {
        let reference = ReferenceLine::default();
        let segments = vec![vec!["カ".to_string()]];
        let _ = LineAligner::default().align_segments(&segments, &[], &reference);
    }

    #[test]
    fn test_phonemes_come_from_first_original_mora() {
        // ウ and ィ are separate words; their joined text would read as ウィ
        let parody = vec![AnalyzedWord::new("鵜", "ウ", false)];
        let original = vec![
            AnalyzedWord::new("鵜", "ウ", true),
            AnalyzedWord::new("ぃ", "ィ", false),
        ];
        let line = LineAligner::default().align_moras(&parody, &original).unwrap();
        assert_eq!(line.rows.len(), 1);
        let row = &line.rows[0];
        assert_eq!(row.original_mora, "ウィ");
        assert_eq!(row.original_consonant, "");
        assert_eq!(row.original_vowel, "u");
    }

    #[test]
    fn test_parse_error_aborts_block() {
        let text = "阿部\nアベ\n荒れ\nアレ/p\n阿部\nア漢\n荒れ\nアレ/p";
        let lyrics = AnalyzedLyrics::from_text(text).unwrap();
        let err = LineAligner::default()
            .align_lyrics(&lyrics, Granularity::Mora)
            .unwrap_err();
        assert!(matches!(err, AlignError::MoraParse(_)));
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("mora".parse::<Granularity>().unwrap(), Granularity::Mora);
        assert_eq!("word".parse::<Granularity>().unwrap(), Granularity::Word);
        assert!(matches!(
            "phrase".parse::<Granularity>(),
            Err(AlignError::Config { .. })
        ));
        assert_eq!(Granularity::Word.to_string(), "word");
    }
}
