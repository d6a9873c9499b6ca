//! Consonant/vowel decomposition and mora-sequence distance.

use crate::config::DistanceConfig;
use crate::error::MoraParseError;
use crate::language::mora::mora_to_ipa;

/// Split a mora into `(consonant, vowel)`.
///
/// The last character of the mora's IPA form is the vowel (or `N`, `Q`,
/// `:` for special moras); everything before it is the consonant, empty
/// for onsetless moras. Multi-mora input uses its first mora.
pub fn split_consonant_vowel(mora: &str) -> Result<(String, String), MoraParseError> {
    if mora.is_empty() {
        return Ok((String::new(), String::new()));
    }

    let ipa = mora_to_ipa(mora)?;
    let mut chars: Vec<char> = ipa.chars().collect();
    let vowel = chars.pop().map(String::from).unwrap_or_default();
    Ok((chars.into_iter().collect(), vowel))
}

/// Levenshtein distance over arbitrary symbol sequences.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, x) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(x != y);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Vowel/consonant edit-distance metric between mora sequences.
#[derive(Debug, Clone, Default)]
pub struct PhoneticDistance {
    config: DistanceConfig,
}

impl PhoneticDistance {
    pub fn new(config: DistanceConfig) -> Self {
        Self { config }
    }

    /// Weighted sum of the vowel and consonant edit distances.
    ///
    /// Symmetric in its arguments; zero for two empty sequences.
    pub fn distance<S: AsRef<str>>(&self, a: &[S], b: &[S]) -> Result<f64, MoraParseError> {
        let (consonants_a, vowels_a) = decompose(a)?;
        let (consonants_b, vowels_b) = decompose(b)?;

        let vowel = edit_distance(&vowels_a, &vowels_b) as f64;
        let consonant = edit_distance(&consonants_a, &consonants_b) as f64;
        let mut cost = self.config.vowel_weight * vowel + self.config.consonant_weight * consonant;

        let identical =
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.as_ref() == y.as_ref());
        if !a.is_empty() && identical {
            cost -= self.config.exact_match_bonus;
        }
        Ok(cost)
    }
}

/// Parallel consonant and vowel sequences for a mora sequence.
fn decompose<S: AsRef<str>>(moras: &[S]) -> Result<(Vec<String>, Vec<String>), MoraParseError> {
    let mut consonants = Vec::with_capacity(moras.len());
    let mut vowels = Vec::with_capacity(moras.len());
    for mora in moras {
        let (c, v) = split_consonant_vowel(mora.as_ref())?;
        consonants.push(c);
        vowels.push(v);
    }
    Ok((consonants, vowels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(m: &str) -> (String, String) {
        split_consonant_vowel(m).unwrap()
    }

    fn dist(a: &[&str], b: &[&str]) -> f64 {
        PhoneticDistance::default().distance(a, b).unwrap()
    }

    #[test]
    fn test_split_consonant_vowel() {
        assert_eq!(split(""), ("".into(), "".into()));
        assert_eq!(split("あ"), ("".into(), "a".into()));
        assert_eq!(split("ア"), ("".into(), "a".into()));
        assert_eq!(split("ー"), ("".into(), ":".into()));
        assert_eq!(split("あー"), ("".into(), "a".into()));
        assert_eq!(split("ッ"), ("".into(), "Q".into()));
        assert_eq!(split("ン"), ("".into(), "N".into()));
    }

    #[test]
    fn test_split_multi_char_consonant() {
        assert_eq!(split("キ"), ("kj".into(), "i".into()));
        assert_eq!(split("ツ"), ("ts".into(), "u".into()));
        assert_eq!(split("チャ"), ("tɕ".into(), "a".into()));
    }

    #[test]
    fn test_split_propagates_parse_error() {
        assert!(split_consonant_vowel("漢").is_err());
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance::<char>(&[], &[]), 0);
        assert_eq!(edit_distance(&['a', 'b'], &[]), 2);
        assert_eq!(edit_distance(&[], &['a']), 1);
        assert_eq!(edit_distance(&['k', 'i', 't'], &['s', 'i', 't']), 1);
        let kitten: Vec<char> = "kitten".chars().collect();
        let sitting: Vec<char> = "sitting".chars().collect();
        assert_eq!(edit_distance(&kitten, &sitting), 3);
    }

    #[test]
    fn test_distance_plain() {
        assert_eq!(dist(&["あ"], &["あ"]), 0.0);
        assert_eq!(dist(&["あ"], &["い"]), 1.0);
        assert_eq!(dist(&["あ"], &["か"]), 1.0);
        assert_eq!(dist(&["あ"], &[""]), 1.0);
        assert_eq!(dist(&["か"], &[""]), 2.0);
        assert_eq!(dist(&["あ"], &["き"]), 2.0);
    }

    #[test]
    fn test_distance_empty() {
        assert_eq!(dist(&[], &[]), 0.0);
        let one = dist(&["カ"], &[]);
        let two = dist(&["カ", "ナ"], &[]);
        assert!(one > 0.0);
        assert!(two > one);
        assert_eq!(dist(&[], &["カ", "ナ"]), two);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = ["ク", "ド", "ウ"];
        let b = ["カ", "ト"];
        assert_eq!(dist(&a, &b), dist(&b, &a));
    }

    #[test]
    fn test_distance_weights() {
        let metric = PhoneticDistance::new(DistanceConfig {
            vowel_weight: 2.0,
            consonant_weight: 0.5,
            exact_match_bonus: 0.0,
        });
        // き vs あ: one vowel substitution, one consonant substitution
        let d = metric.distance(&["き"], &["あ"]).unwrap();
        assert!((d - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_distance_exact_match_bonus() {
        let metric = PhoneticDistance::new(DistanceConfig::biased());
        let exact = metric.distance(&["カ", "ナ"], &["カ", "ナ"]).unwrap();
        assert!((exact + 0.01).abs() < 1e-9);
        // Hiragana spelling is phonetically identical but not the same token
        let same_sound = metric.distance(&["カ", "ナ"], &["か", "な"]).unwrap();
        assert_eq!(same_sound, 0.0);
        assert!(exact < same_sound);
        // No bonus for two empty sequences
        assert_eq!(metric.distance::<&str>(&[], &[]).unwrap(), 0.0);
    }
}
