//! Kana mora segmentation and simple-IPA transcription.
//!
//! Splits a katakana (or hiragana) pronunciation into moras and renders
//! each mora as a compact IPA-like string whose last character is the
//! vowel, or one of the special-mora symbols `N` (ン), `Q` (ッ) and `:` (ー).

use std::collections::HashMap;

use wana_kana::{ConvertJapanese, Options};

use crate::error::MoraParseError;

lazy_static::lazy_static! {
    /// Simple-IPA rendering for every mora the parser accepts.
    ///
    /// Palatalized onsets carry a trailing `j` (キ → kji, キャ → kja).
    static ref MORA_IPA: HashMap<&'static str, &'static str> = {
        let table: &[(&str, &str)] = &[
            // Vowels
            ("ア", "a"), ("イ", "i"), ("ウ", "u"), ("エ", "e"), ("オ", "o"),
            ("ァ", "a"), ("ィ", "i"), ("ゥ", "u"), ("ェ", "e"), ("ォ", "o"),
            // K / G
            ("カ", "ka"), ("キ", "kji"), ("ク", "ku"), ("ケ", "ke"), ("コ", "ko"),
            ("ヵ", "ka"), ("ヶ", "ke"),
            ("キャ", "kja"), ("キュ", "kju"), ("キョ", "kjo"), ("キェ", "kje"),
            ("クァ", "kwa"), ("クィ", "kwi"), ("クェ", "kwe"), ("クォ", "kwo"),
            ("ガ", "ga"), ("ギ", "gji"), ("グ", "gu"), ("ゲ", "ge"), ("ゴ", "go"),
            ("ギャ", "gja"), ("ギュ", "gju"), ("ギョ", "gjo"), ("ギェ", "gje"),
            ("グァ", "gwa"),
            // S / Z
            ("サ", "sa"), ("シ", "ɕi"), ("ス", "su"), ("セ", "se"), ("ソ", "so"),
            ("シャ", "ɕa"), ("シュ", "ɕu"), ("シェ", "ɕe"), ("ショ", "ɕo"),
            ("スィ", "si"),
            ("ザ", "za"), ("ジ", "dʑi"), ("ズ", "zu"), ("ゼ", "ze"), ("ゾ", "zo"),
            ("ジャ", "dʑa"), ("ジュ", "dʑu"), ("ジェ", "dʑe"), ("ジョ", "dʑo"),
            ("ズィ", "zi"),
            // T / D
            ("タ", "ta"), ("チ", "tɕi"), ("ツ", "tsu"), ("テ", "te"), ("ト", "to"),
            ("チャ", "tɕa"), ("チュ", "tɕu"), ("チェ", "tɕe"), ("チョ", "tɕo"),
            ("ツァ", "tsa"), ("ツィ", "tsi"), ("ツェ", "tse"), ("ツォ", "tso"),
            ("ティ", "ti"), ("トゥ", "tu"), ("テュ", "tju"),
            ("ダ", "da"), ("ヂ", "dʑi"), ("ヅ", "zu"), ("デ", "de"), ("ド", "do"),
            ("ヂャ", "dʑa"), ("ヂュ", "dʑu"), ("ヂョ", "dʑo"),
            ("ディ", "di"), ("ドゥ", "du"), ("デュ", "dju"),
            // N
            ("ナ", "na"), ("ニ", "nji"), ("ヌ", "nu"), ("ネ", "ne"), ("ノ", "no"),
            ("ニャ", "nja"), ("ニュ", "nju"), ("ニョ", "njo"), ("ニェ", "nje"),
            // H / B / P
            ("ハ", "ha"), ("ヒ", "çi"), ("フ", "ɸu"), ("ヘ", "he"), ("ホ", "ho"),
            ("ヒャ", "ça"), ("ヒュ", "çu"), ("ヒョ", "ço"), ("ヒェ", "çe"),
            ("ファ", "ɸa"), ("フィ", "ɸi"), ("フェ", "ɸe"), ("フォ", "ɸo"), ("フュ", "ɸju"),
            ("バ", "ba"), ("ビ", "bji"), ("ブ", "bu"), ("ベ", "be"), ("ボ", "bo"),
            ("ビャ", "bja"), ("ビュ", "bju"), ("ビョ", "bjo"),
            ("パ", "pa"), ("ピ", "pji"), ("プ", "pu"), ("ペ", "pe"), ("ポ", "po"),
            ("ピャ", "pja"), ("ピュ", "pju"), ("ピョ", "pjo"),
            // M
            ("マ", "ma"), ("ミ", "mji"), ("ム", "mu"), ("メ", "me"), ("モ", "mo"),
            ("ミャ", "mja"), ("ミュ", "mju"), ("ミョ", "mjo"),
            // Y
            ("ヤ", "ja"), ("ユ", "ju"), ("ヨ", "jo"),
            ("ャ", "ja"), ("ュ", "ju"), ("ョ", "jo"),
            ("イェ", "je"),
            // R
            ("ラ", "ra"), ("リ", "rji"), ("ル", "ru"), ("レ", "re"), ("ロ", "ro"),
            ("リャ", "rja"), ("リュ", "rju"), ("リョ", "rjo"),
            // W
            ("ワ", "wa"), ("ヰ", "i"), ("ヱ", "e"), ("ヲ", "o"), ("ヮ", "wa"),
            ("ウィ", "wi"), ("ウェ", "we"), ("ウォ", "wo"),
            // V
            ("ヴ", "vu"), ("ヴァ", "va"), ("ヴィ", "vi"), ("ヴェ", "ve"), ("ヴォ", "vo"),
            ("ヴュ", "vju"),
            // Special moras
            ("ン", "N"), ("ッ", "Q"), ("ー", ":"),
        ];
        table.iter().copied().collect()
    };
}

/// Small kana that may fuse with the preceding kana into one mora.
const COMBINING_SMALL: &[char] = &['ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ヮ'];

/// Characters dropped before segmentation.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '・'
}

/// Split a pronunciation string into moras.
///
/// Hiragana is folded to katakana first; romaji and other characters
/// pass through and are rejected. A base kana followed by a small kana
/// forms one mora when the pair is a known sound; otherwise each is its
/// own mora. ン, ッ and ー always stand alone.
pub fn parse_moras(text: &str) -> Result<Vec<String>, MoraParseError> {
    let katakana = text.to_katakana_with_opt(Options {
        pass_romaji: true,
        ..Default::default()
    });
    let chars: Vec<char> = katakana.chars().collect();

    let mut moras = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_separator(c) {
            i += 1;
            continue;
        }

        if let Some(&next) = chars.get(i + 1) {
            if COMBINING_SMALL.contains(&next) {
                let pair: String = [c, next].iter().collect();
                if MORA_IPA.contains_key(pair.as_str()) {
                    moras.push(pair);
                    i += 2;
                    continue;
                }
            }
        }

        let single = c.to_string();
        if !MORA_IPA.contains_key(single.as_str()) {
            return Err(MoraParseError {
                text: text.to_string(),
                found: c,
                position: i,
            });
        }
        moras.push(single);
        i += 1;
    }

    Ok(moras)
}

/// Simple-IPA rendering of the first mora in `text`.
///
/// Returns an empty string when `text` holds no moras at all.
pub fn mora_to_ipa(text: &str) -> Result<String, MoraParseError> {
    let moras = parse_moras(text)?;
    Ok(moras
        .first()
        .and_then(|m| MORA_IPA.get(m.as_str()))
        .map(|ipa| ipa.to_string())
        .unwrap_or_default())
}
