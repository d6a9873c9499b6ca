//! Language-specific front end: kana pronunciations to mora tokens.

pub mod mora;
