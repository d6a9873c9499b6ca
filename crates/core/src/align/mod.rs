//! Phonetic correspondence between a reference lyric and a parody lyric.

pub mod assembler;
pub mod boundaries;
pub mod phonetic_distance;
pub mod solver;
