//! Mora-level alignment of parody lyrics (soramimi) against their originals.
//!
//! The solver in [`align::solver`] assigns each parody segment a contiguous
//! span of the original mora sequence; [`align::assembler`] turns those
//! spans into [`types::AlignedMora`] rows carrying word and phrase
//! boundaries from both sides.

pub mod align;
pub mod config;
pub mod dataset;
pub mod error;
pub mod language;
pub mod lyrics;
pub mod pipeline;
pub mod types;

pub use align::assembler::{Granularity, LineAligner, LineAlignment};
pub use align::solver::solve;
pub use config::AlignConfig;
pub use error::{AlignError, MoraParseError};
pub use types::{AlignedMora, AnalyzedWord, Correspondence, Span};
