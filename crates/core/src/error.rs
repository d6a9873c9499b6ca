//! Error types shared across the alignment library.

use thiserror::Error;

/// Result alias defaulting to [`AlignError`].
pub type Result<T, E = AlignError> = std::result::Result<T, E>;

/// A pronunciation string could not be segmented into moras.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot segment {text:?} into moras: unexpected {found:?} at char {position}")]
pub struct MoraParseError {
    /// The pronunciation as given
    pub text: String,
    /// The offending character
    pub found: char,
    /// Char index of `found` within `text`
    pub position: usize,
}

#[derive(Debug, Error)]
pub enum AlignError {
    #[error(transparent)]
    MoraParse(#[from] MoraParseError),
    #[error("invalid lyrics block: {message}")]
    Lyrics { message: String },
    #[error("invalid config: {message}")]
    Config { message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("CSV error while {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
}

impl AlignError {
    pub(crate) fn lyrics(message: impl Into<String>) -> Self {
        Self::Lyrics {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn csv(context: &'static str, source: csv::Error) -> Self {
        Self::Csv { context, source }
    }
}
