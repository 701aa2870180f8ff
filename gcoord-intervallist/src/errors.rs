use thiserror::Error;

use gcoord_core::errors::DictionaryError;

#[derive(Error, Debug)]
pub enum IntervalListError {
    #[error("Malformed interval list at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("At least one interval list is required")]
    NoInput,

    #[error("Cannot merge an empty run of intervals")]
    EmptyMerge,

    #[error("Cannot merge intervals on different sequences: {0}")]
    MixedSequences(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type IntervalListResult<T> = std::result::Result<T, IntervalListError>;
