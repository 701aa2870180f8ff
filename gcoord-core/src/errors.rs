use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Sequence appears more than once in dictionary: {0}")]
    DuplicateSequence(String),

    #[error("Sequence not found in dictionary: {0}")]
    UnknownSequence(String),

    #[error("Sequence dictionaries differ: {0}")]
    Mismatch(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalParseError {
    #[error("Interval must look like `sequence:start-end`, got: {0}")]
    Malformed(String),

    #[error("Invalid coordinate in interval {0}")]
    InvalidCoordinate(String),
}
