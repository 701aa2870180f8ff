use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Malformed chain file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid chain {id}: {message}")]
    Invalid { id: u64, message: String },

    #[error("Chain id {0} appears more than once")]
    DuplicateChainId(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LiftOverError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("Chains do not match the target sequence dictionary: {0}")]
    DictionaryMismatch(String),

    #[error("Invalid liftover configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ChainResult<T> = std::result::Result<T, ChainError>;
pub type LiftOverResult<T> = std::result::Result<T, LiftOverError>;
