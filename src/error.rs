use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Hash mismatch at block {index}")]
    HashMismatch { index: usize },

    #[error("Broken link at block {index}: previous hash does not match its predecessor")]
    BrokenLink { index: usize },

    #[error("Invalid genesis block: previous hash must be empty")]
    InvalidGenesis,

    #[error("Empty chain — at least a genesis block is required")]
    EmptyChain,
}

pub type Result<T> = std::result::Result<T, ChainError>;
