use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Tag identifier errors
    #[error("Empty UID")]
    EmptyUid,

    #[error("UID too long: {len} bytes (max {max})")]
    UidTooLong { len: usize, max: usize },

    #[error("Invalid tag identifier: {0}")]
    InvalidTagId(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
