use thiserror::Error;

#[derive(Error, Debug)]
pub enum MathError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Mode '{mode}' has an empty tier table")]
    EmptyTierTable { mode: String },

    #[error("Mode '{mode}' tier {index}: {reason}")]
    InvalidTier { mode: String, index: usize, reason: String },

    #[error("Mode '{name}' not found")]
    ModeNotFound { name: String },

    #[error("Mode '{mode}' produced {zeros} zero-payout entries but forbids zero")]
    DomainViolation { mode: String, zeros: usize },

    #[error("Malformed record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported index version: expected {expected}, got {actual}")]
    IndexVersion { expected: u32, actual: u32 },
}

pub type MathResult<T> = Result<T, MathError>;
