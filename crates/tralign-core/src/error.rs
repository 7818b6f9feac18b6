use std::path::PathBuf;
use thiserror::Error;

/// Error kinds shared across the tralign crates.
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Input file extension outside the accepted set
    #[error("extension '{extension}' is not supported: input must be .fasta, .fa, .faa, or .tfa")]
    UnsupportedExtension { extension: String },

    /// Fewer sequences in the input than the model was trained for
    #[error("{path} contains only {found} sequences; the model requires exactly {required}")]
    InsufficientSequences {
        path: PathBuf,
        found: usize,
        required: usize,
    },

    /// Aligned rows of unequal length where a rectangular alignment is required
    #[error("aligned rows have unequal lengths ({0} vs {1})")]
    RaggedAlignment(usize, usize),

    /// Reference alignment length not divisible by the row count
    #[error("alignment length {len} is not divisible by {n}")]
    NotDivisible { len: usize, n: usize },
}

/// Convenience alias used throughout the tralign crates.
pub type Result<T> = std::result::Result<T, CoreError>;
