//! Core library for the tralign toolkit.
//!
//! Holds everything that does not need the ML runtime: FASTA/TFA and MSF
//! sequence I/O, the token codec spoken by the alignment model (space
//! separated residue tokens, `|`-separated sequences, column-major
//! interleaved targets), input preparation, and the pure transformations
//! used by the training-data builders.

pub mod codec;
pub mod dataset;
pub mod error;
pub mod fasta;
pub mod input;
pub mod msf;

pub use error::{CoreError, Result};
pub use fasta::FastaRecord;
