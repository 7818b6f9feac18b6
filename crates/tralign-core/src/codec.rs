//! The token format exchanged with the alignment model.
//!
//! Source side: every residue becomes one space-separated token and
//! sequences are joined with a `|` separator token, e.g. two sequences
//! `SEQ` and `S-Q` become `"S E Q | S - Q"`. Target side: an alignment of
//! N equal-length rows is serialized column-major (all rows' residues for
//! column 0, then column 1, ...), one token per residue or gap.
//!
//! Tokens are single characters by construction; alphabet characters must
//! not collide with the separator tokens, which is not checked here.

use itertools::Itertools;

use crate::error::{CoreError, Result};

/// The token separating sequences in the source format.
pub const SEQUENCE_SEPARATOR: &str = "|";

/// Format unaligned sequences for model consumption.
///
/// Deterministic and order-preserving; empty sequences contribute an empty
/// segment between separators.
pub fn format_source<S: AsRef<str>>(seqs: &[S]) -> String {
    seqs.iter()
        .map(|s| s.as_ref().chars().join(" "))
        .join(&format!(" {} ", SEQUENCE_SEPARATOR))
}

/// Serialize N equal-length rows column-major as a flat token string.
///
/// Returns [`CoreError::RaggedAlignment`] if the rows differ in length.
pub fn interleave<S: AsRef<str>>(rows: &[S]) -> Result<String> {
    let rows: Vec<Vec<char>> = rows.iter().map(|r| r.as_ref().chars().collect()).collect();
    let row_len = rows.first().map(|r| r.len()).unwrap_or(0);
    for row in &rows {
        if row.len() != row_len {
            return Err(CoreError::RaggedAlignment(row_len, row.len()));
        }
    }

    let mut tokens = Vec::with_capacity(row_len * rows.len());
    for col in 0..row_len {
        for row in &rows {
            tokens.push(row[col]);
        }
    }
    Ok(tokens.iter().join(" "))
}

/// Result of reshaping a flat decode output back into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deinterleaved {
    /// The reconstructed rows, all the same length.
    pub rows: Vec<String>,
    /// Tokens dropped from a trailing partial column, zero when the token
    /// count was an exact multiple of the row count.
    pub dropped: usize,
}

/// Reshape a flat output token string into `n` rows, assigning token `i`
/// to row `i % n`.
///
/// A token count that is not a multiple of `n` is a soft failure: the
/// trailing partial column is dropped and reported via `dropped` so the
/// caller can surface a warning.
pub fn deinterleave(flat: &str, n: usize) -> Deinterleaved {
    if n == 0 {
        return Deinterleaved {
            rows: Vec::new(),
            dropped: flat.split_whitespace().count(),
        };
    }
    let tokens: Vec<&str> = flat.split_whitespace().collect();
    let dropped = tokens.len() % n;
    let complete = tokens.len() - dropped;

    let mut rows = vec![String::new(); n];
    for (i, token) in tokens[..complete].iter().enumerate() {
        rows[i % n].push_str(token);
    }
    Deinterleaved { rows, dropped }
}
