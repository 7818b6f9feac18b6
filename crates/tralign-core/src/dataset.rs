//! Pure transformations for the training-data builders.
//!
//! The corpus stores, per item, a set of named unaligned sequences and the
//! reference alignment as one flat string of `corpus_rows` concatenated
//! equal-length rows. The source side reuses the token formatter; the
//! target side slices the flat string row-major, keeps a row subset, and
//! re-encodes it column-major for the model.

use crate::codec;
use crate::error::{CoreError, Result};

/// The gap character used in reference alignments.
pub const GAP: char = '-';

/// Format the source side of one corpus item. Missing sequence fields are
/// passed as empty strings by the caller so the separator count stays fixed.
pub fn source_line(seqs: &[String]) -> String {
    codec::format_source(seqs)
}

/// Build the interleaved target line for one corpus item.
///
/// `msa` is the flat reference alignment of `corpus_rows` concatenated
/// rows; the first `keep_rows` rows are retained. When
/// `drop_all_gap_columns` is set, columns that are gaps across every kept
/// row are removed before interleaving.
///
/// Returns [`CoreError::NotDivisible`] when the alignment length is not a
/// multiple of `corpus_rows`; callers skip the item and report it.
pub fn target_line(
    msa: &str,
    corpus_rows: usize,
    keep_rows: usize,
    drop_all_gap_columns: bool,
) -> Result<String> {
    let chars: Vec<char> = msa.chars().collect();
    if corpus_rows == 0 || chars.len() % corpus_rows != 0 {
        return Err(CoreError::NotDivisible {
            len: chars.len(),
            n: corpus_rows,
        });
    }
    if chars.is_empty() {
        return Ok(String::new());
    }
    let row_len = chars.len() / corpus_rows;

    let rows: Vec<&[char]> = chars
        .chunks(row_len)
        .take(keep_rows.min(corpus_rows))
        .collect();

    let columns: Vec<usize> = (0..row_len)
        .filter(|&col| !drop_all_gap_columns || rows.iter().any(|row| row[col] != GAP))
        .collect();

    let mut tokens = Vec::with_capacity(columns.len() * rows.len());
    for &col in &columns {
        for row in &rows {
            tokens.push(row[col].to_string());
        }
    }
    Ok(tokens.join(" "))
}
