//! FASTA parser and writer.
//!
//! Handles plain FASTA as used for both unaligned input and aligned output;
//! `.tfa` files are the same format under a different extension and are
//! parsed identically. Sequence data may span multiple lines and is
//! concatenated; no alphabet validation is performed.

use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};

/// A single sequence record: identifier, optional free-text description,
/// and the sequence itself. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: String,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: None,
            seq: seq.into(),
        }
    }

    /// Residue count of this record.
    pub fn len(&self) -> usize {
        self.seq.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Parse FASTA-format text into records.
///
/// Returns an error if sequence data appears before the first `>` header.
/// Blank lines are ignored. An empty input yields an empty vector.
pub fn parse_fasta(input: &str) -> Result<Vec<FastaRecord>> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for line in input.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            let header = header.trim();
            let (id, desc) = match header.split_once(char::is_whitespace) {
                Some((id, desc)) => (id.to_string(), Some(desc.trim().to_string())),
                None => (header.to_string(), None),
            };
            records.push(FastaRecord { id, desc, seq: String::new() });
        } else {
            match records.last_mut() {
                Some(record) => record.seq.push_str(line.trim()),
                None => {
                    return Err(CoreError::Parse(
                        "sequence data before the first FASTA header".to_string(),
                    ))
                }
            }
        }
    }

    Ok(records)
}

/// Render records as FASTA text, wrapping sequence lines at 60 columns.
pub fn format_fasta(records: &[FastaRecord]) -> String {
    const LINE_WIDTH: usize = 60;

    let mut out = String::new();
    for record in records {
        match &record.desc {
            Some(desc) => out.push_str(&format!(">{} {}\n", record.id, desc)),
            None => out.push_str(&format!(">{}\n", record.id)),
        }
        let chars: Vec<char> = record.seq.chars().collect();
        for chunk in chars.chunks(LINE_WIDTH) {
            out.extend(chunk.iter());
            out.push('\n');
        }
        if chars.is_empty() {
            out.push('\n');
        }
    }
    out
}

/// Read and parse a FASTA file.
pub fn read_fasta(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let text = fs::read_to_string(path)?;
    parse_fasta(&text)
}

/// Write records to a FASTA file.
pub fn write_fasta(path: impl AsRef<Path>, records: &[FastaRecord]) -> Result<()> {
    fs::write(path, format_fasta(records))?;
    Ok(())
}
