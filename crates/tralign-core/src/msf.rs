//! GCG MSF writer.
//!
//! Produces a `PileUp`-style MSF file from a rectangular alignment: a
//! header carrying the alignment length and checksum, one `Name:` line per
//! sequence, a `//` separator, then interleaved blocks of 50 residues in
//! groups of 10. Gap characters are written as `.` per GCG convention.

use std::path::Path;

use crate::error::{CoreError, Result};
use crate::fasta::FastaRecord;

const BLOCK_WIDTH: usize = 50;
const GROUP_WIDTH: usize = 10;

/// The GCG checksum of a sequence: position-weighted sum of the uppercased
/// bytes, modulo 10000.
pub fn gcg_checksum(seq: &str) -> u32 {
    seq.bytes()
        .enumerate()
        .map(|(i, b)| ((i % 57 + 1) as u32) * (b.to_ascii_uppercase() as u32))
        .sum::<u32>()
        % 10000
}

/// Render a rectangular alignment as MSF text.
///
/// Returns [`CoreError::RaggedAlignment`] if the rows are not all the same
/// length.
pub fn format_msf(records: &[FastaRecord]) -> Result<String> {
    let alignment_len = records.first().map(|r| r.len()).unwrap_or(0);
    for record in records {
        if record.len() != alignment_len {
            return Err(CoreError::RaggedAlignment(alignment_len, record.len()));
        }
    }

    let gapped: Vec<String> = records
        .iter()
        .map(|r| r.seq.replace('-', "."))
        .collect();
    let checksums: Vec<u32> = gapped.iter().map(|s| gcg_checksum(s)).collect();
    let total_check: u32 = checksums.iter().sum::<u32>() % 10000;
    let name_width = records.iter().map(|r| r.id.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str("PileUp\n\n");
    out.push_str(&format!(
        " MSF: {}  Type: P  Check: {}  ..\n\n",
        alignment_len, total_check
    ));
    for (record, check) in records.iter().zip(&checksums) {
        out.push_str(&format!(
            " Name: {:<name_width$}  Len: {}  Check: {}  Weight: 1.00\n",
            record.id, alignment_len, check
        ));
    }
    out.push_str("\n//\n\n");

    // Lengths and slices are in chars, not bytes; the format promises no
    // alphabet validation, so residues may be multi-byte.
    let mut offset = 0;
    while offset < alignment_len {
        let end = usize::min(offset + BLOCK_WIDTH, alignment_len);
        for (record, seq) in records.iter().zip(&gapped) {
            out.push_str(&format!("{:<name_width$}  ", record.id));
            let fragment: Vec<char> = seq.chars().skip(offset).take(end - offset).collect();
            for (i, group) in fragment.chunks(GROUP_WIDTH).enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.extend(group.iter());
            }
            out.push('\n');
        }
        out.push('\n');
        offset = end;
    }

    Ok(out)
}

/// Write a rectangular alignment to an MSF file.
pub fn write_msf(path: impl AsRef<Path>, records: &[FastaRecord]) -> Result<()> {
    std::fs::write(path, format_msf(records)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_known_value() {
        // 1*65 + 2*67 + 3*68 + 4*69 = 679
        assert_eq!(gcg_checksum("ACDE"), 679);
        assert_eq!(gcg_checksum("acde"), 679);
        assert_eq!(gcg_checksum(""), 0);
    }

    #[test]
    fn header_and_name_lines() {
        let records = vec![
            FastaRecord::new("seq1", "MK-VAL"),
            FastaRecord::new("longer_name", "MKTV-L"),
        ];
        let text = format_msf(&records).unwrap();
        assert!(text.starts_with("PileUp\n"));
        assert!(text.contains(" MSF: 6  Type: P "));
        assert!(text.contains(" Name: seq1 "));
        assert!(text.contains(" Name: longer_name "));
        assert!(text.contains("\n//\n"));
    }

    #[test]
    fn gaps_become_dots() {
        let records = vec![FastaRecord::new("s", "MK-VAL")];
        let text = format_msf(&records).unwrap();
        assert!(text.contains("MK.VAL"));
        assert!(!text.lines().skip(1).any(|l| l.contains('-')));
    }

    #[test]
    fn blocks_wrap_at_fifty() {
        let records = vec![FastaRecord::new("s", "A".repeat(72))];
        let text = format_msf(&records).unwrap();
        let data_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("s "))
            .collect();
        assert_eq!(data_lines.len(), 2);
        // 50 residues in groups of 10, four separating spaces
        let first_block: String = data_lines[0].split_whitespace().skip(1).collect();
        assert_eq!(first_block.len(), 50);
        let second_block: String = data_lines[1].split_whitespace().skip(1).collect();
        assert_eq!(second_block.len(), 22);
    }

    #[test]
    fn non_ascii_residues_are_sliced_by_char() {
        // No alphabet validation happens upstream, so block slicing must
        // not land inside a multi-byte character.
        let records = vec![FastaRecord::new("s", "É".repeat(60))];
        let text = format_msf(&records).unwrap();
        assert!(text.contains(" MSF: 60 "));
        let data_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("s ")).collect();
        assert_eq!(data_lines.len(), 2);
        let first_block: String = data_lines[0].split_whitespace().skip(1).collect();
        assert_eq!(first_block.chars().count(), 50);
        let second_block: String = data_lines[1].split_whitespace().skip(1).collect();
        assert_eq!(second_block.chars().count(), 10);
    }

    #[test]
    fn ragged_lengths_are_counted_in_chars() {
        // Three chars against four bytes: the check must compare chars.
        let records = vec![
            FastaRecord::new("a", "MKÉ"),
            FastaRecord::new("b", "MKT"),
        ];
        assert!(format_msf(&records).is_ok());
    }

    #[test]
    fn ragged_alignment_rejected() {
        let records = vec![
            FastaRecord::new("a", "MKTV"),
            FastaRecord::new("b", "MKT"),
        ];
        let err = format_msf(&records).unwrap_err();
        assert!(matches!(err, CoreError::RaggedAlignment(4, 3)));
    }
}
