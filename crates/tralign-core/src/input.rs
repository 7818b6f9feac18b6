//! Input preparation for the alignment pipeline.
//!
//! Resolves the input path against the accepted extensions (converting
//! `.tfa` to a sibling `.fasta`), then enforces the model's fixed sequence
//! count: fewer records than required is a hard error; extra records are
//! truncated to the first N in file order, with the kept subset written to
//! a sibling audit file for traceability.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::fasta::{self, FastaRecord};

/// Extensions accepted without conversion.
pub const FASTA_EXTENSIONS: [&str; 3] = ["fasta", "fa", "faa"];

/// Outcome of resolving and loading an input file.
#[derive(Debug)]
pub struct PreparedInput {
    /// The records the model will see, exactly the required count.
    pub records: Vec<FastaRecord>,
    /// The path actually read; differs from the argument when a `.tfa`
    /// input was converted.
    pub working_path: PathBuf,
    /// Path of the truncation audit copy, when one was written.
    pub audit_copy: Option<PathBuf>,
}

/// Map the input argument to a readable FASTA path.
///
/// `.tfa` files are re-parsed and re-written as a sibling `.fasta`, which
/// becomes the working input. Unknown extensions are a hard error.
pub fn resolve_input(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CoreError::Io(io::Error::new(
            ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if extension == "tfa" {
        let fasta_path = path.with_extension("fasta");
        let records = fasta::read_fasta(path)?;
        fasta::write_fasta(&fasta_path, &records)?;
        Ok(fasta_path)
    } else if FASTA_EXTENSIONS.contains(&extension.as_str()) {
        Ok(path.to_path_buf())
    } else {
        Err(CoreError::UnsupportedExtension { extension })
    }
}

/// Load the working input and enforce the required sequence count.
pub fn prepare(path: &Path, required: usize) -> Result<PreparedInput> {
    let working_path = resolve_input(path)?;
    let mut records = fasta::read_fasta(&working_path)?;

    if records.len() < required {
        return Err(CoreError::InsufficientSequences {
            path: working_path,
            found: records.len(),
            required,
        });
    }

    let audit_copy = if records.len() > required {
        records.truncate(required);
        let mut name = working_path.as_os_str().to_owned();
        name.push(format!(".{required}seq.temp.fasta"));
        let audit_path = PathBuf::from(name);
        fasta::write_fasta(&audit_path, &records)?;
        Some(audit_path)
    } else {
        None
    };

    Ok(PreparedInput {
        records,
        working_path,
        audit_copy,
    })
}
