use std::path::Path;

use anyhow::{Context, Result};
use tralign_core::{fasta, msf};

/// Convert an aligned FASTA file to GCG MSF format.
pub fn execute(input: &Path, output: &Path) -> Result<()> {
    let records = fasta::read_fasta(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    msf::write_msf(output, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Successfully converted 1 alignment.");
    println!("Output saved to: {}", output.display());
    Ok(())
}
