use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Re-align a file by delegating to an external alignment executable,
/// invoked as `<exec> -align <input> -output <output>` and awaited
/// synchronously with captured output streams.
pub fn execute(input: &Path, output: &Path, aligner: &str) -> Result<()> {
    println!(
        "[INFO] Running alignment tool: {} -> {}",
        input.display(),
        output.display()
    );

    let result = Command::new(aligner)
        .arg("-align")
        .arg(input)
        .arg("-output")
        .arg(output)
        .output();

    match result {
        Err(e) if e.kind() == ErrorKind::NotFound => bail!(
            "the alignment executable '{aligner}' was not found; ensure it is \
             installed and on your system PATH"
        ),
        Err(e) => Err(e).context(format!("failed to run '{aligner}'")),
        Ok(out) if !out.status.success() => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            bail!(
                "'{aligner}' failed with {}: {}",
                out.status,
                stderr.trim()
            )
        }
        Ok(_) => {
            println!("[INFO] Alignment completed successfully.");
            Ok(())
        }
    }
}
