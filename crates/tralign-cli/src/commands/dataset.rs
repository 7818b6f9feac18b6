use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use polars::prelude::*;

use tralign_core::dataset::{source_line, target_line};

/// Row count of the reference alignments in the published corpus.
const CORPUS_ROWS: usize = 10;

const SPLITS: [&str; 3] = ["train", "test", "validation"];

fn default_output_dir(num_seqs: usize) -> PathBuf {
    match num_seqs {
        10 => PathBuf::from("data-bin-amino-raw"),
        n => PathBuf::from(format!("data-bin-amino-{n}seq-raw")),
    }
}

/// Download the labeled corpus and rewrite it into paired source/target
/// text files per split, one example per line.
pub fn execute(
    num_seqs: usize,
    dataset: &str,
    output_dir: Option<PathBuf>,
    drop_gap_columns: bool,
) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| default_output_dir(num_seqs));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    println!("Downloading dataset {dataset}...");
    let api = Api::new()?;
    let repo = api.repo(Repo::with_revision(
        dataset.to_string(),
        RepoType::Dataset,
        "main".to_string(),
    ));
    let info = repo
        .info()
        .with_context(|| format!("failed to list files of dataset {dataset}"))?;

    for split in SPLITS {
        let shards: Vec<String> = info
            .siblings
            .iter()
            .map(|s| s.rfilename.clone())
            .filter(|name| name.ends_with(".parquet") && name.contains(split))
            .collect();
        if shards.is_empty() {
            continue;
        }

        println!("Processing split: {split} for {num_seqs} sequences...");
        let mut src_file = BufWriter::new(File::create(output_dir.join(format!("{split}.source")))?);
        let mut tgt_file = BufWriter::new(File::create(output_dir.join(format!("{split}.target")))?);

        let mut kept = 0usize;
        let mut skipped = 0usize;
        for shard in shards {
            let local = repo
                .get(&shard)
                .with_context(|| format!("failed to download {shard}"))?;
            let df = ParquetReader::new(File::open(&local)?)
                .finish()
                .with_context(|| format!("failed to read {shard}"))?;
            let (shard_kept, shard_skipped) = process_frame(
                &df,
                num_seqs,
                drop_gap_columns,
                &mut src_file,
                &mut tgt_file,
            )?;
            kept += shard_kept;
            skipped += shard_skipped;
        }

        src_file.flush()?;
        tgt_file.flush()?;
        println!("  {split}: {kept} items written, {skipped} skipped");
    }

    println!("Done! Files are in {}", output_dir.display());
    Ok(())
}

/// Rewrite one parquet shard. Items whose reference alignment length is
/// not divisible by the corpus row count are skipped with a warning, so
/// the source and target files stay line-parallel.
fn process_frame(
    df: &DataFrame,
    num_seqs: usize,
    drop_gap_columns: bool,
    src_file: &mut impl Write,
    tgt_file: &mut impl Write,
) -> Result<(usize, usize)> {
    let msa_col = df
        .column("MSA")
        .context("corpus is missing the MSA column")?
        .as_materialized_series()
        .str()
        .context("MSA column is not a string column")?
        .clone();

    let unaligned = df
        .column("unaligned_seqs")
        .context("corpus is missing the unaligned_seqs column")?
        .as_materialized_series()
        .struct_()
        .context("unaligned_seqs column is not a struct column")?;

    // Missing sequence fields become empty strings so the separator count
    // in the source line stays fixed.
    let field_cols: Vec<Option<StringChunked>> = (0..num_seqs)
        .map(|k| {
            unaligned
                .field_by_name(&format!("seq{k}"))
                .ok()
                .and_then(|s| s.str().ok().cloned())
        })
        .collect();

    let mut kept = 0usize;
    let mut skipped = 0usize;
    for i in 0..df.height() {
        let seqs: Vec<String> = field_cols
            .iter()
            .map(|col| {
                col.as_ref()
                    .and_then(|c| c.get(i))
                    .unwrap_or("")
                    .to_string()
            })
            .collect();

        let Some(msa) = msa_col.get(i) else {
            eprintln!("Warning: item without a reference alignment. Skipping.");
            skipped += 1;
            continue;
        };

        match target_line(msa, CORPUS_ROWS, num_seqs, drop_gap_columns) {
            Ok(target) => {
                writeln!(src_file, "{}", source_line(&seqs))?;
                writeln!(tgt_file, "{target}")?;
                kept += 1;
            }
            Err(e) => {
                eprintln!("Warning: {e}. Skipping item.");
                skipped += 1;
            }
        }
    }
    Ok((kept, skipped))
}
