use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tralign_core::{codec, fasta, input, FastaRecord};
use tralign_model::{check_context_budget, AlignmentModel, DecodeBounds, Device};

use super::refine;

pub struct AlignArgs {
    pub input: PathBuf,
    pub model_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub num_seqs: usize,
    pub beam: usize,
    pub cpu: bool,
    pub verbose: bool,
    pub refine: bool,
    pub aligner: String,
}

/// Directory the pretrained checkpoints are expected in when none is given.
fn default_model_dir(num_seqs: usize) -> PathBuf {
    match num_seqs {
        10 => PathBuf::from("checkpoints_amino"),
        n => PathBuf::from(format!("checkpoints_amino_{n}seq")),
    }
}

/// Companion data directory holding the tokenizers.
fn default_data_dir(num_seqs: usize) -> PathBuf {
    match num_seqs {
        10 => PathBuf::from("data-bin-amino-processed"),
        n => PathBuf::from(format!("data-bin-amino-{n}seq-processed")),
    }
}

/// Output path derived from the input when none is given.
fn default_output(input: &Path, num_seqs: usize) -> PathBuf {
    let stem = input.with_extension("");
    let suffix = match num_seqs {
        10 => "_aligned.fasta".to_string(),
        n => format!("_aligned_{n}seq.fasta"),
    };
    let mut name = stem.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn execute(args: AlignArgs) -> Result<()> {
    let model_dir = args
        .model_dir
        .unwrap_or_else(|| default_model_dir(args.num_seqs));
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| default_data_dir(args.num_seqs));
    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, args.num_seqs));

    let prepared = input::prepare(&args.input, args.num_seqs)?;
    if prepared.working_path != args.input {
        println!(
            "[INFO] Detected .tfa file. Converted: {} -> {}",
            args.input.display(),
            prepared.working_path.display()
        );
    }
    if let Some(audit) = &prepared.audit_copy {
        println!(
            "[INFO] The input held more than {} sequences. Only the first {} will be used.",
            args.num_seqs, args.num_seqs
        );
        println!("[INFO] Copy of the used sequences written to: {}", audit.display());
    }

    let seqs: Vec<&str> = prepared.records.iter().map(|r| r.seq.as_str()).collect();
    let source = codec::format_source(&seqs);
    let total_residues: usize = prepared.records.iter().map(|r| r.len()).sum();
    if args.verbose {
        println!("Model input: {source}");
    }
    println!("Total residues to align: {total_residues}");

    let device = if args.cpu {
        Device::Cpu
    } else {
        tralign_model::best_device()?
    };
    println!("Using {} for inference.", tralign_model::describe(&device));

    println!("Loading model from {}...", model_dir.display());
    let mut model = AlignmentModel::load(&model_dir, &data_dir, device)?;

    let num_tokens = source.split_whitespace().count();
    check_context_budget(num_tokens, model.max_positions(), args.num_seqs)?;

    println!("Aligning (this may take some time)...");
    let bounds = DecodeBounds::for_residues(total_residues);
    let translated = model
        .translate(&source, args.beam, bounds)
        .context("decode failed")?;

    let out = codec::deinterleave(&translated, args.num_seqs);
    if out.dropped > 0 {
        eprintln!(
            "Warning: the model produced a token count that is not a multiple of {}; \
             {} trailing tokens were dropped and the alignment may be incomplete.",
            args.num_seqs, out.dropped
        );
    }

    let aligned: Vec<FastaRecord> = prepared
        .records
        .iter()
        .zip(out.rows)
        .map(|(record, row)| FastaRecord {
            id: record.id.clone(),
            desc: record.desc.clone(),
            seq: row,
        })
        .collect();
    fasta::write_fasta(&output, &aligned)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Alignment completed!");
    println!("Result saved in: {}", output.display());

    if args.refine {
        let mut name = output.with_extension("").into_os_string();
        name.push(".refined.fasta");
        let refined = PathBuf::from(name);
        refine::execute(&prepared.working_path, &refined, &args.aligner)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_sequence_count() {
        assert_eq!(default_model_dir(10), PathBuf::from("checkpoints_amino"));
        assert_eq!(
            default_model_dir(5),
            PathBuf::from("checkpoints_amino_5seq")
        );
        assert_eq!(
            default_data_dir(10),
            PathBuf::from("data-bin-amino-processed")
        );
        assert_eq!(
            default_data_dir(5),
            PathBuf::from("data-bin-amino-5seq-processed")
        );
    }

    #[test]
    fn default_output_derives_from_input_stem() {
        assert_eq!(
            default_output(Path::new("test.tfa"), 10),
            PathBuf::from("test_aligned.fasta")
        );
        assert_eq!(
            default_output(Path::new("dir/test.fasta"), 5),
            PathBuf::from("dir/test_aligned_5seq.fasta")
        );
    }
}
