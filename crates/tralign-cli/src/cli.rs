use std::path::PathBuf;

use super::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Transformer-based multiple sequence alignment tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a FASTA or TFA file with a pretrained transformer model
    Align {
        /// Input file (.fasta, .fa, .faa, or .tfa)
        input: PathBuf,

        /// Model directory holding config.json and model.safetensors;
        /// defaults to checkpoints_amino[_<N>seq]
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Data directory holding the source/target tokenizers;
        /// defaults to data-bin-amino[-<N>seq]-processed
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output path; defaults to <input stem>_aligned[_<N>seq].fasta
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of sequences the model was trained for
        #[arg(long, default_value_t = 10)]
        num_seqs: usize,

        /// Beam width for the decode
        #[arg(long, default_value_t = 10)]
        beam: usize,

        /// Run on CPU rather than on GPU.
        #[arg(long)]
        cpu: bool,

        /// Print the full formatted model input
        #[arg(long)]
        verbose: bool,

        /// Also re-align the input with the external aligner, writing a
        /// sibling .refined.fasta next to the output
        #[arg(long)]
        refine: bool,

        /// External aligner executable used by --refine
        #[arg(long, default_value = "muscle")]
        aligner: String,
    },

    /// Convert an aligned FASTA file to GCG MSF format
    Convert {
        /// Aligned FASTA input
        input: PathBuf,
        /// MSF output path
        output: PathBuf,
    },

    /// Re-align a FASTA file with an external alignment executable
    Refine {
        input: PathBuf,
        output: PathBuf,
        /// Aligner executable to invoke
        #[arg(long, default_value = "muscle")]
        aligner: String,
    },

    /// Download the training corpus and write source/target files per split
    BuildDataset {
        /// Number of sequences to keep per item (5 or 10)
        #[arg(long, default_value_t = 10)]
        num_seqs: usize,

        /// Hugging Face dataset repository
        #[arg(long, default_value = "dotan1111/MSA-amino-10-seq")]
        dataset: String,

        /// Output directory; defaults to data-bin-amino[-<N>seq]-raw
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Drop alignment columns that are all-gap across the kept rows
        #[arg(long)]
        drop_gap_columns: bool,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Align {
                input,
                model_dir,
                data_dir,
                output,
                num_seqs,
                beam,
                cpu,
                verbose,
                refine,
                aligner,
            } => commands::align::execute(commands::align::AlignArgs {
                input,
                model_dir,
                data_dir,
                output,
                num_seqs,
                beam,
                cpu,
                verbose,
                refine,
                aligner,
            }),
            Commands::Convert { input, output } => commands::convert::execute(&input, &output),
            Commands::Refine {
                input,
                output,
                aligner,
            } => commands::refine::execute(&input, &output, &aligner),
            Commands::BuildDataset {
                num_seqs,
                dataset,
                output_dir,
                drop_gap_columns,
            } => commands::dataset::execute(num_seqs, &dataset, output_dir, drop_gap_columns),
        }
    }
}
