//! Loading and invoking the pretrained alignment transformer.
//!
//! The model directory holds `config.json` and `model.safetensors` for a
//! marian-style encoder-decoder translation model; the companion data
//! directory holds `tokenizer-source.json` and `tokenizer-target.json`
//! covering the residue-token vocabularies. Everything is loaded once per
//! invocation; there is no global state.

use std::path::Path;

use anyhow::{Context, Error as E, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::marian::{self, MTModel};
use serde::Deserialize;
use thiserror::Error;
use tokenizers::Tokenizer;

use crate::beam::{beam_search, BeamParams};

/// Fixed slack added to the residue total to bound the decode length;
/// covers the gap tokens an alignment inserts on top of the residues.
pub const MAX_LEN_SLACK: usize = 500;

/// Output-length bounds derived from the input.
///
/// The alignment cannot be shorter than the unaligned residue total, so
/// `min_len` is that total; `max_len_b` caps the decode at the total plus
/// [`MAX_LEN_SLACK`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeBounds {
    pub min_len: usize,
    pub max_len_b: usize,
}

impl DecodeBounds {
    pub fn for_residues(total_residues: usize) -> Self {
        Self {
            min_len: total_residues,
            max_len_b: total_residues + MAX_LEN_SLACK,
        }
    }
}

/// Input too long for the model's trained context window.
#[derive(Debug, Error)]
#[error(
    "input of {num_tokens} tokens exceeds the model context of {max_positions} tokens \
     (roughly {per_sequence_budget} residues per sequence); trim the sequences or use \
     a model trained with a longer context"
)]
pub struct ContextOverflow {
    pub num_tokens: usize,
    pub max_positions: usize,
    /// Approximate residue budget per sequence under this model.
    pub per_sequence_budget: usize,
}

/// Refuse any input whose token count exceeds the model's configured
/// maximum context length. Checked before the decode is attempted.
pub fn check_context_budget(
    num_tokens: usize,
    max_positions: usize,
    num_seqs: usize,
) -> std::result::Result<(), ContextOverflow> {
    if num_tokens > max_positions {
        Err(ContextOverflow {
            num_tokens,
            max_positions,
            per_sequence_budget: max_positions / num_seqs.max(1),
        })
    } else {
        Ok(())
    }
}

/// The subset of the model's `config.json` the invoker needs, mirrored
/// into [`marian::Config`] on load.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub vocab_size: usize,
    #[serde(default)]
    pub decoder_vocab_size: Option<usize>,
    pub max_position_embeddings: usize,
    pub encoder_layers: usize,
    pub encoder_ffn_dim: usize,
    pub encoder_attention_heads: usize,
    pub decoder_layers: usize,
    pub decoder_ffn_dim: usize,
    pub decoder_attention_heads: usize,
    #[serde(default = "default_true")]
    pub use_cache: bool,
    #[serde(default = "default_true")]
    pub is_encoder_decoder: bool,
    pub activation_function: candle_nn::Activation,
    pub d_model: usize,
    pub decoder_start_token_id: u32,
    #[serde(default)]
    pub scale_embedding: bool,
    pub pad_token_id: u32,
    pub eos_token_id: u32,
    #[serde(default)]
    pub forced_eos_token_id: u32,
    #[serde(default = "default_true")]
    pub share_encoder_decoder_embeddings: bool,
}

fn default_true() -> bool {
    true
}

impl From<ModelConfig> for marian::Config {
    fn from(c: ModelConfig) -> Self {
        marian::Config {
            vocab_size: c.vocab_size,
            decoder_vocab_size: c.decoder_vocab_size,
            max_position_embeddings: c.max_position_embeddings,
            encoder_layers: c.encoder_layers,
            encoder_ffn_dim: c.encoder_ffn_dim,
            encoder_attention_heads: c.encoder_attention_heads,
            decoder_layers: c.decoder_layers,
            decoder_ffn_dim: c.decoder_ffn_dim,
            decoder_attention_heads: c.decoder_attention_heads,
            use_cache: c.use_cache,
            is_encoder_decoder: c.is_encoder_decoder,
            activation_function: c.activation_function,
            d_model: c.d_model,
            decoder_start_token_id: c.decoder_start_token_id,
            scale_embedding: c.scale_embedding,
            pad_token_id: c.pad_token_id,
            eos_token_id: c.eos_token_id,
            forced_eos_token_id: c.forced_eos_token_id,
            share_encoder_decoder_embeddings: c.share_encoder_decoder_embeddings,
        }
    }
}

/// A loaded alignment model: weights, vocabularies, and device.
pub struct AlignmentModel {
    model: MTModel,
    config: marian::Config,
    source_tokenizer: Tokenizer,
    target_tokenizer: Tokenizer,
    device: Device,
}

impl AlignmentModel {
    /// Load model weights and vocabularies. Weights are mmapped
    /// safetensors; everything is read exactly once.
    pub fn load(model_dir: &Path, data_dir: &Path, device: Device) -> Result<Self> {
        let config_path = model_dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path).with_context(|| {
            format!(
                "failed to read {}; ensure the model directory contains config.json",
                config_path.display()
            )
        })?;
        let config: ModelConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("malformed model config at {}", config_path.display()))?;
        let config: marian::Config = config.into();

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
        }
        .with_context(|| {
            format!(
                "failed to load weights from {}; ensure the model directory \
                 contains model.safetensors",
                weights_path.display()
            )
        })?;
        let model = MTModel::new(&config, vb).context("failed to build the model graph")?;

        let source_tokenizer = Tokenizer::from_file(data_dir.join("tokenizer-source.json"))
            .map_err(E::msg)
            .with_context(|| {
                format!(
                    "ensure the data directory {} contains tokenizer-source.json",
                    data_dir.display()
                )
            })?;
        let target_tokenizer = Tokenizer::from_file(data_dir.join("tokenizer-target.json"))
            .map_err(E::msg)
            .with_context(|| {
                format!(
                    "ensure the data directory {} contains tokenizer-target.json",
                    data_dir.display()
                )
            })?;

        Ok(Self {
            model,
            config,
            source_tokenizer,
            target_tokenizer,
            device,
        })
    }

    /// The model's configured maximum context length, in tokens.
    pub fn max_positions(&self) -> usize {
        self.config.max_position_embeddings
    }

    /// Encode the flat source string, run one beam-search decode under the
    /// given bounds, and return the flat target token string.
    pub fn translate(
        &mut self,
        source: &str,
        beam_width: usize,
        bounds: DecodeBounds,
    ) -> Result<String> {
        let encoding = self
            .source_tokenizer
            .encode(source, true)
            .map_err(E::msg)
            .context("failed to encode the source string")?;
        let src_ids = encoding.get_ids().to_vec();

        let src = Tensor::new(src_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let encoder_xs = self.model.encoder().forward(&src, 0)?;

        let params = BeamParams {
            width: beam_width,
            min_len: bounds.min_len,
            max_len: bounds.max_len_b,
            start_token: self.config.decoder_start_token_id,
            eos_token: self.config.eos_token_id,
        };

        let model = &mut self.model;
        let device = &self.device;
        let output_ids = beam_search(
            |prefix| {
                // The kv cache holds the previous hypothesis's state, so
                // each scoring pass re-runs the full prefix from scratch.
                model.reset_kv_cache();
                let input = Tensor::new(prefix, device)?.unsqueeze(0)?;
                let logits = model.decode(&input, &encoder_xs, 0)?.squeeze(0)?;
                let last = logits.get(logits.dim(0)? - 1)?;
                let logprobs = candle_nn::ops::log_softmax(&last, D::Minus1)?;
                Ok(logprobs.to_vec1::<f32>()?)
            },
            &params,
        )?;

        let text = self
            .target_tokenizer
            .decode(&output_ids, true)
            .map_err(E::msg)
            .context("failed to decode the model output")?;
        Ok(text)
    }
}
