//! Model invoker for the tralign toolkit.
//!
//! Loads a pretrained encoder-decoder translation transformer with candle
//! and runs a single bounded beam-search decode over the flat token format
//! defined in `tralign-core`. The transformer architecture itself comes
//! from `candle_transformers`; this crate only owns loading, the context
//! guard, the decode bounds, and the search loop.

pub mod beam;
pub mod device;
pub mod invoker;

pub use beam::{beam_search, BeamParams};
pub use candle_core::Device;
pub use device::{best_device, describe};
pub use invoker::{check_context_budget, AlignmentModel, ContextOverflow, DecodeBounds};
