//! Segue Core
//!
//! Transition-point selection and crossfade synthesis between two tracks.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Signal Types**: `SignalBuffer`, `TransitionPoint`, `TransitionPair`
//! - **Analysis**: windowed energy profiles and the `TransitionStrategy` variants
//! - **Synthesis**: `CrossfadeSpec` with pluggable gain curves
//! - **Collaborator Traits**: `AudioDecoder`, `AudioEncoder`, `TagReader`, `TagWriter`
//! - **Orchestration**: `MixPipeline`, which drives the collaborators
//!
//! Decoding, encoding and tag formats live in `segue-audio` and `segue-metadata`.
//!
//! # Example
//!
//! ```rust
//! use segue_core::{mix, CrossfadeSpec, SignalBuffer, TransitionStrategy};
//!
//! let a = SignalBuffer::new(vec![1000; 44_100 * 10], 44_100).unwrap();
//! let b = SignalBuffer::new(vec![-1000; 44_100 * 10], 44_100).unwrap();
//!
//! let spec = CrossfadeSpec::linear(2.0).unwrap();
//! let result = mix(&a, &b, TransitionStrategy::tail_head(2.0), &spec).unwrap();
//!
//! assert_eq!(result.buffer.len(), 44_100 * 18);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crossfade;
pub mod energy;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod tags;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use crossfade::{
    synthesize, CrossfadeSpec, FadeCurve, FadeIn, FadeOut, GainCurve, MixDiagnostics, MixResult,
};
pub use energy::EnergyProfile;
pub use error::{MixError, Result};
pub use locator::TransitionStrategy;
pub use pipeline::{mix, MixPipeline, MixReport, PipelineConfig};
pub use tags::{merge_tags, TagValue, Tags, WriteReport};
pub use traits::{AudioDecoder, AudioEncoder, TagReader, TagWriter};
pub use types::{saturate_i16, SignalBuffer, TransitionPair, TransitionPoint};
