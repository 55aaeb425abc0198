//! Synthetic training batches for the affinity network.
//!
//! Each example starts from a stroke-based SVG template with transform
//! placeholders. A random affine jitter is substituted in and rendered as
//! the full sketch; one stroke is then isolated and rendered as the target,
//! and one of its pixels becomes the query point of the input.
pub mod example;
pub mod isolate;
pub mod jitter;
mod manager;
mod params;
pub mod template;

pub use example::{synthesize, TrainingExample};
pub use jitter::{sample_jitter, Jitter};
pub use manager::{Batch, BatchManager};
pub use params::{BatchParams, DatasetVariant};
pub use template::SvgTemplate;
