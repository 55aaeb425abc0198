//! Run reports and timing traces written next to the tool outputs.
pub mod timing;

pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
