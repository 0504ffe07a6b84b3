//! Episode quality assessment for pre-storage filtering.
//!
//! Implements quality scoring using multiple features to determine whether
//! an episode is worth storing in the memory system.

mod assessor;
mod types;

pub use assessor::QualityAssessor;
pub use types::{QualityConfig, QualityFeature};
