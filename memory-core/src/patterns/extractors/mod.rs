//! # Pattern Extractors
//!
//! Trait-based system for extracting patterns from episodes.
//! Each extractor specializes in a different pattern type.

use crate::episode::Episode;
use crate::pattern::Pattern;
use anyhow::Result;
use async_trait::async_trait;

mod clustering;
mod context_pattern;
mod decision_point;
mod error_recovery;
mod hybrid;
mod tool_sequence;

pub use clustering::{cluster_similar_patterns, deduplicate_patterns};
pub use context_pattern::ContextPatternExtractor;
pub use decision_point::DecisionPointExtractor;
pub use error_recovery::ErrorRecoveryExtractor;
pub use hybrid::HybridPatternExtractor;
pub use tool_sequence::ToolSequenceExtractor;

/// Base trait for all pattern extractors
#[async_trait]
pub trait PatternExtractor: Send + Sync {
    /// Extract patterns from an episode
    async fn extract(&self, episode: &Episode) -> Result<Vec<Pattern>>;

    /// Get the name of this extractor
    fn name(&self) -> &str;

    /// Get the confidence threshold for this extractor
    fn confidence_threshold(&self) -> f32;
}
