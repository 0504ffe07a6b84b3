//! Demonstration of the semantic embeddings capability
//!
//! This example shows the new semantic similarity features added to memory-core.

use memory_core::embeddings_simple::{EmbeddingConfig, demonstrate_semantic_search};

fn main() -> anyhow::Result<()> {
    println!("🚀 Memory-Core: Semantic Embeddings Feature Demo");
    println!("=================================================\n");

    // Show embedding configuration
    let config = EmbeddingConfig::default();
    println!("📋 Embedding Configuration:");
    println!("  • Similarity Threshold: {}", config.similarity_threshold);
    println!("  • Batch Size: {}", config.batch_size);
    println!("  • Caching Enabled: {}", config.cache_embeddings);
    println!();

    // Run the demonstration
    demonstrate_semantic_search()?;

    println!("\n✨ This demonstrates the foundation for semantic search in AI agent memory!");
    println!("🔮 Future versions will integrate this with the full episode system.");

    Ok(())
}
