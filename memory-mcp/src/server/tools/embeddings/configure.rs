//! Configure embeddings tool handler for MCP server
//!
//! This module provides the tool for configuring semantic embedding
//! providers for enhanced memory retrieval.

use crate::server::MemoryMCPServer;
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

impl MemoryMCPServer {
    /// Execute the configure_embeddings tool
    ///
    /// # Arguments
    ///
    /// * `input` - Configuration parameters for the embedding provider
    ///
    /// # Returns
    ///
    /// Returns configuration result with provider details
    pub async fn execute_configure_embeddings(
        &self,
        input: crate::mcp::tools::embeddings::ConfigureEmbeddingsInput,
    ) -> Result<serde_json::Value> {
        self.track_tool_usage("configure_embeddings").await;

        debug!(
            "Configuring embeddings: provider='{}', model='{:?}'",
            input.provider, input.model
        );

        let tool = crate::mcp::tools::embeddings::EmbeddingTools::new(Arc::clone(&self.memory));

        let result = tool.execute_configure_embeddings(input).await?;

        // Convert result to JSON
        Ok(json!(result))
    }
}
