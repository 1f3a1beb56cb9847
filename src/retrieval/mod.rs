//! Retrieval adapter seam
//!
//! Handlers ask for ranked passages through `RetrievalAdapter`; how the index
//! was built (embeddings, BM25, a remote vector store) is not their concern.

use crate::models::RetrievedChunk;
use crate::Result;
use async_trait::async_trait;

pub mod lexical;
pub use lexical::LexicalIndex;

/// Ranked passage search over a fixed index snapshot
#[async_trait]
pub trait RetrievalAdapter: Send + Sync {
    /// At most `k` chunks, descending by score
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>>;
}
