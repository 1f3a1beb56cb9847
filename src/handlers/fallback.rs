//! Fallback handler
//!
//! The always-available path: unfiltered retrieval and a templated excerpt
//! list. It never fails; a retrieval error is answered like an empty corpus.

use super::{passage_sources, render_passages};
use crate::models::AgentResponse;
use crate::retrieval::RetrievalAdapter;
use tracing::warn;

pub const FALLBACK_AGENT: &str = "Fallback";
pub const FALLBACK_CONFIDENCE: f32 = 0.6;

const FALLBACK_K: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackHandler;

impl FallbackHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn respond(&self, query: &str, retriever: &dyn RetrievalAdapter) -> AgentResponse {
        let chunks = match retriever.search(query, FALLBACK_K).await {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Fallback retrieval failed, answering without evidence: {}", e);
                Vec::new()
            }
        };

        AgentResponse {
            agent_type: FALLBACK_AGENT.to_string(),
            response: render_passages("[Fallback Mode] Based on available documents:", &chunks),
            confidence: FALLBACK_CONFIDENCE,
            sources_used: passage_sources(&chunks),
            reasoning: "Fallback mode without specialized agents".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::NO_INFORMATION;
    use super::*;

    #[tokio::test]
    async fn test_fallback_lists_top_three() {
        let retriever = StaticRetriever::new(vec![
            chunk("docs/invoice_1003.txt", 0.9, "Invoice INV-1003"),
            chunk("docs/statement_01.txt", 0.8, "Deposit $1,200"),
            chunk("docs/invoice_1004.txt", 0.7, "Invoice INV-1004"),
            chunk("docs/statement_02.txt", 0.6, "Withdrawal $80"),
        ]);

        let response = FallbackHandler::new().respond("anything", &retriever).await;

        assert_eq!(response.agent_type, "Fallback");
        assert_eq!(response.confidence, 0.6);
        assert_eq!(response.sources_used.len(), 3);
        assert!(response
            .response
            .starts_with("[Fallback Mode] Based on available documents:\n\n1. From invoice_1003.txt:"));
        assert_eq!(*retriever.requested_k.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_fallback_survives_retrieval_error() {
        let response =
            tokio_test::block_on(FallbackHandler::new().respond("anything", &FailingRetriever));

        assert_eq!(response.response, NO_INFORMATION);
        assert!(response.sources_used.is_empty());
        assert!(!response.reasoning.is_empty());
    }
}
