//! General handler: plain retrieval, templated answer, no generation

use super::{passage_sources, render_passages, AgentDeps, Handler};
use crate::models::{AgentResponse, IntentLabel, RetrievedChunk};
use crate::Result;
use async_trait::async_trait;

pub struct GeneralHandler;

#[async_trait]
impl Handler for GeneralHandler {
    fn label(&self) -> IntentLabel {
        IntentLabel::General
    }

    fn agent_type(&self) -> &'static str {
        "General"
    }

    fn k(&self) -> usize {
        5
    }

    async fn respond(
        &self,
        _query: &str,
        chunks: Vec<RetrievedChunk>,
        _deps: &AgentDeps,
    ) -> Result<AgentResponse> {
        Ok(AgentResponse {
            agent_type: self.agent_type().to_string(),
            response: render_passages("Based on the available documents:", &chunks),
            confidence: 0.7,
            sources_used: passage_sources(&chunks),
            reasoning: "General retrieval without specialization".to_string(),
        })
    }
}
