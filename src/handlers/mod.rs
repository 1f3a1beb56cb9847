//! Handler trait and registry
//!
//! A handler answers one intent category: it pulls passages from the
//! retrieval adapter, prunes them with its domain filter, and packages an
//! `AgentResponse`. Filtering never reorders what the adapter returned.

use crate::error::OrchestrationError;
use crate::generation::GenerationCapability;
use crate::models::{AgentResponse, Evidence, HandlerOutcome, IntentLabel, RetrievedChunk};
use crate::retrieval::RetrievalAdapter;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub mod fallback;
pub mod general;
pub mod specialists;

pub use fallback::FallbackHandler;
pub use general::GeneralHandler;
pub use specialists::{InvoiceHandler, PaymentHandler, SummaryHandler};

pub const NO_INFORMATION: &str = "I don't have enough information to answer this query.";

/// Passages shown in templated answers
const PASSAGES_SHOWN: usize = 3;
const PASSAGE_PREVIEW_CHARS: usize = 300;

/// Per-session dependencies shared by every handler
#[derive(Clone)]
pub struct AgentDeps {
    pub retriever: Arc<dyn RetrievalAdapter>,
    pub generator: Arc<dyn GenerationCapability>,
    pub generation_timeout: Duration,
}

impl AgentDeps {
    pub fn new(
        retriever: Arc<dyn RetrievalAdapter>,
        generator: Arc<dyn GenerationCapability>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            retriever,
            generator,
            generation_timeout,
        }
    }

    /// One generation exchange, bounded by `generation_timeout`
    pub async fn generate(&self, instruction: &str, context: &[RetrievedChunk]) -> Result<String> {
        tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(instruction, context),
        )
        .await
        .map_err(|_| OrchestrationError::GenerationTimeout(self.generation_timeout))?
    }
}

/// Trait for a single intent handler
#[async_trait]
pub trait Handler: Send + Sync {
    fn label(&self) -> IntentLabel;
    fn agent_type(&self) -> &'static str;

    /// Number of passages requested from the adapter
    fn k(&self) -> usize;

    /// Domain filter applied after retrieval
    fn accepts(&self, _chunk: &RetrievedChunk) -> bool {
        true
    }

    async fn retrieve(&self, query: &str, deps: &AgentDeps) -> Result<Vec<RetrievedChunk>> {
        let results = deps.retriever.search(query, self.k()).await?;
        let retrieved = results.len();

        let kept: Vec<RetrievedChunk> = results
            .into_iter()
            .filter(|chunk| self.accepts(chunk))
            .collect();

        debug!(
            agent = self.agent_type(),
            retrieved,
            kept = kept.len(),
            "Domain filter applied"
        );
        Ok(kept)
    }

    async fn respond(
        &self,
        query: &str,
        chunks: Vec<RetrievedChunk>,
        deps: &AgentDeps,
    ) -> Result<AgentResponse>;

    async fn handle(&self, query: &str, deps: &AgentDeps) -> Result<HandlerOutcome> {
        let chunks = self.retrieve(query, deps).await?;
        let evidence = Evidence::from_count(chunks.len());
        let response = self.respond(query, chunks, deps).await?;
        Ok(HandlerOutcome { response, evidence })
    }
}

/// Handler registry keyed by intent label
pub struct HandlerRegistry {
    handlers: HashMap<IntentLabel, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.insert(handler.label(), handler);
    }

    pub fn get(&self, label: IntentLabel) -> Option<Arc<dyn Handler>> {
        self.handlers.get(&label).cloned()
    }

    pub fn labels(&self) -> Vec<IntentLabel> {
        self.handlers.keys().copied().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with one handler per intent label
pub fn create_default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(InvoiceHandler));
    registry.register(Arc::new(PaymentHandler));
    registry.register(Arc::new(SummaryHandler));
    registry.register(Arc::new(GeneralHandler));
    registry
}

/// Numbered excerpt list for the top passages, or the no-information text
pub(crate) fn render_passages(header: &str, chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return NO_INFORMATION.to_string();
    }

    let mut out = String::from(header);
    out.push_str("\n\n");
    for (i, chunk) in chunks.iter().take(PASSAGES_SHOWN).enumerate() {
        let preview: String = chunk.text.chars().take(PASSAGE_PREVIEW_CHARS).collect();
        out.push_str(&format!(
            "{}. From {}:\n{}...\n\n",
            i + 1,
            chunk.source_name(),
            preview
        ));
    }
    out
}

pub(crate) fn passage_sources(chunks: &[RetrievedChunk]) -> Vec<String> {
    chunks
        .iter()
        .take(PASSAGES_SHOWN)
        .map(|chunk| chunk.source.clone())
        .collect()
}
