use financial_doc_router::{
    agent::Orchestrator,
    audit::AuditLog,
    config::RouterConfig,
    corpus::{chunk_documents, ensure_present, load_corpus},
    gemini::GeminiClient,
    retrieval::{LexicalIndex, RetrievalAdapter},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TEST_QUERIES: &[&str] = &[
    // Invoice analysis
    "What is the total amount for invoice INV-1003?",
    "Which vendor has the highest invoice total?",
    "List all line items from the most recent invoice",
    // Payment verification
    "What payment methods are used across all documents?",
    "Are there any overdue payments or past due amounts?",
    "What is the average transaction amount?",
    // Summary
    "Provide a summary of all financial activity",
    "What are the key trends across all documents?",
    "Compare invoice totals vs bank statement deposits",
    // General
    "What documents do we have?",
    "Find any mentions of tax calculations",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RouterConfig::from_env()?;
    info!("Financial document query router starting");

    // Index: reuse the persisted one, otherwise build from the corpus
    let index = if config.index_path.exists() {
        info!(path = %config.index_path.display(), "Loading existing index");
        LexicalIndex::load(&config.index_path)?
    } else {
        let paths = ensure_present(&config.corpus_dir)?;
        let documents = load_corpus(&paths)?;
        let chunks = chunk_documents(&documents, config.chunk_size, config.chunk_overlap);
        info!(documents = documents.len(), chunks = chunks.len(), "Building new index");

        let index = LexicalIndex::build(chunks);
        index.save(&config.index_path)?;
        index
    };
    info!(chunks = index.len(), "Index ready");

    let retriever: Arc<dyn RetrievalAdapter> = Arc::new(index);

    let orchestrator = match &config.gemini_api_key {
        Some(api_key) => {
            match GeminiClient::new(api_key.clone(), &config.gemini_model, config.generation_timeout) {
                Ok(client) => Orchestrator::with_defaults(
                    retriever,
                    Arc::new(client),
                    config.generation_timeout,
                ),
                Err(e) => {
                    warn!("Gemini client unavailable: {}", e);
                    Orchestrator::without_substrate(retriever, e.to_string())
                }
            }
        }
        None => {
            warn!("GEMINI_API_KEY not set; every query will use fallback mode");
            Orchestrator::without_substrate(retriever, "GEMINI_API_KEY not configured")
        }
    }
    .with_audit_log(AuditLog::with_capacity(config.audit_capacity));

    println!("\n=== MULTI-AGENT DOCUMENT ANALYSIS ===");

    for (i, query) in TEST_QUERIES.iter().enumerate() {
        println!("\n--- Query {} ---", i + 1);
        println!("Q: {}", query);

        let response = orchestrator.route_query(query).await;

        println!("Agent: {}", response.agent_type);
        println!("Confidence: {:.2}", response.confidence);
        println!("Reasoning: {}", response.reasoning);
        println!("Sources: {} documents", response.sources_used.len());
        println!("Answer:\n{}", response.response);
        println!("{}", "-".repeat(80));
    }

    println!("\nRouting summary:");
    for (agent, count) in orchestrator.audit_log().count_by_agent().await {
        println!("  {}: {}", agent, count);
    }

    Ok(())
}
