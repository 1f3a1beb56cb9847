//! Core data models for the query router

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Intent =================
//

/// Classified category of a user query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    InvoiceAnalysis,
    PaymentVerification,
    Summary,
    General,
}

impl IntentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::InvoiceAnalysis => "invoice_analysis",
            IntentLabel::PaymentVerification => "payment_verification",
            IntentLabel::Summary => "summary",
            IntentLabel::General => "general",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Intent {
    pub label: IntentLabel,
    pub confidence: f32,
    pub reasoning: String,
}

//
// ================= Retrieval =================
//

/// A scored, sourced unit of retrieved evidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub source: String,
    pub score: f32,
    pub text: String,
}

impl RetrievedChunk {
    /// File name of the source, or the whole source when it has no path components
    pub fn source_name(&self) -> &str {
        std::path::Path::new(&self.source)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.source)
    }
}

//
// ================= Corpus =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub source: String,
    pub chunk_index: usize,
    pub text: String,
}

//
// ================= Responses =================
//

/// Terminal output of one routing call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentResponse {
    pub agent_type: String,
    pub response: String,
    pub confidence: f32,
    pub sources_used: Vec<String>,
    pub reasoning: String,
}

/// Whether a handler had any evidence to work from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "kind", content = "chunks")]
pub enum Evidence {
    Grounded(usize),
    Empty,
}

impl Evidence {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Evidence::Empty
        } else {
            Evidence::Grounded(count)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerOutcome {
    pub response: AgentResponse,
    pub evidence: Evidence,
}

//
// ================= Routing =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum FallbackReason {
    SubstrateUnavailable(String),
    ClassificationFailed(String),
    NoHandler(IntentLabel),
    HandlerFailed { label: IntentLabel, error: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::SubstrateUnavailable(reason) => {
                write!(f, "substrate unavailable: {}", reason)
            }
            FallbackReason::ClassificationFailed(error) => {
                write!(f, "classification failed: {}", error)
            }
            FallbackReason::NoHandler(label) => write!(f, "no handler registered for {}", label),
            FallbackReason::HandlerFailed { label, error } => {
                write!(f, "{} handler failed: {}", label, error)
            }
        }
    }
}

/// How a routing call was resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "route")]
pub enum RouteDecision {
    Specialized { intent: Intent, evidence: Evidence },
    Fallback { intent: Option<Intent>, reason: FallbackReason },
}

impl RouteDecision {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RouteDecision::Fallback { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedResponse {
    pub route_id: Uuid,
    pub decision: RouteDecision,
    pub response: AgentResponse,
    pub elapsed_ms: u64,
}

//
// ================= Audit =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub route_id: Uuid,
    pub query_hash: String,
    pub query: String,
    pub decision: RouteDecision,
    pub agent_type: String,
    pub confidence: f32,
    pub sources_count: usize,
    pub created_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}
