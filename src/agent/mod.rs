//! Query orchestrator
//!
//! QUERY → CLASSIFY → DISPATCH → RESPOND, with every failure diverted to the
//! fallback handler inside the same call. Nothing raised by the classifier
//! or a handler reaches the caller.

use crate::audit::{compute_query_hash, AuditLog};
use crate::classifier::{IntentClassifier, KeywordClassifier};
use crate::generation::GenerationCapability;
use crate::handlers::{create_default_registry, AgentDeps, FallbackHandler, HandlerRegistry};
use crate::models::{
    AgentResponse, FallbackReason, HandlerOutcome, Intent, RouteDecision, RoutedResponse,
    RoutingRecord,
};
use crate::retrieval::RetrievalAdapter;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Classification + generation capability, decided once at construction
pub enum Substrate {
    Live(LiveSubstrate),
    Unavailable { reason: String },
}

pub struct LiveSubstrate {
    classifier: Box<dyn IntentClassifier>,
    registry: HandlerRegistry,
    deps: AgentDeps,
}

impl Substrate {
    pub fn live(
        classifier: Box<dyn IntentClassifier>,
        registry: HandlerRegistry,
        deps: AgentDeps,
    ) -> Self {
        Substrate::Live(LiveSubstrate {
            classifier,
            registry,
            deps,
        })
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Substrate::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Substrate::Live(_))
    }
}

/// Result of the specialized path, before fallback is applied
enum Dispatch {
    Answered {
        intent: Intent,
        outcome: HandlerOutcome,
    },
    Divert {
        intent: Option<Intent>,
        reason: FallbackReason,
    },
}

/// Main orchestrator: owns the substrate, the fallback, and the audit trail
pub struct Orchestrator {
    substrate: Substrate,
    retriever: Arc<dyn RetrievalAdapter>,
    fallback: FallbackHandler,
    audit_log: AuditLog,
}

impl Orchestrator {
    pub fn new(substrate: Substrate, retriever: Arc<dyn RetrievalAdapter>) -> Self {
        info!(available = substrate.is_available(), "Orchestrator initialized");

        Self {
            substrate,
            retriever,
            fallback: FallbackHandler::new(),
            audit_log: AuditLog::new(),
        }
    }

    /// Keyword classifier and the four default handlers
    pub fn with_defaults(
        retriever: Arc<dyn RetrievalAdapter>,
        generator: Arc<dyn GenerationCapability>,
        generation_timeout: Duration,
    ) -> Self {
        let deps = AgentDeps::new(retriever.clone(), generator, generation_timeout);
        let substrate = Substrate::live(
            Box::new(KeywordClassifier::new()),
            create_default_registry(),
            deps,
        );
        Self::new(substrate, retriever)
    }

    /// Fallback-only orchestrator
    pub fn without_substrate(retriever: Arc<dyn RetrievalAdapter>, reason: impl Into<String>) -> Self {
        Self::new(Substrate::unavailable(reason), retriever)
    }

    /// Replace the default audit log, e.g. one sized from `RouterConfig::audit_capacity`
    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.audit_log = audit_log;
        self
    }

    pub fn substrate(&self) -> &Substrate {
        &self.substrate
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    /// Route a query and return only the response
    pub async fn route_query(&self, query: &str) -> AgentResponse {
        self.route_query_traced(query).await.response
    }

    /// Route a query and report how it was resolved
    pub async fn route_query_traced(&self, query: &str) -> RoutedResponse {
        let start = Instant::now();
        let route_id = Uuid::new_v4();

        debug!(%route_id, query, "Routing query");

        let dispatch = match &self.substrate {
            Substrate::Unavailable { reason } => Dispatch::Divert {
                intent: None,
                reason: FallbackReason::SubstrateUnavailable(reason.clone()),
            },
            Substrate::Live(live) => Self::dispatch(live, query).await,
        };

        let (response, decision) = match dispatch {
            Dispatch::Answered { intent, outcome } => (
                outcome.response,
                RouteDecision::Specialized {
                    intent,
                    evidence: outcome.evidence,
                },
            ),
            Dispatch::Divert { intent, reason } => {
                warn!(%route_id, %reason, "Using fallback mode");
                let response = self.fallback.respond(query, self.retriever.as_ref()).await;
                (response, RouteDecision::Fallback { intent, reason })
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.audit_log
            .record(RoutingRecord {
                route_id,
                query_hash: compute_query_hash(query),
                query: query.to_string(),
                decision: decision.clone(),
                agent_type: response.agent_type.clone(),
                confidence: response.confidence,
                sources_count: response.sources_used.len(),
                created_at: Utc::now(),
                elapsed_ms,
            })
            .await;

        info!(
            %route_id,
            agent = %response.agent_type,
            confidence = response.confidence,
            elapsed_ms,
            "Query answered"
        );

        RoutedResponse {
            route_id,
            decision,
            response,
            elapsed_ms,
        }
    }

    async fn dispatch(live: &LiveSubstrate, query: &str) -> Dispatch {
        // === CLASSIFY ===
        let intent = match live.classifier.classify(query) {
            Ok(intent) => intent,
            Err(e) => {
                warn!("Query classification failed: {}", e);
                return Dispatch::Divert {
                    intent: None,
                    reason: FallbackReason::ClassificationFailed(e.to_string()),
                };
            }
        };

        info!(
            label = %intent.label,
            confidence = intent.confidence,
            reasoning = %intent.reasoning,
            "Query classification"
        );

        // === DISPATCH ===
        let Some(handler) = live.registry.get(intent.label) else {
            let reason = FallbackReason::NoHandler(intent.label);
            return Dispatch::Divert {
                intent: Some(intent),
                reason,
            };
        };

        info!(agent = handler.agent_type(), "Routing to handler");

        match handler.handle(query, &live.deps).await {
            Ok(outcome) => Dispatch::Answered { intent, outcome },
            Err(e) => {
                warn!(agent = handler.agent_type(), "Handler execution failed: {}", e);
                let reason = FallbackReason::HandlerFailed {
                    label: intent.label,
                    error: e.to_string(),
                };
                Dispatch::Divert {
                    intent: Some(intent),
                    reason,
                }
            }
        }
    }
}
