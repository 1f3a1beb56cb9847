//! Routing audit log
//!
//! Every routed query leaves a record: which path answered it, why, and how
//! long it took. Records are keyed by route id and kept in memory, bounded by
//! a capacity; the oldest record is evicted first.

use crate::models::RoutingRecord;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_AUDIT_CAPACITY: usize = 1024;

struct AuditStore {
    records: HashMap<Uuid, RoutingRecord>,
    /// Route ids, oldest first
    order: VecDeque<Uuid>,
}

/// Audit trail storage
pub struct AuditLog {
    store: Arc<RwLock<AuditStore>>,
    capacity: usize,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }

    /// Keeps at most `capacity` records (never fewer than one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            store: Arc::new(RwLock::new(AuditStore {
                records: HashMap::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY)),
                order: VecDeque::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY)),
            })),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn record(&self, record: RoutingRecord) -> Uuid {
        let route_id = record.route_id;
        let mut store = self.store.write().await;

        if store.records.insert(route_id, record).is_none() {
            store.order.push_back(route_id);
        }

        while store.order.len() > self.capacity {
            if let Some(evicted) = store.order.pop_front() {
                store.records.remove(&evicted);
                debug!(route_id = %evicted, "Audit record evicted");
            }
        }

        route_id
    }

    pub async fn get(&self, route_id: Uuid) -> Option<RoutingRecord> {
        let store = self.store.read().await;
        store.records.get(&route_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.records.len()
    }

    /// Most recently recorded first
    pub async fn list_recent(&self, limit: usize) -> Vec<RoutingRecord> {
        let store = self.store.read().await;

        store
            .order
            .iter()
            .rev()
            .filter_map(|route_id| store.records.get(route_id))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of answers produced by each agent type
    pub async fn count_by_agent(&self) -> HashMap<String, usize> {
        let store = self.store.read().await;

        let mut counts = HashMap::new();
        for record in store.records.values() {
            *counts.entry(record.agent_type.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA256 of the query text, hex-encoded
pub fn compute_query_hash(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FallbackReason, RouteDecision};
    use chrono::{Duration, Utc};

    fn record(agent_type: &str, minutes_ago: i64) -> RoutingRecord {
        RoutingRecord {
            route_id: Uuid::new_v4(),
            query_hash: compute_query_hash("q"),
            query: "q".to_string(),
            decision: RouteDecision::Fallback {
                intent: None,
                reason: FallbackReason::SubstrateUnavailable("no key".to_string()),
            },
            agent_type: agent_type.to_string(),
            confidence: 0.6,
            sources_count: 0,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            elapsed_ms: 1,
        }
    }

    #[test]
    fn test_query_hash_is_stable() {
        let hash = compute_query_hash("What is the total amount for invoice INV-1003?");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, compute_query_hash("What is the total amount for invoice INV-1003?"));
        assert_ne!(hash, compute_query_hash("what is the total amount for invoice inv-1003?"));
    }

    #[tokio::test]
    async fn test_record_and_list() {
        let log = AuditLog::new();
        let older = record("Fallback", 10);
        let newer = record("General", 1);
        let older_id = log.record(older).await;
        log.record(newer).await;

        assert_eq!(log.len().await, 2);
        assert_eq!(log.get(older_id).await.unwrap().agent_type, "Fallback");

        let recent = log.list_recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].agent_type, "General");

        let counts = log.count_by_agent().await;
        assert_eq!(counts.get("Fallback"), Some(&1));
        assert_eq!(counts.get("General"), Some(&1));
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let log = AuditLog::with_capacity(3);
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(log.record(record("General", 10 - i)).await);
        }

        assert_eq!(log.len().await, 3);
        assert!(log.get(ids[0]).await.is_none());
        assert!(log.get(ids[1]).await.is_none());
        assert!(log.get(ids[4]).await.is_some());

        let recent: Vec<Uuid> = log.list_recent(10).await.iter().map(|r| r.route_id).collect();
        assert_eq!(recent, vec![ids[4], ids[3], ids[2]]);
        assert_eq!(log.count_by_agent().await.get("General"), Some(&3));
    }

    #[tokio::test]
    async fn test_zero_capacity_keeps_latest() {
        let log = AuditLog::with_capacity(0);
        log.record(record("Fallback", 2)).await;
        let latest = log.record(record("General", 1)).await;

        assert_eq!(log.capacity(), 1);
        assert_eq!(log.len().await, 1);
        assert!(log.get(latest).await.is_some());
    }
}
