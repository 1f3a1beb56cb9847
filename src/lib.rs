//! Financial Document Query Router
//!
//! Answers natural-language questions over invoices and bank statements by
//! classifying the query and handing it to a specialist:
//! - Invoice Analyzer: vendors, line items, totals
//! - Payment Verifier: transactions, balances, due dates
//! - Summary Agent: cross-document trends
//! - General: plain retrieval
//!
//! ROUTING LOOP:
//! QUERY → CLASSIFY → DISPATCH → RESPOND, with FALLBACK on any failure

pub mod agent;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod handlers;
pub mod models;
pub mod retrieval;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use agent::{Orchestrator, Substrate};
pub use classifier::{IntentClassifier, KeywordClassifier};
