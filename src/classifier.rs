//! Query Classifier
//!
//! Scores a query against three domain keyword sets and picks an intent:
//! - Invoice analysis: vendors, line items, totals, tax
//! - Payment verification: transactions, balances, deposits
//! - Summary: overviews, trends, cross-document comparisons
//!
//! Anything without a keyword hit is treated as a general query.

use crate::models::{Intent, IntentLabel};
use crate::Result;

/// Static keyword lists — zero allocation
const INVOICE_KEYWORDS: &[&str] = &[
    "invoice", "vendor", "line item", "total", "subtotal", "tax", "billing",
];

const PAYMENT_KEYWORDS: &[&str] = &[
    "payment", "transaction", "due date", "paid", "balance", "deposit", "withdrawal",
];

const SUMMARY_KEYWORDS: &[&str] = &[
    "summary", "overview", "trend", "pattern", "all", "across", "compare",
];

/// Tie-break order: earlier entries win when scores are equal
const PRIORITY: &[(IntentLabel, &str)] = &[
    (IntentLabel::InvoiceAnalysis, "invoice"),
    (IntentLabel::PaymentVerification, "payment"),
    (IntentLabel::Summary, "summary"),
];

const BASE_CONFIDENCE: f32 = 0.5;
const CONFIDENCE_PER_KEYWORD: f32 = 0.1;
const MAX_CONFIDENCE: f32 = 0.9;

/// Anything that can turn a query into an intent
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, query: &str) -> Result<Intent>;
}

/// Keyword classifier (literal substring matching, no tokenization)
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query; pure and infallible
    pub fn classify_query(query: &str) -> Intent {
        let lowered = query.to_lowercase();

        let scores = [
            keyword_score(&lowered, INVOICE_KEYWORDS),
            keyword_score(&lowered, PAYMENT_KEYWORDS),
            keyword_score(&lowered, SUMMARY_KEYWORDS),
        ];

        let max_score = scores.iter().copied().max().unwrap_or(0);

        if max_score == 0 {
            return Intent {
                label: IntentLabel::General,
                confidence: BASE_CONFIDENCE,
                reasoning: "No specific keywords detected, treating as general query".to_string(),
            };
        }

        // PRIORITY and scores share the same ordering
        let (label, domain) = PRIORITY
            .iter()
            .zip(scores.iter())
            .find(|(_, score)| **score == max_score)
            .map(|(entry, _)| *entry)
            .unwrap_or((IntentLabel::General, "general"));

        Intent {
            label,
            confidence: (BASE_CONFIDENCE + max_score as f32 * CONFIDENCE_PER_KEYWORD)
                .min(MAX_CONFIDENCE),
            reasoning: format!("Detected {} {}-related keywords", max_score, domain),
        }
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, query: &str) -> Result<Intent> {
        Ok(Self::classify_query(query))
    }
}

fn keyword_score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(**kw)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_invoice_keyword() {
        let intent = KeywordClassifier::classify_query("invoice total");
        assert_eq!(intent.label, IntentLabel::InvoiceAnalysis);
        assert!((intent.confidence - 0.7).abs() < 1e-6);
        assert_eq!(intent.reasoning, "Detected 2 invoice-related keywords");
    }

    #[test]
    fn test_tie_prefers_invoice_over_payment() {
        let intent = KeywordClassifier::classify_query("invoice payment");
        assert_eq!(intent.label, IntentLabel::InvoiceAnalysis);
    }

    #[test]
    fn test_tie_prefers_payment_over_summary() {
        let intent = KeywordClassifier::classify_query("payment overview");
        assert_eq!(intent.label, IntentLabel::PaymentVerification);
    }

    #[test]
    fn test_summary_queries() {
        let cases = vec![
            "Provide a summary of all financial activity",
            "What are the key trends across all documents?",
        ];

        for c in cases {
            assert_eq!(
                KeywordClassifier::classify_query(c).label,
                IntentLabel::Summary,
                "query: {}",
                c
            );
        }
    }

    #[test]
    fn test_payment_queries() {
        let cases = vec![
            "Are there any overdue payments or past due amounts?",
            "What is the average transaction amount?",
        ];

        for c in cases {
            assert_eq!(
                KeywordClassifier::classify_query(c).label,
                IntentLabel::PaymentVerification,
                "query: {}",
                c
            );
        }
    }

    #[test]
    fn test_general_when_no_keywords() {
        let intent = KeywordClassifier::classify_query("What documents do we have?");
        assert_eq!(intent.label, IntentLabel::General);
        assert_eq!(intent.confidence, 0.5);
        assert!(!intent.reasoning.is_empty());
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let intent = KeywordClassifier::classify_query("INVOICES from VENDORS");
        assert_eq!(intent.label, IntentLabel::InvoiceAnalysis);
        assert_eq!(intent.reasoning, "Detected 2 invoice-related keywords");
    }

    #[test]
    fn test_confidence_bounds() {
        let cases = vec![
            "",
            "hi",
            "invoice vendor line item total subtotal tax billing",
            "payment transaction due date paid balance deposit withdrawal",
            "summary overview trend pattern all across compare",
            "Compare invoice totals vs bank statement deposits",
        ];

        for c in cases {
            let intent = KeywordClassifier::classify_query(c);
            assert!(
                (0.5..=0.9).contains(&intent.confidence),
                "confidence {} out of range for {:?}",
                intent.confidence,
                c
            );
        }
    }

    #[test]
    fn test_classification_is_pure() {
        let query = "Which vendor has the highest invoice total?";
        let classifier = KeywordClassifier::new();
        let first = classifier.classify(query).unwrap();
        let second = classifier.classify(query).unwrap();
        assert_eq!(first, second);
    }
}
