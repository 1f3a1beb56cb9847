//! Generation capability seam
//!
//! Handlers never talk to a model directly; they go through this trait so the
//! substrate can be swapped (Gemini, a local model, a test double).

use crate::models::RetrievedChunk;
use crate::Result;
use async_trait::async_trait;

/// Single request/response exchange with a language model
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    async fn generate(&self, instruction: &str, context: &[RetrievedChunk]) -> Result<String>;
}

/// Render retrieved chunks as a prompt section
pub fn render_context(context: &[RetrievedChunk]) -> String {
    if context.is_empty() {
        return "No relevant documents were retrieved.".to_string();
    }

    let mut out = String::from("Retrieved document excerpts:\n");
    for (i, chunk) in context.iter().enumerate() {
        out.push_str(&format!(
            "\n[{}] {} (score {:.3})\n{}\n",
            i + 1,
            chunk.source_name(),
            chunk.score,
            chunk.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_context() {
        assert_eq!(render_context(&[]), "No relevant documents were retrieved.");
    }

    #[test]
    fn test_render_context_numbers_chunks() {
        let context = vec![
            RetrievedChunk {
                source: "docs/invoice_1003.txt".to_string(),
                score: 0.812,
                text: "Invoice INV-1003".to_string(),
            },
            RetrievedChunk {
                source: "docs/statement_02.txt".to_string(),
                score: 0.5,
                text: "Closing balance".to_string(),
            },
        ];

        let rendered = render_context(&context);
        assert!(rendered.contains("[1] invoice_1003.txt (score 0.812)"));
        assert!(rendered.contains("[2] statement_02.txt"));
        assert!(rendered.contains("Closing balance"));
    }
}
