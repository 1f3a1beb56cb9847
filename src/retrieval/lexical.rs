//! In-memory lexical index
//!
//! Term-overlap scoring over pre-tokenized chunks, persisted as JSONL
//! (one chunk per line) so the index survives restarts.

use super::RetrievalAdapter;
use crate::error::OrchestrationError;
use crate::models::{Chunk, RetrievedChunk};
use crate::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "do", "for", "from", "have", "in", "is", "it", "of", "on",
    "or", "the", "there", "to", "we", "what", "which", "with",
];

struct IndexedChunk {
    chunk: Chunk,
    terms: HashSet<String>,
}

pub struct LexicalIndex {
    entries: Vec<IndexedChunk>,
}

impl LexicalIndex {
    pub fn build(chunks: Vec<Chunk>) -> Self {
        let entries = chunks
            .into_iter()
            .map(|chunk| IndexedChunk {
                terms: tokenize(&chunk.text),
                chunk,
            })
            .collect::<Vec<_>>();

        info!(chunks = entries.len(), "Lexical index built");
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    /// Persist chunks as JSONL, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            serde_json::to_writer(&mut writer, &entry.chunk)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!(path = %path.display(), chunks = self.entries.len(), "Index saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            OrchestrationError::IndexError(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let mut chunks = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let chunk: Chunk = serde_json::from_str(&line).map_err(|e| {
                OrchestrationError::IndexError(format!(
                    "{} line {}: {}",
                    path.display(),
                    line_no + 1,
                    e
                ))
            })?;
            chunks.push(chunk);
        }

        Ok(Self::build(chunks))
    }

    /// Synchronous ranking used by the async adapter
    pub fn rank(&self, query: &str, k: usize) -> Vec<RetrievedChunk> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let overlap = entry.terms.intersection(&query_terms).count();
                if overlap == 0 {
                    return None;
                }
                let norm = ((query_terms.len() * entry.terms.len()) as f32).sqrt();
                Some((overlap as f32 / norm, &entry.chunk))
            })
            .collect();

        // stable sort keeps corpus order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(score, chunk)| RetrievedChunk {
                source: chunk.source.clone(),
                score,
                text: chunk.text.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl RetrievalAdapter for LexicalIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let results = self.rank(query, k);
        debug!(k, hits = results.len(), "Lexical search");
        Ok(results)
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|token| token.trim_matches('-'))
        .filter(|token| token.len() > 1 && !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str, index: usize, text: &str) -> Chunk {
        Chunk {
            source: source.to_string(),
            chunk_index: index,
            text: text.to_string(),
        }
    }

    fn sample_index() -> LexicalIndex {
        LexicalIndex::build(vec![
            chunk("docs/invoice_1003.txt", 0, "Invoice INV-1003 from Acme Consulting. Total due $4,250.00"),
            chunk("docs/statement_01.txt", 0, "Bank statement. Deposit of $1,200. Closing balance $8,900"),
            chunk("docs/invoice_1004.txt", 0, "Invoice INV-1004 from Northwind Supplies. Subtotal $310"),
        ])
    }

    #[test]
    fn test_rank_orders_by_descending_score() {
        let index = sample_index();
        let results = index.rank("total due on invoice INV-1003", 5);

        assert!(!results.is_empty());
        assert_eq!(results[0].source, "docs/invoice_1003.txt");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_rank_respects_k() {
        let index = sample_index();
        assert_eq!(index.rank("invoice", 1).len(), 1);
        assert!(index.rank("invoice", 0).is_empty());
    }

    #[test]
    fn test_rank_without_overlap_is_empty() {
        let index = sample_index();
        assert!(index.rank("cryptocurrency mining", 5).is_empty());
        assert!(index.rank("the of and", 5).is_empty());
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_ids() {
        let terms = tokenize("Invoice INV-1003, total: $4,250.00");
        assert!(terms.contains("inv-1003"));
        assert!(terms.contains("invoice"));
        assert!(!terms.contains("$4"));
    }

    #[test]
    fn test_save_and_load_preserves_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index").join("docs.jsonl");

        let index = sample_index();
        index.save(&path).unwrap();

        let loaded = LexicalIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(
            loaded.chunks().collect::<Vec<_>>(),
            index.chunks().collect::<Vec<_>>()
        );
        assert_eq!(loaded.rank("deposit", 5)[0].source, "docs/statement_01.txt");
    }

    #[test]
    fn test_load_reports_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();

        let err = LexicalIndex::load(&path).err().unwrap();
        assert!(err.to_string().contains("line 1"));
    }

    #[tokio::test]
    async fn test_search_through_adapter() {
        let index = sample_index();
        let results = index.search("closing balance", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_name(), "statement_01.txt");
    }
}
