//! Corpus lifecycle
//!
//! Locates plain-text documents, loads them, and cuts them into overlapping
//! character windows ready for indexing. Text extraction from PDFs happens
//! upstream; this module only sees `.txt` / `.md` files.

use crate::error::OrchestrationError;
use crate::models::{Chunk, Document};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// List the documents in `dir`, sorted by path
pub fn ensure_present(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(OrchestrationError::CorpusError(format!(
            "Corpus directory {} does not exist",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);

        if path.is_file() && supported {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(OrchestrationError::CorpusError(format!(
            "No documents found in {}",
            dir.display()
        )));
    }

    paths.sort();
    info!(dir = %dir.display(), documents = paths.len(), "Corpus located");
    Ok(paths)
}

/// Read every path; blank files are skipped with a warning
pub fn load_corpus(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            warn!(path = %path.display(), "Skipping empty document");
            continue;
        }
        documents.push(Document {
            source: path.to_string_lossy().into_owned(),
            text,
        });
    }

    Ok(documents)
}

/// Split documents into windows of `chunk_size` chars sharing `overlap` chars
pub fn chunk_documents(documents: &[Document], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let step = if overlap < chunk_size {
        chunk_size - overlap
    } else {
        chunk_size
    };

    let mut chunks = Vec::new();

    for document in documents {
        let chars: Vec<char> = document.text.chars().collect();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < chars.len() {
            let end = (start + chunk_size).min(chars.len());
            let text: String = chars[start..end].iter().collect();
            let text = text.trim();

            if !text.is_empty() {
                chunks.push(Chunk {
                    source: document.source.clone(),
                    chunk_index,
                    text: text.to_string(),
                });
                chunk_index += 1;
            }

            if end == chars.len() {
                break;
            }
            start += step;
        }

        debug!(source = %document.source, chunks = chunk_index, "Document chunked");
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(text: &str) -> Document {
        Document {
            source: "docs/invoice_1003.txt".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_chunk_windows_overlap() {
        let chunks = chunk_documents(&[document("abcdefghij")], 4, 1);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        assert_eq!(texts, vec!["abcd", "defg", "ghij"]);
        assert_eq!(chunks[2].chunk_index, 2);
    }

    #[test]
    fn test_chunk_short_document_is_single_chunk() {
        let chunks = chunk_documents(&[document("Invoice INV-1003")], 800, 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Invoice INV-1003");
    }

    #[test]
    fn test_chunk_overlap_not_smaller_than_size() {
        let chunks = chunk_documents(&[document("abcdef")], 3, 5);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abc", "def"]);
    }

    #[test]
    fn test_chunk_handles_multibyte_text() {
        let chunks = chunk_documents(&[document("€€€€€€")], 4, 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "€€€€");
    }

    #[test]
    fn test_ensure_present_lists_supported_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_statement.txt"), "Deposit $100").unwrap();
        std::fs::write(dir.path().join("a_invoice.md"), "Invoice INV-1").unwrap();
        std::fs::write(dir.path().join("scan.pdf"), "%PDF").unwrap();

        let paths = ensure_present(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a_invoice.md", "b_statement.txt"]);
    }

    #[test]
    fn test_ensure_present_rejects_missing_or_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_present(dir.path()).is_err());
        assert!(ensure_present(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_load_corpus_skips_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("invoice.txt");
        let blank = dir.path().join("blank.txt");
        std::fs::write(&full, "Invoice INV-7 total $12").unwrap();
        std::fs::write(&blank, "   \n").unwrap();

        let documents = load_corpus(&[full, blank]).unwrap();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].source.ends_with("invoice.txt"));
    }
}
