//! Environment-driven configuration
//!
//! Values come from the process environment (optionally seeded from `.env`
//! by the binary). Every field has a default except the Gemini API key.

use crate::audit::DEFAULT_AUDIT_CAPACITY;
use crate::error::OrchestrationError;
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key_here", "mock_key"];

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub corpus_dir: PathBuf,
    pub index_path: PathBuf,
    pub generation_timeout: Duration,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Routing records kept in the audit log
    pub audit_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            corpus_dir: PathBuf::from("synthetic_docs"),
            index_path: PathBuf::from("index/docs.jsonl"),
            generation_timeout: Duration::from_secs(30),
            chunk_size: 800,
            chunk_overlap: 100,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }
}

impl RouterConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key.as_str()));

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            corpus_dir: lookup("CORPUS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_dir),
            index_path: lookup("INDEX_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.index_path),
            generation_timeout: parse_var(&lookup, "GENERATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.generation_timeout),
            chunk_size: parse_var(&lookup, "CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            chunk_overlap: parse_var(&lookup, "CHUNK_OVERLAP")?.unwrap_or(defaults.chunk_overlap),
            audit_capacity: match parse_var(&lookup, "AUDIT_CAPACITY")? {
                Some(0) => {
                    return Err(OrchestrationError::ConfigError(
                        "AUDIT_CAPACITY must be at least 1".to_string(),
                    ))
                }
                Some(capacity) => capacity,
                None => defaults.audit_capacity,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            OrchestrationError::ConfigError(format!("{} has invalid value {:?}: {}", key, raw, e))
        }),
        None => Ok(None),
    }
}
