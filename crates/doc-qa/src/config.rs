//! Configuration for the document assistant
//!
//! Values are layered: built-in defaults, then an optional TOML file, then `DOCQA_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "DOCQA_CONFIG";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Summary configuration
    pub summary: SummaryConfig,
    /// Preview configuration
    pub preview: PreviewConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
    /// Live sessions kept at once; creating one more evicts the least recently used
    pub max_sessions: usize,
    /// Sessions idle for longer than this are dropped by the sweeper
    pub session_ttl_secs: u64,
    /// How often the sweeper runs
    pub session_sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7860,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024,
            max_sessions: 256,
            session_ttl_secs: 60 * 60,
            session_sweep_interval_secs: 60,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma2:2b".to_string(),
            temperature: 0.1,
            timeout_secs: 600,
            max_retries: 0,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama embedding model (all-minilm is all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-minilm".to_string(),
            dimensions: 384,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the LLM per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Summary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Characters of extracted text sent to the summary prompt
    pub max_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { max_chars: 2000 }
    }
}

/// Preview configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Lines shown for text files
    pub text_lines: usize,
    /// Paragraphs shown for DOCX files
    pub docx_paragraphs: usize,
    /// Target width in pixels of the rendered first PDF page
    pub pdf_width: u16,
    /// Directory containing the pdfium shared library (system search path if unset)
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            text_lines: 20,
            docx_paragraphs: 10,
            pdf_width: 800,
            pdfium_library_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML text; missing sections and fields take their defaults
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply `DOCQA_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DOCQA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCQA_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("DOCQA_PORT is not a port: {}", port)))?;
        }
        if let Some(url) = lookup("DOCQA_OLLAMA_URL") {
            self.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("DOCQA_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(timeout) = lookup("DOCQA_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = timeout.parse().map_err(|_| {
                Error::Config(format!("DOCQA_LLM_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }
        if let Some(model) = lookup("DOCQA_EMBED_MODEL") {
            self.embeddings.model = model;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::Config("llm.model must not be empty".into()));
        }
        if self.embeddings.model.trim().is_empty() {
            return Err(Error::Config("embeddings.model must not be empty".into()));
        }
        if self.server.max_sessions == 0 {
            return Err(Error::Config("server.max_sessions must be at least 1".into()));
        }
        if self.server.session_sweep_interval_secs == 0 {
            return Err(Error::Config(
                "server.session_sweep_interval_secs must be at least 1".into(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".into()));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be at least 1".into()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reference_setup() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "gemma2:2b");
        assert_eq!(config.llm.timeout_secs, 600);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.summary.max_chars, 2000);
        assert_eq!(config.preview.text_lines, 20);
        assert_eq!(config.preview.docx_paragraphs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [llm]
            model = "llama3.2:3b"

            [retrieval]
            top_k = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama3.2:3b");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.chunking.chunk_size, 1024);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DOCQA_PORT", "9000"),
            ("DOCQA_OLLAMA_URL", "http://gpu-box:11434/"),
            ("DOCQA_EMBED_MODEL", "nomic-embed-text"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.base_url, "http://gpu-box:11434");
        assert_eq!(config.embeddings.model, "nomic-embed-text");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "DOCQA_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_overlap_larger_than_chunk() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.max_sessions = 0;
        assert!(config.validate().is_err());
    }
}
