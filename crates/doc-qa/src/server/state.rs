//! Shared state of the HTTP server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::assistant::DocumentAssistant;
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    assistant: DocumentAssistant,
    sessions: SessionStore,
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state backed by the configured Ollama server
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing document assistant...");
        let assistant = DocumentAssistant::from_config(&config)?;
        tracing::info!(
            "Using {} for answers and {} for embeddings",
            config.llm.model,
            config.embeddings.model
        );
        Ok(Self::with_assistant(config, assistant))
    }

    /// Create state around an existing assistant
    pub fn with_assistant(config: AppConfig, assistant: DocumentAssistant) -> Self {
        let sessions = SessionStore::new(config.server.max_sessions);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                assistant,
                sessions,
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn assistant(&self) -> &DocumentAssistant {
        &self.inner.assistant
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
