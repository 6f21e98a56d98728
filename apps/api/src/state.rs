use std::sync::Arc;

use crate::config::Config;
use crate::interview::service::InterviewService;
use crate::interview::store::SessionStore;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the completion client; every model call goes through it.
    pub interview: InterviewService,
    /// Live sessions. In-memory only, lost on restart.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            config,
            interview: InterviewService::new(llm),
            sessions: SessionStore::new(),
        }
    }
}
