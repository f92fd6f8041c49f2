use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; each request works on its own clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no `ANTHROPIC_API_KEY` is configured; the LLM endpoints answer 503.
    pub llm: Option<LlmClient>,
}

impl AppState {
    #[cfg(test)]
    pub fn for_tests(extraction: crate::extraction::ExtractionConfig) -> Self {
        Self {
            config: Config {
                anthropic_api_key: None,
                extraction,
                port: 0,
                rust_log: "debug".to_string(),
            },
            llm: None,
        }
    }
}
