use std::sync::Arc;
use symptom_core::{
    ChatAssistant, ConditionMatcher, ConditionTable, CoreConfig, DatasetSource, DialogueResolver,
    GeminiClient, Generator, SymptomResult,
};

/// Application state shared across REST API handlers
///
/// Every field is read-only after startup; cloning is cheap (`Arc` inside).
#[derive(Clone)]
pub struct AppState {
    pub matcher: ConditionMatcher,
    pub resolver: DialogueResolver,
    pub chat: ChatAssistant,
}

impl AppState {
    /// Assemble state from an already-loaded table and chat assistant.
    pub fn new(table: Arc<ConditionTable>, chat: ChatAssistant) -> Self {
        Self {
            matcher: ConditionMatcher::new(table.clone()),
            resolver: DialogueResolver::new(table),
            chat,
        }
    }

    /// Load the dataset and build the AI provider client described by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the provider HTTP client cannot be built; a missing dataset
    /// falls back to the built-in table.
    pub fn from_config(cfg: &CoreConfig) -> SymptomResult<Self> {
        let table = Arc::new(ConditionTable::load_or_builtin(cfg.dataset_path()));
        match table.source() {
            DatasetSource::File(path) => {
                tracing::info!("-- Condition table: {} ({} rows)", path.display(), table.len())
            }
            DatasetSource::BuiltIn => {
                tracing::info!("-- Condition table: built-in ({} rows)", table.len())
            }
        }

        let generator: Option<Arc<dyn Generator>> = match cfg.ai_provider() {
            Some(provider) => {
                let client = GeminiClient::new(provider, cfg.ai_timeout())?;
                tracing::info!("-- AI provider configured (model {})", client.model());
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; AI chat will use fallback responses");
                None
            }
        };

        Ok(Self::new(table, ChatAssistant::new(generator, cfg.ai_timeout())))
    }
}
