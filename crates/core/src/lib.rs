//! # Symptom Core
//!
//! Core logic for the symptom checker backend.
//!
//! This crate contains the data operations behind every endpoint:
//! - Loading the condition table from CSV (with a built-in fallback table)
//! - Scoring free-text symptom lists against the table
//! - The legacy webhook dialogue, as a pure state transition
//! - The chat assistant: provider call with timeout, keyword fallback scripts
//!
//! **No API concerns**: HTTP routing, CORS and JSON envelopes belong in `api-rest` and
//! `api-shared`.

pub mod chat;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod dialogue;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod matcher;
pub mod search;

pub use chat::{ChatAssistant, ChatReply, ChatSource, GenerationConfig, Generator, ProviderCheck};
pub use config::{AiProviderConfig, CoreConfig};
pub use dataset::{ConditionRecord, ConditionTable, DatasetSource};
pub use dialogue::{
    CandidatePicker, DialogueReply, DialogueResolver, DialogueSession, DialogueStep, RandomPicker,
    YesNo,
};
pub use error::{SymptomError, SymptomResult};
pub use fallback::FallbackTopic;
pub use gemini::GeminiClient;
pub use matcher::{ConditionMatcher, ConditionSummary, DatasetStats, MatchOutcome, MatchResult};
pub use symptom_types::{NonEmptyText, Symptom, TextError};
