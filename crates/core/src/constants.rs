//! Constants used throughout the symptom core crate.
//!
//! Defaults for configuration live here so that binaries, the CLI and tests agree on them.

use std::time::Duration;

/// Default path of the condition table when `SYMPTOMS_CSV` is not set.
pub const DEFAULT_DATASET_PATH: &str = "symptoms.csv";

/// Number of symptom columns in the condition table.
pub const SYMPTOM_SLOTS: usize = 5;

/// CSV header names of the symptom columns, in slot order.
pub const SYMPTOM_COLUMNS: [&str; SYMPTOM_SLOTS] = [
    "symptoms_1",
    "symptoms_2",
    "symptoms_3",
    "symptoms_4",
    "symptoms_5",
];

/// Diagnosis used for rows with a blank `conclusion` cell.
pub const UNKNOWN_DIAGNOSIS: &str = "Unknown";

/// Treatment used for rows with a blank `treatment` cell.
pub const DEFAULT_TREATMENT: &str = "Consult a doctor";

/// Maximum number of ranked matches returned by the matcher.
pub const MAX_MATCHES: usize = 3;

/// Maximum number of first-slot symptoms reported in dataset stats.
pub const MAX_SAMPLE_SYMPTOMS: usize = 10;

/// Base URL for external search suggestions.
pub const SEARCH_BASE_URL: &str = "https://www.google.com/search";

/// Disclaimer attached to every successful match response.
pub const DISCLAIMER: &str = "This is for informational purposes only. Please consult a healthcare professional for proper diagnosis and treatment.";

/// Default Gemini model name.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";

/// Default Gemini REST API base.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default bound on a single provider call.
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(20);

/// Note attached to chat replies served from fallback scripts.
pub const FALLBACK_NOTE: &str =
    "AI service is currently limited. For best results, consult a healthcare professional.";
