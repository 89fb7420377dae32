//! Condition matching.
//!
//! Scores a comma-separated symptom list against every record of the condition table. A
//! record's score is the number of distinct query symptoms that appear verbatim (after
//! case-folding) among its symptom slots; there is no fuzzy matching.
//!
//! ## Ranking
//!
//! Records scoring zero are dropped, the rest are stably sorted by score (highest first) so that
//! ties keep dataset order, and the first [`MAX_MATCHES`] are returned.

use crate::constants::{MAX_MATCHES, MAX_SAMPLE_SYMPTOMS};
use crate::dataset::{ConditionRecord, ConditionTable};
use crate::search::search_url;
use crate::{Symptom, SymptomError, SymptomResult};
use std::collections::HashSet;
use std::sync::Arc;

/// One ranked candidate for a symptom query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub diagnosis: String,
    pub treatment: String,
    pub match_score: usize,
    pub total_symptoms: usize,
    pub symptoms: Vec<Symptom>,
}

impl MatchResult {
    fn scored(record: &ConditionRecord, match_score: usize) -> Self {
        Self {
            diagnosis: record.diagnosis().to_string(),
            treatment: record.treatment().to_string(),
            match_score,
            total_symptoms: record.symptoms().len(),
            symptoms: record.symptoms().to_vec(),
        }
    }
}

/// Result of a successful match query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matches {
        symptoms_entered: Vec<Symptom>,
        matches: Vec<MatchResult>,
    },
    /// Nothing in the table matched; `search_url` points at an external search instead.
    NoMatch {
        symptoms_entered: Vec<Symptom>,
        search_url: String,
    },
}

/// A distinct (diagnosis, treatment) pair from the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionSummary {
    pub diagnosis: String,
    pub treatment: String,
}

/// Summary figures about the loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetStats {
    pub total_records: usize,
    pub distinct_diagnoses: usize,
    pub sample_symptoms: Vec<String>,
}

/// Pure read-only queries over the condition table.
#[derive(Clone, Debug)]
pub struct ConditionMatcher {
    table: Arc<ConditionTable>,
}

impl ConditionMatcher {
    pub fn new(table: Arc<ConditionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ConditionTable {
        &self.table
    }

    /// Scores `input` (comma-separated symptoms) against the table.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::InvalidInput` if the input is blank or contains no symptom once
    /// empty tokens are discarded. The message is suitable for showing to the user.
    pub fn match_symptoms(&self, input: &str) -> SymptomResult<MatchOutcome> {
        if input.trim().is_empty() {
            return Err(SymptomError::InvalidInput(
                "Please enter some symptoms to analyze.".into(),
            ));
        }

        let symptoms = Symptom::parse_list(input);
        if symptoms.is_empty() {
            return Err(SymptomError::InvalidInput(
                "Please enter valid symptoms separated by commas.".into(),
            ));
        }

        let mut matches: Vec<MatchResult> = self
            .table
            .records()
            .iter()
            .filter_map(|record| {
                let score = symptoms.iter().filter(|s| record.contains(s)).count();
                (score > 0).then(|| MatchResult::scored(record, score))
            })
            .collect();

        if matches.is_empty() {
            let search_url = search_url(&symptoms, Some("symptoms"));
            return Ok(MatchOutcome::NoMatch {
                symptoms_entered: symptoms,
                search_url,
            });
        }

        // sort_by is stable, so equal scores keep dataset order.
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches.truncate(MAX_MATCHES);

        Ok(MatchOutcome::Matches {
            symptoms_entered: symptoms,
            matches,
        })
    }

    /// Distinct (diagnosis, treatment) pairs in first-occurrence order.
    pub fn list_conditions(&self) -> Vec<ConditionSummary> {
        let mut seen = HashSet::new();
        self.table
            .records()
            .iter()
            .map(|record| ConditionSummary {
                diagnosis: record.diagnosis().to_string(),
                treatment: record.treatment().to_string(),
            })
            .filter(|summary| seen.insert(summary.clone()))
            .collect()
    }

    pub fn stats(&self) -> DatasetStats {
        let records = self.table.records();
        let distinct_diagnoses = records
            .iter()
            .map(ConditionRecord::diagnosis)
            .collect::<HashSet<_>>()
            .len();

        let mut sample_symptoms: Vec<String> = Vec::new();
        for record in records {
            if sample_symptoms.len() == MAX_SAMPLE_SYMPTOMS {
                break;
            }
            let first = &record.slots()[0];
            if Symptom::parse(first).is_ok() && !sample_symptoms.contains(first) {
                sample_symptoms.push(first.clone());
            }
        }

        DatasetStats {
            total_records: records.len(),
            distinct_diagnoses,
            sample_symptoms,
        }
    }
}
