//! Condition table loading.
//!
//! The table is a CSV file with the header
//! `symptoms_1,symptoms_2,symptoms_3,symptoms_4,symptoms_5,conclusion,treatment`. It is read
//! once at startup and shared read-only for the lifetime of the process.
//!
//! A missing or unreadable file is not fatal: [`ConditionTable::load_or_builtin`] logs the
//! failure and serves the small built-in table instead, so the endpoints keep working on a fresh
//! checkout.

use crate::constants::{DEFAULT_TREATMENT, SYMPTOM_COLUMNS, SYMPTOM_SLOTS, UNKNOWN_DIAGNOSIS};
use crate::{Symptom, SymptomError, SymptomResult};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One row of the symptom-to-diagnosis lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionRecord {
    slots: [String; SYMPTOM_SLOTS],
    present: Vec<Symptom>,
    diagnosis: String,
    treatment: String,
}

impl ConditionRecord {
    /// Builds a record from raw slot text.
    ///
    /// Slots keep their raw text; blank and placeholder slots are skipped when computing the
    /// record's symptom set.
    pub fn new(
        slots: [&str; SYMPTOM_SLOTS],
        diagnosis: impl Into<String>,
        treatment: impl Into<String>,
    ) -> Self {
        let slots = slots.map(|s| s.trim().to_string());
        let present = slots.iter().filter_map(|s| Symptom::parse(s).ok()).collect();
        Self {
            slots,
            present,
            diagnosis: diagnosis.into(),
            treatment: treatment.into(),
        }
    }

    /// Raw slot text, including blank slots.
    pub fn slots(&self) -> &[String; SYMPTOM_SLOTS] {
        &self.slots
    }

    /// The non-empty slots, case-folded, in slot order.
    pub fn symptoms(&self) -> &[Symptom] {
        &self.present
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.present.contains(symptom)
    }

    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    pub fn treatment(&self) -> &str {
        &self.treatment
    }
}

/// Where the loaded table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    BuiltIn,
}

/// The full, immutable condition table.
#[derive(Debug, Clone)]
pub struct ConditionTable {
    records: Vec<ConditionRecord>,
    source: DatasetSource,
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    symptoms_1: Option<String>,
    #[serde(default)]
    symptoms_2: Option<String>,
    #[serde(default)]
    symptoms_3: Option<String>,
    #[serde(default)]
    symptoms_4: Option<String>,
    #[serde(default)]
    symptoms_5: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    treatment: Option<String>,
}

impl CsvRow {
    fn to_record(&self) -> ConditionRecord {
        let slots = [
            slot_text(&self.symptoms_1),
            slot_text(&self.symptoms_2),
            slot_text(&self.symptoms_3),
            slot_text(&self.symptoms_4),
            slot_text(&self.symptoms_5),
        ];
        let diagnosis = self
            .conclusion
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_DIAGNOSIS.into());
        let treatment = self
            .treatment
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TREATMENT.into());

        ConditionRecord::new(slots, diagnosis, treatment)
    }
}

fn slot_text(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or("")
}

impl ConditionTable {
    /// Wrap an already-built set of records.
    pub fn new(records: Vec<ConditionRecord>, source: DatasetSource) -> Self {
        Self { records, source }
    }

    /// The documented fallback table used when no dataset file can be read.
    pub fn builtin() -> Self {
        let records = vec![
            ConditionRecord::new(
                ["fever", "headache", "cough", "fatigue", "body aches"],
                "Common Cold",
                "Rest and fluids",
            ),
            ConditionRecord::new(
                ["nausea", "vomiting", "stomach ache", "diarrhea", "fatigue"],
                "Gastroenteritis",
                "Hydration and rest",
            ),
            ConditionRecord::new(
                [
                    "headache",
                    "nausea",
                    "dizziness",
                    "fatigue",
                    "sensitivity to light",
                ],
                "Migraine",
                "Rest in dark room and pain medication",
            ),
        ];
        Self::new(records, DatasetSource::BuiltIn)
    }

    /// Reads the table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::DatasetLoad` if the file cannot be opened, the header is missing a
    /// required column, or no row could be parsed.
    pub fn from_csv_path(path: &Path) -> SymptomResult<Self> {
        let load_err = |reason: String| SymptomError::DatasetLoad {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        let records = read_records(file).map_err(load_err)?;
        Ok(Self::new(records, DatasetSource::File(path.to_path_buf())))
    }

    /// Reads the table from `path`, falling back to [`ConditionTable::builtin`] on any failure.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::from_csv_path(path) {
            Ok(table) => {
                tracing::info!(
                    "loaded {} condition records from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                tracing::warn!("{e}; using built-in condition table");
                Self::builtin()
            }
        }
    }

    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn read_records<R: Read>(reader: R) -> Result<Vec<ConditionRecord>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    for column in SYMPTOM_COLUMNS.into_iter().chain(["conclusion", "treatment"]) {
        if !headers.iter().any(|h| h == column) {
            return Err(format!("missing column `{column}`"));
        }
    }

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => records.push(row.to_record()),
            // +2: one for the header, one for 1-based numbering.
            Err(e) => tracing::warn!("skipping dataset row {}: {e}", line + 2),
        }
    }

    if records.is_empty() {
        return Err("no condition rows".into());
    }
    Ok(records)
}
