//! Request and response bodies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Lifespan (in turns) of the context returned to the conversational platform.
pub const CONTEXT_LIFESPAN: u32 = 15;
/// Suffix appended to the caller's session path to name the dialogue context.
pub const CONTEXT_SUFFIX: &str = "/contexts/symptom_context";
/// Value of `source` in every webhook response.
pub const WEBHOOK_SOURCE: &str = "webhookdata";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
    pub message: String,
    pub endpoints: Vec<String>,
}

// ---------------------------------------------------------------------------
// Symptom matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeReq {
    /// Comma-separated symptoms, e.g. `fever, headache`.
    #[serde(default)]
    pub symptoms: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchDto {
    pub condition: String,
    pub treatment: String,
    pub match_score: u32,
    pub total_symptoms: u32,
    pub symptoms: Vec<String>,
}

/// Outcome of `/analyze`.
///
/// `error: true` carries only `message`. A successful match carries `symptoms_entered`,
/// `matches` and `disclaimer`; an empty match carries `message` and `search_url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRes {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms_entered: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<MatchDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConditionDto {
    pub conclusion: String,
    pub treatment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AiStatus {
    Configured,
    NotConfigured,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    pub total_conditions: u32,
    pub unique_conditions: u32,
    pub sample_symptoms: Vec<String>,
    pub ai_status: AiStatus,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatSourceDto {
    Ai,
    Fallback,
    System,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub response: String,
    pub source: ChatSourceDto,
    /// RFC 3339 time the reply was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderTestRes {
    /// `success` or `error`.
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Legacy webhook
// ---------------------------------------------------------------------------

/// Turn request from the conversational platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookReq {
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QueryResult {
    #[serde(default)]
    pub parameters: Option<WebhookParameters>,
}

/// Entities parsed by the platform plus the parameters of our previous context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct WebhookParameters {
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub new_symptoms: EntityList,
    #[serde(default)]
    pub yes_no: Option<String>,
    /// Number, numeric string or empty string.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub index: Value,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub symptom: EntityList,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub identified: EntityList,
}

/// A list entity. The platform sends a single string or an array; `null` and `""` mean empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntityList(pub Vec<String>);

impl<'de> Deserialize<'de> for EntityList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
            Nothing(()),
        }

        Ok(EntityList(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
            OneOrMany::Nothing(()) => Vec::new(),
        }))
    }
}

impl WebhookParameters {
    /// The `index` parameter as a position, if it holds one.
    pub fn index(&self) -> Option<usize> {
        match &self.index {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
                .and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRes {
    pub fulfillment_text: String,
    pub output_contexts: Vec<OutputContext>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputContext {
    pub name: String,
    pub lifespan_count: u32,
    pub parameters: ContextParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContextParameters {
    pub identified: Vec<String>,
    pub new_symptoms: Vec<String>,
    /// Candidate position, or `""` when the dialogue was reset.
    #[schema(value_type = Object)]
    pub index: Value,
}

impl WebhookRes {
    /// Builds the response envelope for `session`.
    pub fn new(
        session: &str,
        message: String,
        identified: Vec<String>,
        new_symptoms: Vec<String>,
        index: Option<usize>,
    ) -> Self {
        Self {
            fulfillment_text: message,
            output_contexts: vec![OutputContext {
                name: format!("{session}{CONTEXT_SUFFIX}"),
                lifespan_count: CONTEXT_LIFESPAN,
                parameters: ContextParameters {
                    identified,
                    new_symptoms,
                    index: index.map(Value::from).unwrap_or_else(|| Value::from("")),
                },
            }],
            source: WEBHOOK_SOURCE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn webhook_parameters_accept_strings_lists_and_nulls() {
        let req: WebhookReq = serde_json::from_value(json!({
            "session": "projects/p/agent/sessions/s1",
            "queryResult": { "parameters": {
                "new_symptoms": "",
                "yes_no": null,
                "index": "2",
                "symptom": "Fever",
                "identified": ["headache"]
            }}
        }))
        .unwrap();

        let params = req.query_result.unwrap().parameters.unwrap();
        assert!(params.new_symptoms.0.is_empty());
        assert_eq!(params.yes_no, None);
        assert_eq!(params.symptom.0, vec!["Fever"]);
        assert_eq!(params.identified.0, vec!["headache"]);
        assert_eq!(params.index(), Some(2));
    }

    #[test]
    fn index_accepts_numbers_and_rejects_junk() {
        let with = |index: Value| WebhookParameters {
            index,
            ..Default::default()
        };
        assert_eq!(with(json!(1)).index(), Some(1));
        assert_eq!(with(json!(3.0)).index(), Some(3));
        assert_eq!(with(json!(-1)).index(), None);
        assert_eq!(with(json!("")).index(), None);
        assert_eq!(with(Value::Null).index(), None);
    }

    #[test]
    fn webhook_response_keeps_platform_field_names() {
        let res = WebhookRes::new(
            "projects/p/agent/sessions/s1",
            "Are you also feeling cough. (Yes/No)".into(),
            vec!["fever".into()],
            vec!["cough".into()],
            Some(1),
        );

        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["fulfillmentText"], "Are you also feeling cough. (Yes/No)");
        assert_eq!(json["source"], "webhookdata");
        let context = &json["outputContexts"][0];
        assert_eq!(
            context["name"],
            "projects/p/agent/sessions/s1/contexts/symptom_context"
        );
        assert_eq!(context["lifespanCount"], 15);
        assert_eq!(context["parameters"]["index"], 1);
        assert_eq!(context["parameters"]["new_symptoms"][0], "cough");
    }

    #[test]
    fn reset_context_has_empty_index() {
        let res = WebhookRes::new("s", "reset".into(), Vec::new(), Vec::new(), None);
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["outputContexts"][0]["parameters"]["index"], "");
    }

    #[test]
    fn analyze_response_omits_absent_fields() {
        let res = AnalyzeRes {
            error: true,
            message: Some("Please enter some symptoms to analyze.".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json, json!({ "error": true, "message": "Please enter some symptoms to analyze." }));
    }
}
