//! Request handlers.
//!
//! Handlers never fail the HTTP request for bad input: malformed bodies and validation errors
//! come back as structured JSON with a 200 status, which is what the frontend and the
//! conversational platform expect.

use api_shared::{
    AiStatus, AnalyzeReq, AnalyzeRes, ChatReq, ChatRes, ChatSourceDto, ConditionDto, HealthRes,
    HealthService, MatchDto, ProviderTestRes, StatsRes, WebhookReq, WebhookRes,
};
use axum::{body::Bytes, extract::rejection::JsonRejection, extract::State, response::Json};
use symptom_core::constants::DISCLAIMER;
use symptom_core::dialogue::CLARIFY_MESSAGE;
use symptom_core::{
    ChatReply, ChatSource, DialogueSession, MatchOutcome, MatchResult, RandomPicker, Symptom,
    SymptomError, YesNo,
};

use crate::AppState;

const NO_MATCH_MESSAGE: &str =
    "No matching conditions found for your symptoms. Please consult a healthcare professional.";
const CHAT_ERROR_MESSAGE: &str = "I apologize, but I'm experiencing technical difficulties. Please consult with a healthcare professional for your medical concerns.";

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, also served at `/`.
///
/// Returns a static status payload listing the available routes.
#[axum::debug_handler(state = AppState)]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Ranked matches, a no-match hint, or a validation message", body = AnalyzeRes)
    )
)]
/// Score free-text symptoms against the condition table
///
/// # Returns
/// * `error: false` with up to three ranked `matches` and a disclaimer
/// * `error: false` with `message` and `search_url` when nothing matched
/// * `error: true` with `message` for blank or unreadable input
#[axum::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeReq>, JsonRejection>,
) -> Json<AnalyzeRes> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::error!("Analyze request rejected: {e}");
            return Json(error_res(format!("An error occurred: {}", e.body_text())));
        }
    };

    match state.matcher.match_symptoms(&req.symptoms) {
        Ok(MatchOutcome::Matches {
            symptoms_entered,
            matches,
        }) => Json(AnalyzeRes {
            error: false,
            symptoms_entered: Some(symptom_strings(&symptoms_entered)),
            matches: Some(matches.into_iter().map(match_dto).collect()),
            disclaimer: Some(DISCLAIMER.into()),
            ..Default::default()
        }),
        Ok(MatchOutcome::NoMatch { search_url, .. }) => Json(AnalyzeRes {
            error: false,
            message: Some(NO_MATCH_MESSAGE.into()),
            search_url: Some(search_url),
            ..Default::default()
        }),
        Err(e @ SymptomError::InvalidInput(_)) => Json(error_res(e.user_message())),
        Err(e) => {
            tracing::error!("Analyze error: {:?}", e);
            Json(error_res(e.user_message()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/conditions",
    responses(
        (status = 200, description = "Distinct conditions in dataset order", body = [ConditionDto])
    )
)]
/// List distinct (condition, treatment) pairs
#[axum::debug_handler]
pub async fn list_conditions(State(state): State<AppState>) -> Json<Vec<ConditionDto>> {
    let conditions = state
        .matcher
        .list_conditions()
        .into_iter()
        .map(|c| ConditionDto {
            conclusion: c.diagnosis,
            treatment: c.treatment,
        })
        .collect();
    Json(conditions)
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dataset statistics", body = StatsRes)
    )
)]
/// Basic statistics about the loaded dataset
#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Json<StatsRes> {
    let stats = state.matcher.stats();
    Json(StatsRes {
        total_conditions: saturating_u32(stats.total_records),
        unique_conditions: saturating_u32(stats.distinct_diagnoses),
        sample_symptoms: stats.sample_symptoms,
        ai_status: if state.chat.is_configured() {
            AiStatus::Configured
        } else {
            AiStatus::NotConfigured
        },
    })
}

#[utoipa::path(
    post,
    path = "/api/gemini-chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "AI or fallback reply", body = ChatRes)
    )
)]
/// Chat with the AI assistant
///
/// Falls back to canned keyword scripts whenever the provider is unavailable.
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatReq>, JsonRejection>,
) -> Json<ChatRes> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::error!("Chat request rejected: {e}");
            return Json(ChatRes {
                response: CHAT_ERROR_MESSAGE.into(),
                source: ChatSourceDto::Error,
                timestamp: None,
                note: None,
            });
        }
    };

    Json(chat_res(state.chat.reply(&req.message).await))
}

#[utoipa::path(
    get,
    path = "/api/test-gemini",
    responses(
        (status = 200, description = "Provider probe result", body = ProviderTestRes)
    )
)]
/// Probe the AI provider with a fixed prompt
#[axum::debug_handler]
pub async fn test_provider(State(state): State<AppState>) -> Json<ProviderTestRes> {
    let check = state.chat.provider_check().await;
    let configured = state.chat.is_configured();
    Json(ProviderTestRes {
        status: if check.ok { "success" } else { "error" }.into(),
        message: check.message,
        test_response: check.test_response,
        available_models: configured.then_some(check.available_models),
    })
}

#[utoipa::path(
    post,
    path = "/webhook",
    request_body = WebhookReq,
    responses(
        (status = 200, description = "Fulfillment text and the context for the next turn", body = WebhookRes)
    )
)]
/// Legacy dialogue webhook
///
/// Accepts a conversational-platform turn. The body is parsed as JSON regardless of its
/// content type, since the platform does not always send one. Session state travels in the
/// returned output context; nothing is kept server-side.
#[axum::debug_handler]
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> Json<WebhookRes> {
    let req = match serde_json::from_slice::<WebhookReq>(&body) {
        Ok(req) => req,
        Err(e) => {
            let err = SymptomError::MalformedLegacyRequest(e.to_string());
            tracing::warn!("{err}");
            return Json(clarify_res(""));
        }
    };
    Json(run_turn(&state, req))
}

fn run_turn(state: &AppState, req: WebhookReq) -> WebhookRes {
    let session_path = req.session.unwrap_or_default();
    let Some(params) = req.query_result.and_then(|q| q.parameters) else {
        let err = SymptomError::MalformedLegacyRequest("missing queryResult.parameters".into());
        tracing::warn!("{err}");
        return clarify_res(&session_path);
    };

    let session = DialogueSession {
        identified: parse_symptoms(&params.identified.0),
        candidate_index: params.index(),
        pending_new_symptoms: parse_symptoms(&params.new_symptoms.0),
        last_yes_no: YesNo::parse(params.yes_no.as_deref().unwrap_or("")),
    };
    let mentioned = parse_symptoms(&params.symptom.0);

    let reply = state
        .resolver
        .resolve(session, &mentioned, &mut RandomPicker::thread_local());
    tracing::debug!("webhook turn for {session_path}: {:?}", reply.step);

    WebhookRes::new(
        &session_path,
        reply.message,
        symptom_strings(&reply.session.identified),
        symptom_strings(&reply.session.pending_new_symptoms),
        reply.session.candidate_index,
    )
}

fn clarify_res(session_path: &str) -> WebhookRes {
    WebhookRes::new(
        session_path,
        CLARIFY_MESSAGE.into(),
        Vec::new(),
        Vec::new(),
        None,
    )
}

fn parse_symptoms(values: &[String]) -> Vec<Symptom> {
    let mut out: Vec<Symptom> = Vec::new();
    for symptom in values.iter().filter_map(|v| Symptom::parse(v).ok()) {
        if !out.contains(&symptom) {
            out.push(symptom);
        }
    }
    out
}

fn symptom_strings(symptoms: &[Symptom]) -> Vec<String> {
    symptoms.iter().map(|s| s.as_str().to_string()).collect()
}

fn match_dto(m: MatchResult) -> MatchDto {
    MatchDto {
        condition: m.diagnosis,
        treatment: m.treatment,
        match_score: saturating_u32(m.match_score),
        total_symptoms: saturating_u32(m.total_symptoms),
        symptoms: symptom_strings(&m.symptoms),
    }
}

fn chat_res(reply: ChatReply) -> ChatRes {
    ChatRes {
        response: reply.response,
        source: match reply.source {
            ChatSource::Ai => ChatSourceDto::Ai,
            ChatSource::Fallback => ChatSourceDto::Fallback,
            ChatSource::System => ChatSourceDto::System,
            ChatSource::Error => ChatSourceDto::Error,
        },
        timestamp: reply.timestamp.map(|t| t.to_rfc3339()),
        note: reply.note,
    }
}

fn error_res(message: String) -> AnalyzeRes {
    AnalyzeRes {
        error: true,
        message: Some(message),
        ..Default::default()
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
