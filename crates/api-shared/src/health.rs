use crate::dto::HealthRes;

/// Routes advertised by the health payload.
pub const ADVERTISED_ENDPOINTS: &[&str] = &[
    "/analyze - POST - Analyze symptoms",
    "/api/conditions - GET - Get all conditions",
    "/api/gemini-chat - POST - Chat with AI",
    "/api/stats - GET - Get statistics",
    "/api/test-gemini - GET - Check AI provider",
    "/webhook - POST - Legacy dialogue webhook",
];

/// Static health payload shared by `/` and `/health`.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Returns the health payload.
    ///
    /// The service holds no state, so healthy means the process is up and routing requests.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
            message: "AI Medical Symptom Checker API is running".into(),
            endpoints: ADVERTISED_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
