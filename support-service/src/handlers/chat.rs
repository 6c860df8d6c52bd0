use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ChatTurn, Location, Resource, ResourceGroup, ResourceKind, Severity};
use crate::services::pipeline;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub conversation: Vec<ChatTurn>,
    pub location: Option<Location>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub severity: Severity,
    /// Always empty on success under the current policy; carries the
    /// static emergency group on the fallback path.
    pub resources: Vec<ResourceGroup>,
    pub location_resources: Vec<Resource>,
    pub timestamp: DateTime<Utc>,
}

#[tracing::instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    request.validate()?;

    match state
        .pipeline
        .handle(
            &request.message,
            &request.conversation,
            request.location.as_ref(),
        )
        .await
    {
        Ok(outcome) => Ok((
            StatusCode::OK,
            Json(ChatResponse {
                response: outcome.reply,
                severity: outcome.severity,
                resources: Vec::new(),
                location_resources: outcome.resources,
                timestamp: Utc::now(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Chat completion failed, returning fallback");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(fallback_response()),
            ))
        }
    }
}

/// Fixed user-safe payload for downstream model failures: apology text,
/// medium severity, the static emergency contact group.
fn fallback_response() -> ChatResponse {
    ChatResponse {
        response: pipeline::FALLBACK_REPLY.to_string(),
        severity: Severity::Medium,
        resources: pipeline::fallback_contacts(),
        location_resources: Vec::new(),
        timestamp: Utc::now(),
    }
}

/// Two hard-coded sample records for UI testing; never touches the model.
pub async fn test_resources() -> Json<ChatResponse> {
    let samples = vec![
        Resource {
            kind: ResourceKind::Crisis,
            name: "Test Crisis Center".to_string(),
            description: "This is a test record to verify functionality".to_string(),
            phone: Some("555-123-4567".to_string()),
            website: Some("https://example.com".to_string()),
            directions: Some("https://maps.google.com/?q=test+crisis+center".to_string()),
            distance: Some("0.5 miles away".to_string()),
        },
        Resource {
            kind: ResourceKind::Therapy,
            name: "Test Mental Health Center".to_string(),
            description: "Testing therapy resource records".to_string(),
            phone: Some("555-234-5678".to_string()),
            website: Some("https://example.com".to_string()),
            directions: None,
            distance: Some("1.0 miles away".to_string()),
        },
    ];

    Json(ChatResponse {
        response: "Here are some test resources for you:".to_string(),
        severity: Severity::Medium,
        resources: Vec::new(),
        location_resources: samples,
        timestamp: Utc::now(),
    })
}
