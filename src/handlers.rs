// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! HTTP handlers for the rules service.
//!
//! Submission and rule listings are public; moderation and account creation
//! require a bearer credential. Every response uses the same JSON envelope
//! so the contribution UI can switch on `success`.

use crate::auth::{self, AdminDirectory, SessionIssuer};
use crate::config::Config;
use crate::error::ApiError;
use crate::rules::{DomainRule, Submission};
use crate::store::{Decision, RuleStore};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state.
pub struct AppState {
    pub store: RuleStore,
    pub admins: AdminDirectory,
    pub sessions: SessionIssuer,
    pub config: Config,
}

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rules", get(list_rules))
        .route("/api/rules/pending", get(list_pending))
        .route("/api/rules/approved", get(list_approved))
        .route("/api/submit", post(submit_rule))
        .route("/api/rules/:id/approve", put(approve_rule))
        .route("/api/rules/:id/reject", put(reject_rule))
        .route("/api/admin/login", post(login_admin))
        .route("/api/admin/logout", post(logout_admin))
        .route("/api/admin/create", post(create_admin))
        .with_state(state)
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)
}

/// Verify the caller's credential. Touches no state on failure.
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = bearer_token(headers)?;
    state.sessions.verify(token).await?;
    Ok(())
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "linkscrub-rules",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// All rules, any status.
pub async fn list_rules(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<DomainRule>>> {
    Json(ApiResponse::ok(state.store.list_all().await))
}

/// Rules awaiting review.
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<DomainRule>>> {
    Json(ApiResponse::ok(state.store.list_pending().await))
}

/// Active rules, the set the cleaning engine consumes.
pub async fn list_approved(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<DomainRule>>> {
    Json(ApiResponse::ok(state.store.list_approved().await))
}

/// Submit a new domain rule for review.
pub async fn submit_rule(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<Submission>,
) -> Result<Json<ApiResponse<DomainRule>>, ApiError> {
    debug!(domain = %submission.domain, "Processing rule submission");
    let rule = state.store.submit(submission).await?;
    Ok(Json(ApiResponse::ok_with_message(
        rule,
        "Rule submitted and pending review",
    )))
}

/// Approve a pending rule.
pub async fn approve_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DomainRule>>, ApiError> {
    require_admin(&state, &headers).await?;
    let rule = state.store.moderate(id, Decision::Approve).await?;
    Ok(Json(ApiResponse::ok_with_message(rule, "Rule approved")))
}

/// Reject a pending rule.
pub async fn reject_rule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<DomainRule>>, ApiError> {
    require_admin(&state, &headers).await?;
    let rule = state.store.moderate(id, Decision::Reject).await?;
    Ok(Json(ApiResponse::ok_with_message(rule, "Rule rejected")))
}

/// Exchange a username/password for an opaque session token.
pub async fn login_admin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let token = auth::login(&state.admins, &state.sessions, &req.username, &req.password).await?;
    Ok(Json(ApiResponse::ok_with_message(token, "Login successful")))
}

/// Revoke the caller's session token.
pub async fn logout_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = bearer_token(&headers)?;
    state.sessions.revoke(token).await;
    info!("Administrator logged out");
    Ok(Json(ApiResponse::message("Logged out")))
}

/// Create another administrator account. Requires a valid credential.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateAdminRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    require_admin(&state, &headers).await?;
    state.admins.create(&req.username, &req.password).await?;
    Ok(Json(ApiResponse::message("Administrator created")))
}
