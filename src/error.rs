// SPDX-FileCopyrightText: 2026 LinkScrub contributors
// SPDX-License-Identifier: MIT

//! Error taxonomy surfaced at the HTTP boundary.
//!
//! Every variant is terminal for the calling operation: the service never
//! retries internally and an error leaves the rule store unchanged.

use crate::auth::AuthError;
use crate::rules::{RuleStatus, ValidationError};
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rule {0} not found")]
    NotFound(i64),

    #[error("Rule {id} already moderated: {status}")]
    InvalidStateTransition { id: i64, status: RuleStatus },

    #[error("Missing or invalid bearer credential")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::InvalidStateTransition { id, status } => {
                Self::InvalidStateTransition { id, status }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::UsernameExists => Self::UsernameExists,
            AuthError::Hash(e) => Self::Internal(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidStateTransition { .. } | Self::UsernameExists => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(crate::handlers::ApiResponse::<()>::error(self.to_string()));
        (self.status_code(), body).into_response()
    }
}

/// Result type alias for handler code.
pub type Result<T> = std::result::Result<T, ApiError>;
