/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use shared::error::PollError;
use shared::types::BaseResponse;
use std::fmt;

#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    NotFound(String),
    Database(DbErr),
    Poll(PollError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            WebError::Database(err) => write!(f, "Database error: {}", err),
            WebError::Poll(err) => write!(f, "Poll error: {}", err),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::Database(err) => Some(err),
            WebError::Poll(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for WebError {
    fn from(err: DbErr) -> Self {
        WebError::Database(err)
    }
}

impl From<PollError> for WebError {
    fn from(err: PollError) -> Self {
        WebError::Poll(err)
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Poll(err) => match err {
                PollError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                PollError::NotFound(_) => StatusCode::NOT_FOUND,
                PollError::TransientUpstream(_) => StatusCode::BAD_GATEWAY,
                PollError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                PollError::TimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
                PollError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    pub fn not_found(resource: &str) -> Self {
        WebError::NotFound(format!("{} not found", resource))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            WebError::BadRequest(msg) | WebError::NotFound(msg) => msg,
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                "Database error".to_string()
            }
            WebError::Poll(PollError::PersistenceFailure(err)) => {
                tracing::error!("Database error during poll: {}", err);
                "Database error".to_string()
            }
            WebError::Poll(err) => {
                tracing::warn!("Poll failed: {}", err);
                err.to_string()
            }
        };

        let body = Json(BaseResponse {
            error: true,
            message: error_message,
        });

        (status, body).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;
