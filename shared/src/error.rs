/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::DbErr;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the hosting API or the text generation service.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum PollError {
    /// Malformed input, detected before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    TransientUpstream(#[from] SourceError),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] DbErr),

    #[error("Poll timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("Poll was cancelled")]
    Cancelled,
}

impl PollError {
    pub fn project_not_found() -> Self {
        PollError::NotFound("Project".to_string())
    }

    pub fn repository_not_found() -> Self {
        PollError::NotFound("Project repository URL".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_error_messages() {
        assert_eq!(
            PollError::project_not_found().to_string(),
            "Project not found"
        );
        assert_eq!(
            PollError::TimedOut(Duration::from_secs(120)).to_string(),
            "Poll timed out after 120s"
        );

        let upstream: PollError = SourceError::Status {
            service: "GitHub",
            status: 403,
            body: "rate limited".to_string(),
        }
        .into();
        assert_eq!(
            upstream.to_string(),
            "Upstream request failed: GitHub responded with status 403: rate limited"
        );
    }
}
