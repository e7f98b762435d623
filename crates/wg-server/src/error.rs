// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server error types and handling

use crate::content::ContentError;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use wg_access::CreateTenantError;
use wg_config::ConfigError;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Body of every authorization denial; it never says which check failed
pub const NOT_AUTHORIZED_PAGE: &str = "<html><p>You don't have the authorisation to view this wiki.</p> <p><a href='/'>Return to login</a></p></html>";

/// RFC 7807 problem document
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub detail: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, Vec<String>>,
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Missing tenant, missing content or insufficient rights
    #[error("Not authorized")]
    NotAuthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CreateTenantError> for ServerError {
    fn from(err: CreateTenantError) -> Self {
        match err {
            CreateTenantError::AlreadyExists(name) => {
                ServerError::Conflict(format!("wiki '{}' already exists", name))
            }
            CreateTenantError::Config(err) => ServerError::Config(err),
        }
    }
}

impl ServerError {
    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        let (slug, title, status, detail) = match self {
            ServerError::NotAuthorized => (
                "forbidden",
                "Not Authorized",
                StatusCode::FORBIDDEN,
                NOT_AUTHORIZED_PAGE.to_string(),
            ),
            ServerError::NotFound(what) => (
                "not-found",
                "Not Found",
                StatusCode::NOT_FOUND,
                format!("'{}' was not found", what),
            ),
            ServerError::BadRequest(msg) => (
                "bad-request",
                "Bad Request",
                StatusCode::BAD_REQUEST,
                msg.clone(),
            ),
            ServerError::Conflict(msg) => (
                "conflict",
                "Conflict",
                StatusCode::CONFLICT,
                msg.clone(),
            ),
            ServerError::Config(_) => (
                "config",
                "Configuration Error",
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration change was not applied".to_string(),
            ),
            ServerError::Content(_) => (
                "content",
                "Content Error",
                StatusCode::INTERNAL_SERVER_ERROR,
                "wiki content could not be read".to_string(),
            ),
            ServerError::Internal(msg) => (
                "internal",
                "Internal Server Error",
                StatusCode::INTERNAL_SERVER_ERROR,
                msg.clone(),
            ),
        };

        ProblemDetails {
            problem_type: format!("urn:wikigate:error:{}", slug),
            title: title.to_string(),
            status: Some(status.as_u16()),
            detail,
            errors: Default::default(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let ServerError::NotAuthorized = self {
            return (StatusCode::FORBIDDEN, Html(NOT_AUTHORIZED_PAGE)).into_response();
        }

        let problem = self.to_problem();
        let status = problem
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response()
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

/// Convert IO errors
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}
