// content-backend/src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Content store error: {0}")]
    StoreError(String),

    #[error("Collaborator error: {0}")]
    CollaboratorError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    validation_errors: None,
                    error_type: "unauthorized".to_string(),
                },
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    validation_errors: None,
                    error_type: "bad_request".to_string(),
                },
            ),
            AppError::InvalidPromoCode(code) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: "Invalid promo code".to_string(),
                    message: "Invalid promo code".to_string(),
                    details: Some(json!({ "code": code })),
                    validation_errors: None,
                    error_type: "invalid_promo_code".to_string(),
                },
            ),
            AppError::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    validation_errors: None,
                    error_type: "validation_error".to_string(),
                },
            ),
            AppError::ValidationErrors(errors) => {
                let mut field_errors = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_insert_with(Vec::new)
                            .push(message.to_string());
                    }
                }
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        details: None,
                        validation_errors: Some(field_errors),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        details: None,
                        validation_errors: Some(field_errors),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::StoreError(message) => {
                eprintln!("Content store error: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        success: false,
                        error: "Content store error".to_string(),
                        message,
                        details: None,
                        validation_errors: None,
                        error_type: "store_error".to_string(),
                    },
                )
            }
            AppError::CollaboratorError(message) => {
                eprintln!("Collaborator error: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse {
                        success: false,
                        error: "Collaborator error".to_string(),
                        message,
                        details: None,
                        validation_errors: None,
                        error_type: "collaborator_error".to_string(),
                    },
                )
            }
            AppError::InternalServerError(message) => {
                eprintln!("Internal server error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        error: "An internal server error occurred".to_string(),
                        message: "An internal server error occurred".to_string(),
                        details: None,
                        validation_errors: None,
                        error_type: "internal_server_error".to_string(),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    pub error_type: String,
}
