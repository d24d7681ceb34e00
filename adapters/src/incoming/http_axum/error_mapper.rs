use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error};

use crate::incoming::http_axum::templates::ErrorTemplate;
use chanban_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::BanAccess(e) => (StatusCode::NOT_FOUND, e.to_string()),

            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),

            AppError::TemplateError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Page rendering failed".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::Domain(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_client_error() {
            debug!("Client error response generated: {}", self.0);
        } else {
            error!("Server error response generated: {}", self.0);
        }

        match ErrorTemplate::new(status_code, message.clone()).render() {
            Ok(body) => (status_code, Html(body)).into_response(),
            Err(e) => {
                error!("Failed to render error page: {}", e);
                (status_code, message).into_response()
            }
        }
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ban::BanAccessError, error::DomainError};

    fn status_of(error: AppError) -> StatusCode {
        HttpError(error).into_response().status()
    }

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            status_of(AppError::BanAccess(BanAccessError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::NotFound {
                message: "no such page".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::TemplateError {
                message: "missing field".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::ConfigError {
                message: "bad port".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::DatabaseError {
                message: "locked".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Domain(DomainError::InvalidBanMode(String::new()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let (_, message) = HttpError(AppError::DatabaseError {
            message: "disk I/O error at /var/lib/chanban.db".to_string(),
        })
        .status_and_message();

        assert_eq!(message, "Database error");
    }
}
