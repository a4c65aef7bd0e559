use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

/// Every failure a handler can report. Each variant maps to exactly one
/// status code so clients never have to parse the message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields.")]
    MissingFields,
    #[error("{0}")]
    Validation(String),
    #[error("Invalid ID.")]
    InvalidId,
    #[error("Invalid arrondissement.")]
    InvalidArrondissement,
    #[error("Walk not found.")]
    NotFound,
    #[error("Access denied.")]
    MissingToken,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Email already exists.")]
    EmailTaken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields
            | AppError::Validation(_)
            | AppError::InvalidId
            | AppError::InvalidArrondissement
            | AppError::EmailTaken => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MissingToken | AppError::InvalidToken | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => AppError::MissingFields,
            JsonRejection::JsonSyntaxError(_) => AppError::Validation("Malformed JSON body.".into()),
            _ => AppError::Validation("Invalid request body.".into()),
        }
    }
}

/// `Json` extractor whose rejections go through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_expected_status() {
        assert_eq!(AppError::MissingFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn body_rejections_become_bad_requests() {
        use axum::{body::Body, extract::FromRequest, http::Request};

        #[derive(Debug, serde::Deserialize)]
        struct Counter {
            #[allow(dead_code)]
            count: i32,
        }

        let cases = [
            (Some("application/json"), r#"{"count":"abc"}"#),
            (Some("application/json"), r#"{"count":99999999999}"#),
            (Some("application/json"), r#"{}"#),
            (Some("application/json"), r#"{"count":"#),
            (None, ""),
        ];
        for (content_type, body) in cases {
            let mut req = Request::builder().method("POST").uri("/");
            if let Some(ct) = content_type {
                req = req.header("content-type", ct);
            }
            let req = req.body(Body::from(body)).unwrap();
            let err = AppJson::<Counter>::from_request(req, &()).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        }
    }

    #[tokio::test]
    async fn internal_error_does_not_leak_details() {
        let res = AppError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.3"));
    }
}
