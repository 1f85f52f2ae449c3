use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tower_sessions::session;

use crate::db;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    DB(#[from] db::Error),

    #[error(transparent)]
    Session(#[from] session::Error),
    #[error("password_hash")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            error: error.into(),
            message,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("unauthorized", None))),
            err => {
                tracing::error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("unexpected", Some("Unexpected error".into()))),
                )
            }
        }
        .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
