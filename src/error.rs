use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use askama::Template;
use thiserror::Error;

use crate::views::ErrorTemplate;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}_NOT_FOUND")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("DATABASE_FAILURE")]
    Database(#[from] mongodb::error::Error),
    #[error("SERIALIZATION_FAILED")]
    Serialization(#[from] mongodb::bson::ser::Error),
    #[error("DESERIALIZATION_FAILED")]
    Deserialization(#[from] mongodb::bson::de::Error),
    #[error("RENDERING_FAILED")]
    Template(#[from] askama::Error),
    #[error("INVALID_CONFIG: {0}")]
    Config(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(code = %self, "request rejected");
        }

        let page = ErrorTemplate {
            status: status.as_u16(),
            code: self.to_string(),
        };
        match page.render() {
            Ok(html) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(html),
            Err(_) => HttpResponse::build(status)
                .content_type(ContentType::plaintext())
                .body(self.to_string()),
        }
    }
}
