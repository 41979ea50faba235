use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The only failure the domain layer produces: a referenced identifier with
/// no corresponding stored entity. Raised before any state is mutated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("film with id = {0} not found")]
    FilmNotFound(u64),
    #[error("user with id = {0} not found")]
    UserNotFound(u64),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
    }
}
