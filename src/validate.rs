//! Field-level checks applied by the HTTP layer before a request body
//! reaches the services. The domain layer below assumes its inputs already
//! passed these.

use crate::model::{Film, User};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::{Local, NaiveDate};
use thiserror::Error;

const MAX_DESCRIPTION_LEN: usize = 200;

/// Day of the first public film screening; no release can predate it.
fn min_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("hardcoded date is valid")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("film name must not be empty")]
    EmptyFilmName,
    #[error("film description must not be empty")]
    EmptyDescription,
    #[error("film description is limited to {} characters", MAX_DESCRIPTION_LEN)]
    DescriptionTooLong,
    #[error("release date must not be before {0}")]
    ReleaseDateTooEarly(NaiveDate),
    #[error("film duration must be positive")]
    NonPositiveDuration,
    #[error("email must not be empty and must contain '@'")]
    InvalidEmail,
    #[error("login must not be empty or contain whitespace")]
    InvalidLogin,
    #[error("birthday must not be in the future")]
    BirthdayInFuture,
    #[error("count must be positive")]
    NonPositiveCount,
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
    }
}

pub fn film(film: &Film) -> Result<(), ValidationError> {
    if film.name.trim().is_empty() {
        return Err(ValidationError::EmptyFilmName);
    }
    if film.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if film.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    if film.release_date < min_release_date() {
        return Err(ValidationError::ReleaseDateTooEarly(min_release_date()));
    }
    if film.duration == 0 {
        return Err(ValidationError::NonPositiveDuration);
    }
    Ok(())
}

/// A blank user name is not an error; the user service substitutes the login.
pub fn user(user: &User) -> Result<(), ValidationError> {
    if user.email.is_empty() || !user.email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if user.login.is_empty() || user.login.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidLogin);
    }
    if user.birthday > Local::now().date_naive() {
        return Err(ValidationError::BirthdayInFuture);
    }
    Ok(())
}

pub fn count(count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::NonPositiveCount);
    }
    Ok(())
}
