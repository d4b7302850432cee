use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	Conflict(String),

	#[error("{0}")]
	Forbidden(String),

	#[error("{0}")]
	BadRequest(String),

	#[error("{0}")]
	Unauthorized(String),

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("internal error: {0}")]
	Internal(String),
}

impl CustomError {
	pub fn not_found(message: impl Into<String>) -> Self {
		CustomError::NotFound(message.into())
	}

	pub fn conflict(message: impl Into<String>) -> Self {
		CustomError::Conflict(message.into())
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		CustomError::Forbidden(message.into())
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		CustomError::BadRequest(message.into())
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		CustomError::Unauthorized(message.into())
	}

	/// Maps a unique-index violation to `Conflict`, everything else stays a database error.
	pub fn from_db(err: sqlx::Error, conflict_message: &str) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
				CustomError::Conflict(conflict_message.to_string())
			}
			_ => CustomError::Database(err),
		}
	}
}

impl ResponseError for CustomError {
	fn status_code(&self) -> StatusCode {
		match self {
			CustomError::NotFound(_) => StatusCode::NOT_FOUND,
			CustomError::Conflict(_) => StatusCode::CONFLICT,
			CustomError::Forbidden(_) => StatusCode::FORBIDDEN,
			CustomError::BadRequest(_) => StatusCode::BAD_REQUEST,
			CustomError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			CustomError::Database(_) | CustomError::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn error_response(&self) -> HttpResponse {
		let status = self.status_code();
		if status.is_server_error() {
			log::error!("{}", self);
			return HttpResponse::build(status)
				.json(json!({"status": "error", "message": "Something went wrong"}));
		}

		HttpResponse::build(status).json(json!({"status": "fail", "message": self.to_string()}))
	}
}
