//! Error type shared by the server and the storage adapters.
//!
//! Every error is recovered at the handler boundary into a structured JSON
//! response; the `IntoResponse` impl is the single place where the error
//! taxonomy is mapped to HTTP status codes.

use axum::{Json, http::StatusCode, response::IntoResponse};

pub type RvResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Missing entity or mis-scoped nested path
	NotFound,
	/// No credential on an endpoint that requires one
	Unauthorized,
	/// Valid credential, insufficient privilege
	PermissionDenied,
	/// Bad, missing, or duplicate field value
	ValidationError(String),
	/// Storage layer failure (details already logged at the call site)
	DbError,
	/// External collaborator (mail transport) unavailable
	ServiceUnavailable(String),
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized => write!(f, "authentication required"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationError(msg) => write!(f, "{}", msg),
			Error::DbError => write!(f, "database error"),
			Error::ServiceUnavailable(msg) => write!(f, "service unavailable: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = match &self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		};
		let body = serde_json::json!({ "error": self.to_string() });
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_mapping() {
		assert_eq!(Error::NotFound.into_response().status(), StatusCode::NOT_FOUND);
		assert_eq!(Error::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
		assert_eq!(Error::PermissionDenied.into_response().status(), StatusCode::FORBIDDEN);
		assert_eq!(
			Error::ValidationError("bad".into()).into_response().status(),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(Error::DbError.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(
			Error::ServiceUnavailable("smtp".into()).into_response().status(),
			StatusCode::SERVICE_UNAVAILABLE
		);
	}
}

// vim: ts=4
