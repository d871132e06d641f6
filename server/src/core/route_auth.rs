//! Token issuing and authentication middleware
//!
//! The bearer token carries the user id and expiry only. The caller's role
//! and staff flags are loaded from the store on every request, so a
//! privilege change is effective immediately, not at token renewal.

use axum::{
	body::Body,
	extract::State,
	http::{Request, response::Response},
	middleware::Next,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time;

use crate::prelude::*;
use crate::settings::Settings;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AuthToken {
	pub sub: i64,
	pub exp: u64,
}

pub fn generate_access_token(settings: &Settings, user_id: i64) -> RvResult<Box<str>> {
	let expire = time::SystemTime::now()
		.duration_since(time::UNIX_EPOCH)
		.map_err(|_| Error::Internal("system clock before epoch".into()))?
		.as_secs() + 3600 * settings.token_expire_hours;

	let token = encode(
		&jsonwebtoken::Header::new(Algorithm::HS256),
		&AuthToken { sub: user_id, exp: expire },
		&EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
	)
	.map_err(|_| Error::Internal("token encoding failed".into()))?
	.into();

	Ok(token)
}

pub fn validate_token(settings: &Settings, token: &str) -> RvResult<i64> {
	let decoding_key = DecodingKey::from_secret(settings.jwt_secret.as_bytes());

	let token_data = decode::<AuthToken>(token, &decoding_key, &Validation::new(Algorithm::HS256))
		.map_err(|_| Error::Unauthorized)?;

	Ok(token_data.claims.sub)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
	req.headers()
		.get("Authorization")
		.and_then(|h| h.to_str().ok())
		.and_then(|h| h.strip_prefix("Bearer "))
}

/// Attach the caller's identity when a valid token is presented; pass the
/// request through untouched otherwise. Endpoints that require a caller
/// enforce it with the `Auth` extractor.
pub async fn optional_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> RvResult<Response<Body>> {
	if let Some(token) = bearer_token(&req) {
		if let Ok(user_id) = validate_token(&app.settings, token) {
			match app.store_adapter.read_user_by_id(user_id).await {
				Ok(user) => {
					let ctx = AuthCtx {
						user_id: user.user_id,
						handle: user.handle,
						role: user.role,
						is_staff: user.is_staff,
						is_superuser: user.is_superuser,
					};
					req.extensions_mut().insert(ctx);
				}
				// A token for a deleted user is just an anonymous request
				Err(Error::NotFound) => {}
				Err(err) => return Err(err),
			}
		}
	}

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn test_settings() -> Settings {
		Settings {
			listen: "127.0.0.1:8080".into(),
			data_dir: PathBuf::from("./data").into(),
			jwt_secret: "test-secret".into(),
			token_expire_hours: 8,
			email_from: "Revuo <no-reply@localhost>".into(),
			smtp: None,
		}
	}

	#[test]
	fn test_token_round_trip() {
		let settings = test_settings();
		let token = generate_access_token(&settings, 42).expect("Should mint token");
		let sub = validate_token(&settings, &token).expect("Should validate token");
		assert_eq!(sub, 42);
	}

	#[test]
	fn test_token_wrong_secret() {
		let settings = test_settings();
		let token = generate_access_token(&settings, 42).expect("Should mint token");

		let mut other = test_settings();
		other.jwt_secret = "other-secret".into();
		assert!(matches!(validate_token(&other, &token), Err(Error::Unauthorized)));
	}

	#[test]
	fn test_garbage_token() {
		let settings = test_settings();
		assert!(matches!(validate_token(&settings, "not.a.token"), Err(Error::Unauthorized)));
	}
}

// vim: ts=4
