//! Registration and token endpoints
//!
//! Registration is driven by the email address alone: the handle is derived
//! from the local part and a confirmation code is mailed out. Registering
//! an already-registered address resends the stored code, so an account
//! whose first mail attempt failed is never stranded without one.
//! The token endpoint exchanges a matching (email, code) pair for a bearer
//! token; the token is minted only after the code has been checked.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::route_auth::generate_access_token;
use crate::email::EmailMessage;
use crate::prelude::*;
use revuo::store_adapter::{CreateUser, UserRecord};
use revuo::utils::{check_email, derive_handle_from_email, random_code};

const CONFIRMATION_CODE_LEN: usize = 8;

// Register //
//**********//
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
	pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
	pub handle: Box<str>,
	pub email: Box<str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub confirmation_code: Option<Box<str>>,
	pub status: &'static str,
}

async fn send_code(app: &App, email: &str, code: &str) -> RvResult<()> {
	app.email
		.send(EmailMessage {
			to: email.to_string(),
			subject: "Your Revuo confirmation code".to_string(),
			text_body: format!("Your confirmation code: {}", code),
		})
		.await
}

/// The idempotent repeat-registration path: keep the account and resend the
/// stored code. Accounts without one (created by an administrator) get no
/// mail.
async fn already_registered(
	app: &App,
	user: UserRecord,
) -> RvResult<(StatusCode, Json<RegisterResponse>)> {
	if let Some(code) = user.confirmation_code.as_deref() {
		send_code(app, &user.email, code).await?;
	}
	Ok((
		StatusCode::OK,
		Json(RegisterResponse {
			handle: user.handle,
			email: user.email,
			confirmation_code: user.confirmation_code,
			status: "already registered",
		}),
	))
}

pub async fn post_register(
	State(app): State<App>,
	Json(req): Json<RegisterRequest>,
) -> RvResult<(StatusCode, Json<RegisterResponse>)> {
	if !check_email(&req.email) {
		return Err(Error::ValidationError("invalid email address".into()));
	}

	match app.store_adapter.read_user_by_email(&req.email).await {
		Ok(user) => return already_registered(&app, user).await,
		Err(Error::NotFound) => {}
		Err(err) => return Err(err),
	}

	let code = random_code(CONFIRMATION_CODE_LEN);
	let handle = derive_handle_from_email(&req.email);
	if handle.is_empty() {
		return Err(Error::ValidationError("invalid email address".into()));
	}

	let create = CreateUser {
		handle: &handle,
		email: &req.email,
		confirmation_code: Some(&code),
		..Default::default()
	};
	let user = match app.store_adapter.create_user(&create).await {
		Ok(user) => user,
		Err(Error::ValidationError(_)) => {
			// A lost race on the email lands on the idempotent path; anything
			// else is the derived handle being taken, worth one retry with a
			// random suffix
			if let Ok(user) = app.store_adapter.read_user_by_email(&req.email).await {
				return already_registered(&app, user).await;
			}
			let handle = format!("{}.{}", handle, random_code(4).to_lowercase());
			let create = CreateUser { handle: &handle, ..create };
			app.store_adapter.create_user(&create).await?
		}
		Err(err) => return Err(err),
	};

	info!("Registered {} ({})", user.handle, user.email);

	// Mail failure fails the request; the caller must see that no code went
	// out, and the next registration attempt resends it
	send_code(&app, &req.email, &code).await?;

	Ok((
		StatusCode::CREATED,
		Json(RegisterResponse {
			handle: user.handle,
			email: user.email,
			confirmation_code: Some(code.into()),
			status: "registered",
		}),
	))
}

// Token //
//*******//
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
	pub email: String,
	pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
	pub token: Box<str>,
}

/// Check the stored code against the presented one. Accounts without a
/// stored code (created by an administrator) can not log in this way.
fn verify_code(stored: Option<&str>, presented: &str) -> RvResult<()> {
	match stored {
		Some(stored) if stored == presented => Ok(()),
		_ => Err(Error::ValidationError("incorrect confirmation code".into())),
	}
}

pub async fn post_token(
	State(app): State<App>,
	Json(req): Json<TokenRequest>,
) -> RvResult<Json<TokenResponse>> {
	// Unknown email is 404, a mismatched code is 400
	let user = app.store_adapter.read_user_by_email(&req.email).await?;

	verify_code(user.confirmation_code.as_deref(), &req.confirmation_code)?;

	let token = generate_access_token(&app.settings, user.user_id)?;
	debug!("Token issued for {}", user.handle);

	Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::app::AppState;
	use crate::email::sender::EmailSender;
	use crate::settings::Settings;
	use revuo_store_adapter_sqlite::StoreAdapterSqlite;
	use std::path::PathBuf;
	use std::sync::Arc;
	use tempfile::TempDir;

	async fn test_app() -> (App, TempDir) {
		let temp_dir = TempDir::new().expect("Failed to create temp directory");
		let settings = Settings {
			listen: "127.0.0.1:8080".into(),
			data_dir: PathBuf::from(temp_dir.path()).into(),
			jwt_secret: "test-secret".into(),
			token_expire_hours: 8,
			email_from: "Revuo <no-reply@localhost>".into(),
			smtp: None,
		};
		let email = EmailSender::new(&settings).expect("Should build sender");
		let store_adapter = Arc::new(
			StoreAdapterSqlite::new(temp_dir.path().join("revuo.db"))
				.await
				.expect("Should create adapter"),
		);
		(Arc::new(AppState { settings, email, store_adapter }), temp_dir)
	}

	#[tokio::test]
	async fn test_register_repeat_resends_stored_code() {
		let (app, _temp) = test_app().await;
		let req = RegisterRequest { email: "dora@example.com".into() };

		let (status, Json(first)) = post_register(State(app.clone()), Json(req))
			.await
			.expect("Should register");
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(&*first.handle, "dora");
		let code = first.confirmation_code.expect("Code should be issued");

		// The repeat keeps the account and hands the same code out again
		let req = RegisterRequest { email: "dora@example.com".into() };
		let (status, Json(second)) =
			post_register(State(app), Json(req)).await.expect("Should accept repeat");
		assert_eq!(status, StatusCode::OK);
		assert_eq!(second.status, "already registered");
		assert_eq!(second.confirmation_code, Some(code));
	}

	#[tokio::test]
	async fn test_register_handle_collision_gets_suffix() {
		let (app, _temp) = test_app().await;
		app.store_adapter
			.create_user(&CreateUser {
				handle: "dora",
				email: "dora@other.net",
				..Default::default()
			})
			.await
			.expect("Should create user");

		let req = RegisterRequest { email: "dora@example.com".into() };
		let (status, Json(resp)) =
			post_register(State(app), Json(req)).await.expect("Should register");
		assert_eq!(status, StatusCode::CREATED);
		assert!(resp.handle.starts_with("dora."));
		assert_eq!(&*resp.email, "dora@example.com");
	}

	#[tokio::test]
	async fn test_token_requires_matching_code() {
		let (app, _temp) = test_app().await;
		let req = RegisterRequest { email: "erin@example.com".into() };
		let (_, Json(reg)) =
			post_register(State(app.clone()), Json(req)).await.expect("Should register");
		let code = reg.confirmation_code.expect("Code should be issued");

		let bad = TokenRequest { email: "erin@example.com".into(), confirmation_code: "nope".into() };
		let res = post_token(State(app.clone()), Json(bad)).await;
		assert!(matches!(res, Err(Error::ValidationError(_))));

		let good =
			TokenRequest { email: "erin@example.com".into(), confirmation_code: code.into() };
		let Json(resp) = post_token(State(app), Json(good)).await.expect("Should issue token");
		assert!(!resp.token.is_empty());
	}

	#[test]
	fn test_verify_code() {
		assert!(verify_code(Some("abc123XY"), "abc123XY").is_ok());
		assert!(matches!(
			verify_code(Some("abc123XY"), "wrong"),
			Err(Error::ValidationError(_))
		));
		assert!(matches!(verify_code(None, "abc123XY"), Err(Error::ValidationError(_))));
		assert!(matches!(verify_code(Some("abc123XY"), ""), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_register_response_hides_absent_code() {
		let resp = RegisterResponse {
			handle: "alice".into(),
			email: "alice@example.com".into(),
			confirmation_code: None,
			status: "already registered",
		};
		let json = serde_json::to_value(&resp).expect("Should serialize");
		assert!(json.get("confirmationCode").is_none());
		assert_eq!(json["status"], "already registered");
	}

	#[test]
	fn test_token_request_wire_format() {
		let req: TokenRequest = serde_json::from_str(
			r#"{"email": "a@example.com", "confirmationCode": "abc123XY"}"#,
		)
		.expect("Should deserialize");
		assert_eq!(req.confirmation_code, "abc123XY");
	}
}

// vim: ts=4
