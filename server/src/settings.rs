//! Server configuration, read from the environment at startup.

use std::path::PathBuf;

use crate::prelude::*;

#[derive(Clone, Debug)]
pub enum TlsMode {
	None,
	StartTls,
	Tls,
}

/// SMTP transport parameters. When absent the server runs in log-only mail
/// mode: confirmation codes are written to the log instead of being sent.
#[derive(Clone, Debug)]
pub struct SmtpSettings {
	pub host: Box<str>,
	pub port: u16,
	pub username: Box<str>,
	pub password: Box<str>,
	pub tls_mode: TlsMode,
}

#[derive(Clone, Debug)]
pub struct Settings {
	pub listen: Box<str>,
	pub data_dir: Box<std::path::Path>,
	pub jwt_secret: Box<str>,
	pub token_expire_hours: u64,
	pub email_from: Box<str>,
	pub smtp: Option<SmtpSettings>,
}

fn var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Settings {
	pub fn from_env() -> RvResult<Self> {
		let jwt_secret = var("REVUO_JWT_SECRET")
			.ok_or_else(|| Error::ConfigError("REVUO_JWT_SECRET is not set".into()))?;

		let token_expire_hours = match var("REVUO_TOKEN_EXPIRE_HOURS") {
			Some(v) => v.parse().map_err(|_| {
				Error::ConfigError("REVUO_TOKEN_EXPIRE_HOURS is not a number".into())
			})?,
			None => 8,
		};

		let smtp = match var("REVUO_SMTP_HOST") {
			Some(host) => {
				let port = match var("REVUO_SMTP_PORT") {
					Some(v) => v
						.parse()
						.map_err(|_| Error::ConfigError("REVUO_SMTP_PORT is not a number".into()))?,
					None => 587,
				};
				let tls_mode = match var("REVUO_SMTP_TLS_MODE").as_deref() {
					None | Some("starttls") => TlsMode::StartTls,
					Some("tls") => TlsMode::Tls,
					Some("none") => TlsMode::None,
					Some(other) => {
						return Err(Error::ConfigError(format!(
							"Invalid REVUO_SMTP_TLS_MODE: {}. Must be 'none', 'starttls', or 'tls'",
							other
						)));
					}
				};
				Some(SmtpSettings {
					host: host.into(),
					port,
					username: var("REVUO_SMTP_USERNAME").unwrap_or_default().into(),
					password: var("REVUO_SMTP_PASSWORD").unwrap_or_default().into(),
					tls_mode,
				})
			}
			None => None,
		};

		Ok(Settings {
			listen: var("REVUO_LISTEN").unwrap_or_else(|| "127.0.0.1:8080".into()).into(),
			data_dir: PathBuf::from(var("REVUO_DATA_DIR").unwrap_or_else(|| "./data".into()))
				.into(),
			jwt_secret: jwt_secret.into(),
			token_expire_hours,
			email_from: var("REVUO_EMAIL_FROM")
				.unwrap_or_else(|| "Revuo <no-reply@localhost>".into())
				.into(),
			smtp,
		})
	}
}

// vim: ts=4
