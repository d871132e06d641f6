//! SMTP email sender using lettre
//!
//! Without SMTP settings the sender runs in log mode: the message body is
//! written to the log instead of being delivered. Useful in development,
//! where the confirmation code can be read straight from the log.

use lettre::transport::smtp::SmtpTransport;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, Transport};
use std::time::Duration;

use crate::email::EmailMessage;
use crate::prelude::*;
use crate::settings::{Settings, TlsMode};

pub struct EmailSender {
	from: Box<str>,
	transport: MailTransport,
}

enum MailTransport {
	Smtp(SmtpTransport),
	Log,
}

impl EmailSender {
	pub fn new(settings: &Settings) -> RvResult<Self> {
		let transport = match &settings.smtp {
			Some(smtp) => {
				let tls = match smtp.tls_mode {
					TlsMode::Tls => lettre::transport::smtp::client::Tls::Wrapper(
						lettre::transport::smtp::client::TlsParameters::builder(
							smtp.host.to_string(),
						)
						.build()
						.map_err(|e| Error::ConfigError(format!("TLS configuration error: {}", e)))?,
					),
					TlsMode::StartTls => lettre::transport::smtp::client::Tls::Opportunistic(
						lettre::transport::smtp::client::TlsParameters::builder(
							smtp.host.to_string(),
						)
						.build()
						.map_err(|e| Error::ConfigError(format!("TLS configuration error: {}", e)))?,
					),
					TlsMode::None => lettre::transport::smtp::client::Tls::None,
				};

				let credentials =
					Credentials::new(smtp.username.to_string(), smtp.password.to_string());
				let mailer = SmtpTransport::builder_dangerous(&*smtp.host)
					.port(smtp.port)
					.timeout(Some(Duration::from_secs(30)))
					.tls(tls)
					.credentials(credentials)
					.build();
				MailTransport::Smtp(mailer)
			}
			None => {
				info!("No SMTP settings, mail will be logged instead of sent");
				MailTransport::Log
			}
		};

		Ok(Self { from: settings.email_from.clone(), transport })
	}

	pub async fn send(&self, message: EmailMessage) -> RvResult<()> {
		let mailer = match &self.transport {
			MailTransport::Log => {
				info!("MAIL to={} subject={:?}: {}", message.to, message.subject, message.text_body);
				return Ok(());
			}
			MailTransport::Smtp(mailer) => mailer,
		};

		let email = Message::builder()
			.from(
				self.from
					.parse()
					.map_err(|_| Error::ConfigError("Invalid from email format".into()))?,
			)
			.to(message
				.to
				.parse()
				.map_err(|_| Error::ValidationError("Invalid recipient email format".into()))?)
			.subject(&message.subject)
			.singlepart(lettre::message::SinglePart::plain(message.text_body))
			.map_err(|e| Error::ValidationError(format!("Failed to build email: {}", e)))?;

		match mailer.send(&email) {
			Ok(response) => {
				debug!("Email sent to {} (response: {:?})", message.to, response);
				Ok(())
			}
			Err(e) => {
				warn!("Failed to send email to {}: {}", message.to, e);
				Err(Error::ServiceUnavailable(format!("SMTP send failed: {}", e)))
			}
		}
	}
}


// vim: ts=4
