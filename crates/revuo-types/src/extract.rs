//! Request extractors for the authenticated caller.
//!
//! The auth middleware validates the bearer token, loads the caller's user
//! record, and inserts an [`AuthCtx`] into the request extensions. Handlers
//! then declare [`Auth`] (mandatory) or [`OptionalAuth`] as a parameter; a
//! missing context on a mandatory extractor is an `Unauthorized` error, not
//! a panic.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::prelude::*;

/// The authenticated caller, as loaded from the store at request time.
///
/// The role and staff flags come from the current user record, never from
/// token claims, so a privilege change takes effect on the next request.
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: i64,
	pub handle: Box<str>,
	pub role: Role,
	pub is_staff: bool,
	pub is_superuser: bool,
}

impl AuthCtx {
	/// Moderator-or-above role. The staff and superuser flags are separate
	/// axes and grant nothing here.
	pub fn is_moderator(&self) -> bool {
		self.role >= Role::Moderator
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}

// Auth //
//******//
/// Extractor for endpoints that require an authenticated caller.
#[derive(Clone, Debug)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match parts.extensions.get::<AuthCtx>() {
			Some(ctx) => Ok(Auth(ctx.clone())),
			None => Err(Error::Unauthorized),
		}
	}
}

// OptionalAuth //
//**************//
/// Extractor for endpoints that serve both anonymous and authenticated
/// callers, with different privileges.
#[derive(Clone, Debug)]
pub struct OptionalAuth(pub Option<AuthCtx>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(parts.extensions.get::<AuthCtx>().cloned()))
	}
}

// vim: ts=4
