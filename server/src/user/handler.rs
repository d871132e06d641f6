//! User administration and self-service endpoints
//!
//! The `/users` collection is superuser territory. `/users/me` is open to
//! any authenticated caller, but only for the harmless fields; the
//! privileged ones are stripped before the update reaches the store.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::{Method, StatusCode},
};
use serde::{Deserialize, Serialize};

use crate::core::perm;
use crate::prelude::*;
use revuo::store_adapter::{CreateUser, ListUserOptions, UpdateUserData, UserRecord};
use revuo::utils::check_email;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
	pub handle: Box<str>,
	pub email: Box<str>,
	pub first_name: Box<str>,
	pub last_name: Box<str>,
	pub bio: Box<str>,
	pub role: Role,
	pub is_staff: bool,
	pub is_superuser: bool,
	pub created_at: Timestamp,
}

impl From<UserRecord> for UserView {
	fn from(user: UserRecord) -> Self {
		UserView {
			handle: user.handle,
			email: user.email,
			first_name: user.first_name,
			last_name: user.last_name,
			bio: user.bio,
			role: user.role,
			is_staff: user.is_staff,
			is_superuser: user.is_superuser,
			created_at: user.created_at,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListUsersQuery {
	pub q: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

pub async fn list_users(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Query(query): Query<ListUsersQuery>,
) -> RvResult<Json<Vec<UserView>>> {
	perm::check(&perm::SUPERUSER_ONLY, auth.as_ref(), &Method::GET, None)?;

	let opts = ListUserOptions { q: query.q, limit: query.limit, offset: query.offset };
	let users = app.store_adapter.list_users(&opts).await?;

	Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	pub handle: String,
	pub email: String,
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub bio: String,
	#[serde(default)]
	pub role: Role,
	#[serde(default)]
	pub is_staff: bool,
	#[serde(default)]
	pub is_superuser: bool,
}

pub async fn post_user(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Json(req): Json<CreateUserRequest>,
) -> RvResult<(StatusCode, Json<UserView>)> {
	perm::check(&perm::SUPERUSER_ONLY, auth.as_ref(), &Method::POST, None)?;

	if !check_email(&req.email) {
		return Err(Error::ValidationError("invalid email address".into()));
	}
	if req.handle.is_empty() {
		return Err(Error::ValidationError("handle must not be empty".into()));
	}

	let user = app
		.store_adapter
		.create_user(&CreateUser {
			handle: &req.handle,
			email: &req.email,
			first_name: &req.first_name,
			last_name: &req.last_name,
			bio: &req.bio,
			role: req.role,
			confirmation_code: None,
			is_staff: req.is_staff,
			is_superuser: req.is_superuser,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(handle): Path<String>,
) -> RvResult<Json<UserView>> {
	perm::check(&perm::SUPERUSER_ONLY, auth.as_ref(), &Method::GET, None)?;

	let user = app.store_adapter.read_user(&handle).await?;
	Ok(Json(user.into()))
}

pub async fn patch_user(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(handle): Path<String>,
	Json(data): Json<UpdateUserData>,
) -> RvResult<Json<UserView>> {
	perm::check(&perm::SUPERUSER_ONLY, auth.as_ref(), &Method::PATCH, None)?;

	if let Some(email) = data.email.value() {
		if !check_email(email) {
			return Err(Error::ValidationError("invalid email address".into()));
		}
	}

	app.store_adapter.update_user(&handle, &data).await?;

	// The handle may have changed in this very update
	let handle = data.handle.value().map_or(handle, ToString::to_string);
	let user = app.store_adapter.read_user(&handle).await?;
	Ok(Json(user.into()))
}

pub async fn delete_user(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(handle): Path<String>,
) -> RvResult<StatusCode> {
	perm::check(&perm::SUPERUSER_ONLY, auth.as_ref(), &Method::DELETE, None)?;

	app.store_adapter.delete_user(&handle).await?;
	Ok(StatusCode::NO_CONTENT)
}

// Self-service //
//**************//
/// Only the harmless profile fields survive a self-service update.
fn sanitize_self_update(data: UpdateUserData) -> UpdateUserData {
	UpdateUserData {
		first_name: data.first_name,
		last_name: data.last_name,
		bio: data.bio,
		..Default::default()
	}
}

pub async fn get_me(State(app): State<App>, Auth(auth): Auth) -> RvResult<Json<UserView>> {
	let user = app.store_adapter.read_user_by_id(auth.user_id).await?;
	Ok(Json(user.into()))
}

pub async fn patch_me(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(data): Json<UpdateUserData>,
) -> RvResult<Json<UserView>> {
	let data = sanitize_self_update(data);
	app.store_adapter.update_user(&auth.handle, &data).await?;

	let user = app.store_adapter.read_user_by_id(auth.user_id).await?;
	Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sanitize_self_update_strips_privileged_fields() {
		let data = UpdateUserData {
			handle: Patch::Value("new-handle".into()),
			email: Patch::Value("new@example.com".into()),
			bio: Patch::Value("about me".into()),
			role: Patch::Value(Role::Admin),
			is_staff: Patch::Value(true),
			is_superuser: Patch::Value(true),
			..Default::default()
		};
		let clean = sanitize_self_update(data);

		assert_eq!(clean.bio, Patch::Value("about me".into()));
		assert!(clean.handle.is_undefined());
		assert!(clean.email.is_undefined());
		assert!(clean.role.is_undefined());
		assert!(clean.is_staff.is_undefined());
		assert!(clean.is_superuser.is_undefined());
	}

	#[test]
	fn test_list_users_query() {
		let query: ListUsersQuery =
			serde_urlencoded::from_str("q=alice&limit=10").expect("Should parse");
		assert_eq!(query.q.as_deref(), Some("alice"));
		assert_eq!(query.limit, Some(10));
		assert_eq!(query.offset, None);
	}

	#[test]
	fn test_patch_payload_distinguishes_null() {
		let data: UpdateUserData =
			serde_json::from_str(r#"{"bio": null, "firstName": "Jo"}"#).expect("Should parse");
		assert_eq!(data.bio, Patch::Null);
		assert_eq!(data.first_name, Patch::Value("Jo".into()));
		assert!(data.last_name.is_undefined());
	}
}

// vim: ts=4
