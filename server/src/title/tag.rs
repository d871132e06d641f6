//! Category and genre endpoints
//!
//! Two resources with the same shape: a display name and a unique slug.
//! Anyone lists them, staff create and delete them. There is no update;
//! a tag is replaced by deleting and recreating it.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::{Method, StatusCode},
};
use serde::Deserialize;

use crate::core::perm;
use crate::prelude::*;
use revuo::store_adapter::{ListTagOptions, Tag};
use revuo::utils::check_slug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListTagsQuery {
	pub q: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

impl From<ListTagsQuery> for ListTagOptions {
	fn from(query: ListTagsQuery) -> Self {
		ListTagOptions { q: query.q, limit: query.limit, offset: query.offset }
	}
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
	pub name: String,
	pub slug: String,
}

impl CreateTagRequest {
	fn validate(&self) -> RvResult<Tag> {
		if self.name.is_empty() {
			return Err(Error::ValidationError("name must not be empty".into()));
		}
		if !check_slug(&self.slug) {
			return Err(Error::ValidationError(
				"slug must be lowercase letters, digits, and hyphens".into(),
			));
		}
		Ok(Tag { name: self.name.as_str().into(), slug: self.slug.as_str().into() })
	}
}

// Categories //
//************//
pub async fn list_categories(
	State(app): State<App>,
	Query(query): Query<ListTagsQuery>,
) -> RvResult<Json<Vec<Tag>>> {
	let tags = app.store_adapter.list_categories(&query.into()).await?;
	Ok(Json(tags))
}

pub async fn post_category(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Json(req): Json<CreateTagRequest>,
) -> RvResult<(StatusCode, Json<Tag>)> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::POST, None)?;

	let tag = req.validate()?;
	app.store_adapter.create_category(&tag).await?;
	Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_category(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(slug): Path<String>,
) -> RvResult<StatusCode> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::DELETE, None)?;

	app.store_adapter.delete_category(&slug).await?;
	Ok(StatusCode::NO_CONTENT)
}

// Genres //
//********//
pub async fn list_genres(
	State(app): State<App>,
	Query(query): Query<ListTagsQuery>,
) -> RvResult<Json<Vec<Tag>>> {
	let tags = app.store_adapter.list_genres(&query.into()).await?;
	Ok(Json(tags))
}

pub async fn post_genre(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Json(req): Json<CreateTagRequest>,
) -> RvResult<(StatusCode, Json<Tag>)> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::POST, None)?;

	let tag = req.validate()?;
	app.store_adapter.create_genre(&tag).await?;
	Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_genre(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(slug): Path<String>,
) -> RvResult<StatusCode> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::DELETE, None)?;

	app.store_adapter.delete_genre(&slug).await?;
	Ok(StatusCode::NO_CONTENT)
}


// vim: ts=4
