//! Comment endpoints, nested under a title/review pair
//!
//! Same authorization story as reviews: anyone reads, the author or
//! moderation edits and deletes. Both path ancestors scope the lookup.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::{Method, StatusCode},
};
use serde::Deserialize;

use crate::core::perm;
use crate::prelude::*;
use crate::review::handler::PageQuery;
use revuo::store_adapter::{CommentView, CreateComment};

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
	pub text: String,
}

impl CommentRequest {
	fn validate(&self) -> RvResult<()> {
		if self.text.is_empty() {
			return Err(Error::ValidationError("text must not be empty".into()));
		}
		Ok(())
	}
}

pub async fn list_comments(
	State(app): State<App>,
	Path((title_id, review_id)): Path<(i64, i64)>,
	Query(query): Query<PageQuery>,
) -> RvResult<Json<Vec<CommentView>>> {
	let comments = app.store_adapter.list_comments(title_id, review_id, &query.into()).await?;
	Ok(Json(comments))
}

pub async fn post_comment(
	State(app): State<App>,
	Auth(auth): Auth,
	Path((title_id, review_id)): Path<(i64, i64)>,
	Json(req): Json<CommentRequest>,
) -> RvResult<(StatusCode, Json<CommentView>)> {
	req.validate()?;

	let comment = app
		.store_adapter
		.create_comment(
			title_id,
			review_id,
			&CreateComment { author_id: auth.user_id, text: &req.text },
		)
		.await?;

	Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
	State(app): State<App>,
	Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> RvResult<Json<CommentView>> {
	let comment = app.store_adapter.read_comment(title_id, review_id, comment_id).await?;
	Ok(Json(comment))
}

pub async fn patch_comment(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
	Json(req): Json<CommentRequest>,
) -> RvResult<Json<CommentView>> {
	req.validate()?;

	// Scope first: a mis-addressed comment must 404 before any 403
	let comment = app.store_adapter.read_comment(title_id, review_id, comment_id).await?;
	perm::check(
		&perm::AUTHOR_OR_MODERATION,
		auth.as_ref(),
		&Method::PATCH,
		Some(comment.author_id),
	)?;

	app.store_adapter.update_comment(title_id, review_id, comment_id, &req.text).await?;

	let comment = app.store_adapter.read_comment(title_id, review_id, comment_id).await?;
	Ok(Json(comment))
}

pub async fn delete_comment(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> RvResult<StatusCode> {
	let comment = app.store_adapter.read_comment(title_id, review_id, comment_id).await?;
	perm::check(
		&perm::AUTHOR_OR_MODERATION,
		auth.as_ref(),
		&Method::DELETE,
		Some(comment.author_id),
	)?;

	app.store_adapter.delete_comment(title_id, review_id, comment_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_comment_request_validation() {
		let good = CommentRequest { text: "nice review".into() };
		assert!(good.validate().is_ok());

		let empty = CommentRequest { text: "".into() };
		assert!(matches!(empty.validate(), Err(Error::ValidationError(_))));
	}
}

// vim: ts=4
