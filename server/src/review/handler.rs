//! Review endpoints, nested under a title
//!
//! The title id from the path scopes every lookup; a review reached through
//! the wrong title is a 404. Author and creation time are always
//! server-assigned, whatever the payload says.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::{Method, StatusCode},
};
use serde::Deserialize;

use crate::core::perm;
use crate::prelude::*;
use revuo::store_adapter::{CreateReview, Page, ReviewView, UpdateReviewData};

/// Scores live on a closed 1..=10 scale
fn check_score(score: i32) -> RvResult<()> {
	if !(1..=10).contains(&score) {
		return Err(Error::ValidationError("score must be between 1 and 10".into()));
	}
	Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

impl From<PageQuery> for Page {
	fn from(query: PageQuery) -> Self {
		Page { limit: query.limit, offset: query.offset }
	}
}

pub async fn list_reviews(
	State(app): State<App>,
	Path(title_id): Path<i64>,
	Query(query): Query<PageQuery>,
) -> RvResult<Json<Vec<ReviewView>>> {
	let reviews = app.store_adapter.list_reviews(title_id, &query.into()).await?;
	Ok(Json(reviews))
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
	pub text: String,
	pub score: i32,
}

pub async fn post_review(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(title_id): Path<i64>,
	Json(req): Json<CreateReviewRequest>,
) -> RvResult<(StatusCode, Json<ReviewView>)> {
	check_score(req.score)?;
	if req.text.is_empty() {
		return Err(Error::ValidationError("text must not be empty".into()));
	}

	let review = app
		.store_adapter
		.create_review(&CreateReview {
			title_id,
			author_id: auth.user_id,
			text: &req.text,
			score: req.score,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review(
	State(app): State<App>,
	Path((title_id, review_id)): Path<(i64, i64)>,
) -> RvResult<Json<ReviewView>> {
	let review = app.store_adapter.read_review(title_id, review_id).await?;
	Ok(Json(review))
}

pub async fn patch_review(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path((title_id, review_id)): Path<(i64, i64)>,
	Json(data): Json<UpdateReviewData>,
) -> RvResult<Json<ReviewView>> {
	// Scope first: a mis-addressed review must 404 before any 403
	let review = app.store_adapter.read_review(title_id, review_id).await?;
	perm::check(&perm::AUTHOR_OR_MODERATION, auth.as_ref(), &Method::PATCH, Some(review.author_id))?;

	if let Some(score) = data.score.value() {
		check_score(*score)?;
	}

	app.store_adapter.update_review(title_id, review_id, &data).await?;

	let review = app.store_adapter.read_review(title_id, review_id).await?;
	Ok(Json(review))
}

pub async fn delete_review(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path((title_id, review_id)): Path<(i64, i64)>,
) -> RvResult<StatusCode> {
	let review = app.store_adapter.read_review(title_id, review_id).await?;
	perm::check(
		&perm::AUTHOR_OR_MODERATION,
		auth.as_ref(),
		&Method::DELETE,
		Some(review.author_id),
	)?;

	app.store_adapter.delete_review(title_id, review_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_check_score_bounds() {
		assert!(check_score(1).is_ok());
		assert!(check_score(10).is_ok());
		assert!(matches!(check_score(0), Err(Error::ValidationError(_))));
		assert!(matches!(check_score(11), Err(Error::ValidationError(_))));
		assert!(matches!(check_score(-3), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_update_payload() {
		let data: UpdateReviewData =
			serde_json::from_str(r#"{"score": 8}"#).expect("Should parse");
		assert_eq!(data.score, Patch::Value(8));
		assert!(data.text.is_undefined());
	}
}

// vim: ts=4
