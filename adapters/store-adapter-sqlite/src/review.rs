//! Review storage
//!
//! Every operation is scoped to the parent title; a review id paired with
//! the wrong title behaves exactly like a missing review.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use revuo::prelude::*;
use revuo::store_adapter::{CreateReview, Page, ReviewView, UpdateReviewData};

const REVIEW_SELECT: &str = "SELECT r.review_id, r.title_id, r.author_id, u.handle AS author,
	r.text, r.score, r.created_at
	FROM reviews r JOIN users u ON u.user_id = r.author_id";

fn map_review_row(row: &SqliteRow) -> Result<ReviewView, sqlx::Error> {
	Ok(ReviewView {
		review_id: row.try_get("review_id")?,
		title_id: row.try_get("title_id")?,
		author_id: row.try_get("author_id")?,
		author: row.try_get("author")?,
		text: row.try_get("text")?,
		score: row.try_get("score")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// Listing against a missing title is NotFound, not an empty list
pub(crate) async fn check_title(db: &SqlitePool, title_id: i64) -> RvResult<()> {
	let res = sqlx::query("SELECT 1 FROM titles WHERE title_id=?1")
		.bind(title_id)
		.fetch_one(db)
		.await;
	map_res(res, |_| Ok(()))
}

pub(crate) async fn list(
	db: &SqlitePool,
	title_id: i64,
	page: &Page,
) -> RvResult<Vec<ReviewView>> {
	check_title(db, title_id).await?;

	let mut query = sqlx::QueryBuilder::new(REVIEW_SELECT);
	query.push(" WHERE r.title_id=").push_bind(title_id);
	query.push(" ORDER BY r.created_at DESC, r.review_id DESC");
	query.push(" LIMIT ").push_bind(i64::from(page.limit.unwrap_or(20).min(100)));
	if let Some(offset) = page.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(map_review_row))
}

pub(crate) async fn create(db: &SqlitePool, review: &CreateReview<'_>) -> RvResult<ReviewView> {
	check_title(db, review.title_id).await?;

	// The (author, title) unique index keeps this a one-review-per-title deal
	let res = sqlx::query(
		"INSERT INTO reviews (title_id, author_id, text, score)
		 VALUES (?1, ?2, ?3, ?4) RETURNING review_id",
	)
	.bind(review.title_id)
	.bind(review.author_id)
	.bind(review.text)
	.bind(review.score)
	.fetch_one(db)
	.await;

	let row = match res {
		Ok(row) => row,
		Err(err) => return Err(map_write_err(err, "you have already reviewed this title")),
	};
	let review_id: i64 = row.try_get("review_id").or(Err(Error::DbError))?;

	read(db, review.title_id, review_id).await
}

pub(crate) async fn read(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
) -> RvResult<ReviewView> {
	let res = sqlx::query(&format!("{REVIEW_SELECT} WHERE r.review_id=?1 AND r.title_id=?2"))
		.bind(review_id)
		.bind(title_id)
		.fetch_one(db)
		.await;
	map_res(res, |row| map_review_row(&row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	data: &UpdateReviewData,
) -> RvResult<()> {
	let mut query = sqlx::QueryBuilder::new("UPDATE reviews SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "text", data.text.as_ref(), |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "score", data.score.as_ref(), |v| *v);

	if !has_updates {
		return read(db, title_id, review_id).await.map(|_| ());
	}

	query.push(" WHERE review_id=").push_bind(review_id);
	query.push(" AND title_id=").push_bind(title_id);

	let res =
		query.build().execute(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// The review's comments go with it, through the cascade.
pub(crate) async fn delete(db: &SqlitePool, title_id: i64, review_id: i64) -> RvResult<()> {
	let res = sqlx::query("DELETE FROM reviews WHERE review_id=?1 AND title_id=?2")
		.bind(review_id)
		.bind(title_id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

// vim: ts=4
