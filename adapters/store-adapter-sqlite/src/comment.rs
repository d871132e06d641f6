//! Comment storage
//!
//! Comments hang off a review, which in turn hangs off a title; both
//! ancestors are checked, so a comment reached through the wrong pair is
//! a NotFound.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use revuo::prelude::*;
use revuo::store_adapter::{CommentView, CreateComment, Page};

const COMMENT_SELECT: &str = "SELECT c.comment_id, c.review_id, c.author_id,
	u.handle AS author, c.text, c.created_at
	FROM comments c JOIN users u ON u.user_id = c.author_id";

fn map_comment_row(row: &SqliteRow) -> Result<CommentView, sqlx::Error> {
	Ok(CommentView {
		comment_id: row.try_get("comment_id")?,
		review_id: row.try_get("review_id")?,
		author_id: row.try_get("author_id")?,
		author: row.try_get("author")?,
		text: row.try_get("text")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

/// Verify the review exists under the given title
async fn check_scope(db: &SqlitePool, title_id: i64, review_id: i64) -> RvResult<()> {
	let res = sqlx::query("SELECT 1 FROM reviews WHERE review_id=?1 AND title_id=?2")
		.bind(review_id)
		.bind(title_id)
		.fetch_one(db)
		.await;
	map_res(res, |_| Ok(()))
}

pub(crate) async fn list(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	page: &Page,
) -> RvResult<Vec<CommentView>> {
	check_scope(db, title_id, review_id).await?;

	let mut query = sqlx::QueryBuilder::new(COMMENT_SELECT);
	query.push(" WHERE c.review_id=").push_bind(review_id);
	query.push(" ORDER BY c.created_at DESC, c.comment_id DESC");
	query.push(" LIMIT ").push_bind(i64::from(page.limit.unwrap_or(20).min(100)));
	if let Some(offset) = page.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	collect_res(res.iter().map(map_comment_row))
}

pub(crate) async fn create(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	comment: &CreateComment<'_>,
) -> RvResult<CommentView> {
	check_scope(db, title_id, review_id).await?;

	let res = sqlx::query(
		"INSERT INTO comments (review_id, author_id, text)
		 VALUES (?1, ?2, ?3) RETURNING comment_id",
	)
	.bind(review_id)
	.bind(comment.author_id)
	.bind(comment.text)
	.fetch_one(db)
	.await;

	let row = match res {
		Ok(row) => row,
		Err(err) => {
			inspect(&err);
			return Err(Error::DbError);
		}
	};
	let comment_id: i64 = row.try_get("comment_id").or(Err(Error::DbError))?;

	read(db, title_id, review_id, comment_id).await
}

pub(crate) async fn read(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	comment_id: i64,
) -> RvResult<CommentView> {
	check_scope(db, title_id, review_id).await?;

	let res = sqlx::query(&format!("{COMMENT_SELECT} WHERE c.comment_id=?1 AND c.review_id=?2"))
		.bind(comment_id)
		.bind(review_id)
		.fetch_one(db)
		.await;
	map_res(res, |row| map_comment_row(&row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	comment_id: i64,
	text: &str,
) -> RvResult<()> {
	check_scope(db, title_id, review_id).await?;

	let res = sqlx::query("UPDATE comments SET text=?1 WHERE comment_id=?2 AND review_id=?3")
		.bind(text)
		.bind(comment_id)
		.bind(review_id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete(
	db: &SqlitePool,
	title_id: i64,
	review_id: i64,
	comment_id: i64,
) -> RvResult<()> {
	check_scope(db, title_id, review_id).await?;

	let res = sqlx::query("DELETE FROM comments WHERE comment_id=?1 AND review_id=?2")
		.bind(comment_id)
		.bind(review_id)
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
