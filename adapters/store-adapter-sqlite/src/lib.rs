//! SQLite-backed implementation of the Revuo store adapter.
//!
//! One database file holds everything: users, classification tags, titles,
//! reviews, and comments. Foreign keys are switched on per connection, so
//! the delete cascades declared in the schema actually run.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use revuo::{
	prelude::*,
	store_adapter::{
		CommentView, CreateComment, CreateReview, CreateTitle, CreateUser, ListTagOptions,
		ListTitleOptions, ListUserOptions, Page, ReviewView, StoreAdapter, Tag, TitleView,
		UpdateReviewData, UpdateTitleData, UpdateUserData, UserRecord,
	},
};

mod comment;
mod review;
mod tag;
mod title;
mod user;
mod utils;

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Open (or create) the database at `path` and run schema setup.
	pub async fn new(path: impl AsRef<Path>) -> RvResult<Self> {
		if let Some(dir) = path.as_ref().parent() {
			tokio::fs::create_dir_all(dir).await?;
		}
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DB open: {:#?}", err))
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(|err| error!("DB init: {:#?}", err))?;

		Ok(Self { db })
	}
}

async fn init_db(db: &SqlitePool) -> RvResult<()> {
	let mut tx = db.begin().await.or(Err(Error::DbError))?;

	for stmt in [
		"CREATE TABLE IF NOT EXISTS users (
			user_id INTEGER PRIMARY KEY AUTOINCREMENT,
			handle TEXT NOT NULL UNIQUE,
			email TEXT NOT NULL UNIQUE,
			first_name TEXT NOT NULL DEFAULT '',
			last_name TEXT NOT NULL DEFAULT '',
			bio TEXT NOT NULL DEFAULT '',
			role TEXT NOT NULL DEFAULT 'user',
			confirmation_code TEXT,
			is_staff INTEGER NOT NULL DEFAULT 0,
			is_superuser INTEGER NOT NULL DEFAULT 0,
			created_at INTEGER NOT NULL DEFAULT (unixepoch())
		)",
		"CREATE TABLE IF NOT EXISTS categories (
			slug TEXT PRIMARY KEY,
			name TEXT NOT NULL
		)",
		"CREATE TABLE IF NOT EXISTS genres (
			slug TEXT PRIMARY KEY,
			name TEXT NOT NULL
		)",
		"CREATE TABLE IF NOT EXISTS titles (
			title_id INTEGER PRIMARY KEY AUTOINCREMENT,
			name TEXT NOT NULL,
			year INTEGER,
			description TEXT,
			category_slug TEXT REFERENCES categories(slug) ON DELETE SET NULL
		)",
		"CREATE TABLE IF NOT EXISTS title_genres (
			title_id INTEGER NOT NULL REFERENCES titles(title_id) ON DELETE CASCADE,
			genre_slug TEXT NOT NULL REFERENCES genres(slug) ON DELETE CASCADE,
			PRIMARY KEY (title_id, genre_slug)
		)",
		"CREATE TABLE IF NOT EXISTS reviews (
			review_id INTEGER PRIMARY KEY AUTOINCREMENT,
			title_id INTEGER NOT NULL REFERENCES titles(title_id) ON DELETE CASCADE,
			author_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
			text TEXT NOT NULL,
			score INTEGER NOT NULL,
			created_at INTEGER NOT NULL DEFAULT (unixepoch()),
			UNIQUE (author_id, title_id)
		)",
		"CREATE TABLE IF NOT EXISTS comments (
			comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
			review_id INTEGER NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
			author_id INTEGER NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
			text TEXT NOT NULL,
			created_at INTEGER NOT NULL DEFAULT (unixepoch())
		)",
		"CREATE INDEX IF NOT EXISTS idx_reviews_title ON reviews (title_id)",
		"CREATE INDEX IF NOT EXISTS idx_comments_review ON comments (review_id)",
	] {
		sqlx::query(stmt).execute(&mut *tx).await.or(Err(Error::DbError))?;
	}

	tx.commit().await.or(Err(Error::DbError))?;
	Ok(())
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	// User management
	//*****************
	async fn create_user(&self, user: &CreateUser<'_>) -> RvResult<UserRecord> {
		user::create(&self.db, user).await
	}

	async fn read_user(&self, handle: &str) -> RvResult<UserRecord> {
		user::read(&self.db, handle).await
	}

	async fn read_user_by_id(&self, user_id: i64) -> RvResult<UserRecord> {
		user::read_by_id(&self.db, user_id).await
	}

	async fn read_user_by_email(&self, email: &str) -> RvResult<UserRecord> {
		user::read_by_email(&self.db, email).await
	}

	async fn list_users(&self, opts: &ListUserOptions) -> RvResult<Vec<UserRecord>> {
		user::list(&self.db, opts).await
	}

	async fn update_user(&self, handle: &str, data: &UpdateUserData) -> RvResult<()> {
		user::update(&self.db, handle, data).await
	}

	async fn delete_user(&self, handle: &str) -> RvResult<()> {
		user::delete(&self.db, handle).await
	}

	// Category management
	//*********************
	async fn list_categories(&self, opts: &ListTagOptions) -> RvResult<Vec<Tag>> {
		tag::list(&self.db, tag::Kind::Category, opts).await
	}

	async fn create_category(&self, t: &Tag) -> RvResult<()> {
		tag::create(&self.db, tag::Kind::Category, t).await
	}

	async fn delete_category(&self, slug: &str) -> RvResult<()> {
		tag::delete(&self.db, tag::Kind::Category, slug).await
	}

	// Genre management
	//******************
	async fn list_genres(&self, opts: &ListTagOptions) -> RvResult<Vec<Tag>> {
		tag::list(&self.db, tag::Kind::Genre, opts).await
	}

	async fn create_genre(&self, t: &Tag) -> RvResult<()> {
		tag::create(&self.db, tag::Kind::Genre, t).await
	}

	async fn delete_genre(&self, slug: &str) -> RvResult<()> {
		tag::delete(&self.db, tag::Kind::Genre, slug).await
	}

	// Title management
	//******************
	async fn list_titles(&self, opts: &ListTitleOptions) -> RvResult<Vec<TitleView>> {
		title::list(&self.db, opts).await
	}

	async fn read_title(&self, title_id: i64) -> RvResult<TitleView> {
		title::read(&self.db, title_id).await
	}

	async fn create_title(&self, title: &CreateTitle<'_>) -> RvResult<TitleView> {
		title::create(&self.db, title).await
	}

	async fn update_title(&self, title_id: i64, data: &UpdateTitleData) -> RvResult<()> {
		title::update(&self.db, title_id, data).await
	}

	async fn delete_title(&self, title_id: i64) -> RvResult<()> {
		title::delete(&self.db, title_id).await
	}

	// Review management
	//*******************
	async fn list_reviews(&self, title_id: i64, page: &Page) -> RvResult<Vec<ReviewView>> {
		review::list(&self.db, title_id, page).await
	}

	async fn create_review(&self, rv: &CreateReview<'_>) -> RvResult<ReviewView> {
		review::create(&self.db, rv).await
	}

	async fn read_review(&self, title_id: i64, review_id: i64) -> RvResult<ReviewView> {
		review::read(&self.db, title_id, review_id).await
	}

	async fn update_review(
		&self,
		title_id: i64,
		review_id: i64,
		data: &UpdateReviewData,
	) -> RvResult<()> {
		review::update(&self.db, title_id, review_id, data).await
	}

	async fn delete_review(&self, title_id: i64, review_id: i64) -> RvResult<()> {
		review::delete(&self.db, title_id, review_id).await
	}

	// Comment management
	//********************
	async fn list_comments(
		&self,
		title_id: i64,
		review_id: i64,
		page: &Page,
	) -> RvResult<Vec<CommentView>> {
		comment::list(&self.db, title_id, review_id, page).await
	}

	async fn create_comment(
		&self,
		title_id: i64,
		review_id: i64,
		c: &CreateComment<'_>,
	) -> RvResult<CommentView> {
		comment::create(&self.db, title_id, review_id, c).await
	}

	async fn read_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment_id: i64,
	) -> RvResult<CommentView> {
		comment::read(&self.db, title_id, review_id, comment_id).await
	}

	async fn update_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment_id: i64,
		text: &str,
	) -> RvResult<()> {
		comment::update(&self.db, title_id, review_id, comment_id, text).await
	}

	async fn delete_comment(&self, title_id: i64, review_id: i64, comment_id: i64) -> RvResult<()> {
		comment::delete(&self.db, title_id, review_id, comment_id).await
	}
}

// vim: ts=4
