//! Adapter trait for the persistent store.
//!
//! All uniqueness invariants (user email/handle, category/genre slug, one
//! review per author and title) are enforced by the adapter with atomic
//! check-and-insert semantics; a violated constraint surfaces as
//! `Error::ValidationError`, never as a silent overwrite.
//!
//! Nested-resource scoping is part of the contract: review operations take
//! the parent title id, comment operations take the `(title, review)` pair,
//! and a mismatched ancestor fails with `Error::NotFound`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

// Users //
//*******//
#[derive(Clone, Debug)]
pub struct UserRecord {
	pub user_id: i64,
	pub handle: Box<str>,
	pub email: Box<str>,
	pub first_name: Box<str>,
	pub last_name: Box<str>,
	pub bio: Box<str>,
	pub role: Role,
	pub confirmation_code: Option<Box<str>>,
	pub is_staff: bool,
	pub is_superuser: bool,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateUser<'a> {
	pub handle: &'a str,
	pub email: &'a str,
	pub first_name: &'a str,
	pub last_name: &'a str,
	pub bio: &'a str,
	pub role: Role,
	pub confirmation_code: Option<&'a str>,
	pub is_staff: bool,
	pub is_superuser: bool,
}

impl Default for CreateUser<'_> {
	fn default() -> Self {
		CreateUser {
			handle: "",
			email: "",
			first_name: "",
			last_name: "",
			bio: "",
			role: Role::User,
			confirmation_code: None,
			is_staff: false,
			is_superuser: false,
		}
	}
}

/// Partial update of a user record. The self-service path must only ever
/// populate the non-privileged fields; `role`, `is_staff` and `is_superuser`
/// are reachable through the superuser endpoints alone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserData {
	pub handle: Patch<Box<str>>,
	pub email: Patch<Box<str>>,
	pub first_name: Patch<Box<str>>,
	pub last_name: Patch<Box<str>>,
	pub bio: Patch<Box<str>>,
	pub role: Patch<Role>,
	pub confirmation_code: Patch<Box<str>>,
	pub is_staff: Patch<bool>,
	pub is_superuser: Patch<bool>,
}

#[derive(Debug, Default)]
pub struct ListUserOptions {
	/// Substring match against handle or email
	pub q: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

// Categories & genres //
//*********************//
/// A classification tag: category (one per title) or genre (many per title).
/// The slug is the unique lookup key.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tag {
	pub name: Box<str>,
	pub slug: Box<str>,
}

#[derive(Debug, Default)]
pub struct ListTagOptions {
	/// Substring match against the tag name
	pub q: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

// Titles //
//********//
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleView {
	pub title_id: i64,
	pub name: Box<str>,
	pub year: Option<i32>,
	pub description: Option<Box<str>>,
	pub category: Option<Tag>,
	pub genres: Vec<Tag>,
	/// Mean of all review scores, absent when the title has no reviews
	pub rating: Option<f64>,
}

#[derive(Debug, Default)]
pub struct CreateTitle<'a> {
	pub name: &'a str,
	pub year: Option<i32>,
	pub description: Option<&'a str>,
	/// Category slug; an unknown slug is a validation error
	pub category: Option<&'a str>,
	/// Genre slugs; an unknown slug is a validation error
	pub genres: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTitleData {
	pub name: Patch<Box<str>>,
	pub year: Patch<i32>,
	pub description: Patch<Box<str>>,
	/// Category by slug; `Null` clears the category
	pub category: Patch<Box<str>>,
	/// Full replacement of the genre set, by slug
	#[serde(rename = "genre")]
	pub genres: Patch<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct ListTitleOptions {
	/// Case-insensitive substring match against the title name
	pub name: Option<String>,
	/// Exact release year
	pub year: Option<i32>,
	/// Category slug
	pub category: Option<String>,
	/// Genre slug
	pub genre: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

// Reviews //
//*********//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
	pub review_id: i64,
	pub title_id: i64,
	pub author_id: i64,
	/// Handle of the author, resolved at read time
	pub author: Box<str>,
	pub text: Box<str>,
	pub score: i32,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateReview<'a> {
	pub title_id: i64,
	pub author_id: i64,
	pub text: &'a str,
	pub score: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateReviewData {
	pub text: Patch<Box<str>>,
	pub score: Patch<i32>,
}

// Comments //
//**********//
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
	pub comment_id: i64,
	pub review_id: i64,
	pub author_id: i64,
	pub author: Box<str>,
	pub text: Box<str>,
	pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateComment<'a> {
	pub author_id: i64,
	pub text: &'a str,
}

#[derive(Debug, Default)]
pub struct Page {
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

/// Adapter that manages the persistent store for all Revuo entities.
#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	// User management
	//*****************
	async fn create_user(&self, user: &CreateUser<'_>) -> RvResult<UserRecord>;
	async fn read_user(&self, handle: &str) -> RvResult<UserRecord>;
	async fn read_user_by_id(&self, user_id: i64) -> RvResult<UserRecord>;
	async fn read_user_by_email(&self, email: &str) -> RvResult<UserRecord>;
	async fn list_users(&self, opts: &ListUserOptions) -> RvResult<Vec<UserRecord>>;
	async fn update_user(&self, handle: &str, data: &UpdateUserData) -> RvResult<()>;
	async fn delete_user(&self, handle: &str) -> RvResult<()>;

	// Category management
	//*********************
	async fn list_categories(&self, opts: &ListTagOptions) -> RvResult<Vec<Tag>>;
	async fn create_category(&self, tag: &Tag) -> RvResult<()>;
	/// Deleting a category clears the category of referencing titles;
	/// the titles themselves stay.
	async fn delete_category(&self, slug: &str) -> RvResult<()>;

	// Genre management
	//******************
	async fn list_genres(&self, opts: &ListTagOptions) -> RvResult<Vec<Tag>>;
	async fn create_genre(&self, tag: &Tag) -> RvResult<()>;
	/// Deleting a genre removes it from every title's genre set;
	/// the titles themselves stay.
	async fn delete_genre(&self, slug: &str) -> RvResult<()>;

	// Title management
	//******************
	async fn list_titles(&self, opts: &ListTitleOptions) -> RvResult<Vec<TitleView>>;
	async fn read_title(&self, title_id: i64) -> RvResult<TitleView>;
	async fn create_title(&self, title: &CreateTitle<'_>) -> RvResult<TitleView>;
	async fn update_title(&self, title_id: i64, data: &UpdateTitleData) -> RvResult<()>;
	/// Cascades to the title's reviews and their comments.
	async fn delete_title(&self, title_id: i64) -> RvResult<()>;

	// Review management (scoped to a title)
	//***************************************
	async fn list_reviews(&self, title_id: i64, page: &Page) -> RvResult<Vec<ReviewView>>;
	async fn create_review(&self, review: &CreateReview<'_>) -> RvResult<ReviewView>;
	async fn read_review(&self, title_id: i64, review_id: i64) -> RvResult<ReviewView>;
	async fn update_review(
		&self,
		title_id: i64,
		review_id: i64,
		data: &UpdateReviewData,
	) -> RvResult<()>;
	/// Cascades to the review's comments.
	async fn delete_review(&self, title_id: i64, review_id: i64) -> RvResult<()>;

	// Comment management (scoped to a title/review pair)
	//****************************************************
	async fn list_comments(
		&self,
		title_id: i64,
		review_id: i64,
		page: &Page,
	) -> RvResult<Vec<CommentView>>;
	async fn create_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment: &CreateComment<'_>,
	) -> RvResult<CommentView>;
	async fn read_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment_id: i64,
	) -> RvResult<CommentView>;
	async fn update_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment_id: i64,
		text: &str,
	) -> RvResult<()>;
	async fn delete_comment(
		&self,
		title_id: i64,
		review_id: i64,
		comment_id: i64,
	) -> RvResult<()>;
}

// vim: ts=4
