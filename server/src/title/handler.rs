//! Title endpoints
//!
//! Reads are open to everyone; mutations are for staff. The rating field in
//! every response is computed from the current reviews by the store.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::{Method, StatusCode},
};
use chrono::Datelike;
use serde::Deserialize;

use crate::core::perm;
use crate::prelude::*;
use revuo::store_adapter::{CreateTitle, ListTitleOptions, TitleView, UpdateTitleData};

/// Titles can not be released in the future
fn check_year(year: i32) -> RvResult<()> {
	let current = chrono::Utc::now().year();
	if year > current {
		return Err(Error::ValidationError(format!(
			"year must not be greater than {}",
			current
		)));
	}
	Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListTitlesQuery {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub category: Option<String>,
	pub genre: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

pub async fn list_titles(
	State(app): State<App>,
	Query(query): Query<ListTitlesQuery>,
) -> RvResult<Json<Vec<TitleView>>> {
	let opts = ListTitleOptions {
		name: query.name,
		year: query.year,
		category: query.category,
		genre: query.genre,
		limit: query.limit,
		offset: query.offset,
	};
	let titles = app.store_adapter.list_titles(&opts).await?;
	Ok(Json(titles))
}

pub async fn get_title(
	State(app): State<App>,
	Path(title_id): Path<i64>,
) -> RvResult<Json<TitleView>> {
	let title = app.store_adapter.read_title(title_id).await?;
	Ok(Json(title))
}

#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
	pub name: String,
	pub year: Option<i32>,
	pub description: Option<String>,
	pub category: Option<String>,
	#[serde(default)]
	pub genre: Vec<String>,
}

pub async fn post_title(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Json(req): Json<CreateTitleRequest>,
) -> RvResult<(StatusCode, Json<TitleView>)> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::POST, None)?;

	if req.name.is_empty() {
		return Err(Error::ValidationError("name must not be empty".into()));
	}
	if let Some(year) = req.year {
		check_year(year)?;
	}

	let title = app
		.store_adapter
		.create_title(&CreateTitle {
			name: &req.name,
			year: req.year,
			description: req.description.as_deref(),
			category: req.category.as_deref(),
			genres: &req.genre,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(title)))
}

pub async fn patch_title(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(title_id): Path<i64>,
	Json(data): Json<UpdateTitleData>,
) -> RvResult<Json<TitleView>> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::PATCH, None)?;

	if let Some(year) = data.year.value() {
		check_year(*year)?;
	}
	if let Some(name) = data.name.value() {
		if name.is_empty() {
			return Err(Error::ValidationError("name must not be empty".into()));
		}
	}

	app.store_adapter.update_title(title_id, &data).await?;

	let title = app.store_adapter.read_title(title_id).await?;
	Ok(Json(title))
}

pub async fn delete_title(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	Path(title_id): Path<i64>,
) -> RvResult<StatusCode> {
	perm::check(&perm::STAFF_OR_READ_ONLY, auth.as_ref(), &Method::DELETE, None)?;

	app.store_adapter.delete_title(title_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_check_year_boundary() {
		let current = chrono::Utc::now().year();
		assert!(check_year(current).is_ok());
		assert!(check_year(1895).is_ok());
		assert!(matches!(check_year(current + 1), Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_list_titles_query() {
		let query: ListTitlesQuery =
			serde_urlencoded::from_str("name=dune&year=2021&genre=sci-fi").expect("Should parse");
		assert_eq!(query.name.as_deref(), Some("dune"));
		assert_eq!(query.year, Some(2021));
		assert_eq!(query.genre.as_deref(), Some("sci-fi"));
		assert_eq!(query.category, None);
	}

	#[test]
	fn test_update_payload_clears_category() {
		let data: UpdateTitleData =
			serde_json::from_str(r#"{"category": null, "genre": []}"#).expect("Should parse");
		assert_eq!(data.category, Patch::Null);
		assert_eq!(data.genres, Patch::Value(vec![]));
		assert!(data.name.is_undefined());
	}
}

// vim: ts=4
