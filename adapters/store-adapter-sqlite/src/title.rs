//! Title storage
//!
//! The rating is never stored; it is computed from the title's reviews at
//! read time, so it can never drift out of sync with them.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use std::collections::HashMap;

use crate::utils::*;
use revuo::prelude::*;
use revuo::store_adapter::{CreateTitle, ListTitleOptions, Tag, TitleView, UpdateTitleData};

const TITLE_SELECT: &str = "SELECT t.title_id, t.name, t.year, t.description,
	t.category_slug, c.name AS category_name,
	(SELECT AVG(score) FROM reviews r WHERE r.title_id = t.title_id) AS rating
	FROM titles t LEFT JOIN categories c ON c.slug = t.category_slug";

/// Map a title row into a view with an empty genre set; genres are attached
/// in a second, batched query.
fn map_title_row(row: &SqliteRow) -> Result<TitleView, sqlx::Error> {
	let category = match row.try_get::<Option<Box<str>>, _>("category_slug")? {
		Some(slug) => Some(Tag { name: row.try_get("category_name")?, slug }),
		None => None,
	};
	Ok(TitleView {
		title_id: row.try_get("title_id")?,
		name: row.try_get("name")?,
		year: row.try_get("year")?,
		description: row.try_get("description")?,
		category,
		genres: Vec::new(),
		rating: row.try_get("rating")?,
	})
}

async fn load_genres(db: &SqlitePool, title_ids: &[i64]) -> RvResult<HashMap<i64, Vec<Tag>>> {
	let mut genres: HashMap<i64, Vec<Tag>> = HashMap::new();
	if title_ids.is_empty() {
		return Ok(genres);
	}

	let query = sqlx::QueryBuilder::new(
		"SELECT tg.title_id, g.name, g.slug
		 FROM title_genres tg JOIN genres g ON g.slug = tg.genre_slug
		 WHERE tg.title_id IN ",
	);
	let mut query = push_in(query, title_ids);
	query.push(" ORDER BY g.slug");

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	for row in res {
		let title_id: i64 = row.try_get("title_id").or(Err(Error::DbError))?;
		let tag = Tag {
			name: row.try_get("name").or(Err(Error::DbError))?,
			slug: row.try_get("slug").or(Err(Error::DbError))?,
		};
		genres.entry(title_id).or_default().push(tag);
	}
	Ok(genres)
}

pub(crate) async fn list(db: &SqlitePool, opts: &ListTitleOptions) -> RvResult<Vec<TitleView>> {
	let mut query = sqlx::QueryBuilder::new(TITLE_SELECT);
	query.push(" WHERE 1=1");

	if let Some(name) = &opts.name {
		query.push(" AND t.name LIKE ").push_bind(format!("%{}%", name));
	}
	if let Some(year) = opts.year {
		query.push(" AND t.year=").push_bind(year);
	}
	if let Some(category) = &opts.category {
		query.push(" AND t.category_slug=").push_bind(category.as_str());
	}
	if let Some(genre) = &opts.genre {
		query
			.push(" AND t.title_id IN (SELECT title_id FROM title_genres WHERE genre_slug=")
			.push_bind(genre.as_str())
			.push(")");
	}

	query.push(" ORDER BY t.name, t.year");
	query.push(" LIMIT ").push_bind(i64::from(opts.limit.unwrap_or(20).min(100)));
	if let Some(offset) = opts.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let mut titles = collect_res(res.iter().map(map_title_row))?;

	let ids: Vec<i64> = titles.iter().map(|t| t.title_id).collect();
	let mut genres = load_genres(db, &ids).await?;
	for title in &mut titles {
		if let Some(g) = genres.remove(&title.title_id) {
			title.genres = g;
		}
	}
	Ok(titles)
}

pub(crate) async fn read(db: &SqlitePool, title_id: i64) -> RvResult<TitleView> {
	let res = sqlx::query(&format!("{TITLE_SELECT} WHERE t.title_id=?1"))
		.bind(title_id)
		.fetch_one(db)
		.await;
	let mut title = map_res(res, |row| map_title_row(&row))?;

	let mut genres = load_genres(db, &[title_id]).await?;
	if let Some(g) = genres.remove(&title_id) {
		title.genres = g;
	}
	Ok(title)
}

pub(crate) async fn create(db: &SqlitePool, title: &CreateTitle<'_>) -> RvResult<TitleView> {
	let mut tx = db.begin().await.or(Err(Error::DbError))?;

	// An unknown category slug trips the foreign key here
	let res = sqlx::query(
		"INSERT INTO titles (name, year, description, category_slug)
		 VALUES (?1, ?2, ?3, ?4) RETURNING title_id",
	)
	.bind(title.name)
	.bind(title.year)
	.bind(title.description)
	.bind(title.category)
	.fetch_one(&mut *tx)
	.await;

	let row = match res {
		Ok(row) => row,
		Err(err) => return Err(map_write_err(err, "unknown category")),
	};
	let title_id: i64 = row.try_get("title_id").or(Err(Error::DbError))?;

	for slug in title.genres {
		sqlx::query("INSERT INTO title_genres (title_id, genre_slug) VALUES (?1, ?2)")
			.bind(title_id)
			.bind(slug.as_str())
			.execute(&mut *tx)
			.await
			.map_err(|err| map_write_err(err, "unknown or repeated genre"))?;
	}

	tx.commit().await.or(Err(Error::DbError))?;

	read(db, title_id).await
}

pub(crate) async fn update(
	db: &SqlitePool,
	title_id: i64,
	data: &UpdateTitleData,
) -> RvResult<()> {
	let mut tx = db.begin().await.or(Err(Error::DbError))?;

	let exists = sqlx::query("SELECT 1 FROM titles WHERE title_id=?1")
		.bind(title_id)
		.fetch_one(&mut *tx)
		.await;
	map_res(exists, |_| Ok(()))?;

	let mut query = sqlx::QueryBuilder::new("UPDATE titles SET ");
	let mut has_updates = false;

	has_updates = push_patch!(query, has_updates, "name", data.name.as_ref(), |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "year", data.year.as_ref(), |v| *v);
	has_updates =
		push_patch!(query, has_updates, "description", data.description.as_ref(), |v| v.as_ref());
	has_updates =
		push_patch!(query, has_updates, "category_slug", data.category.as_ref(), |v| v.as_ref());

	if has_updates {
		query.push(" WHERE title_id=").push_bind(title_id);
		query
			.build()
			.execute(&mut *tx)
			.await
			.map_err(|err| map_write_err(err, "unknown category"))?;
	}

	match data.genres.as_ref() {
		Patch::Undefined => {}
		Patch::Null => {
			sqlx::query("DELETE FROM title_genres WHERE title_id=?1")
				.bind(title_id)
				.execute(&mut *tx)
				.await
				.inspect_err(inspect)
				.map_err(|_| Error::DbError)?;
		}
		Patch::Value(slugs) => {
			sqlx::query("DELETE FROM title_genres WHERE title_id=?1")
				.bind(title_id)
				.execute(&mut *tx)
				.await
				.inspect_err(inspect)
				.map_err(|_| Error::DbError)?;
			for slug in slugs.iter() {
				sqlx::query("INSERT INTO title_genres (title_id, genre_slug) VALUES (?1, ?2)")
					.bind(title_id)
					.bind(slug.as_str())
					.execute(&mut *tx)
					.await
					.map_err(|err| map_write_err(err, "unknown or repeated genre"))?;
			}
		}
	}

	tx.commit().await.or(Err(Error::DbError))?;
	Ok(())
}

/// Reviews and their comments go with the title, through the cascades.
pub(crate) async fn delete(db: &SqlitePool, title_id: i64) -> RvResult<()> {
	let res = sqlx::query("DELETE FROM titles WHERE title_id=?1")
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
