//! Category and genre storage
//!
//! The two tag kinds share one shape, so one set of queries serves both,
//! parameterized over the table.

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use revuo::prelude::*;
use revuo::store_adapter::{ListTagOptions, Tag};

#[derive(Clone, Copy, Debug)]
pub(crate) enum Kind {
	Category,
	Genre,
}

impl Kind {
	fn table(self) -> &'static str {
		match self {
			Kind::Category => "categories",
			Kind::Genre => "genres",
		}
	}
}

pub(crate) async fn list(
	db: &SqlitePool,
	kind: Kind,
	opts: &ListTagOptions,
) -> RvResult<Vec<Tag>> {
	let mut query =
		sqlx::QueryBuilder::new(format!("SELECT name, slug FROM {} WHERE 1=1", kind.table()));

	if let Some(q) = &opts.q {
		query.push(" AND name LIKE ").push_bind(format!("%{}%", q));
	}

	query.push(" ORDER BY slug");
	query.push(" LIMIT ").push_bind(i64::from(opts.limit.unwrap_or(20).min(100)));
	if let Some(offset) = opts.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	collect_res(res.into_iter().map(|row| {
		Ok(Tag { name: row.try_get("name")?, slug: row.try_get("slug")? })
	}))
}

pub(crate) async fn create(db: &SqlitePool, kind: Kind, tag: &Tag) -> RvResult<()> {
	let res = sqlx::query(&format!("INSERT INTO {} (slug, name) VALUES (?1, ?2)", kind.table()))
		.bind(&*tag.slug)
		.bind(&*tag.name)
		.execute(db)
		.await;
	match res {
		Ok(_) => Ok(()),
		Err(err) => Err(map_write_err(err, "slug already in use")),
	}
}

/// Removing a category detaches it from titles; removing a genre drops its
/// links. Titles themselves are never deleted here.
pub(crate) async fn delete(db: &SqlitePool, kind: Kind, slug: &str) -> RvResult<()> {
	let res = sqlx::query(&format!("DELETE FROM {} WHERE slug=?1", kind.table()))
		.bind(slug)
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
