//! User account storage

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use revuo::prelude::*;
use revuo::store_adapter::{CreateUser, ListUserOptions, UpdateUserData, UserRecord};

const USER_COLUMNS: &str = "user_id, handle, email, first_name, last_name, bio, role,
	confirmation_code, is_staff, is_superuser, created_at";

fn map_user_row(row: SqliteRow) -> Result<UserRecord, sqlx::Error> {
	let role: &str = row.try_get("role")?;
	Ok(UserRecord {
		user_id: row.try_get("user_id")?,
		handle: row.try_get("handle")?,
		email: row.try_get("email")?,
		first_name: row.try_get("first_name")?,
		last_name: row.try_get("last_name")?,
		bio: row.try_get("bio")?,
		role: Role::parse(role).ok_or(sqlx::Error::RowNotFound)?,
		confirmation_code: row.try_get("confirmation_code")?,
		is_staff: row.try_get("is_staff")?,
		is_superuser: row.try_get("is_superuser")?,
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn create(db: &SqlitePool, user: &CreateUser<'_>) -> RvResult<UserRecord> {
	let res = sqlx::query(
		"INSERT INTO users (handle, email, first_name, last_name, bio, role,
			confirmation_code, is_staff, is_superuser)
		 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
		 RETURNING user_id, created_at",
	)
	.bind(user.handle)
	.bind(user.email)
	.bind(user.first_name)
	.bind(user.last_name)
	.bind(user.bio)
	.bind(user.role.as_str())
	.bind(user.confirmation_code)
	.bind(user.is_staff)
	.bind(user.is_superuser)
	.fetch_one(db)
	.await;

	let row = match res {
		Ok(row) => row,
		Err(err) => return Err(map_write_err(err, "handle or email already in use")),
	};
	let user_id = row.try_get("user_id").or(Err(Error::DbError))?;
	let created_at: i64 = row.try_get("created_at").or(Err(Error::DbError))?;

	Ok(UserRecord {
		user_id,
		handle: user.handle.into(),
		email: user.email.into(),
		first_name: user.first_name.into(),
		last_name: user.last_name.into(),
		bio: user.bio.into(),
		role: user.role,
		confirmation_code: user.confirmation_code.map(Into::into),
		is_staff: user.is_staff,
		is_superuser: user.is_superuser,
		created_at: Timestamp(created_at),
	})
}

pub(crate) async fn read(db: &SqlitePool, handle: &str) -> RvResult<UserRecord> {
	let res = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE handle=?1"))
		.bind(handle)
		.fetch_one(db)
		.await;
	map_res(res, map_user_row)
}

pub(crate) async fn read_by_id(db: &SqlitePool, user_id: i64) -> RvResult<UserRecord> {
	let res = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id=?1"))
		.bind(user_id)
		.fetch_one(db)
		.await;
	map_res(res, map_user_row)
}

pub(crate) async fn read_by_email(db: &SqlitePool, email: &str) -> RvResult<UserRecord> {
	let res = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email=?1"))
		.bind(email)
		.fetch_one(db)
		.await;
	map_res(res, map_user_row)
}

pub(crate) async fn list(db: &SqlitePool, opts: &ListUserOptions) -> RvResult<Vec<UserRecord>> {
	let mut query =
		sqlx::QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1"));

	if let Some(q) = &opts.q {
		query
			.push(" AND (handle LIKE ")
			.push_bind(format!("%{}%", q))
			.push(" OR email LIKE ")
			.push_bind(format!("%{}%", q))
			.push(")");
	}

	query.push(" ORDER BY handle");
	query.push(" LIMIT ").push_bind(i64::from(opts.limit.unwrap_or(20).min(100)));
	if let Some(offset) = opts.offset {
		query.push(" OFFSET ").push_bind(i64::from(offset));
	}

	let res = query.build().fetch_all(db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	collect_res(res.into_iter().map(map_user_row))
}

pub(crate) async fn update(
	db: &SqlitePool,
	handle: &str,
	data: &UpdateUserData,
) -> RvResult<()> {
	let mut query = sqlx::QueryBuilder::new("UPDATE users SET ");
	let mut has_updates = false;

	has_updates =
		push_patch!(query, has_updates, "handle", data.handle.as_ref(), |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "email", data.email.as_ref(), |v| v.as_ref());
	has_updates =
		push_patch!(query, has_updates, "first_name", data.first_name.as_ref(), |v| v.as_ref());
	has_updates =
		push_patch!(query, has_updates, "last_name", data.last_name.as_ref(), |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "bio", data.bio.as_ref(), |v| v.as_ref());
	has_updates = push_patch!(query, has_updates, "role", data.role.as_ref(), |v| v.as_str());
	has_updates = push_patch!(
		query,
		has_updates,
		"confirmation_code",
		data.confirmation_code.as_ref(),
		|v| v.as_ref()
	);
	has_updates = push_patch!(query, has_updates, "is_staff", data.is_staff.as_ref(), |v| *v);
	has_updates =
		push_patch!(query, has_updates, "is_superuser", data.is_superuser.as_ref(), |v| *v);

	if !has_updates {
		// Nothing to change, but the target must still exist
		return read(db, handle).await.map(|_| ());
	}

	query.push(" WHERE handle=").push_bind(handle);

	let res = query.build().execute(db).await;
	match res {
		Ok(done) if done.rows_affected() == 0 => Err(Error::NotFound),
		Ok(_) => Ok(()),
		Err(err) => Err(map_write_err(err, "handle or email already in use")),
	}
}

pub(crate) async fn delete(db: &SqlitePool, handle: &str) -> RvResult<()> {
	let res = sqlx::query("DELETE FROM users WHERE handle=?1")
		.bind(handle)
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
