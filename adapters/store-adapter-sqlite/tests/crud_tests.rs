//! Store adapter CRUD operation tests
//!
//! Tests Create, Read, Update, Delete operations for users, tags, and titles.

use revuo_store_adapter_sqlite::StoreAdapterSqlite;
use revuo::error::Error;
use revuo::store_adapter::{
	CreateTitle, CreateUser, ListTagOptions, ListTitleOptions, ListUserOptions, StoreAdapter,
	Tag, UpdateTitleData, UpdateUserData,
};
use revuo::types::{Patch, Role};
use tempfile::TempDir;

async fn create_test_adapter() -> (StoreAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");

	let adapter = StoreAdapterSqlite::new(temp_dir.path().join("revuo.db"))
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

#[tokio::test]
async fn test_create_and_read_user() {
	let (adapter, _temp) = create_test_adapter().await;

	let user = adapter
		.create_user(&CreateUser {
			handle: "alice",
			email: "alice@example.com",
			bio: "hello",
			..Default::default()
		})
		.await
		.expect("Should create user");

	assert_eq!(&*user.handle, "alice");
	assert_eq!(user.role, Role::User);

	let by_handle = adapter.read_user("alice").await.expect("Should read by handle");
	assert_eq!(by_handle.user_id, user.user_id);
	assert_eq!(&*by_handle.bio, "hello");

	let by_email = adapter.read_user_by_email("alice@example.com").await.expect("by email");
	assert_eq!(by_email.user_id, user.user_id);

	let by_id = adapter.read_user_by_id(user.user_id).await.expect("by id");
	assert_eq!(&*by_id.handle, "alice");
}

#[tokio::test]
async fn test_duplicate_user_is_validation_error() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_user(&CreateUser {
			handle: "alice",
			email: "alice@example.com",
			..Default::default()
		})
		.await
		.expect("Should create user");

	let same_email = adapter
		.create_user(&CreateUser {
			handle: "alice2",
			email: "alice@example.com",
			..Default::default()
		})
		.await;
	assert!(matches!(same_email, Err(Error::ValidationError(_))));

	let same_handle = adapter
		.create_user(&CreateUser {
			handle: "alice",
			email: "other@example.com",
			..Default::default()
		})
		.await;
	assert!(matches!(same_handle, Err(Error::ValidationError(_))));
}

#[tokio::test]
async fn test_update_user() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_user(&CreateUser {
			handle: "bob",
			email: "bob@example.com",
			..Default::default()
		})
		.await
		.expect("Should create user");

	let update = UpdateUserData {
		first_name: Patch::Value("Robert".into()),
		role: Patch::Value(Role::Moderator),
		..Default::default()
	};
	adapter.update_user("bob", &update).await.expect("Should update user");

	let user = adapter.read_user("bob").await.expect("Should read user");
	assert_eq!(&*user.first_name, "Robert");
	assert_eq!(user.role, Role::Moderator);

	// Untouched fields stay
	assert_eq!(&*user.email, "bob@example.com");
}

#[tokio::test]
async fn test_update_missing_user() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter.update_user("nobody", &UpdateUserData::default()).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_user() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_user(&CreateUser {
			handle: "carol",
			email: "carol@example.com",
			..Default::default()
		})
		.await
		.expect("Should create user");

	adapter.delete_user("carol").await.expect("Should delete user");
	assert!(matches!(adapter.read_user("carol").await, Err(Error::NotFound)));
	assert!(matches!(adapter.delete_user("carol").await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_users_filter() {
	let (adapter, _temp) = create_test_adapter().await;

	for (handle, email) in
		[("alice", "alice@example.com"), ("bob", "bob@example.com"), ("carol", "c@example.com")]
	{
		adapter
			.create_user(&CreateUser { handle, email, ..Default::default() })
			.await
			.expect("Should create user");
	}

	let all = adapter.list_users(&ListUserOptions::default()).await.expect("Should list");
	assert_eq!(all.len(), 3);

	let opts = ListUserOptions { q: Some("bob".into()), ..Default::default() };
	let filtered = adapter.list_users(&opts).await.expect("Should list filtered");
	assert_eq!(filtered.len(), 1);
	assert_eq!(&*filtered[0].handle, "bob");
}

#[tokio::test]
async fn test_tag_crud() {
	let (adapter, _temp) = create_test_adapter().await;

	let tag = Tag { name: "Science Fiction".into(), slug: "sci-fi".into() };
	adapter.create_category(&tag).await.expect("Should create category");

	// Same slug again is rejected
	let dup = adapter.create_category(&tag).await;
	assert!(matches!(dup, Err(Error::ValidationError(_))));

	// Categories and genres are separate namespaces
	adapter.create_genre(&tag).await.expect("Should create genre with same slug");

	let cats = adapter.list_categories(&ListTagOptions::default()).await.expect("Should list");
	assert_eq!(cats.len(), 1);
	assert_eq!(&*cats[0].slug, "sci-fi");

	adapter.delete_category("sci-fi").await.expect("Should delete category");
	assert!(matches!(adapter.delete_category("sci-fi").await, Err(Error::NotFound)));

	// The genre with the same slug is untouched
	let genres = adapter.list_genres(&ListTagOptions::default()).await.expect("Should list");
	assert_eq!(genres.len(), 1);
}

#[tokio::test]
async fn test_title_crud() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_category(&Tag { name: "Movies".into(), slug: "movies".into() })
		.await
		.expect("Should create category");
	adapter
		.create_genre(&Tag { name: "Drama".into(), slug: "drama".into() })
		.await
		.expect("Should create genre");

	let genres = vec!["drama".to_string()];
	let title = adapter
		.create_title(&CreateTitle {
			name: "The Long Goodbye",
			year: Some(1973),
			category: Some("movies"),
			genres: &genres,
			..Default::default()
		})
		.await
		.expect("Should create title");

	assert_eq!(&*title.name, "The Long Goodbye");
	assert_eq!(title.year, Some(1973));
	assert_eq!(title.category.as_ref().map(|c| &*c.slug), Some("movies"));
	assert_eq!(title.genres.len(), 1);
	assert_eq!(title.rating, None);

	// Unknown category slug is rejected
	let bad = adapter
		.create_title(&CreateTitle { name: "Nope", category: Some("books"), ..Default::default() })
		.await;
	assert!(matches!(bad, Err(Error::ValidationError(_))));

	// Update: clear the category, replace the genre set
	let update = UpdateTitleData {
		category: Patch::Null,
		genres: Patch::Value(vec![]),
		..Default::default()
	};
	adapter.update_title(title.title_id, &update).await.expect("Should update title");

	let read = adapter.read_title(title.title_id).await.expect("Should read title");
	assert!(read.category.is_none());
	assert!(read.genres.is_empty());

	adapter.delete_title(title.title_id).await.expect("Should delete title");
	assert!(matches!(adapter.read_title(title.title_id).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_titles_filters() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_category(&Tag { name: "Movies".into(), slug: "movies".into() })
		.await
		.expect("category");
	adapter
		.create_genre(&Tag { name: "Drama".into(), slug: "drama".into() })
		.await
		.expect("genre");

	let drama = vec!["drama".to_string()];
	adapter
		.create_title(&CreateTitle {
			name: "Alpha",
			year: Some(2001),
			category: Some("movies"),
			genres: &drama,
			..Default::default()
		})
		.await
		.expect("title");
	adapter
		.create_title(&CreateTitle { name: "Beta", year: Some(2002), ..Default::default() })
		.await
		.expect("title");

	let by_year = ListTitleOptions { year: Some(2001), ..Default::default() };
	let res = adapter.list_titles(&by_year).await.expect("Should list");
	assert_eq!(res.len(), 1);
	assert_eq!(&*res[0].name, "Alpha");

	let by_genre = ListTitleOptions { genre: Some("drama".into()), ..Default::default() };
	let res = adapter.list_titles(&by_genre).await.expect("Should list");
	assert_eq!(res.len(), 1);

	let by_name = ListTitleOptions { name: Some("et".into()), ..Default::default() };
	let res = adapter.list_titles(&by_name).await.expect("Should list");
	assert_eq!(res.len(), 1);
	assert_eq!(&*res[0].name, "Beta");

	let by_category = ListTitleOptions { category: Some("movies".into()), ..Default::default() };
	let res = adapter.list_titles(&by_category).await.expect("Should list");
	assert_eq!(res.len(), 1);
	assert_eq!(&*res[0].name, "Alpha");
}

#[tokio::test]
async fn test_null_on_required_field_is_validation_error() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_user(&CreateUser {
			handle: "erin",
			email: "erin@example.com",
			..Default::default()
		})
		.await
		.expect("Should create user");
	let update = UpdateUserData { handle: Patch::Null, ..Default::default() };
	let res = adapter.update_user("erin", &update).await;
	assert!(matches!(res, Err(Error::ValidationError(_))));

	let title = adapter
		.create_title(&CreateTitle { name: "Alpha", ..Default::default() })
		.await
		.expect("Should create title");
	let update = UpdateTitleData { name: Patch::Null, ..Default::default() };
	let res = adapter.update_title(title.title_id, &update).await;
	assert!(matches!(res, Err(Error::ValidationError(_))));

	// The records are untouched
	adapter.read_user("erin").await.expect("Should still read user");
	let read = adapter.read_title(title.title_id).await.expect("Should read title");
	assert_eq!(&*read.name, "Alpha");
}

#[tokio::test]
async fn test_category_delete_detaches_titles() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.create_category(&Tag { name: "Movies".into(), slug: "movies".into() })
		.await
		.expect("category");
	let title = adapter
		.create_title(&CreateTitle {
			name: "Alpha",
			category: Some("movies"),
			..Default::default()
		})
		.await
		.expect("title");

	adapter.delete_category("movies").await.expect("Should delete category");

	// The title survives with its category cleared
	let read = adapter.read_title(title.title_id).await.expect("Should read title");
	assert!(read.category.is_none());
}

// vim: ts=4
