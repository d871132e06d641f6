use axum::{
	Router, middleware,
	routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::route_auth::optional_auth;
use crate::{App, auth, comment, review, title, user};

pub fn init(state: App) -> Router {
	let api = Router::new()
		.route("/auth/email", post(auth::handler::post_register))
		.route("/auth/token", post(auth::handler::post_token))
		.route("/users", get(user::handler::list_users).post(user::handler::post_user))
		.route("/users/me", get(user::handler::get_me).patch(user::handler::patch_me))
		.route(
			"/users/{handle}",
			get(user::handler::get_user)
				.patch(user::handler::patch_user)
				.delete(user::handler::delete_user),
		)
		.route("/categories", get(title::tag::list_categories).post(title::tag::post_category))
		.route("/categories/{slug}", axum::routing::delete(title::tag::delete_category))
		.route("/genres", get(title::tag::list_genres).post(title::tag::post_genre))
		.route("/genres/{slug}", axum::routing::delete(title::tag::delete_genre))
		.route("/titles", get(title::handler::list_titles).post(title::handler::post_title))
		.route(
			"/titles/{title_id}",
			get(title::handler::get_title)
				.patch(title::handler::patch_title)
				.delete(title::handler::delete_title),
		)
		.route(
			"/titles/{title_id}/reviews",
			get(review::handler::list_reviews).post(review::handler::post_review),
		)
		.route(
			"/titles/{title_id}/reviews/{review_id}",
			get(review::handler::get_review)
				.patch(review::handler::patch_review)
				.delete(review::handler::delete_review),
		)
		.route(
			"/titles/{title_id}/reviews/{review_id}/comments",
			get(comment::handler::list_comments).post(comment::handler::post_comment),
		)
		.route(
			"/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
			get(comment::handler::get_comment)
				.patch(comment::handler::patch_comment)
				.delete(comment::handler::delete_comment),
		)
		.route_layer(middleware::from_fn_with_state(state.clone(), optional_auth));

	Router::new()
		.nest("/api/v1", api)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}

// vim: ts=4
