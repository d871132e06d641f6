//! Revuo is a review platform: users rate and discuss titled works
//! (movies, books, music) organized by category and genre.
//!
//! # Features
//!
//! - Email-based registration with mailed confirmation codes
//! - Bearer-token sessions (JWT)
//! - Role-based permissions (user, moderator, admin) plus staff/superuser flags
//! - Titles with categories, genres, and a computed average rating
//! - One review per user and title, threaded comments under reviews
//! - Pluggable storage through the store adapter trait

pub mod auth;
pub mod comment;
pub mod core;
pub mod email;
pub mod prelude;
pub mod review;
pub mod routes;
pub mod settings;
pub mod title;
pub mod user;

pub use crate::core::app::{App, AppState};

// vim: ts=4
