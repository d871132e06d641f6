//! App state type

use std::sync::Arc;

use crate::email::sender::EmailSender;
use crate::settings::Settings;
use revuo::store_adapter::StoreAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub settings: Settings,
	pub email: EmailSender,

	pub store_adapter: Arc<dyn StoreAdapter>,
}

pub type App = Arc<AppState>;

// vim: ts=4
