use std::sync::Arc;

use revuo_server::core::app::{AppState, VERSION};
use revuo_server::email::sender::EmailSender;
use revuo_server::prelude::*;
use revuo_server::routes;
use revuo_server::settings::Settings;
use revuo_store_adapter_sqlite::StoreAdapterSqlite;

async fn run() -> RvResult<()> {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();
	info!("Revuo v{}", VERSION);

	let settings = Settings::from_env()?;
	let store_adapter = Arc::new(StoreAdapterSqlite::new(settings.data_dir.join("revuo.db")).await?);
	let email = EmailSender::new(&settings)?;

	let listen = settings.listen.clone();
	let state: App = Arc::new(AppState { settings, email, store_adapter });

	let router = routes::init(state);
	let listener = tokio::net::TcpListener::bind(&*listen).await?;
	info!("Listening on {}", listen);
	axum::serve(listener, router).await?;

	Ok(())
}

#[tokio::main]
async fn main() {
	if let Err(err) = run().await {
		eprintln!("FATAL: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
