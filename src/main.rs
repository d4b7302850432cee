use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use actix_web_grants::GrantsMiddleware;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use bars_api::config::Config;
use bars_api::jwt_auth::extract;
use bars_api::{controllers, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "actix_web=info,bars_api=info");
	}
	dotenv().ok();
	env_logger::init();

	let config = match Config::init() {
		Ok(config) => config,
		Err(err) => {
			log::error!("🔥 Invalid configuration: {}", err);
			std::process::exit(1);
		}
	};

	let pool = match PgPoolOptions::new()
		.max_connections(config.database_max_connections)
		.connect(&config.database_url)
		.await
	{
		Ok(pool) => {
			log::info!("✅Connection to the database is successful!");
			pool
		}
		Err(err) => {
			log::error!("🔥 Failed to connect to the database: {:?}", err);
			std::process::exit(1);
		}
	};

	if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
		log::error!("🔥 Failed to run migrations: {:?}", err);
		std::process::exit(1);
	}

	let address = (config.host.clone(), config.port);
	log::info!(
		"🚀 Server started successfully on {}:{}",
		address.0,
		address.1
	);

	let state = web::Data::new(AppState::postgres(config, pool));

	HttpServer::new(move || {
		let auth = GrantsMiddleware::with_extractor(extract);
		App::new()
			.app_data(state.clone())
			.configure(controllers::config)
			.wrap(Cors::permissive())
			.wrap(Logger::default())
			.wrap(auth)
	})
	.bind(address)?
	.run()
	.await
}
