use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("{0} must be set")]
	Missing(&'static str),

	#[error("{key} has an invalid value: {value}")]
	Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub database_max_connections: u32,
	pub jwt_secret: String,
	/// Token lifetime in minutes, also used as the cookie max-age.
	pub jwt_maxage: i64,
	pub host: String,
	pub port: u16,
	pub uploads_dir: PathBuf,
}

impl Config {
	pub fn init() -> Result<Config, ConfigError> {
		let database_url = required("DATABASE_URL")?;
		let jwt_secret = required("JWT_SECRET")?;
		let jwt_maxage = parsed("JWT_MAXAGE", 60)?;
		let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
		let port = parsed("PORT", 8000)?;
		let database_max_connections = parsed("DATABASE_MAX_CONNECTIONS", 10)?;
		let uploads_dir = env::var("UPLOADS_DIR")
			.map(PathBuf::from)
			.unwrap_or_else(|_| PathBuf::from("./uploads"));

		Ok(Config {
			database_url,
			database_max_connections,
			jwt_secret,
			jwt_maxage,
			host,
			port,
			uploads_dir,
		})
	}
}

fn required(key: &'static str) -> Result<String, ConfigError> {
	env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
	match env::var(key) {
		Ok(value) => value
			.parse()
			.map_err(|_| ConfigError::Invalid { key, value }),
		Err(_) => {
			log::debug!("{} not set, using default", key);
			Ok(default)
		}
	}
}
