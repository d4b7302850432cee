//! Storage ports and their Postgres / in-memory implementations.

pub mod bars;
pub mod error;
pub mod favorites;
pub mod memory;
pub mod menus;
pub mod promotions;
pub mod reservations;
pub mod reviews;
pub mod users;

use sqlx::{Pool, Postgres};

pub use self::bars::*;
pub use self::error::*;
pub use self::favorites::*;
pub use self::memory::MemoryStore;
pub use self::menus::*;
pub use self::promotions::*;
pub use self::reservations::*;
pub use self::reviews::*;
pub use self::users::*;

/// Postgres-backed implementation of every store port.
#[derive(Debug, Clone)]
pub struct PgStore {
	db: Pool<Postgres>,
}

impl PgStore {
	pub fn new(db: Pool<Postgres>) -> Self {
		PgStore { db }
	}
}
