use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::Bar;

#[async_trait]
pub trait FavoriteStore: Send + Sync {
	/// Returns false when the venue was already a favorite.
	async fn add_favorite(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
		at: DateTime<Utc>,
	) -> Result<bool, CustomError>;
	async fn remove_favorite(&self, user_id: Uuid, bar_id: Uuid) -> Result<bool, CustomError>;
	async fn list_favorite_bars(&self, user_id: Uuid) -> Result<Vec<Bar>, CustomError>;
}

#[async_trait]
impl FavoriteStore for PgStore {
	async fn add_favorite(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
		at: DateTime<Utc>,
	) -> Result<bool, CustomError> {
		let result = sqlx::query(
			"INSERT INTO user_favorites (user_id, bar_id, created_at) VALUES ($1, $2, $3)
			ON CONFLICT (user_id, bar_id) DO NOTHING",
		)
		.bind(user_id)
		.bind(bar_id)
		.bind(at)
		.execute(&self.db)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn remove_favorite(&self, user_id: Uuid, bar_id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND bar_id = $2")
			.bind(user_id)
			.bind(bar_id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn list_favorite_bars(&self, user_id: Uuid) -> Result<Vec<Bar>, CustomError> {
		let bars = sqlx::query_as::<_, Bar>(
			"SELECT b.* FROM user_favorites f
			JOIN bars b ON b.id = f.bar_id
			WHERE f.user_id = $1
			ORDER BY f.created_at",
		)
		.bind(user_id)
		.fetch_all(&self.db)
		.await?;

		Ok(bars)
	}
}
