use async_trait::async_trait;
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::{Bar, BarSummary, RatingAggregate, UniqueBarField};

/// Read-only venue lookups used by reservations, reviews, promotions and menus.
#[async_trait]
pub trait BarDirectory: Send + Sync {
	async fn find_bar_summary(&self, id: Uuid) -> Result<Option<BarSummary>, CustomError>;
	async fn bar_ids_owned_by(&self, owner_id: Uuid) -> Result<Vec<Uuid>, CustomError>;
}

#[async_trait]
pub trait BarStore: Send + Sync {
	async fn insert_bar(&self, bar: Bar) -> Result<Bar, CustomError>;
	async fn find_bar(&self, id: Uuid) -> Result<Option<Bar>, CustomError>;
	/// True when another venue (other than `exclude`) already uses `value` for `field`.
	async fn bar_field_taken(
		&self,
		field: UniqueBarField,
		value: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError>;
	async fn list_bars(&self) -> Result<Vec<Bar>, CustomError>;
	async fn list_bars_by_owner(&self, owner_id: Uuid) -> Result<Vec<Bar>, CustomError>;
	/// Saves the editable fields; the rating fields are left untouched.
	async fn update_bar(&self, bar: Bar) -> Result<Bar, CustomError>;
	async fn delete_bar(&self, id: Uuid) -> Result<bool, CustomError>;
}

/// Write side of the derived rating fields.
#[async_trait]
pub trait RatingSink: Send + Sync {
	async fn store_rating(
		&self,
		bar_id: Uuid,
		aggregate: RatingAggregate,
	) -> Result<(), CustomError>;
}

#[async_trait]
impl BarDirectory for PgStore {
	async fn find_bar_summary(&self, id: Uuid) -> Result<Option<BarSummary>, CustomError> {
		let bar = sqlx::query_as::<_, BarSummary>(
			"SELECT id, owner_id, name_bar, photo, average_rating FROM bars WHERE id = $1",
		)
		.bind(id)
		.fetch_optional(&self.db)
		.await?;

		Ok(bar)
	}

	async fn bar_ids_owned_by(&self, owner_id: Uuid) -> Result<Vec<Uuid>, CustomError> {
		let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM bars WHERE owner_id = $1")
			.bind(owner_id)
			.fetch_all(&self.db)
			.await?;

		Ok(ids)
	}
}

#[async_trait]
impl BarStore for PgStore {
	async fn insert_bar(&self, bar: Bar) -> Result<Bar, CustomError> {
		sqlx::query_as::<_, Bar>(
			"INSERT INTO bars (id, name_bar, location, description, owner_id, phone, photo,
				social_links, hours, average_rating, total_reviews, is_active, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
			RETURNING *",
		)
		.bind(bar.id)
		.bind(&bar.name_bar)
		.bind(&bar.location)
		.bind(&bar.description)
		.bind(bar.owner_id)
		.bind(&bar.phone)
		.bind(&bar.photo)
		.bind(&bar.social_links)
		.bind(&bar.hours)
		.bind(bar.average_rating)
		.bind(bar.total_reviews)
		.bind(bar.is_active)
		.bind(bar.created_at)
		.bind(bar.updated_at)
		.fetch_one(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, "A bar with that name or phone already exists"))
	}

	async fn find_bar(&self, id: Uuid) -> Result<Option<Bar>, CustomError> {
		let bar = sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?;

		Ok(bar)
	}

	async fn bar_field_taken(
		&self,
		field: UniqueBarField,
		value: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError> {
		let sql = match field {
			UniqueBarField::Name => {
				"SELECT EXISTS (SELECT 1 FROM bars WHERE name_bar = $1 AND ($2::uuid IS NULL OR id <> $2))"
			}
			UniqueBarField::Phone => {
				"SELECT EXISTS (SELECT 1 FROM bars WHERE phone = $1 AND ($2::uuid IS NULL OR id <> $2))"
			}
			UniqueBarField::Facebook => {
				"SELECT EXISTS (SELECT 1 FROM bars WHERE social_links->>'facebook' = $1 AND ($2::uuid IS NULL OR id <> $2))"
			}
			UniqueBarField::Instagram => {
				"SELECT EXISTS (SELECT 1 FROM bars WHERE social_links->>'instagram' = $1 AND ($2::uuid IS NULL OR id <> $2))"
			}
		};

		let taken = sqlx::query_scalar::<_, bool>(sql)
			.bind(value)
			.bind(exclude)
			.fetch_one(&self.db)
			.await?;

		Ok(taken)
	}

	async fn list_bars(&self) -> Result<Vec<Bar>, CustomError> {
		let bars = sqlx::query_as::<_, Bar>("SELECT * FROM bars ORDER BY created_at")
			.fetch_all(&self.db)
			.await?;

		Ok(bars)
	}

	async fn list_bars_by_owner(&self, owner_id: Uuid) -> Result<Vec<Bar>, CustomError> {
		let bars =
			sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE owner_id = $1 ORDER BY created_at")
				.bind(owner_id)
				.fetch_all(&self.db)
				.await?;

		Ok(bars)
	}

	async fn update_bar(&self, bar: Bar) -> Result<Bar, CustomError> {
		sqlx::query_as::<_, Bar>(
			"UPDATE bars SET name_bar = $2, location = $3, description = $4, phone = $5,
				photo = $6, social_links = $7, hours = $8, is_active = $9, updated_at = $10
			WHERE id = $1
			RETURNING *",
		)
		.bind(bar.id)
		.bind(&bar.name_bar)
		.bind(&bar.location)
		.bind(&bar.description)
		.bind(&bar.phone)
		.bind(&bar.photo)
		.bind(&bar.social_links)
		.bind(&bar.hours)
		.bind(bar.is_active)
		.bind(bar.updated_at)
		.fetch_optional(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, "A bar with that name or phone already exists"))?
		.ok_or_else(|| CustomError::not_found(format!("Bar with id {} not found", bar.id)))
	}

	async fn delete_bar(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM bars WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}

#[async_trait]
impl RatingSink for PgStore {
	async fn store_rating(
		&self,
		bar_id: Uuid,
		aggregate: RatingAggregate,
	) -> Result<(), CustomError> {
		sqlx::query("UPDATE bars SET average_rating = $2, total_reviews = $3 WHERE id = $1")
			.bind(bar_id)
			.bind(aggregate.average_rating)
			.bind(aggregate.total_reviews)
			.execute(&self.db)
			.await?;

		Ok(())
	}
}
