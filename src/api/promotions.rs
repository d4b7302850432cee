use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::{ActivePromotion, BarSummary, Promotion};

#[async_trait]
pub trait PromotionStore: Send + Sync {
	async fn insert_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError>;
	async fn find_promotion(&self, id: Uuid) -> Result<Option<Promotion>, CustomError>;
	async fn list_promotions(&self, bar_id: Option<Uuid>) -> Result<Vec<Promotion>, CustomError>;
	async fn list_promotions_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Promotion>, CustomError>;
	/// Active promotions with `valid_until > now` joined to their venue, in insertion order.
	/// Promotions whose venue is gone are skipped.
	async fn list_active_promotions(
		&self,
		now: DateTime<Utc>,
	) -> Result<Vec<ActivePromotion>, CustomError>;
	async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError>;
	async fn delete_promotion(&self, id: Uuid) -> Result<bool, CustomError>;
}

#[derive(sqlx::FromRow)]
struct ActivePromotionRow {
	#[sqlx(flatten)]
	promotion: Promotion,
	bar_owner_id: Uuid,
	bar_name: String,
	bar_photo: Option<String>,
	bar_average_rating: f64,
}

impl From<ActivePromotionRow> for ActivePromotion {
	fn from(row: ActivePromotionRow) -> Self {
		let bar = BarSummary {
			id: row.promotion.bar_id,
			owner_id: row.bar_owner_id,
			name_bar: row.bar_name,
			photo: row.bar_photo,
			average_rating: row.bar_average_rating,
		};

		ActivePromotion {
			promotion: row.promotion,
			bar,
		}
	}
}

#[async_trait]
impl PromotionStore for PgStore {
	async fn insert_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError> {
		let promotion = sqlx::query_as::<_, Promotion>(
			"INSERT INTO promotions (id, bar_id, title, description, discount_percentage,
				valid_from, valid_until, is_active, photo_url, terms_and_conditions, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
			RETURNING *",
		)
		.bind(promotion.id)
		.bind(promotion.bar_id)
		.bind(&promotion.title)
		.bind(&promotion.description)
		.bind(promotion.discount_percentage)
		.bind(promotion.valid_from)
		.bind(promotion.valid_until)
		.bind(promotion.is_active)
		.bind(&promotion.photo_url)
		.bind(&promotion.terms_and_conditions)
		.bind(promotion.created_at)
		.bind(promotion.updated_at)
		.fetch_one(&self.db)
		.await?;

		Ok(promotion)
	}

	async fn find_promotion(&self, id: Uuid) -> Result<Option<Promotion>, CustomError> {
		let promotion = sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?;

		Ok(promotion)
	}

	async fn list_promotions(&self, bar_id: Option<Uuid>) -> Result<Vec<Promotion>, CustomError> {
		let promotions = sqlx::query_as::<_, Promotion>(
			"SELECT * FROM promotions WHERE ($1::uuid IS NULL OR bar_id = $1) ORDER BY created_at",
		)
		.bind(bar_id)
		.fetch_all(&self.db)
		.await?;

		Ok(promotions)
	}

	async fn list_promotions_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Promotion>, CustomError> {
		let promotions = sqlx::query_as::<_, Promotion>(
			"SELECT * FROM promotions WHERE bar_id = ANY($1) ORDER BY created_at",
		)
		.bind(bar_ids)
		.fetch_all(&self.db)
		.await?;

		Ok(promotions)
	}

	async fn list_active_promotions(
		&self,
		now: DateTime<Utc>,
	) -> Result<Vec<ActivePromotion>, CustomError> {
		let rows = sqlx::query_as::<_, ActivePromotionRow>(
			"SELECT p.*,
				b.owner_id AS bar_owner_id,
				b.name_bar AS bar_name,
				b.photo AS bar_photo,
				b.average_rating AS bar_average_rating
			FROM promotions p
			JOIN bars b ON b.id = p.bar_id
			WHERE p.is_active AND p.valid_until > $1
			ORDER BY p.created_at, p.id",
		)
		.bind(now)
		.fetch_all(&self.db)
		.await?;

		Ok(rows.into_iter().map(ActivePromotion::from).collect())
	}

	async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError> {
		sqlx::query_as::<_, Promotion>(
			"UPDATE promotions SET title = $2, description = $3, discount_percentage = $4,
				valid_from = $5, valid_until = $6, is_active = $7, photo_url = $8,
				terms_and_conditions = $9, updated_at = $10
			WHERE id = $1
			RETURNING *",
		)
		.bind(promotion.id)
		.bind(&promotion.title)
		.bind(&promotion.description)
		.bind(promotion.discount_percentage)
		.bind(promotion.valid_from)
		.bind(promotion.valid_until)
		.bind(promotion.is_active)
		.bind(&promotion.photo_url)
		.bind(&promotion.terms_and_conditions)
		.bind(promotion.updated_at)
		.fetch_optional(&self.db)
		.await?
		.ok_or_else(|| {
			CustomError::not_found(format!("Promotion with id {} not found", promotion.id))
		})
	}

	async fn delete_promotion(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
