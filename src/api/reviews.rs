use async_trait::async_trait;
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::Review;

const DUPLICATE_REVIEW: &str = "You have already reviewed this bar";

#[async_trait]
pub trait ReviewStore: Send + Sync {
	/// Fails with `Conflict` when the author already reviewed the venue.
	async fn insert_review(&self, review: Review) -> Result<Review, CustomError>;
	async fn find_review(&self, id: Uuid) -> Result<Option<Review>, CustomError>;
	async fn find_review_by_author(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
	) -> Result<Option<Review>, CustomError>;
	/// Visible reviews of a venue, newest first.
	async fn list_visible_reviews_by_bar(&self, bar_id: Uuid) -> Result<Vec<Review>, CustomError>;
	/// Every review written by the user, newest first.
	async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, CustomError>;
	async fn list_visible_reviews_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Review>, CustomError>;
	async fn visible_ratings(&self, bar_id: Uuid) -> Result<Vec<i16>, CustomError>;
	async fn update_review(&self, review: Review) -> Result<Review, CustomError>;
	async fn delete_review(&self, id: Uuid) -> Result<bool, CustomError>;
}

#[async_trait]
impl ReviewStore for PgStore {
	async fn insert_review(&self, review: Review) -> Result<Review, CustomError> {
		sqlx::query_as::<_, Review>(
			"INSERT INTO reviews (id, user_id, bar_id, rating, comment, owner_response,
				response_date, is_visible, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
			RETURNING *",
		)
		.bind(review.id)
		.bind(review.user_id)
		.bind(review.bar_id)
		.bind(review.rating)
		.bind(&review.comment)
		.bind(&review.owner_response)
		.bind(review.response_date)
		.bind(review.is_visible)
		.bind(review.created_at)
		.bind(review.updated_at)
		.fetch_one(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, DUPLICATE_REVIEW))
	}

	async fn find_review(&self, id: Uuid) -> Result<Option<Review>, CustomError> {
		let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?;

		Ok(review)
	}

	async fn find_review_by_author(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
	) -> Result<Option<Review>, CustomError> {
		let review = sqlx::query_as::<_, Review>(
			"SELECT * FROM reviews WHERE user_id = $1 AND bar_id = $2",
		)
		.bind(user_id)
		.bind(bar_id)
		.fetch_optional(&self.db)
		.await?;

		Ok(review)
	}

	async fn list_visible_reviews_by_bar(&self, bar_id: Uuid) -> Result<Vec<Review>, CustomError> {
		let reviews = sqlx::query_as::<_, Review>(
			"SELECT * FROM reviews WHERE bar_id = $1 AND is_visible ORDER BY created_at DESC",
		)
		.bind(bar_id)
		.fetch_all(&self.db)
		.await?;

		Ok(reviews)
	}

	async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, CustomError> {
		let reviews = sqlx::query_as::<_, Review>(
			"SELECT * FROM reviews WHERE user_id = $1 ORDER BY created_at DESC",
		)
		.bind(user_id)
		.fetch_all(&self.db)
		.await?;

		Ok(reviews)
	}

	async fn list_visible_reviews_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Review>, CustomError> {
		let reviews = sqlx::query_as::<_, Review>(
			"SELECT * FROM reviews WHERE bar_id = ANY($1) AND is_visible ORDER BY created_at DESC",
		)
		.bind(bar_ids)
		.fetch_all(&self.db)
		.await?;

		Ok(reviews)
	}

	async fn visible_ratings(&self, bar_id: Uuid) -> Result<Vec<i16>, CustomError> {
		let ratings = sqlx::query_scalar::<_, i16>(
			"SELECT rating FROM reviews WHERE bar_id = $1 AND is_visible",
		)
		.bind(bar_id)
		.fetch_all(&self.db)
		.await?;

		Ok(ratings)
	}

	async fn update_review(&self, review: Review) -> Result<Review, CustomError> {
		sqlx::query_as::<_, Review>(
			"UPDATE reviews SET rating = $2, comment = $3, owner_response = $4,
				response_date = $5, is_visible = $6, updated_at = $7
			WHERE id = $1
			RETURNING *",
		)
		.bind(review.id)
		.bind(review.rating)
		.bind(&review.comment)
		.bind(&review.owner_response)
		.bind(review.response_date)
		.bind(review.is_visible)
		.bind(review.updated_at)
		.fetch_optional(&self.db)
		.await?
		.ok_or_else(|| CustomError::not_found("Review not found"))
	}

	async fn delete_review(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
