use std::sync::Arc;

use uuid::Uuid;

use super::require_length;
use crate::api::{BarDirectory, CustomError, RatingSink, ReviewStore};
use crate::models::{
	Actor, BarSummary, CreateReviewSchema, OwnerResponseSchema, RatingAggregate, Review,
	ReviewStats, UpdateReviewSchema,
};
use crate::utils::{Clock, IdGenerator};

const COMMENT_MIN: usize = 10;
const COMMENT_MAX: usize = 500;
const RESPONSE_MIN: usize = 10;
const RESPONSE_MAX: usize = 300;

fn validate_rating(rating: i16) -> Result<(), CustomError> {
	if !(1..=5).contains(&rating) {
		return Err(CustomError::bad_request("rating must be between 1 and 5"));
	}
	Ok(())
}

/// Reviews plus the derived rating fields of their venue.
///
/// Every mutation that can change the visible rating set ends with
/// [`ReviewAggregator::refresh_rating`], which runs after the review write has
/// been stored and is not atomic with it.
pub struct ReviewAggregator {
	reviews: Arc<dyn ReviewStore>,
	bars: Arc<dyn BarDirectory>,
	ratings: Arc<dyn RatingSink>,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
}

impl ReviewAggregator {
	pub fn new(
		reviews: Arc<dyn ReviewStore>,
		bars: Arc<dyn BarDirectory>,
		ratings: Arc<dyn RatingSink>,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self {
		ReviewAggregator {
			reviews,
			bars,
			ratings,
			clock,
			ids,
		}
	}

	pub async fn create(
		&self,
		actor: &Actor,
		body: CreateReviewSchema,
	) -> Result<Review, CustomError> {
		validate_rating(body.rating)?;
		require_length(&body.comment, "comment", COMMENT_MIN, COMMENT_MAX)?;

		let bar = self.find_bar(body.bar_id).await?;
		if bar.owner_id == actor.user_id {
			return Err(CustomError::bad_request(
				"You cannot review your own bar",
			));
		}
		if self
			.reviews
			.find_review_by_author(actor.user_id, bar.id)
			.await?
			.is_some()
		{
			return Err(CustomError::conflict("You have already reviewed this bar"));
		}

		let now = self.clock.now();
		let review = Review {
			id: self.ids.next_id(),
			user_id: actor.user_id,
			bar_id: bar.id,
			rating: body.rating,
			comment: body.comment,
			owner_response: None,
			response_date: None,
			is_visible: true,
			created_at: now,
			updated_at: now,
		};

		let review = self.reviews.insert_review(review).await?;
		log::info!("User {} reviewed bar {}", actor.user_id, bar.id);

		self.refresh_rating(review.bar_id).await?;
		Ok(review)
	}

	pub async fn list_by_bar(&self, bar_id: Uuid) -> Result<Vec<Review>, CustomError> {
		self.reviews.list_visible_reviews_by_bar(bar_id).await
	}

	pub async fn stats(&self, bar_id: Uuid) -> Result<ReviewStats, CustomError> {
		let ratings = self.reviews.visible_ratings(bar_id).await?;
		Ok(ReviewStats::from_ratings(&ratings))
	}

	pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Review>, CustomError> {
		self.reviews.list_reviews_by_user(actor.user_id).await
	}

	pub async fn list_for_owner(&self, actor: &Actor) -> Result<Vec<Review>, CustomError> {
		let bar_ids = self.bars.bar_ids_owned_by(actor.user_id).await?;
		if bar_ids.is_empty() {
			return Ok(Vec::new());
		}
		self.reviews.list_visible_reviews_by_bars(&bar_ids).await
	}

	pub async fn get(&self, id: Uuid) -> Result<Review, CustomError> {
		self.find(id).await
	}

	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdateReviewSchema,
	) -> Result<Review, CustomError> {
		let mut review = self.find_authored(actor, id, "edit").await?;

		if let Some(rating) = patch.rating {
			validate_rating(rating)?;
			review.rating = rating;
		}
		if let Some(comment) = patch.comment {
			require_length(&comment, "comment", COMMENT_MIN, COMMENT_MAX)?;
			review.comment = comment;
		}
		review.updated_at = self.clock.now();

		let review = self.reviews.update_review(review).await?;
		self.refresh_rating(review.bar_id).await?;
		Ok(review)
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		let review = self.find_authored(actor, id, "delete").await?;

		self.reviews.delete_review(review.id).await?;
		log::info!("Review {} deleted by {}", review.id, actor.user_id);

		self.refresh_rating(review.bar_id).await?;
		Ok(())
	}

	/// Attaches the venue owner's reply. The rating is not affected.
	pub async fn respond(
		&self,
		actor: &Actor,
		id: Uuid,
		body: OwnerResponseSchema,
	) -> Result<Review, CustomError> {
		require_length(&body.response, "response", RESPONSE_MIN, RESPONSE_MAX)?;

		let mut review = self.find(id).await?;
		let owns_bar = self
			.bars
			.find_bar_summary(review.bar_id)
			.await?
			.map_or(false, |bar| actor.owns_venue(bar.owner_id));
		if !owns_bar {
			log::warn!("{} tried to answer review {} of a bar they do not own", actor.user_id, id);
			return Err(CustomError::forbidden(
				"Only the bar owner can respond to this review",
			));
		}

		let now = self.clock.now();
		review.owner_response = Some(body.response);
		review.response_date = Some(now);
		review.updated_at = now;

		self.reviews.update_review(review).await
	}

	/// Admin moderation: hides or restores a review.
	pub async fn set_visibility(
		&self,
		actor: &Actor,
		id: Uuid,
		is_visible: bool,
	) -> Result<Review, CustomError> {
		if !actor.is_admin() {
			return Err(CustomError::forbidden(
				"Only administrators can moderate reviews",
			));
		}

		let mut review = self.find(id).await?;
		if review.is_visible == is_visible {
			return Ok(review);
		}
		review.is_visible = is_visible;
		review.updated_at = self.clock.now();

		let review = self.reviews.update_review(review).await?;
		log::info!("Review {} visibility set to {}", review.id, is_visible);

		self.refresh_rating(review.bar_id).await?;
		Ok(review)
	}

	/// Recomputes a venue's aggregate from its visible reviews and stores it.
	pub async fn refresh_rating(&self, bar_id: Uuid) -> Result<RatingAggregate, CustomError> {
		let ratings = self.reviews.visible_ratings(bar_id).await?;
		let aggregate = RatingAggregate::from_ratings(&ratings);

		self.ratings.store_rating(bar_id, aggregate).await?;
		log::info!(
			"Bar {} rating refreshed: {} over {} reviews",
			bar_id,
			aggregate.average_rating,
			aggregate.total_reviews
		);
		Ok(aggregate)
	}

	async fn find(&self, id: Uuid) -> Result<Review, CustomError> {
		self.reviews
			.find_review(id)
			.await?
			.ok_or_else(|| CustomError::not_found("Review not found"))
	}

	async fn find_authored(
		&self,
		actor: &Actor,
		id: Uuid,
		action: &str,
	) -> Result<Review, CustomError> {
		let review = self.find(id).await?;
		if review.user_id != actor.user_id {
			return Err(CustomError::forbidden(format!(
				"You do not have permission to {} this review",
				action
			)));
		}
		Ok(review)
	}

	async fn find_bar(&self, bar_id: Uuid) -> Result<BarSummary, CustomError> {
		self.bars
			.find_bar_summary(bar_id)
			.await?
			.ok_or_else(|| CustomError::not_found("Bar not found"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{BarStore, MemoryStore};
	use crate::models::Role;
	use crate::services::fixtures;
	use crate::utils::{FixedClock, SequentialIds};

	const COMMENT: &str = "Great cocktails and friendly staff";

	struct Setup {
		store: Arc<MemoryStore>,
		aggregator: ReviewAggregator,
		owner: Actor,
		bar_id: Uuid,
	}

	async fn setup() -> Setup {
		let store = Arc::new(MemoryStore::new());
		let owner = Actor::new(Uuid::from_u128(100), Role::Owner);
		let bar = store
			.insert_bar(fixtures::bar(300, owner.user_id, "El Rincón"))
			.await
			.unwrap();

		let aggregator = ReviewAggregator::new(
			store.clone(),
			store.clone(),
			store.clone(),
			Arc::new(FixedClock::new(fixtures::at(2025, 3, 1))),
			Arc::new(SequentialIds::default()),
		);

		Setup {
			store,
			aggregator,
			owner,
			bar_id: bar.id,
		}
	}

	fn client(n: u128) -> Actor {
		Actor::new(Uuid::from_u128(1_000 + n), Role::Client)
	}

	fn review(bar_id: Uuid, rating: i16) -> CreateReviewSchema {
		CreateReviewSchema {
			bar_id,
			rating,
			comment: COMMENT.to_string(),
		}
	}

	async fn stored_rating(s: &Setup) -> (f64, i64) {
		let bar = s.store.find_bar(s.bar_id).await.unwrap().unwrap();
		(bar.average_rating, bar.total_reviews)
	}

	#[actix_web::test]
	async fn ratings_are_aggregated_on_the_bar() {
		let s = setup().await;
		for (n, rating) in [4, 5, 3].into_iter().enumerate() {
			s.aggregator
				.create(&client(n as u128), review(s.bar_id, rating))
				.await
				.unwrap();
		}

		assert_eq!(stored_rating(&s).await, (4.0, 3));
	}

	#[actix_web::test]
	async fn second_review_by_same_user_conflicts() {
		let s = setup().await;
		s.aggregator.create(&client(1), review(s.bar_id, 5)).await.unwrap();

		let err = s
			.aggregator
			.create(&client(1), review(s.bar_id, 2))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
		assert_eq!(stored_rating(&s).await, (5.0, 1));
	}

	#[actix_web::test]
	async fn owner_cannot_review_own_bar() {
		let s = setup().await;
		let err = s
			.aggregator
			.create(&s.owner, review(s.bar_id, 5))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn invalid_input_is_rejected() {
		let s = setup().await;
		let err = s
			.aggregator
			.create(&client(1), review(s.bar_id, 6))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));

		let short = CreateReviewSchema {
			comment: "meh".to_string(),
			..review(s.bar_id, 3)
		};
		let err = s.aggregator.create(&client(1), short).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));

		let err = s
			.aggregator
			.create(&client(1), review(Uuid::from_u128(999), 3))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::NotFound(_)));
	}

	#[actix_web::test]
	async fn update_and_delete_keep_the_aggregate_current() {
		let s = setup().await;
		let first = s.aggregator.create(&client(1), review(s.bar_id, 5)).await.unwrap();
		s.aggregator.create(&client(2), review(s.bar_id, 4)).await.unwrap();
		assert_eq!(stored_rating(&s).await, (4.5, 2));

		let patch = UpdateReviewSchema {
			rating: Some(1),
			..Default::default()
		};
		let err = s
			.aggregator
			.update(&client(2), first.id, patch.clone())
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		s.aggregator.update(&client(1), first.id, patch).await.unwrap();
		assert_eq!(stored_rating(&s).await, (2.5, 2));

		s.aggregator.delete(&client(1), first.id).await.unwrap();
		assert_eq!(stored_rating(&s).await, (4.0, 1));
	}

	#[actix_web::test]
	async fn deleting_the_last_review_resets_the_rating() {
		let s = setup().await;
		let only = s.aggregator.create(&client(1), review(s.bar_id, 3)).await.unwrap();
		s.aggregator.delete(&client(1), only.id).await.unwrap();
		assert_eq!(stored_rating(&s).await, (0.0, 0));
	}

	#[actix_web::test]
	async fn hidden_reviews_leave_the_aggregate() {
		let s = setup().await;
		let admin = Actor::new(Uuid::from_u128(1), Role::Admin);
		let harsh = s.aggregator.create(&client(1), review(s.bar_id, 1)).await.unwrap();
		s.aggregator.create(&client(2), review(s.bar_id, 5)).await.unwrap();

		let err = s
			.aggregator
			.set_visibility(&s.owner, harsh.id, false)
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		s.aggregator.set_visibility(&admin, harsh.id, false).await.unwrap();
		assert_eq!(stored_rating(&s).await, (5.0, 1));
		assert_eq!(s.aggregator.list_by_bar(s.bar_id).await.unwrap().len(), 1);
		assert_eq!(s.aggregator.list_mine(&client(1)).await.unwrap().len(), 1);
	}

	#[actix_web::test]
	async fn only_the_owner_responds() {
		let s = setup().await;
		let created = s.aggregator.create(&client(1), review(s.bar_id, 4)).await.unwrap();
		let reply = OwnerResponseSchema {
			response: "Thanks for coming by!".to_string(),
		};

		let err = s
			.aggregator
			.respond(&client(1), created.id, reply.clone())
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		let answered = s.aggregator.respond(&s.owner, created.id, reply).await.unwrap();
		assert_eq!(answered.owner_response.as_deref(), Some("Thanks for coming by!"));
		assert!(answered.response_date.is_some());
		assert_eq!(stored_rating(&s).await, (4.0, 1));
	}

	#[actix_web::test]
	async fn stats_include_the_distribution() {
		let s = setup().await;
		for (n, rating) in [5, 5, 2].into_iter().enumerate() {
			s.aggregator
				.create(&client(n as u128), review(s.bar_id, rating))
				.await
				.unwrap();
		}

		let stats = s.aggregator.stats(s.bar_id).await.unwrap();
		assert_eq!(stats.total_reviews, 3);
		assert_eq!(stats.average_rating, 4.0);
		assert_eq!(stats.rating_distribution[&5], 2);
		assert_eq!(stats.rating_distribution[&3], 0);

		let owner_view = s.aggregator.list_for_owner(&s.owner).await.unwrap();
		assert_eq!(owner_view.len(), 3);
	}
}
