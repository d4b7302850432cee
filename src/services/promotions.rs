use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ranking::{rank_featured, sort_by_expiry};
use super::require_text;
use crate::api::{BarDirectory, CustomError, PromotionStore};
use crate::models::{
	ActivePromotion, Actor, CreatePromotionSchema, Promotion, RankedPromotion,
	UpdatePromotionSchema,
};
use crate::utils::{Clock, IdGenerator, UploadDir};

fn validate_window(valid_from: DateTime<Utc>, valid_until: DateTime<Utc>) -> Result<(), CustomError> {
	if valid_from >= valid_until {
		return Err(CustomError::bad_request(
			"validFrom must be earlier than validUntil",
		));
	}
	Ok(())
}

fn validate_discount(discount: Option<f64>) -> Result<(), CustomError> {
	match discount {
		Some(value) if !(0.0..=100.0).contains(&value) => Err(CustomError::bad_request(
			"discountPercentage must be between 0 and 100",
		)),
		_ => Ok(()),
	}
}

pub struct PromotionService {
	promotions: Arc<dyn PromotionStore>,
	bars: Arc<dyn BarDirectory>,
	uploads: UploadDir,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
}

impl PromotionService {
	pub fn new(
		promotions: Arc<dyn PromotionStore>,
		bars: Arc<dyn BarDirectory>,
		uploads: UploadDir,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self {
		PromotionService {
			promotions,
			bars,
			uploads,
			clock,
			ids,
		}
	}

	pub async fn create(
		&self,
		actor: &Actor,
		body: CreatePromotionSchema,
	) -> Result<Promotion, CustomError> {
		require_text(&body.title, "title")?;
		validate_discount(body.discount_percentage)?;
		validate_window(body.valid_from, body.valid_until)?;
		self.ensure_manages_bar(actor, body.bar_id).await?;

		let now = self.clock.now();
		let promotion = Promotion {
			id: self.ids.next_id(),
			bar_id: body.bar_id,
			title: body.title.trim().to_string(),
			description: body.description,
			discount_percentage: body.discount_percentage,
			valid_from: body.valid_from,
			valid_until: body.valid_until,
			is_active: body.is_active.unwrap_or(true),
			photo_url: body.photo_url,
			terms_and_conditions: body.terms_and_conditions,
			created_at: now,
			updated_at: now,
		};

		let promotion = self.promotions.insert_promotion(promotion).await?;
		log::info!("Promotion {} created for bar {}", promotion.id, promotion.bar_id);
		Ok(promotion)
	}

	pub async fn list(&self, bar_id: Option<Uuid>) -> Result<Vec<Promotion>, CustomError> {
		self.promotions.list_promotions(bar_id).await
	}

	pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Promotion>, CustomError> {
		let bar_ids = self.bars.bar_ids_owned_by(actor.user_id).await?;
		if bar_ids.is_empty() {
			return Ok(Vec::new());
		}
		self.promotions.list_promotions_by_bars(&bar_ids).await
	}

	pub async fn get(&self, id: Uuid) -> Result<Promotion, CustomError> {
		self.promotions
			.find_promotion(id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Promotion with id {} not found", id)))
	}

	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdatePromotionSchema,
	) -> Result<Promotion, CustomError> {
		let mut promotion = self.get(id).await?;
		self.ensure_manages_bar(actor, promotion.bar_id).await?;

		if let Some(title) = patch.title {
			require_text(&title, "title")?;
			promotion.title = title.trim().to_string();
		}
		if patch.discount_percentage.is_some() {
			validate_discount(patch.discount_percentage)?;
			promotion.discount_percentage = patch.discount_percentage;
		}
		if let Some(description) = patch.description {
			promotion.description = Some(description);
		}
		if let Some(valid_from) = patch.valid_from {
			promotion.valid_from = valid_from;
		}
		if let Some(valid_until) = patch.valid_until {
			promotion.valid_until = valid_until;
		}
		validate_window(promotion.valid_from, promotion.valid_until)?;
		if let Some(is_active) = patch.is_active {
			promotion.is_active = is_active;
		}
		if let Some(photo_url) = patch.photo_url {
			promotion.photo_url = Some(photo_url);
		}
		if let Some(terms) = patch.terms_and_conditions {
			promotion.terms_and_conditions = Some(terms);
		}
		promotion.updated_at = self.clock.now();

		self.promotions.update_promotion(promotion).await
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		let promotion = self.get(id).await?;
		self.ensure_manages_bar(actor, promotion.bar_id).await?;

		self.promotions.delete_promotion(id).await?;
		log::info!("Promotion {} deleted by {}", id, actor.user_id);

		if let Some(photo_url) = promotion.photo_url {
			self.uploads.remove(&photo_url).await;
		}
		Ok(())
	}

	pub async fn remove_photo(&self, actor: &Actor, id: Uuid) -> Result<Promotion, CustomError> {
		let mut promotion = self.get(id).await?;
		self.ensure_manages_bar(actor, promotion.bar_id).await?;

		let Some(photo_url) = promotion.photo_url.take() else {
			return Ok(promotion);
		};
		promotion.updated_at = self.clock.now();

		let promotion = self.promotions.update_promotion(promotion).await?;
		self.uploads.remove(&photo_url).await;
		Ok(promotion)
	}

	/// Every running promotion, soonest-expiring first.
	pub async fn active(&self) -> Result<Vec<ActivePromotion>, CustomError> {
		let mut active = self.promotions.list_active_promotions(self.clock.now()).await?;
		sort_by_expiry(&mut active);
		Ok(active)
	}

	pub async fn featured(&self) -> Result<Vec<RankedPromotion>, CustomError> {
		let now = self.clock.now();
		let active = self.promotions.list_active_promotions(now).await?;
		Ok(rank_featured(active, now))
	}

	async fn ensure_manages_bar(&self, actor: &Actor, bar_id: Uuid) -> Result<(), CustomError> {
		let bar = self
			.bars
			.find_bar_summary(bar_id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Bar with id {} not found", bar_id)))?;

		if !actor.manages_venue(bar.owner_id) {
			log::warn!("{} tried to manage promotions of bar {}", actor.user_id, bar_id);
			return Err(CustomError::forbidden(
				"You can only manage promotions of your own bars",
			));
		}
		Ok(())
	}
}
