use std::sync::Arc;

use sqlx::types::Json;
use uuid::Uuid;

use super::require_text;
use crate::api::{BarStore, CustomError};
use crate::models::{
	Actor, Bar, CreateBarSchema, Role, SocialLinks, UniqueBarField, UpdateBarSchema,
};
use crate::utils::{Clock, IdGenerator, UploadDir};

/// Trimmed value, with blank treated as absent.
fn optional_text(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

fn normalize_links(links: SocialLinks) -> SocialLinks {
	SocialLinks {
		facebook: optional_text(links.facebook),
		instagram: optional_text(links.instagram),
		other: links.other,
	}
}

/// Venue listings. Rating fields are owned by the review aggregator and never written here.
pub struct BarService {
	bars: Arc<dyn BarStore>,
	uploads: UploadDir,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
}

impl BarService {
	pub fn new(
		bars: Arc<dyn BarStore>,
		uploads: UploadDir,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self {
		BarService {
			bars,
			uploads,
			clock,
			ids,
		}
	}

	pub async fn create(&self, actor: &Actor, body: CreateBarSchema) -> Result<Bar, CustomError> {
		if !matches!(actor.role, Role::Owner | Role::Admin) {
			return Err(CustomError::forbidden("Only owners can register bars"));
		}
		require_text(&body.name_bar, "nameBar")?;
		require_text(&body.location, "location")?;

		let owner_id = match body.owner_id {
			Some(owner_id) if actor.is_admin() => owner_id,
			_ => actor.user_id,
		};
		let phone = optional_text(body.phone);
		let social_links = normalize_links(body.social_links.unwrap_or_default());

		self.ensure_unique(UniqueBarField::Name, Some(body.name_bar.as_str()), None)
			.await?;
		self.ensure_unique(UniqueBarField::Phone, phone.as_deref(), None)
			.await?;
		self.ensure_unique(
			UniqueBarField::Facebook,
			social_links.facebook.as_deref(),
			None,
		)
		.await?;
		self.ensure_unique(
			UniqueBarField::Instagram,
			social_links.instagram.as_deref(),
			None,
		)
		.await?;

		let now = self.clock.now();
		let bar = Bar {
			id: self.ids.next_id(),
			name_bar: body.name_bar.trim().to_string(),
			location: body.location.trim().to_string(),
			description: body.description,
			owner_id,
			phone,
			photo: body.photo,
			social_links: Json(social_links),
			hours: Json(body.hours.unwrap_or_default()),
			average_rating: 0.0,
			total_reviews: 0,
			is_active: true,
			created_at: now,
			updated_at: now,
		};

		let bar = self.bars.insert_bar(bar).await?;
		log::info!("Bar {} ({}) created for owner {}", bar.id, bar.name_bar, bar.owner_id);
		Ok(bar)
	}

	pub async fn list(&self) -> Result<Vec<Bar>, CustomError> {
		self.bars.list_bars().await
	}

	pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Bar>, CustomError> {
		self.bars.list_bars_by_owner(actor.user_id).await
	}

	pub async fn get(&self, id: Uuid) -> Result<Bar, CustomError> {
		self.bars
			.find_bar(id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Bar with id {} not found", id)))
	}

	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdateBarSchema,
	) -> Result<Bar, CustomError> {
		let mut bar = self.get(id).await?;
		self.ensure_manages(actor, &bar, "update")?;

		if let Some(name_bar) = patch.name_bar {
			require_text(&name_bar, "nameBar")?;
			let name_bar = name_bar.trim().to_string();
			if name_bar != bar.name_bar {
				self.ensure_unique(UniqueBarField::Name, Some(name_bar.as_str()), Some(id))
					.await?;
				bar.name_bar = name_bar;
			}
		}
		if let Some(phone) = patch.phone {
			let phone = optional_text(Some(phone));
			if phone != bar.phone {
				self.ensure_unique(UniqueBarField::Phone, phone.as_deref(), Some(id))
					.await?;
				bar.phone = phone;
			}
		}
		if let Some(social_links) = patch.social_links {
			let social_links = normalize_links(social_links);
			if social_links.facebook != bar.social_links.facebook {
				self.ensure_unique(
					UniqueBarField::Facebook,
					social_links.facebook.as_deref(),
					Some(id),
				)
				.await?;
			}
			if social_links.instagram != bar.social_links.instagram {
				self.ensure_unique(
					UniqueBarField::Instagram,
					social_links.instagram.as_deref(),
					Some(id),
				)
				.await?;
			}
			bar.social_links = Json(social_links);
		}
		if let Some(location) = patch.location {
			require_text(&location, "location")?;
			bar.location = location.trim().to_string();
		}
		if let Some(description) = patch.description {
			bar.description = Some(description);
		}
		if let Some(photo) = patch.photo {
			bar.photo = Some(photo);
		}
		if let Some(hours) = patch.hours {
			bar.hours = Json(hours);
		}
		if let Some(is_active) = patch.is_active {
			bar.is_active = is_active;
		}
		bar.updated_at = self.clock.now();

		let bar = self.bars.update_bar(bar).await?;
		log::info!("Bar {} updated by {}", bar.id, actor.user_id);
		Ok(bar)
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		let bar = self.get(id).await?;
		self.ensure_manages(actor, &bar, "delete")?;

		self.bars.delete_bar(id).await?;
		log::info!("Bar {} deleted by {}", id, actor.user_id);

		if let Some(photo) = bar.photo {
			self.uploads.remove(&photo).await;
		}
		Ok(())
	}

	fn ensure_manages(&self, actor: &Actor, bar: &Bar, action: &str) -> Result<(), CustomError> {
		if !actor.manages_venue(bar.owner_id) {
			log::warn!("{} tried to {} bar {} they do not own", actor.user_id, action, bar.id);
			return Err(CustomError::forbidden(format!(
				"You do not have permission to {} this bar",
				action
			)));
		}
		Ok(())
	}

	async fn ensure_unique(
		&self,
		field: UniqueBarField,
		value: Option<&str>,
		exclude: Option<Uuid>,
	) -> Result<(), CustomError> {
		let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
			return Ok(());
		};

		if self.bars.bar_field_taken(field, value, exclude).await? {
			log::warn!("Rejected duplicate bar {}: {}", field.label(), value);
			return Err(CustomError::conflict(format!(
				"A bar with that {} already exists",
				field.label()
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::MemoryStore;
	use crate::models::SocialLinks;
	use crate::services::fixtures;
	use crate::utils::{FixedClock, SequentialIds};

	fn service() -> BarService {
		BarService::new(
			Arc::new(MemoryStore::new()),
			UploadDir::new("./uploads"),
			Arc::new(FixedClock::new(fixtures::at(2025, 2, 1))),
			Arc::new(SequentialIds::default()),
		)
	}

	fn owner() -> Actor {
		Actor::new(Uuid::from_u128(100), Role::Owner)
	}

	fn new_bar(name: &str) -> CreateBarSchema {
		CreateBarSchema {
			name_bar: name.to_string(),
			location: "Plaza Mayor 3".to_string(),
			description: None,
			owner_id: None,
			phone: None,
			photo: None,
			social_links: None,
			hours: None,
		}
	}

	#[actix_web::test]
	async fn duplicate_names_conflict() {
		let bars = service();
		bars.create(&owner(), new_bar("La Bodeguita")).await.unwrap();

		let err = bars.create(&owner(), new_bar("La Bodeguita")).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
	}

	#[actix_web::test]
	async fn duplicate_instagram_handles_conflict() {
		let bars = service();
		let links = SocialLinks {
			instagram: Some("@bodeguita".to_string()),
			..Default::default()
		};
		let mut first = new_bar("La Bodeguita");
		first.social_links = Some(links.clone());
		bars.create(&owner(), first).await.unwrap();

		let mut second = new_bar("Otra");
		second.social_links = Some(links);
		let err = bars.create(&owner(), second).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
	}

	#[actix_web::test]
	async fn padded_contacts_are_stored_trimmed_and_still_conflict() {
		let bars = service();
		let mut first = new_bar("Uno");
		first.phone = Some(" 600111222 ".to_string());
		first.social_links = Some(SocialLinks {
			facebook: Some("  ".to_string()),
			..Default::default()
		});
		let bar = bars.create(&owner(), first).await.unwrap();
		assert_eq!(bar.phone.as_deref(), Some("600111222"));
		assert_eq!(bar.social_links.facebook, None);

		let mut second = new_bar("Dos");
		second.phone = Some("600111222".to_string());
		let err = bars.create(&owner(), second).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));

		let mut blank = new_bar("Tres");
		blank.phone = Some(String::new());
		blank.social_links = Some(SocialLinks {
			facebook: Some(String::new()),
			..Default::default()
		});
		let bar = bars.create(&owner(), blank).await.unwrap();
		assert_eq!(bar.phone, None);

		let padded = UpdateBarSchema {
			phone: Some("600111222  ".to_string()),
			..Default::default()
		};
		let err = bars.update(&owner(), bar.id, padded).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
	}

	#[actix_web::test]
	async fn clients_cannot_register_bars() {
		let client = Actor::new(Uuid::from_u128(7), Role::Client);
		let err = service().create(&client, new_bar("Mine")).await.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));
	}

	#[actix_web::test]
	async fn admin_may_assign_the_owner() {
		let admin = Actor::new(Uuid::from_u128(1), Role::Admin);
		let mut body = new_bar("Bar Admin");
		body.owner_id = Some(owner().user_id);

		let bars = service();
		let bar = bars.create(&admin, body).await.unwrap();
		assert_eq!(bar.owner_id, owner().user_id);
		assert_eq!(bars.list_mine(&owner()).await.unwrap().len(), 1);
	}

	#[actix_web::test]
	async fn update_rechecks_only_changed_values() {
		let bars = service();
		let bar = bars.create(&owner(), new_bar("Uno")).await.unwrap();
		bars.create(&owner(), new_bar("Dos")).await.unwrap();

		let same_name = UpdateBarSchema {
			name_bar: Some("Uno".to_string()),
			description: Some("Vermut y tapas".to_string()),
			..Default::default()
		};
		let updated = bars.update(&owner(), bar.id, same_name).await.unwrap();
		assert_eq!(updated.description.as_deref(), Some("Vermut y tapas"));

		let taken = UpdateBarSchema {
			name_bar: Some("Dos".to_string()),
			..Default::default()
		};
		let err = bars.update(&owner(), bar.id, taken).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
	}

	#[actix_web::test]
	async fn strangers_cannot_update_or_delete() {
		let bars = service();
		let bar = bars.create(&owner(), new_bar("Uno")).await.unwrap();
		let stranger = Actor::new(Uuid::from_u128(101), Role::Owner);

		let err = bars
			.update(&stranger, bar.id, UpdateBarSchema::default())
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		let err = bars.delete(&stranger, bar.id).await.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		bars.delete(&owner(), bar.id).await.unwrap();
		assert!(matches!(bars.get(bar.id).await, Err(CustomError::NotFound(_))));
	}
}
