use std::sync::Arc;

use sqlx::types::Json;
use uuid::Uuid;

use super::require_text;
use crate::api::{BarDirectory, CustomError, MenuStore};
use crate::models::{Actor, CreateMenuSchema, Menu, MenuItem, UpdateMenuSchema};
use crate::utils::{Clock, IdGenerator, UploadDir};

fn validate_items(items: &[MenuItem]) -> Result<(), CustomError> {
	for item in items {
		require_text(&item.name, "item name")?;
		if !item.price.is_finite() || item.price < 0.0 {
			return Err(CustomError::bad_request(format!(
				"Price of {} must not be negative",
				item.name
			)));
		}
	}
	Ok(())
}

pub struct MenuService {
	menus: Arc<dyn MenuStore>,
	bars: Arc<dyn BarDirectory>,
	uploads: UploadDir,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
}

impl MenuService {
	pub fn new(
		menus: Arc<dyn MenuStore>,
		bars: Arc<dyn BarDirectory>,
		uploads: UploadDir,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self {
		MenuService {
			menus,
			bars,
			uploads,
			clock,
			ids,
		}
	}

	pub async fn create(&self, actor: &Actor, body: CreateMenuSchema) -> Result<Menu, CustomError> {
		require_text(&body.name, "name")?;
		let items = body.items.unwrap_or_default();
		validate_items(&items)?;
		self.ensure_manages_bar(actor, body.bar_id).await?;

		let name = body.name.trim().to_string();
		self.ensure_unique_name(body.bar_id, &name, None).await?;

		let now = self.clock.now();
		let menu = Menu {
			id: self.ids.next_id(),
			bar_id: body.bar_id,
			name,
			description: body.description,
			items: Json(items),
			photo_url: body.photo_url,
			created_at: now,
			updated_at: now,
		};

		let menu = self.menus.insert_menu(menu).await?;
		log::info!("Menu {} created for bar {}", menu.id, menu.bar_id);
		Ok(menu)
	}

	pub async fn list(&self, bar_id: Option<Uuid>) -> Result<Vec<Menu>, CustomError> {
		self.menus.list_menus(bar_id).await
	}

	pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Menu>, CustomError> {
		let bar_ids = self.bars.bar_ids_owned_by(actor.user_id).await?;
		if bar_ids.is_empty() {
			return Ok(Vec::new());
		}
		self.menus.list_menus_by_bars(&bar_ids).await
	}

	pub async fn get(&self, id: Uuid) -> Result<Menu, CustomError> {
		self.menus
			.find_menu(id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Menu with id {} not found", id)))
	}

	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdateMenuSchema,
	) -> Result<Menu, CustomError> {
		let mut menu = self.get(id).await?;
		self.ensure_manages_bar(actor, menu.bar_id).await?;

		if let Some(name) = patch.name {
			require_text(&name, "name")?;
			let name = name.trim().to_string();
			if name != menu.name {
				self.ensure_unique_name(menu.bar_id, &name, Some(id)).await?;
				menu.name = name;
			}
		}
		if let Some(items) = patch.items {
			validate_items(&items)?;
			menu.items = Json(items);
		}
		if let Some(description) = patch.description {
			menu.description = Some(description);
		}
		if let Some(photo_url) = patch.photo_url {
			menu.photo_url = Some(photo_url);
		}
		menu.updated_at = self.clock.now();

		self.menus.update_menu(menu).await
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		let menu = self.get(id).await?;
		self.ensure_manages_bar(actor, menu.bar_id).await?;

		self.menus.delete_menu(id).await?;
		log::info!("Menu {} deleted by {}", id, actor.user_id);

		if let Some(photo_url) = menu.photo_url {
			self.uploads.remove(&photo_url).await;
		}
		for item_photo in menu.items.0.iter().filter_map(|item| item.photo_url.as_deref()) {
			self.uploads.remove(item_photo).await;
		}
		Ok(())
	}

	pub async fn remove_photo(&self, actor: &Actor, id: Uuid) -> Result<Menu, CustomError> {
		let mut menu = self.get(id).await?;
		self.ensure_manages_bar(actor, menu.bar_id).await?;

		let Some(photo_url) = menu.photo_url.take() else {
			return Ok(menu);
		};
		menu.updated_at = self.clock.now();

		let menu = self.menus.update_menu(menu).await?;
		self.uploads.remove(&photo_url).await;
		Ok(menu)
	}

	async fn ensure_unique_name(
		&self,
		bar_id: Uuid,
		name: &str,
		exclude: Option<Uuid>,
	) -> Result<(), CustomError> {
		if self.menus.menu_name_taken(bar_id, name, exclude).await? {
			return Err(CustomError::conflict(
				"A menu with that name already exists for this bar",
			));
		}
		Ok(())
	}

	async fn ensure_manages_bar(&self, actor: &Actor, bar_id: Uuid) -> Result<(), CustomError> {
		let bar = self
			.bars
			.find_bar_summary(bar_id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Bar with id {} not found", bar_id)))?;

		if !actor.manages_venue(bar.owner_id) {
			log::warn!("{} tried to manage menus of bar {}", actor.user_id, bar_id);
			return Err(CustomError::forbidden(
				"You can only manage menus of your own bars",
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{BarStore, MemoryStore};
	use crate::models::Role;
	use crate::services::fixtures;
	use crate::utils::{FixedClock, SequentialIds};

	async fn setup() -> (MenuService, Actor, Uuid) {
		let store = Arc::new(MemoryStore::new());
		let owner = Actor::new(Uuid::from_u128(100), Role::Owner);
		let bar = store
			.insert_bar(fixtures::bar(300, owner.user_id, "Casa Pepe"))
			.await
			.unwrap();

		let service = MenuService::new(
			store.clone(),
			store,
			UploadDir::new("./uploads"),
			Arc::new(FixedClock::new(fixtures::at(2025, 2, 1))),
			Arc::new(SequentialIds::default()),
		);
		(service, owner, bar.id)
	}

	fn menu(bar_id: Uuid, name: &str, price: f64) -> CreateMenuSchema {
		CreateMenuSchema {
			name: name.to_string(),
			description: None,
			bar_id,
			items: Some(vec![MenuItem {
				name: "Croquetas".to_string(),
				description: None,
				price,
				photo_url: None,
			}]),
			photo_url: None,
		}
	}

	#[actix_web::test]
	async fn menu_names_are_unique_per_bar() {
		let (service, owner, bar_id) = setup().await;
		service.create(&owner, menu(bar_id, "Tapas", 4.5)).await.unwrap();

		let err = service
			.create(&owner, menu(bar_id, "Tapas", 5.0))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));
	}

	#[actix_web::test]
	async fn negative_prices_are_rejected() {
		let (service, owner, bar_id) = setup().await;
		let err = service
			.create(&owner, menu(bar_id, "Tapas", -1.0))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn rename_checks_siblings_and_owner() {
		let (service, owner, bar_id) = setup().await;
		let tapas = service.create(&owner, menu(bar_id, "Tapas", 4.5)).await.unwrap();
		service.create(&owner, menu(bar_id, "Vinos", 3.0)).await.unwrap();

		let rename = UpdateMenuSchema {
			name: Some("Vinos".to_string()),
			..Default::default()
		};
		let err = service.update(&owner, tapas.id, rename).await.unwrap_err();
		assert!(matches!(err, CustomError::Conflict(_)));

		let stranger = Actor::new(Uuid::from_u128(5), Role::Client);
		let err = service
			.update(&stranger, tapas.id, UpdateMenuSchema::default())
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		assert_eq!(service.list(Some(bar_id)).await.unwrap().len(), 2);
		assert_eq!(service.list_mine(&owner).await.unwrap().len(), 2);
	}

	#[actix_web::test]
	async fn removing_a_missing_photo_is_a_no_op() {
		let (service, owner, bar_id) = setup().await;
		let mut body = menu(bar_id, "Tapas", 4.5);
		body.photo_url = Some("/uploads/gone.png".to_string());
		let created = service.create(&owner, body).await.unwrap();

		let cleared = service.remove_photo(&owner, created.id).await.unwrap();
		assert_eq!(cleared.photo_url, None);

		let again = service.remove_photo(&owner, created.id).await.unwrap();
		assert_eq!(again.photo_url, None);
		assert_eq!(again.name, "Tapas");
	}
}
