//! In-process store used by tests and local demos. Mirrors the unique indexes
//! and cascades of the Postgres schema.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
	BarDirectory, BarStore, CustomError, FavoriteStore, MenuStore, PromotionStore, RatingSink,
	ReservationStore, ReviewStore, UserStore,
};
use crate::models::{
	ActivePromotion, Bar, BarSummary, Menu, Promotion, RatingAggregate, Reservation, Review,
	UniqueBarField, User,
};

#[derive(Debug, Default)]
struct Tables {
	users: Vec<User>,
	bars: Vec<Bar>,
	reservations: Vec<Reservation>,
	reviews: Vec<Review>,
	promotions: Vec<Promotion>,
	menus: Vec<Menu>,
	favorites: Vec<(Uuid, Uuid, DateTime<Utc>)>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: Mutex<Tables>,
}

impl MemoryStore {
	pub fn new() -> Self {
		MemoryStore::default()
	}

	fn tables(&self) -> MutexGuard<'_, Tables> {
		self.tables
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

fn bar_field_value(bar: &Bar, field: UniqueBarField) -> Option<&str> {
	match field {
		UniqueBarField::Name => Some(bar.name_bar.as_str()),
		UniqueBarField::Phone => bar.phone.as_deref(),
		UniqueBarField::Facebook => bar.social_links.facebook.as_deref(),
		UniqueBarField::Instagram => bar.social_links.instagram.as_deref(),
	}
}

const UNIQUE_BAR_FIELDS: [UniqueBarField; 4] = [
	UniqueBarField::Name,
	UniqueBarField::Phone,
	UniqueBarField::Facebook,
	UniqueBarField::Instagram,
];

/// Same rule as the unique indexes on `bars`: non-null values may not repeat.
fn clashes_with_other_bar(bars: &[Bar], bar: &Bar) -> bool {
	bars.iter().filter(|b| b.id != bar.id).any(|b| {
		UNIQUE_BAR_FIELDS.iter().any(|field| {
			let value = bar_field_value(bar, *field);
			value.is_some() && bar_field_value(b, *field) == value
		})
	})
}

fn newest_reservation_first(reservations: &mut [Reservation]) {
	reservations.sort_by(|a, b| b.reservation_date.cmp(&a.reservation_date));
}

fn newest_review_first(reviews: &mut [Review]) {
	reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl UserStore for MemoryStore {
	async fn insert_user(&self, user: User) -> Result<User, CustomError> {
		let mut tables = self.tables();
		if tables.users.iter().any(|u| u.email == user.email) {
			return Err(CustomError::conflict("This email is already registered"));
		}
		tables.users.push(user.clone());
		Ok(user)
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, CustomError> {
		Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
		Ok(self
			.tables()
			.users
			.iter()
			.find(|u| u.email == email)
			.cloned())
	}

	async fn list_users(&self) -> Result<Vec<User>, CustomError> {
		Ok(self.tables().users.clone())
	}

	async fn update_user(&self, user: User) -> Result<User, CustomError> {
		let mut tables = self.tables();
		let stored = tables
			.users
			.iter_mut()
			.find(|u| u.id == user.id)
			.ok_or_else(|| CustomError::not_found(format!("User with id {} not found", user.id)))?;
		stored.name = user.name;
		stored.phone = user.phone;
		stored.password = user.password;
		stored.updated_at = user.updated_at;
		Ok(stored.clone())
	}

	async fn delete_user(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.users.len();
		tables.users.retain(|u| u.id != id);
		if tables.users.len() == before {
			return Ok(false);
		}

		let owned: Vec<Uuid> = tables
			.bars
			.iter()
			.filter(|b| b.owner_id == id)
			.map(|b| b.id)
			.collect();
		tables.bars.retain(|b| b.owner_id != id);
		tables
			.reservations
			.retain(|r| r.user_id != id && !owned.contains(&r.bar_id));
		tables
			.reviews
			.retain(|r| r.user_id != id && !owned.contains(&r.bar_id));
		tables.promotions.retain(|p| !owned.contains(&p.bar_id));
		tables.menus.retain(|m| !owned.contains(&m.bar_id));
		tables
			.favorites
			.retain(|(user_id, bar_id, _)| *user_id != id && !owned.contains(bar_id));
		Ok(true)
	}
}

#[async_trait]
impl BarDirectory for MemoryStore {
	async fn find_bar_summary(&self, id: Uuid) -> Result<Option<BarSummary>, CustomError> {
		Ok(self
			.tables()
			.bars
			.iter()
			.find(|b| b.id == id)
			.map(BarSummary::from))
	}

	async fn bar_ids_owned_by(&self, owner_id: Uuid) -> Result<Vec<Uuid>, CustomError> {
		Ok(self
			.tables()
			.bars
			.iter()
			.filter(|b| b.owner_id == owner_id)
			.map(|b| b.id)
			.collect())
	}
}

#[async_trait]
impl BarStore for MemoryStore {
	async fn insert_bar(&self, bar: Bar) -> Result<Bar, CustomError> {
		let mut tables = self.tables();
		if clashes_with_other_bar(&tables.bars, &bar) {
			return Err(CustomError::conflict(
				"A bar with that name or phone already exists",
			));
		}
		tables.bars.push(bar.clone());
		Ok(bar)
	}

	async fn find_bar(&self, id: Uuid) -> Result<Option<Bar>, CustomError> {
		Ok(self.tables().bars.iter().find(|b| b.id == id).cloned())
	}

	async fn bar_field_taken(
		&self,
		field: UniqueBarField,
		value: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError> {
		Ok(self.tables().bars.iter().any(|b| {
			Some(b.id) != exclude && bar_field_value(b, field) == Some(value)
		}))
	}

	async fn list_bars(&self) -> Result<Vec<Bar>, CustomError> {
		Ok(self.tables().bars.clone())
	}

	async fn list_bars_by_owner(&self, owner_id: Uuid) -> Result<Vec<Bar>, CustomError> {
		Ok(self
			.tables()
			.bars
			.iter()
			.filter(|b| b.owner_id == owner_id)
			.cloned()
			.collect())
	}

	async fn update_bar(&self, bar: Bar) -> Result<Bar, CustomError> {
		let mut tables = self.tables();
		if clashes_with_other_bar(&tables.bars, &bar) {
			return Err(CustomError::conflict(
				"A bar with that name or phone already exists",
			));
		}
		let stored = tables
			.bars
			.iter_mut()
			.find(|b| b.id == bar.id)
			.ok_or_else(|| CustomError::not_found(format!("Bar with id {} not found", bar.id)))?;
		let (average_rating, total_reviews) = (stored.average_rating, stored.total_reviews);
		*stored = Bar {
			average_rating,
			total_reviews,
			..bar
		};
		Ok(stored.clone())
	}

	async fn delete_bar(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.bars.len();
		tables.bars.retain(|b| b.id != id);
		if tables.bars.len() == before {
			return Ok(false);
		}

		tables.reservations.retain(|r| r.bar_id != id);
		tables.reviews.retain(|r| r.bar_id != id);
		tables.promotions.retain(|p| p.bar_id != id);
		tables.menus.retain(|m| m.bar_id != id);
		tables.favorites.retain(|(_, bar_id, _)| *bar_id != id);
		Ok(true)
	}
}

#[async_trait]
impl RatingSink for MemoryStore {
	async fn store_rating(
		&self,
		bar_id: Uuid,
		aggregate: RatingAggregate,
	) -> Result<(), CustomError> {
		if let Some(bar) = self.tables().bars.iter_mut().find(|b| b.id == bar_id) {
			bar.average_rating = aggregate.average_rating;
			bar.total_reviews = aggregate.total_reviews;
		}
		Ok(())
	}
}

#[async_trait]
impl ReservationStore for MemoryStore {
	async fn insert_reservation(
		&self,
		reservation: Reservation,
	) -> Result<Reservation, CustomError> {
		self.tables().reservations.push(reservation.clone());
		Ok(reservation)
	}

	async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, CustomError> {
		Ok(self
			.tables()
			.reservations
			.iter()
			.find(|r| r.id == id)
			.cloned())
	}

	async fn list_reservations_by_user(
		&self,
		user_id: Uuid,
	) -> Result<Vec<Reservation>, CustomError> {
		let mut reservations: Vec<Reservation> = self
			.tables()
			.reservations
			.iter()
			.filter(|r| r.user_id == user_id)
			.cloned()
			.collect();
		newest_reservation_first(&mut reservations);
		Ok(reservations)
	}

	async fn list_reservations_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Reservation>, CustomError> {
		let mut reservations: Vec<Reservation> = self
			.tables()
			.reservations
			.iter()
			.filter(|r| bar_ids.contains(&r.bar_id))
			.cloned()
			.collect();
		newest_reservation_first(&mut reservations);
		Ok(reservations)
	}

	async fn update_reservation(
		&self,
		reservation: Reservation,
	) -> Result<Reservation, CustomError> {
		let mut tables = self.tables();
		let stored = tables
			.reservations
			.iter_mut()
			.find(|r| r.id == reservation.id)
			.ok_or_else(|| {
				CustomError::not_found(format!("Reservation with ID {} not found", reservation.id))
			})?;
		*stored = reservation;
		Ok(stored.clone())
	}

	async fn delete_reservation(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.reservations.len();
		tables.reservations.retain(|r| r.id != id);
		Ok(tables.reservations.len() < before)
	}
}

#[async_trait]
impl ReviewStore for MemoryStore {
	async fn insert_review(&self, review: Review) -> Result<Review, CustomError> {
		let mut tables = self.tables();
		if tables
			.reviews
			.iter()
			.any(|r| r.user_id == review.user_id && r.bar_id == review.bar_id)
		{
			return Err(CustomError::conflict("You have already reviewed this bar"));
		}
		tables.reviews.push(review.clone());
		Ok(review)
	}

	async fn find_review(&self, id: Uuid) -> Result<Option<Review>, CustomError> {
		Ok(self.tables().reviews.iter().find(|r| r.id == id).cloned())
	}

	async fn find_review_by_author(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
	) -> Result<Option<Review>, CustomError> {
		Ok(self
			.tables()
			.reviews
			.iter()
			.find(|r| r.user_id == user_id && r.bar_id == bar_id)
			.cloned())
	}

	async fn list_visible_reviews_by_bar(&self, bar_id: Uuid) -> Result<Vec<Review>, CustomError> {
		let mut reviews: Vec<Review> = self
			.tables()
			.reviews
			.iter()
			.filter(|r| r.bar_id == bar_id && r.is_visible)
			.cloned()
			.collect();
		newest_review_first(&mut reviews);
		Ok(reviews)
	}

	async fn list_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, CustomError> {
		let mut reviews: Vec<Review> = self
			.tables()
			.reviews
			.iter()
			.filter(|r| r.user_id == user_id)
			.cloned()
			.collect();
		newest_review_first(&mut reviews);
		Ok(reviews)
	}

	async fn list_visible_reviews_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Review>, CustomError> {
		let mut reviews: Vec<Review> = self
			.tables()
			.reviews
			.iter()
			.filter(|r| r.is_visible && bar_ids.contains(&r.bar_id))
			.cloned()
			.collect();
		newest_review_first(&mut reviews);
		Ok(reviews)
	}

	async fn visible_ratings(&self, bar_id: Uuid) -> Result<Vec<i16>, CustomError> {
		Ok(self
			.tables()
			.reviews
			.iter()
			.filter(|r| r.bar_id == bar_id && r.is_visible)
			.map(|r| r.rating)
			.collect())
	}

	async fn update_review(&self, review: Review) -> Result<Review, CustomError> {
		let mut tables = self.tables();
		let stored = tables
			.reviews
			.iter_mut()
			.find(|r| r.id == review.id)
			.ok_or_else(|| CustomError::not_found("Review not found"))?;
		*stored = review;
		Ok(stored.clone())
	}

	async fn delete_review(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.reviews.len();
		tables.reviews.retain(|r| r.id != id);
		Ok(tables.reviews.len() < before)
	}
}

#[async_trait]
impl PromotionStore for MemoryStore {
	async fn insert_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError> {
		self.tables().promotions.push(promotion.clone());
		Ok(promotion)
	}

	async fn find_promotion(&self, id: Uuid) -> Result<Option<Promotion>, CustomError> {
		Ok(self
			.tables()
			.promotions
			.iter()
			.find(|p| p.id == id)
			.cloned())
	}

	async fn list_promotions(&self, bar_id: Option<Uuid>) -> Result<Vec<Promotion>, CustomError> {
		Ok(self
			.tables()
			.promotions
			.iter()
			.filter(|p| bar_id.map_or(true, |id| p.bar_id == id))
			.cloned()
			.collect())
	}

	async fn list_promotions_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Promotion>, CustomError> {
		Ok(self
			.tables()
			.promotions
			.iter()
			.filter(|p| bar_ids.contains(&p.bar_id))
			.cloned()
			.collect())
	}

	async fn list_active_promotions(
		&self,
		now: DateTime<Utc>,
	) -> Result<Vec<ActivePromotion>, CustomError> {
		let tables = self.tables();
		let active = tables
			.promotions
			.iter()
			.filter(|p| p.is_active && p.valid_until > now)
			.filter_map(|p| {
				let bar = tables.bars.iter().find(|b| b.id == p.bar_id)?;
				Some(ActivePromotion {
					promotion: p.clone(),
					bar: BarSummary::from(bar),
				})
			})
			.collect();
		Ok(active)
	}

	async fn update_promotion(&self, promotion: Promotion) -> Result<Promotion, CustomError> {
		let mut tables = self.tables();
		let stored = tables
			.promotions
			.iter_mut()
			.find(|p| p.id == promotion.id)
			.ok_or_else(|| {
				CustomError::not_found(format!("Promotion with id {} not found", promotion.id))
			})?;
		*stored = promotion;
		Ok(stored.clone())
	}

	async fn delete_promotion(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.promotions.len();
		tables.promotions.retain(|p| p.id != id);
		Ok(tables.promotions.len() < before)
	}
}

#[async_trait]
impl MenuStore for MemoryStore {
	async fn insert_menu(&self, menu: Menu) -> Result<Menu, CustomError> {
		let mut tables = self.tables();
		if tables
			.menus
			.iter()
			.any(|m| m.bar_id == menu.bar_id && m.name == menu.name)
		{
			return Err(CustomError::conflict(
				"A menu with that name already exists for this bar",
			));
		}
		tables.menus.push(menu.clone());
		Ok(menu)
	}

	async fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, CustomError> {
		Ok(self.tables().menus.iter().find(|m| m.id == id).cloned())
	}

	async fn menu_name_taken(
		&self,
		bar_id: Uuid,
		name: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError> {
		Ok(self
			.tables()
			.menus
			.iter()
			.any(|m| m.bar_id == bar_id && m.name == name && Some(m.id) != exclude))
	}

	async fn list_menus(&self, bar_id: Option<Uuid>) -> Result<Vec<Menu>, CustomError> {
		Ok(self
			.tables()
			.menus
			.iter()
			.filter(|m| bar_id.map_or(true, |id| m.bar_id == id))
			.cloned()
			.collect())
	}

	async fn list_menus_by_bars(&self, bar_ids: &[Uuid]) -> Result<Vec<Menu>, CustomError> {
		Ok(self
			.tables()
			.menus
			.iter()
			.filter(|m| bar_ids.contains(&m.bar_id))
			.cloned()
			.collect())
	}

	async fn update_menu(&self, menu: Menu) -> Result<Menu, CustomError> {
		let mut tables = self.tables();
		let stored = tables
			.menus
			.iter_mut()
			.find(|m| m.id == menu.id)
			.ok_or_else(|| CustomError::not_found(format!("Menu with id {} not found", menu.id)))?;
		*stored = menu;
		Ok(stored.clone())
	}

	async fn delete_menu(&self, id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.menus.len();
		tables.menus.retain(|m| m.id != id);
		Ok(tables.menus.len() < before)
	}
}

#[async_trait]
impl FavoriteStore for MemoryStore {
	async fn add_favorite(
		&self,
		user_id: Uuid,
		bar_id: Uuid,
		at: DateTime<Utc>,
	) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		if tables
			.favorites
			.iter()
			.any(|(u, b, _)| *u == user_id && *b == bar_id)
		{
			return Ok(false);
		}
		tables.favorites.push((user_id, bar_id, at));
		Ok(true)
	}

	async fn remove_favorite(&self, user_id: Uuid, bar_id: Uuid) -> Result<bool, CustomError> {
		let mut tables = self.tables();
		let before = tables.favorites.len();
		tables
			.favorites
			.retain(|(u, b, _)| !(*u == user_id && *b == bar_id));
		Ok(tables.favorites.len() < before)
	}

	async fn list_favorite_bars(&self, user_id: Uuid) -> Result<Vec<Bar>, CustomError> {
		let tables = self.tables();
		Ok(tables
			.favorites
			.iter()
			.filter(|(u, _, _)| *u == user_id)
			.filter_map(|(_, bar_id, _)| tables.bars.iter().find(|b| b.id == *bar_id).cloned())
			.collect())
	}
}
