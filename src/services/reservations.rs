use std::sync::Arc;

use uuid::Uuid;

use super::{require_length, require_text};
use crate::api::{BarDirectory, CustomError, ReservationStore};
use crate::models::{
	Actor, CreateReservationSchema, Reservation, ReservationStatus, UpdateReservationSchema,
};
use crate::utils::{Clock, IdGenerator};

const CUSTOMER_NAME_MAX: usize = 255;
const CUSTOMER_PHONE_MAX: usize = 32;

fn validate_customer(name: Option<&str>, phone: Option<&str>) -> Result<(), CustomError> {
	if let Some(name) = name {
		require_text(name, "customerName")?;
		require_length(name.trim(), "customerName", 1, CUSTOMER_NAME_MAX)?;
	}
	if let Some(phone) = phone {
		require_text(phone, "customerPhone")?;
		require_length(phone.trim(), "customerPhone", 1, CUSTOMER_PHONE_MAX)?;
	}
	Ok(())
}

/// Who the actor is relative to a reservation.
struct Access {
	is_owner: bool,
}

/// Booking records and their status lifecycle.
pub struct ReservationManager {
	reservations: Arc<dyn ReservationStore>,
	bars: Arc<dyn BarDirectory>,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
}

impl ReservationManager {
	pub fn new(
		reservations: Arc<dyn ReservationStore>,
		bars: Arc<dyn BarDirectory>,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
	) -> Self {
		ReservationManager {
			reservations,
			bars,
			clock,
			ids,
		}
	}

	pub async fn create(
		&self,
		actor: &Actor,
		body: CreateReservationSchema,
	) -> Result<Reservation, CustomError> {
		if self.bars.find_bar_summary(body.bar_id).await?.is_none() {
			return Err(CustomError::not_found(format!(
				"Bar with ID {} not found",
				body.bar_id
			)));
		}
		if body.number_of_people < 1 {
			return Err(CustomError::bad_request(
				"numberOfPeople must be at least 1",
			));
		}
		validate_customer(Some(&body.customer_name), Some(&body.customer_phone))?;

		let now = self.clock.now();
		let reservation = Reservation {
			id: self.ids.next_id(),
			user_id: actor.user_id,
			bar_id: body.bar_id,
			reservation_date: body.reservation_date,
			number_of_people: body.number_of_people,
			customer_name: body.customer_name.trim().to_string(),
			customer_phone: body.customer_phone.trim().to_string(),
			comments: body.comments,
			status: ReservationStatus::Pending,
			created_at: now,
			updated_at: now,
		};

		let reservation = self.reservations.insert_reservation(reservation).await?;
		log::info!(
			"Reservation {} created for bar {} by {}",
			reservation.id,
			reservation.bar_id,
			actor.user_id
		);
		Ok(reservation)
	}

	pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Reservation>, CustomError> {
		self.reservations
			.list_reservations_by_user(actor.user_id)
			.await
	}

	pub async fn list_for_owner(&self, actor: &Actor) -> Result<Vec<Reservation>, CustomError> {
		let bar_ids = self.bars.bar_ids_owned_by(actor.user_id).await?;
		if bar_ids.is_empty() {
			return Ok(Vec::new());
		}
		self.reservations.list_reservations_by_bars(&bar_ids).await
	}

	pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Reservation, CustomError> {
		let (reservation, _) = self.load(actor, id, "view").await?;
		Ok(reservation)
	}

	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdateReservationSchema,
	) -> Result<Reservation, CustomError> {
		let (mut reservation, access) = self.load(actor, id, "update").await?;

		if let Some(status) = patch.status {
			if status != reservation.status {
				if !access.is_owner {
					return Err(CustomError::forbidden(
						"Only the bar owner can update the status",
					));
				}
				if !reservation.status.can_transition_to(status) {
					return Err(CustomError::bad_request(format!(
						"Cannot change a {} reservation to {}",
						reservation.status, status
					)));
				}
				reservation.status = status;
			}
		}

		if let Some(reservation_date) = patch.reservation_date {
			reservation.reservation_date = reservation_date;
		}
		if let Some(number_of_people) = patch.number_of_people {
			if number_of_people < 1 {
				return Err(CustomError::bad_request(
					"numberOfPeople must be at least 1",
				));
			}
			reservation.number_of_people = number_of_people;
		}
		if let Some(customer_name) = patch.customer_name {
			validate_customer(Some(&customer_name), None)?;
			reservation.customer_name = customer_name.trim().to_string();
		}
		if let Some(customer_phone) = patch.customer_phone {
			validate_customer(None, Some(&customer_phone))?;
			reservation.customer_phone = customer_phone.trim().to_string();
		}
		if let Some(comments) = patch.comments {
			reservation.comments = Some(comments);
		}

		reservation.updated_at = self.clock.now();
		self.reservations.update_reservation(reservation).await
	}

	pub async fn cancel(&self, actor: &Actor, id: Uuid) -> Result<Reservation, CustomError> {
		let (reservation, _) = self.load(actor, id, "cancel").await?;
		if reservation.status.is_terminal() {
			return Err(CustomError::bad_request(format!(
				"Cannot cancel a reservation that is {}",
				reservation.status
			)));
		}

		self.transition(reservation, ReservationStatus::Cancelled).await
	}

	pub async fn confirm(&self, actor: &Actor, id: Uuid) -> Result<Reservation, CustomError> {
		let reservation = self.load_as_owner(actor, id, "confirm").await?;
		if reservation.status != ReservationStatus::Pending {
			return Err(CustomError::bad_request(
				"Only pending reservations can be confirmed",
			));
		}

		self.transition(reservation, ReservationStatus::Confirmed).await
	}

	pub async fn complete(&self, actor: &Actor, id: Uuid) -> Result<Reservation, CustomError> {
		let reservation = self.load_as_owner(actor, id, "complete").await?;
		if reservation.status != ReservationStatus::Confirmed {
			return Err(CustomError::bad_request(
				"Only confirmed reservations can be completed",
			));
		}

		self.transition(reservation, ReservationStatus::Completed).await
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		self.load(actor, id, "delete").await?;
		self.reservations.delete_reservation(id).await?;
		log::info!("Reservation {} deleted by {}", id, actor.user_id);
		Ok(())
	}

	async fn transition(
		&self,
		mut reservation: Reservation,
		next: ReservationStatus,
	) -> Result<Reservation, CustomError> {
		let previous = reservation.status;
		reservation.status = next;
		reservation.updated_at = self.clock.now();

		let reservation = self.reservations.update_reservation(reservation).await?;
		log::info!(
			"Reservation {} moved from {} to {}",
			reservation.id,
			previous,
			next
		);
		Ok(reservation)
	}

	/// Loads a reservation the actor may act on: its own client or the venue owner.
	async fn load(
		&self,
		actor: &Actor,
		id: Uuid,
		action: &str,
	) -> Result<(Reservation, Access), CustomError> {
		let reservation = self.find(id).await?;
		let is_owner = self.is_venue_owner(actor, reservation.bar_id).await?;
		let is_client = reservation.user_id == actor.user_id;

		if !is_owner && !is_client {
			log::warn!(
				"{} tried to {} reservation {} without permission",
				actor.user_id,
				action,
				id
			);
			return Err(CustomError::forbidden(format!(
				"You do not have permission to {} this reservation",
				action
			)));
		}

		Ok((reservation, Access { is_owner }))
	}

	async fn load_as_owner(
		&self,
		actor: &Actor,
		id: Uuid,
		action: &str,
	) -> Result<Reservation, CustomError> {
		let reservation = self.find(id).await?;
		if !self.is_venue_owner(actor, reservation.bar_id).await? {
			log::warn!(
				"{} tried to {} reservation {} without owning the bar",
				actor.user_id,
				action,
				id
			);
			return Err(CustomError::forbidden(format!(
				"You do not have permission to {} this reservation",
				action
			)));
		}
		Ok(reservation)
	}

	async fn find(&self, id: Uuid) -> Result<Reservation, CustomError> {
		self.reservations
			.find_reservation(id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("Reservation with ID {} not found", id)))
	}

	async fn is_venue_owner(&self, actor: &Actor, bar_id: Uuid) -> Result<bool, CustomError> {
		let bar = self.bars.find_bar_summary(bar_id).await?;
		Ok(bar.map_or(false, |bar| actor.owns_venue(bar.owner_id)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{BarStore, MemoryStore};
	use crate::models::Role;
	use crate::services::fixtures;
	use crate::utils::{FixedClock, SequentialIds};

	struct Setup {
		manager: ReservationManager,
		owner: Actor,
		client: Actor,
		bar_id: Uuid,
	}

	async fn setup() -> Setup {
		let store = Arc::new(MemoryStore::new());
		let owner = Actor::new(Uuid::from_u128(100), Role::Owner);
		let client = Actor::new(Uuid::from_u128(200), Role::Client);
		let bar = store
			.insert_bar(fixtures::bar(300, owner.user_id, "La Taberna"))
			.await
			.unwrap();

		let manager = ReservationManager::new(
			store.clone(),
			store,
			Arc::new(FixedClock::new(fixtures::at(2025, 3, 1))),
			Arc::new(SequentialIds::default()),
		);

		Setup {
			manager,
			owner,
			client,
			bar_id: bar.id,
		}
	}

	fn booking(bar_id: Uuid) -> CreateReservationSchema {
		CreateReservationSchema {
			bar_id,
			reservation_date: fixtures::at(2025, 3, 14),
			number_of_people: 4,
			customer_name: "Ana".to_string(),
			customer_phone: "600111222".to_string(),
			comments: None,
		}
	}

	#[actix_web::test]
	async fn new_reservations_start_pending() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();
		assert_eq!(reservation.status, ReservationStatus::Pending);
		assert_eq!(reservation.user_id, s.client.user_id);
	}

	#[actix_web::test]
	async fn create_requires_an_existing_bar_and_party() {
		let s = setup().await;
		let err = s
			.manager
			.create(&s.client, booking(Uuid::from_u128(999)))
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::NotFound(_)));

		let mut empty_party = booking(s.bar_id);
		empty_party.number_of_people = 0;
		let err = s.manager.create(&s.client, empty_party).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn overlong_customer_phone_is_a_bad_request() {
		let s = setup().await;
		let mut long_phone = booking(s.bar_id);
		long_phone.customer_phone = "6".repeat(33);
		let err = s.manager.create(&s.client, long_phone).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));

		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();
		let patch = UpdateReservationSchema {
			customer_phone: Some("6".repeat(33)),
			..Default::default()
		};
		let err = s
			.manager
			.update(&s.client, reservation.id, patch)
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));

		let patch = UpdateReservationSchema {
			customer_phone: Some(format!(" {} ", "6".repeat(32))),
			..Default::default()
		};
		let updated = s.manager.update(&s.client, reservation.id, patch).await.unwrap();
		assert_eq!(updated.customer_phone.len(), 32);
	}

	#[actix_web::test]
	async fn owner_walks_the_full_lifecycle() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();

		let confirmed = s.manager.confirm(&s.owner, reservation.id).await.unwrap();
		assert_eq!(confirmed.status, ReservationStatus::Confirmed);

		let completed = s.manager.complete(&s.owner, reservation.id).await.unwrap();
		assert_eq!(completed.status, ReservationStatus::Completed);

		for actor in [&s.owner, &s.client] {
			let err = s.manager.cancel(actor, reservation.id).await.unwrap_err();
			assert!(matches!(err, CustomError::BadRequest(_)));
		}
		let err = s.manager.confirm(&s.owner, reservation.id).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn complete_requires_confirmation_first() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();
		let err = s.manager.complete(&s.owner, reservation.id).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn client_cannot_confirm_but_can_cancel() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();

		let err = s.manager.confirm(&s.client, reservation.id).await.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		let cancelled = s.manager.cancel(&s.client, reservation.id).await.unwrap();
		assert_eq!(cancelled.status, ReservationStatus::Cancelled);

		let err = s.manager.cancel(&s.client, reservation.id).await.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn strangers_and_admins_are_rejected() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();

		let stranger = Actor::new(Uuid::from_u128(201), Role::Client);
		let admin = Actor::new(Uuid::from_u128(1), Role::Admin);
		for actor in [&stranger, &admin] {
			let err = s.manager.get(actor, reservation.id).await.unwrap_err();
			assert!(matches!(err, CustomError::Forbidden(_)));
			let err = s.manager.delete(actor, reservation.id).await.unwrap_err();
			assert!(matches!(err, CustomError::Forbidden(_)));
		}
	}

	#[actix_web::test]
	async fn only_the_owner_changes_status_through_update() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();

		let patch = UpdateReservationSchema {
			status: Some(ReservationStatus::Confirmed),
			..Default::default()
		};
		let err = s
			.manager
			.update(&s.client, reservation.id, patch.clone())
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::Forbidden(_)));

		let updated = s.manager.update(&s.owner, reservation.id, patch).await.unwrap();
		assert_eq!(updated.status, ReservationStatus::Confirmed);

		let skip_ahead = UpdateReservationSchema {
			status: Some(ReservationStatus::Pending),
			..Default::default()
		};
		let err = s
			.manager
			.update(&s.owner, reservation.id, skip_ahead)
			.await
			.unwrap_err();
		assert!(matches!(err, CustomError::BadRequest(_)));
	}

	#[actix_web::test]
	async fn client_edits_details_and_deletes() {
		let s = setup().await;
		let reservation = s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();

		let patch = UpdateReservationSchema {
			number_of_people: Some(6),
			comments: Some("Terrace please".to_string()),
			..Default::default()
		};
		let updated = s.manager.update(&s.client, reservation.id, patch).await.unwrap();
		assert_eq!(updated.number_of_people, 6);
		assert_eq!(updated.status, ReservationStatus::Pending);

		s.manager.delete(&s.client, reservation.id).await.unwrap();
		let err = s.manager.get(&s.client, reservation.id).await.unwrap_err();
		assert!(matches!(err, CustomError::NotFound(_)));
	}

	#[actix_web::test]
	async fn owner_sees_reservations_of_their_bars() {
		let s = setup().await;
		s.manager.create(&s.client, booking(s.bar_id)).await.unwrap();
		let mut later = booking(s.bar_id);
		later.reservation_date = fixtures::at(2025, 4, 1);
		s.manager.create(&s.client, later).await.unwrap();

		let listed = s.manager.list_for_owner(&s.owner).await.unwrap();
		assert_eq!(listed.len(), 2);
		assert!(listed[0].reservation_date > listed[1].reservation_date);

		assert!(s.manager.list_for_owner(&s.client).await.unwrap().is_empty());
		assert_eq!(s.manager.list_mine(&s.client).await.unwrap().len(), 2);
	}
}
