use async_trait::async_trait;
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::Reservation;

#[async_trait]
pub trait ReservationStore: Send + Sync {
	async fn insert_reservation(&self, reservation: Reservation)
		-> Result<Reservation, CustomError>;
	async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, CustomError>;
	/// Newest reservation date first.
	async fn list_reservations_by_user(
		&self,
		user_id: Uuid,
	) -> Result<Vec<Reservation>, CustomError>;
	/// Newest reservation date first.
	async fn list_reservations_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Reservation>, CustomError>;
	async fn update_reservation(&self, reservation: Reservation)
		-> Result<Reservation, CustomError>;
	async fn delete_reservation(&self, id: Uuid) -> Result<bool, CustomError>;
}

#[async_trait]
impl ReservationStore for PgStore {
	async fn insert_reservation(
		&self,
		reservation: Reservation,
	) -> Result<Reservation, CustomError> {
		let reservation = sqlx::query_as::<_, Reservation>(
			"INSERT INTO reservations (id, user_id, bar_id, reservation_date, number_of_people,
				customer_name, customer_phone, comments, status, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
			RETURNING *",
		)
		.bind(reservation.id)
		.bind(reservation.user_id)
		.bind(reservation.bar_id)
		.bind(reservation.reservation_date)
		.bind(reservation.number_of_people)
		.bind(&reservation.customer_name)
		.bind(&reservation.customer_phone)
		.bind(&reservation.comments)
		.bind(reservation.status)
		.bind(reservation.created_at)
		.bind(reservation.updated_at)
		.fetch_one(&self.db)
		.await?;

		Ok(reservation)
	}

	async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, CustomError> {
		let reservation =
			sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.db)
				.await?;

		Ok(reservation)
	}

	async fn list_reservations_by_user(
		&self,
		user_id: Uuid,
	) -> Result<Vec<Reservation>, CustomError> {
		let reservations = sqlx::query_as::<_, Reservation>(
			"SELECT * FROM reservations WHERE user_id = $1 ORDER BY reservation_date DESC",
		)
		.bind(user_id)
		.fetch_all(&self.db)
		.await?;

		Ok(reservations)
	}

	async fn list_reservations_by_bars(
		&self,
		bar_ids: &[Uuid],
	) -> Result<Vec<Reservation>, CustomError> {
		let reservations = sqlx::query_as::<_, Reservation>(
			"SELECT * FROM reservations WHERE bar_id = ANY($1) ORDER BY reservation_date DESC",
		)
		.bind(bar_ids)
		.fetch_all(&self.db)
		.await?;

		Ok(reservations)
	}

	async fn update_reservation(
		&self,
		reservation: Reservation,
	) -> Result<Reservation, CustomError> {
		sqlx::query_as::<_, Reservation>(
			"UPDATE reservations SET reservation_date = $2, number_of_people = $3,
				customer_name = $4, customer_phone = $5, comments = $6, status = $7, updated_at = $8
			WHERE id = $1
			RETURNING *",
		)
		.bind(reservation.id)
		.bind(reservation.reservation_date)
		.bind(reservation.number_of_people)
		.bind(&reservation.customer_name)
		.bind(&reservation.customer_phone)
		.bind(&reservation.comments)
		.bind(reservation.status)
		.bind(reservation.updated_at)
		.fetch_optional(&self.db)
		.await?
		.ok_or_else(|| {
			CustomError::not_found(format!("Reservation with ID {} not found", reservation.id))
		})
	}

	async fn delete_reservation(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
