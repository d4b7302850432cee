use crate::models::{FilteredReservation, Reservation};

pub fn filter_reservation_record(reservation: &Reservation) -> FilteredReservation {
	FilteredReservation {
		id: reservation.id.to_string(),
		user_id: reservation.user_id.to_string(),
		bar_id: reservation.bar_id.to_string(),
		reservation_date: reservation.reservation_date,
		number_of_people: reservation.number_of_people,
		customer_name: reservation.customer_name.to_owned(),
		customer_phone: reservation.customer_phone.to_owned(),
		comments: reservation.comments.to_owned(),
		status: reservation.status,
		created_at: reservation.created_at,
		updated_at: reservation.updated_at,
	}
}
