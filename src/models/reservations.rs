use std::fmt;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, sqlx::Type,
)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
	#[default]
	Pending,
	Confirmed,
	Cancelled,
	Completed,
}

impl ReservationStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ReservationStatus::Pending => "pending",
			ReservationStatus::Confirmed => "confirmed",
			ReservationStatus::Cancelled => "cancelled",
			ReservationStatus::Completed => "completed",
		}
	}

	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			ReservationStatus::Cancelled | ReservationStatus::Completed
		)
	}

	/// pending -> confirmed -> completed, and pending|confirmed -> cancelled.
	pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
		use ReservationStatus::*;

		matches!(
			(self, next),
			(Pending, Confirmed) | (Confirmed, Completed) | (Pending, Cancelled) | (Confirmed, Cancelled)
		)
	}
}

impl fmt::Display for ReservationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq)]
pub struct Reservation {
	pub id: Uuid,
	pub user_id: Uuid,
	pub bar_id: Uuid,
	pub reservation_date: DateTime<Utc>,
	pub number_of_people: i32,
	pub customer_name: String,
	pub customer_phone: String,
	pub comments: Option<String>,
	pub status: ReservationStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationSchema {
	pub bar_id: Uuid,
	pub reservation_date: DateTime<Utc>,
	pub number_of_people: i32,
	pub customer_name: String,
	pub customer_phone: String,
	pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationSchema {
	pub reservation_date: Option<DateTime<Utc>>,
	pub number_of_people: Option<i32>,
	pub customer_name: Option<String>,
	pub customer_phone: Option<String>,
	pub comments: Option<String>,
	pub status: Option<ReservationStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredReservation {
	pub id: String,
	pub user_id: String,
	pub bar_id: String,
	pub reservation_date: DateTime<Utc>,
	pub number_of_people: i32,
	pub customer_name: String,
	pub customer_phone: String,
	pub comments: Option<String>,
	pub status: ReservationStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
	use super::ReservationStatus::*;
	use super::*;

	const ALL: [ReservationStatus; 4] = [Pending, Confirmed, Cancelled, Completed];

	#[test]
	fn terminal_states_have_no_way_out() {
		for from in [Cancelled, Completed] {
			assert!(from.is_terminal());
			for to in ALL {
				assert!(!from.can_transition_to(to), "{} -> {}", from, to);
			}
		}
	}

	#[test]
	fn lifecycle_moves_forward_only() {
		assert!(Pending.can_transition_to(Confirmed));
		assert!(Confirmed.can_transition_to(Completed));
		assert!(Pending.can_transition_to(Cancelled));
		assert!(Confirmed.can_transition_to(Cancelled));

		assert!(!Pending.can_transition_to(Completed));
		assert!(!Confirmed.can_transition_to(Pending));
		assert!(!Pending.can_transition_to(Pending));
	}

	#[test]
	fn status_serializes_lowercase() {
		let json = serde_json::to_string(&Confirmed).unwrap();
		assert_eq!(json, "\"confirmed\"");

		let parsed: ReservationStatus = serde_json::from_str("\"completed\"").unwrap();
		assert_eq!(parsed, Completed);
	}
}
