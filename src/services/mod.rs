//! Business rules. Each service owns its store ports plus the injected clock and id generator.

pub mod bars;
pub mod favorites;
pub mod menus;
pub mod promotions;
pub mod ranking;
pub mod reservations;
pub mod reviews;
pub mod users;

pub use self::bars::BarService;
pub use self::favorites::FavoriteService;
pub use self::menus::MenuService;
pub use self::promotions::PromotionService;
pub use self::reservations::ReservationManager;
pub use self::reviews::ReviewAggregator;
pub use self::users::UserService;

use crate::api::CustomError;

/// Rejects blank strings with a `BadRequest` naming the field.
pub(crate) fn require_text(value: &str, field: &str) -> Result<(), CustomError> {
	if value.trim().is_empty() {
		return Err(CustomError::bad_request(format!("{} must not be empty", field)));
	}
	Ok(())
}

/// Rejects strings whose character count falls outside `min..=max`.
pub(crate) fn require_length(
	value: &str,
	field: &str,
	min: usize,
	max: usize,
) -> Result<(), CustomError> {
	let len = value.chars().count();
	if len < min || len > max {
		return Err(CustomError::bad_request(format!(
			"{} must be between {} and {} characters",
			field, min, max
		)));
	}
	Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
	use chrono::{DateTime, TimeZone, Utc};
	use sqlx::types::Json;
	use uuid::Uuid;

	use crate::models::{Bar, OpeningHours, SocialLinks};

	pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
	}

	pub fn bar(id: u128, owner_id: Uuid, name: &str) -> Bar {
		let now = at(2025, 1, 1);
		Bar {
			id: Uuid::from_u128(id),
			name_bar: name.to_string(),
			location: "Calle Mayor 1".to_string(),
			description: None,
			owner_id,
			phone: None,
			photo: None,
			social_links: Json(SocialLinks::default()),
			hours: Json(OpeningHours::default()),
			average_rating: 0.0,
			total_reviews: 0,
			is_active: true,
			created_at: now,
			updated_at: now,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn length_counts_characters_not_bytes() {
		assert!(require_length("ñññññññññ!", "comment", 10, 500).is_ok());
		assert!(require_length("too short", "comment", 10, 500).is_err());
	}

	#[test]
	fn blank_text_is_rejected() {
		assert!(matches!(
			require_text("   ", "customerName"),
			Err(CustomError::BadRequest(_))
		));
	}
}
