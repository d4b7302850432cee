use std::collections::BTreeMap;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq)]
pub struct Review {
	pub id: Uuid,
	pub user_id: Uuid,
	pub bar_id: Uuid,
	pub rating: i16,
	pub comment: String,
	pub owner_response: Option<String>,
	pub response_date: Option<DateTime<Utc>>,
	pub is_visible: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewSchema {
	pub bar_id: Uuid,
	pub rating: i16,
	pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewSchema {
	pub rating: Option<i16>,
	pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerResponseSchema {
	pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVisibilitySchema {
	pub is_visible: bool,
}

/// Derived rating fields of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
	pub average_rating: f64,
	pub total_reviews: i64,
}

impl RatingAggregate {
	/// Mean rounded to one decimal; an empty set resets both fields to zero.
	pub fn from_ratings(ratings: &[i16]) -> Self {
		if ratings.is_empty() {
			return RatingAggregate::default();
		}

		let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
		let mean = sum as f64 / ratings.len() as f64;

		RatingAggregate {
			average_rating: (mean * 10.0).round() / 10.0,
			total_reviews: ratings.len() as i64,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
	pub average_rating: f64,
	pub total_reviews: i64,
	pub rating_distribution: BTreeMap<i16, i64>,
}

impl ReviewStats {
	pub fn from_ratings(ratings: &[i16]) -> Self {
		let aggregate = RatingAggregate::from_ratings(ratings);
		let mut rating_distribution: BTreeMap<i16, i64> = (1..=5).map(|r| (r, 0)).collect();
		for rating in ratings {
			*rating_distribution.entry(*rating).or_insert(0) += 1;
		}

		ReviewStats {
			average_rating: aggregate.average_rating,
			total_reviews: aggregate.total_reviews,
			rating_distribution,
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredReview {
	pub id: String,
	pub user_id: String,
	pub bar_id: String,
	pub rating: i16,
	pub comment: String,
	pub owner_response: Option<String>,
	pub response_date: Option<DateTime<Utc>>,
	pub is_visible: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn average_is_rounded_to_one_decimal() {
		let aggregate = RatingAggregate::from_ratings(&[4, 5, 3]);
		assert_eq!(aggregate.average_rating, 4.0);
		assert_eq!(aggregate.total_reviews, 3);

		let aggregate = RatingAggregate::from_ratings(&[5, 4, 4]);
		assert_eq!(aggregate.average_rating, 4.3);

		let aggregate = RatingAggregate::from_ratings(&[5, 4]);
		assert_eq!(aggregate.average_rating, 4.5);
	}

	#[test]
	fn no_reviews_resets_to_zero() {
		assert_eq!(RatingAggregate::from_ratings(&[]), RatingAggregate::default());
	}

	#[test]
	fn stats_count_every_star() {
		let stats = ReviewStats::from_ratings(&[5, 5, 1]);
		assert_eq!(stats.total_reviews, 3);
		assert_eq!(stats.average_rating, 3.7);
		assert_eq!(stats.rating_distribution[&5], 2);
		assert_eq!(stats.rating_distribution[&1], 1);
		assert_eq!(stats.rating_distribution[&3], 0);
		assert_eq!(stats.rating_distribution.len(), 5);
	}
}
