//! Composite desirability score used to order featured promotions.

use chrono::{DateTime, Utc};

use crate::models::{ActivePromotion, Promotion, PromotionScore, RankedPromotion};

pub const FEATURED_LIMIT: usize = 6;

const DISCOUNT_WEIGHT: f64 = 40.0;
const RATING_WEIGHT: f64 = 30.0;
const URGENCY_WEIGHT: f64 = 0.2;
const RECENCY_WEIGHT: f64 = 0.1;
const URGENCY_WINDOW_DAYS: f64 = 30.0;
const RECENCY_WINDOW_DAYS: f64 = 7.0;
const MAX_RATING: f64 = 5.0;

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
	let seconds = (to - from).num_milliseconds() as f64 / 1000.0;
	(seconds / 86_400.0).max(0.0)
}

/// Scores one promotion on a 0-100 scale.
pub fn score_promotion(promotion: &Promotion, bar_rating: f64, now: DateTime<Utc>) -> PromotionScore {
	let discount = promotion.discount_percentage.unwrap_or(0.0);
	let discount_score = discount / 100.0 * DISCOUNT_WEIGHT;
	let bar_rating_score = bar_rating / MAX_RATING * RATING_WEIGHT;

	let days_until_expiry = days_between(now, promotion.valid_until);
	let urgency_score =
		(100.0 - (days_until_expiry / URGENCY_WINDOW_DAYS).min(1.0) * 100.0) * URGENCY_WEIGHT;

	let days_since_created = days_between(promotion.created_at, now);
	let recency_score =
		(100.0 - (days_since_created / RECENCY_WINDOW_DAYS).min(1.0) * 100.0) * RECENCY_WEIGHT;

	PromotionScore {
		discount_score,
		bar_rating_score,
		urgency_score,
		recency_score,
		total_score: discount_score + bar_rating_score + urgency_score + recency_score,
	}
}

/// Top promotions by score, highest first. Equal scores keep their input order.
pub fn rank_featured(active: Vec<ActivePromotion>, now: DateTime<Utc>) -> Vec<RankedPromotion> {
	let mut ranked: Vec<RankedPromotion> = active
		.into_iter()
		.map(|entry| {
			let score = score_promotion(&entry.promotion, entry.bar.average_rating, now);
			RankedPromotion {
				promotion: entry.promotion,
				bar: entry.bar,
				score,
			}
		})
		.collect();

	ranked.sort_by(|a, b| b.score.total_score.total_cmp(&a.score.total_score));
	ranked.truncate(FEATURED_LIMIT);
	ranked
}

/// Soonest-expiring first.
pub fn sort_by_expiry(active: &mut [ActivePromotion]) {
	active.sort_by_key(|entry| entry.promotion.valid_until);
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};
	use uuid::Uuid;

	use crate::models::BarSummary;

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
	}

	fn promotion(n: u128, discount: Option<f64>, expires_in: i64, age: i64) -> Promotion {
		let created_at = now() - Duration::days(age);
		Promotion {
			id: Uuid::from_u128(n),
			bar_id: Uuid::from_u128(500),
			title: format!("Promo {}", n),
			description: None,
			discount_percentage: discount,
			valid_from: created_at,
			valid_until: now() + Duration::days(expires_in),
			is_active: true,
			photo_url: None,
			terms_and_conditions: None,
			created_at,
			updated_at: created_at,
		}
	}

	fn listed(promotion: Promotion, rating: f64) -> ActivePromotion {
		ActivePromotion {
			bar: BarSummary {
				id: promotion.bar_id,
				owner_id: Uuid::from_u128(1),
				name_bar: "Bar Central".to_string(),
				photo: None,
				average_rating: rating,
			},
			promotion,
		}
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 0.05
	}

	#[test]
	fn worked_example_scores_about_65_9() {
		let score = score_promotion(&promotion(1, Some(50.0), 10, 1), 4.0, now());

		assert!(close(score.discount_score, 20.0));
		assert!(close(score.bar_rating_score, 24.0));
		assert!(close(score.urgency_score, 13.3));
		assert!(close(score.recency_score, 8.6));
		assert!(close(score.total_score, 65.9));
	}

	#[test]
	fn long_running_old_promotions_score_only_on_discount_and_rating() {
		let score = score_promotion(&promotion(1, None, 90, 30), 5.0, now());
		assert_eq!(score.discount_score, 0.0);
		assert_eq!(score.urgency_score, 0.0);
		assert_eq!(score.recency_score, 0.0);
		assert!(close(score.total_score, 30.0));
	}

	#[test]
	fn featured_keeps_the_top_six_with_stable_ties() {
		let mut active: Vec<ActivePromotion> = (1..=7)
			.map(|n| listed(promotion(n, Some(10.0), 60, 30), 3.0))
			.collect();
		active.push(listed(promotion(8, Some(90.0), 60, 30), 3.0));

		let featured = rank_featured(active, now());
		let ids: Vec<u128> = featured.iter().map(|r| r.promotion.id.as_u128()).collect();
		assert_eq!(ids, vec![8, 1, 2, 3, 4, 5]);
	}

	#[test]
	fn active_listing_orders_by_expiry() {
		let mut active = vec![
			listed(promotion(1, None, 20, 1), 0.0),
			listed(promotion(2, None, 3, 1), 0.0),
			listed(promotion(3, None, 9, 1), 0.0),
		];
		sort_by_expiry(&mut active);
		let ids: Vec<u128> = active.iter().map(|a| a.promotion.id.as_u128()).collect();
		assert_eq!(ids, vec![2, 3, 1]);
	}
}
