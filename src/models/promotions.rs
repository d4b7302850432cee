use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BarSummary;

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq)]
pub struct Promotion {
	pub id: Uuid,
	pub bar_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub discount_percentage: Option<f64>,
	pub valid_from: DateTime<Utc>,
	pub valid_until: DateTime<Utc>,
	pub is_active: bool,
	pub photo_url: Option<String>,
	pub terms_and_conditions: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// An active promotion joined to its venue.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePromotion {
	pub promotion: Promotion,
	pub bar: BarSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionScore {
	pub discount_score: f64,
	pub bar_rating_score: f64,
	pub urgency_score: f64,
	pub recency_score: f64,
	pub total_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedPromotion {
	pub promotion: Promotion,
	pub bar: BarSummary,
	pub score: PromotionScore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionSchema {
	pub title: String,
	pub description: Option<String>,
	pub bar_id: Uuid,
	pub discount_percentage: Option<f64>,
	pub valid_from: DateTime<Utc>,
	pub valid_until: DateTime<Utc>,
	pub is_active: Option<bool>,
	pub photo_url: Option<String>,
	pub terms_and_conditions: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionSchema {
	pub title: Option<String>,
	pub description: Option<String>,
	pub discount_percentage: Option<f64>,
	pub valid_from: Option<DateTime<Utc>>,
	pub valid_until: Option<DateTime<Utc>>,
	pub is_active: Option<bool>,
	pub photo_url: Option<String>,
	pub terms_and_conditions: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionFilterOptions {
	pub bar_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredPromotion {
	pub id: String,
	pub bar_id: String,
	pub title: String,
	pub description: Option<String>,
	pub discount_percentage: Option<f64>,
	pub valid_from: DateTime<Utc>,
	pub valid_until: DateTime<Utc>,
	pub is_active: bool,
	pub photo_url: Option<String>,
	pub terms_and_conditions: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredListedPromotion {
	#[serde(flatten)]
	pub promotion: FilteredPromotion,
	pub bar_name: String,
	pub bar_logo: Option<String>,
	pub bar_rating: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score: Option<f64>,
}
