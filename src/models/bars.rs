use std::collections::BTreeMap;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SocialLinks {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub facebook: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instagram: Option<String>,
	#[serde(flatten)]
	pub other: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DayHours {
	pub open: Option<String>,
	pub close: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OpeningHours {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub monday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tuesday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub wednesday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thursday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub friday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub saturday: Option<DayHours>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub sunday: Option<DayHours>,
}

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone)]
pub struct Bar {
	pub id: Uuid,
	pub name_bar: String,
	pub location: String,
	pub description: Option<String>,
	pub owner_id: Uuid,
	pub phone: Option<String>,
	pub photo: Option<String>,
	pub social_links: Json<SocialLinks>,
	pub hours: Json<OpeningHours>,
	pub average_rating: f64,
	pub total_reviews: i64,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Read-only view of a venue handed to the other modules.
#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone, PartialEq)]
pub struct BarSummary {
	pub id: Uuid,
	pub owner_id: Uuid,
	pub name_bar: String,
	pub photo: Option<String>,
	pub average_rating: f64,
}

impl From<&Bar> for BarSummary {
	fn from(bar: &Bar) -> Self {
		BarSummary {
			id: bar.id,
			owner_id: bar.owner_id,
			name_bar: bar.name_bar.clone(),
			photo: bar.photo.clone(),
			average_rating: bar.average_rating,
		}
	}
}

/// Fields that carry a uniqueness constraint across venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueBarField {
	Name,
	Phone,
	Facebook,
	Instagram,
}

impl UniqueBarField {
	pub fn label(&self) -> &'static str {
		match self {
			UniqueBarField::Name => "name",
			UniqueBarField::Phone => "phone",
			UniqueBarField::Facebook => "Facebook",
			UniqueBarField::Instagram => "Instagram",
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarSchema {
	pub name_bar: String,
	pub location: String,
	pub description: Option<String>,
	pub owner_id: Option<Uuid>,
	pub phone: Option<String>,
	pub photo: Option<String>,
	pub social_links: Option<SocialLinks>,
	pub hours: Option<OpeningHours>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBarSchema {
	pub name_bar: Option<String>,
	pub location: Option<String>,
	pub description: Option<String>,
	pub phone: Option<String>,
	pub photo: Option<String>,
	pub social_links: Option<SocialLinks>,
	pub hours: Option<OpeningHours>,
	pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredBar {
	pub id: String,
	pub name_bar: String,
	pub location: String,
	pub description: Option<String>,
	pub owner_id: String,
	pub phone: Option<String>,
	pub photo: Option<String>,
	pub social_links: SocialLinks,
	pub hours: OpeningHours,
	pub average_rating: f64,
	pub total_reviews: i64,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
