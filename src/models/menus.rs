use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
	pub name: String,
	pub description: Option<String>,
	pub price: f64,
	pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone)]
pub struct Menu {
	pub id: Uuid,
	pub bar_id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub items: Json<Vec<MenuItem>>,
	pub photo_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuSchema {
	pub name: String,
	pub description: Option<String>,
	pub bar_id: Uuid,
	pub items: Option<Vec<MenuItem>>,
	pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuSchema {
	pub name: Option<String>,
	pub description: Option<String>,
	pub items: Option<Vec<MenuItem>>,
	pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuFilterOptions {
	pub bar_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredMenu {
	pub id: String,
	pub bar_id: String,
	pub name: String,
	pub description: Option<String>,
	pub items: Vec<MenuItem>,
	pub photo_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
