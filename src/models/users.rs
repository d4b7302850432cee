use std::fmt;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
	#[default]
	Client,
	Owner,
	Admin,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Client => "client",
			Role::Owner => "owner",
			Role::Admin => "admin",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
	pub user_id: Uuid,
	pub role: Role,
}

impl Actor {
	pub fn new(user_id: Uuid, role: Role) -> Self {
		Actor { user_id, role }
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}

	/// True when the actor is the owner-role user that owns the venue.
	pub fn owns_venue(&self, owner_id: Uuid) -> bool {
		self.role == Role::Owner && self.user_id == owner_id
	}

	/// Venue owners manage their venues; admins manage every venue.
	pub fn manages_venue(&self, owner_id: Uuid) -> bool {
		self.is_admin() || self.user_id == owner_id
	}
}

#[derive(Debug, Deserialize, sqlx::FromRow, Serialize, Clone)]
pub struct User {
	pub id: Uuid,
	pub email: String,
	pub password: String,
	pub name: String,
	pub phone: Option<String>,
	pub role: Role,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUserSchema {
	pub email: String,
	pub password: String,
	pub name: String,
	pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginUserSchema {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserSchema {
	pub name: Option<String>,
	pub phone: Option<String>,
	pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
	pub sub: String,
	pub role: Role,
	pub iat: usize,
	pub exp: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredUser {
	pub id: String,
	pub email: String,
	pub name: String,
	pub phone: Option<String>,
	pub role: Role,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}
