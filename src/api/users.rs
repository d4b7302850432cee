use async_trait::async_trait;
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::User;

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn insert_user(&self, user: User) -> Result<User, CustomError>;
	async fn find_user(&self, id: Uuid) -> Result<Option<User>, CustomError>;
	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;
	async fn list_users(&self) -> Result<Vec<User>, CustomError>;
	async fn update_user(&self, user: User) -> Result<User, CustomError>;
	async fn delete_user(&self, id: Uuid) -> Result<bool, CustomError>;
}

#[async_trait]
impl UserStore for PgStore {
	async fn insert_user(&self, user: User) -> Result<User, CustomError> {
		sqlx::query_as::<_, User>(
			"INSERT INTO users (id, email, password, name, phone, role, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING *",
		)
		.bind(user.id)
		.bind(&user.email)
		.bind(&user.password)
		.bind(&user.name)
		.bind(&user.phone)
		.bind(user.role)
		.bind(user.created_at)
		.bind(user.updated_at)
		.fetch_one(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, "This email is already registered"))
	}

	async fn find_user(&self, id: Uuid) -> Result<Option<User>, CustomError> {
		let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?;

		Ok(user)
	}

	async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
		let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
			.bind(email)
			.fetch_optional(&self.db)
			.await?;

		Ok(user)
	}

	async fn list_users(&self) -> Result<Vec<User>, CustomError> {
		let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
			.fetch_all(&self.db)
			.await?;

		Ok(users)
	}

	async fn update_user(&self, user: User) -> Result<User, CustomError> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET name = $2, phone = $3, password = $4, updated_at = $5
			WHERE id = $1
			RETURNING *",
		)
		.bind(user.id)
		.bind(&user.name)
		.bind(&user.phone)
		.bind(&user.password)
		.bind(user.updated_at)
		.fetch_optional(&self.db)
		.await?
		.ok_or_else(|| CustomError::not_found(format!("User with id {} not found", user.id)))
	}

	async fn delete_user(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM users WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
