use async_trait::async_trait;
use uuid::Uuid;

use super::{CustomError, PgStore};
use crate::models::Menu;

const DUPLICATE_MENU: &str = "A menu with that name already exists for this bar";

#[async_trait]
pub trait MenuStore: Send + Sync {
	async fn insert_menu(&self, menu: Menu) -> Result<Menu, CustomError>;
	async fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, CustomError>;
	async fn menu_name_taken(
		&self,
		bar_id: Uuid,
		name: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError>;
	async fn list_menus(&self, bar_id: Option<Uuid>) -> Result<Vec<Menu>, CustomError>;
	async fn list_menus_by_bars(&self, bar_ids: &[Uuid]) -> Result<Vec<Menu>, CustomError>;
	async fn update_menu(&self, menu: Menu) -> Result<Menu, CustomError>;
	async fn delete_menu(&self, id: Uuid) -> Result<bool, CustomError>;
}

#[async_trait]
impl MenuStore for PgStore {
	async fn insert_menu(&self, menu: Menu) -> Result<Menu, CustomError> {
		sqlx::query_as::<_, Menu>(
			"INSERT INTO menus (id, bar_id, name, description, items, photo_url, created_at, updated_at)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING *",
		)
		.bind(menu.id)
		.bind(menu.bar_id)
		.bind(&menu.name)
		.bind(&menu.description)
		.bind(&menu.items)
		.bind(&menu.photo_url)
		.bind(menu.created_at)
		.bind(menu.updated_at)
		.fetch_one(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, DUPLICATE_MENU))
	}

	async fn find_menu(&self, id: Uuid) -> Result<Option<Menu>, CustomError> {
		let menu = sqlx::query_as::<_, Menu>("SELECT * FROM menus WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db)
			.await?;

		Ok(menu)
	}

	async fn menu_name_taken(
		&self,
		bar_id: Uuid,
		name: &str,
		exclude: Option<Uuid>,
	) -> Result<bool, CustomError> {
		let taken = sqlx::query_scalar::<_, bool>(
			"SELECT EXISTS (
				SELECT 1 FROM menus WHERE bar_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)
			)",
		)
		.bind(bar_id)
		.bind(name)
		.bind(exclude)
		.fetch_one(&self.db)
		.await?;

		Ok(taken)
	}

	async fn list_menus(&self, bar_id: Option<Uuid>) -> Result<Vec<Menu>, CustomError> {
		let menus = sqlx::query_as::<_, Menu>(
			"SELECT * FROM menus WHERE ($1::uuid IS NULL OR bar_id = $1) ORDER BY created_at",
		)
		.bind(bar_id)
		.fetch_all(&self.db)
		.await?;

		Ok(menus)
	}

	async fn list_menus_by_bars(&self, bar_ids: &[Uuid]) -> Result<Vec<Menu>, CustomError> {
		let menus = sqlx::query_as::<_, Menu>(
			"SELECT * FROM menus WHERE bar_id = ANY($1) ORDER BY created_at",
		)
		.bind(bar_ids)
		.fetch_all(&self.db)
		.await?;

		Ok(menus)
	}

	async fn update_menu(&self, menu: Menu) -> Result<Menu, CustomError> {
		sqlx::query_as::<_, Menu>(
			"UPDATE menus SET name = $2, description = $3, items = $4, photo_url = $5, updated_at = $6
			WHERE id = $1
			RETURNING *",
		)
		.bind(menu.id)
		.bind(&menu.name)
		.bind(&menu.description)
		.bind(&menu.items)
		.bind(&menu.photo_url)
		.bind(menu.updated_at)
		.fetch_optional(&self.db)
		.await
		.map_err(|e| CustomError::from_db(e, DUPLICATE_MENU))?
		.ok_or_else(|| CustomError::not_found(format!("Menu with id {} not found", menu.id)))
	}

	async fn delete_menu(&self, id: Uuid) -> Result<bool, CustomError> {
		let result = sqlx::query("DELETE FROM menus WHERE id = $1")
			.bind(id)
			.execute(&self.db)
			.await?;

		Ok(result.rows_affected() > 0)
	}
}
