use actix_web::{
	delete, get, post, put,
	web::{self, Path},
	HttpResponse,
};
use actix_web_grants::proc_macro::has_any_role;
use serde_json::json;
use uuid::Uuid;

use crate::{
	api::CustomError,
	jwt_auth::JwtMiddleware,
	models::{CreateMenuSchema, FilteredMenu, Menu, MenuFilterOptions, Role, UpdateMenuSchema},
	utils::filter_menu_record,
	AppState,
};

fn menu_response(menu: &Menu) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"menu": filter_menu_record(menu)
		})
	})
}

fn menus_response(menus: &[Menu]) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"menus": menus.iter().map(filter_menu_record).collect::<Vec<FilteredMenu>>(),
			"menus_count": menus.len()
		})
	})
}

#[post("/menus")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn create_menu_handler(
	body: web::Json<CreateMenuSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let menu = data.menus.create(&auth.actor, body.into_inner()).await?;

	Ok(HttpResponse::Created().json(menu_response(&menu)))
}

#[get("/menus")]
pub async fn get_menus_handler(
	opts: web::Query<MenuFilterOptions>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let menus = data.menus.list(opts.bar_id).await?;

	Ok(HttpResponse::Ok().json(menus_response(&menus)))
}

#[get("/menus/my-menus")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn get_my_menus_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let menus = data.menus.list_mine(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(menus_response(&menus)))
}

#[get("/menus/bar/{bar_id}")]
pub async fn get_bar_menus_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let menus = data.menus.list(Some(path.into_inner())).await?;

	Ok(HttpResponse::Ok().json(menus_response(&menus)))
}

#[get("/menus/{id}")]
pub async fn get_menu_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let menu = data.menus.get(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(menu_response(&menu)))
}

#[put("/menus/{id}")]
pub async fn update_menu_handler(
	path: Path<Uuid>,
	body: web::Json<UpdateMenuSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let menu = data
		.menus
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(menu_response(&menu)))
}

#[delete("/menus/{id}")]
pub async fn delete_menu_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.menus.delete(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::NoContent().finish())
}

#[delete("/menus/{id}/photo")]
pub async fn delete_menu_photo_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let menu = data
		.menus
		.remove_photo(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(menu_response(&menu)))
}
