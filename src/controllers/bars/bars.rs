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
	models::{Bar, CreateBarSchema, FilteredBar, Role, UpdateBarSchema},
	utils::filter_bar_record,
	AppState,
};

fn bar_response(bar: &Bar) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"bar": filter_bar_record(bar)
		})
	})
}

fn bars_response(bars: &[Bar]) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"bars": bars.iter().map(filter_bar_record).collect::<Vec<FilteredBar>>(),
			"bars_count": bars.len()
		})
	})
}

#[post("/bars")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn create_bar_handler(
	body: web::Json<CreateBarSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let bar = data.bars.create(&auth.actor, body.into_inner()).await?;

	Ok(HttpResponse::Created().json(bar_response(&bar)))
}

#[get("/bars")]
pub async fn get_bars_handler(data: web::Data<AppState>) -> Result<HttpResponse, CustomError> {
	let bars = data.bars.list().await?;

	Ok(HttpResponse::Ok().json(bars_response(&bars)))
}

#[get("/bars/my-bars")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn get_my_bars_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let bars = data.bars.list_mine(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(bars_response(&bars)))
}

#[get("/bars/{id}")]
pub async fn get_bar_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let bar = data.bars.get(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(bar_response(&bar)))
}

#[put("/bars/{id}")]
pub async fn update_bar_handler(
	path: Path<Uuid>,
	body: web::Json<UpdateBarSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let bar = data
		.bars
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(bar_response(&bar)))
}

#[delete("/bars/{id}")]
pub async fn delete_bar_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.bars.delete(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::NoContent().finish())
}
