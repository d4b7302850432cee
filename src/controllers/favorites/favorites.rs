use actix_web::{
	delete, get, post,
	web::{self, Path},
	HttpResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
	api::CustomError, jwt_auth::JwtMiddleware, models::FilteredBar, utils::filter_bar_record,
	AppState,
};

#[post("/favorites/{bar_id}")]
pub async fn add_favorite_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.favorites.add(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(json!({"status": "success", "message": "Bar added to favorites"})))
}

#[delete("/favorites/{bar_id}")]
pub async fn remove_favorite_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.favorites.remove(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(json!({"status": "success", "message": "Bar removed from favorites"})))
}

#[get("/favorites")]
pub async fn get_favorites_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let bars = data.favorites.list(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"favorites": bars.iter().map(filter_bar_record).collect::<Vec<FilteredBar>>(),
			"total": bars.len()
		})
	})))
}
