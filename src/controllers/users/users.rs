use actix_web::{
	delete, get, put,
	web::{self, Path},
	HttpResponse,
};
use actix_web_grants::proc_macro::has_any_role;
use serde_json::json;
use uuid::Uuid;

use crate::{
	api::CustomError,
	jwt_auth::JwtMiddleware,
	models::{FilteredUser, Role, UpdateUserSchema},
	utils::filter_user_record,
	AppState,
};

#[get("/users")]
#[has_any_role("Role::Admin", type = "Role")]
pub async fn get_users_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let users = data.users.list(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"users": users.iter().map(filter_user_record).collect::<Vec<FilteredUser>>(),
			"users_count": users.len()
		})
	})))
}

#[get("/users/{id}")]
pub async fn get_user_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	_: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let user = data.users.get(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"user": filter_user_record(&user)
		})
	})))
}

#[put("/users/{id}")]
pub async fn update_user_handler(
	path: Path<Uuid>,
	body: web::Json<UpdateUserSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let user = data
		.users
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"user": filter_user_record(&user)
		})
	})))
}

#[delete("/users/{id}")]
pub async fn delete_user_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.users.delete(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::NoContent().finish())
}
