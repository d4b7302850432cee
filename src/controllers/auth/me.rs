use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{api::CustomError, jwt_auth::JwtMiddleware, utils::filter_user_record, AppState};

#[get("/users/me")]
pub async fn get_me_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let user = data.users.me(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"user": filter_user_record(&user)
		})
	})))
}
