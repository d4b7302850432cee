use actix_web::{post, web, HttpResponse};
use serde_json::json;

use crate::{api::CustomError, models::RegisterUserSchema, utils::filter_user_record, AppState};

#[post("/auth/register")]
pub async fn register_handler(
	body: web::Json<RegisterUserSchema>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let user = data.users.register(body.into_inner()).await?;

	Ok(HttpResponse::Created().json(json!({
		"status": "success",
		"data": json!({
			"user": filter_user_record(&user)
		})
	})))
}
