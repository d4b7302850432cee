use actix_web::{
	cookie::{time::Duration as ActixWebDuration, Cookie},
	post, web, HttpResponse,
};
use serde_json::json;

use crate::{
	api::CustomError, jwt_auth::TOKEN_COOKIE, models::LoginUserSchema, utils::filter_user_record,
	AppState,
};

#[post("/auth/login")]
pub async fn login_handler(
	body: web::Json<LoginUserSchema>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let session = data.users.login(body.into_inner()).await?;

	let cookie = Cookie::build(TOKEN_COOKIE, session.access_token.to_owned())
		.path("/")
		.max_age(ActixWebDuration::new(60 * data.env.jwt_maxage, 0))
		.http_only(true)
		.finish();

	Ok(HttpResponse::Ok().cookie(cookie).json(json!({
		"status": "success",
		"data": json!({
			"accessToken": session.access_token,
			"user": filter_user_record(&session.user)
		})
	})))
}
