use actix_web::{
	delete, get, patch, post, put,
	web::{self, Path},
	HttpResponse,
};
use actix_web_grants::proc_macro::has_any_role;
use serde_json::json;
use uuid::Uuid;

use crate::{
	api::CustomError,
	jwt_auth::JwtMiddleware,
	models::{
		CreateReviewSchema, FilteredReview, OwnerResponseSchema, Review, ReviewVisibilitySchema,
		Role, UpdateReviewSchema,
	},
	utils::filter_review_record,
	AppState,
};

fn review_response(review: &Review) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"review": filter_review_record(review)
		})
	})
}

fn reviews_response(reviews: &[Review]) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"reviews": reviews.iter().map(filter_review_record).collect::<Vec<FilteredReview>>(),
			"reviews_count": reviews.len()
		})
	})
}

#[post("/reviews")]
pub async fn create_review_handler(
	body: web::Json<CreateReviewSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let review = data.reviews.create(&auth.actor, body.into_inner()).await?;

	Ok(HttpResponse::Created().json(review_response(&review)))
}

#[get("/reviews/bar/{bar_id}")]
pub async fn get_bar_reviews_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let reviews = data.reviews.list_by_bar(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(reviews_response(&reviews)))
}

#[get("/reviews/bar/{bar_id}/stats")]
pub async fn get_bar_review_stats_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let stats = data.reviews.stats(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": stats
	})))
}

#[get("/reviews/my-reviews")]
pub async fn get_my_reviews_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reviews = data.reviews.list_mine(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(reviews_response(&reviews)))
}

#[get("/reviews/my-bars")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn get_my_bars_reviews_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reviews = data.reviews.list_for_owner(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(reviews_response(&reviews)))
}

#[get("/reviews/{id}")]
pub async fn get_review_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let review = data.reviews.get(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(review_response(&review)))
}

#[put("/reviews/{id}")]
pub async fn update_review_handler(
	path: Path<Uuid>,
	body: web::Json<UpdateReviewSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let review = data
		.reviews
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(review_response(&review)))
}

#[delete("/reviews/{id}")]
pub async fn delete_review_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.reviews.delete(&auth.actor, path.into_inner()).await?;

	Ok(HttpResponse::NoContent().finish())
}

#[post("/reviews/{id}/response")]
#[has_any_role("Role::Owner", type = "Role")]
pub async fn respond_review_handler(
	path: Path<Uuid>,
	body: web::Json<OwnerResponseSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let review = data
		.reviews
		.respond(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(review_response(&review)))
}

#[patch("/reviews/{id}/visibility")]
#[has_any_role("Role::Admin", type = "Role")]
pub async fn review_visibility_handler(
	path: Path<Uuid>,
	body: web::Json<ReviewVisibilitySchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let review = data
		.reviews
		.set_visibility(&auth.actor, path.into_inner(), body.is_visible)
		.await?;

	Ok(HttpResponse::Ok().json(review_response(&review)))
}
