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
	models::{
		CreatePromotionSchema, FilteredListedPromotion, FilteredPromotion, Promotion,
		PromotionFilterOptions, Role, UpdatePromotionSchema,
	},
	utils::{
		filter_active_promotion_record, filter_promotion_record, filter_ranked_promotion_record,
	},
	AppState,
};

fn promotion_response(promotion: &Promotion) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"promotion": filter_promotion_record(promotion)
		})
	})
}

fn promotions_response(promotions: &[Promotion]) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"promotions": promotions
				.iter()
				.map(filter_promotion_record)
				.collect::<Vec<FilteredPromotion>>(),
			"promotions_count": promotions.len()
		})
	})
}

#[post("/promotions")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn create_promotion_handler(
	body: web::Json<CreatePromotionSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let promotion = data
		.promotions
		.create(&auth.actor, body.into_inner())
		.await?;

	Ok(HttpResponse::Created().json(promotion_response(&promotion)))
}

#[get("/promotions")]
pub async fn get_promotions_handler(
	opts: web::Query<PromotionFilterOptions>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let promotions = data.promotions.list(opts.bar_id).await?;

	Ok(HttpResponse::Ok().json(promotions_response(&promotions)))
}

#[get("/promotions/active")]
pub async fn get_active_promotions_handler(
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let active = data.promotions.active().await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"promotions": active
				.iter()
				.map(filter_active_promotion_record)
				.collect::<Vec<FilteredListedPromotion>>(),
			"promotions_count": active.len()
		})
	})))
}

#[get("/promotions/featured")]
pub async fn get_featured_promotions_handler(
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let featured = data.promotions.featured().await?;

	Ok(HttpResponse::Ok().json(json!({
		"status": "success",
		"data": json!({
			"promotions": featured
				.iter()
				.map(filter_ranked_promotion_record)
				.collect::<Vec<FilteredListedPromotion>>(),
			"promotions_count": featured.len()
		})
	})))
}

#[get("/promotions/my-promotions")]
#[has_any_role("Role::Owner", "Role::Admin", type = "Role")]
pub async fn get_my_promotions_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let promotions = data.promotions.list_mine(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(promotions_response(&promotions)))
}

#[get("/promotions/bar/{bar_id}")]
pub async fn get_bar_promotions_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let promotions = data.promotions.list(Some(path.into_inner())).await?;

	Ok(HttpResponse::Ok().json(promotions_response(&promotions)))
}

#[get("/promotions/{id}")]
pub async fn get_promotion_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
	let promotion = data.promotions.get(path.into_inner()).await?;

	Ok(HttpResponse::Ok().json(promotion_response(&promotion)))
}

#[put("/promotions/{id}")]
pub async fn update_promotion_handler(
	path: Path<Uuid>,
	body: web::Json<UpdatePromotionSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let promotion = data
		.promotions
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(promotion_response(&promotion)))
}

#[delete("/promotions/{id}")]
pub async fn delete_promotion_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.promotions
		.delete(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::NoContent().finish())
}

#[delete("/promotions/{id}/photo")]
pub async fn delete_promotion_photo_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let promotion = data
		.promotions
		.remove_photo(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(promotion_response(&promotion)))
}
