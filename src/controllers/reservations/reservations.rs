use actix_web::{
	delete, get, patch, post,
	web::{self, Path},
	HttpResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
	api::CustomError,
	jwt_auth::JwtMiddleware,
	models::{
		CreateReservationSchema, FilteredReservation, Reservation, UpdateReservationSchema,
	},
	utils::filter_reservation_record,
	AppState,
};

fn reservation_response(reservation: &Reservation) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"reservation": filter_reservation_record(reservation)
		})
	})
}

fn reservations_response(reservations: &[Reservation]) -> serde_json::Value {
	json!({
		"status": "success",
		"data": json!({
			"reservations": reservations
				.iter()
				.map(filter_reservation_record)
				.collect::<Vec<FilteredReservation>>(),
			"reservations_count": reservations.len()
		})
	})
}

#[post("/reservations")]
pub async fn create_reservation_handler(
	body: web::Json<CreateReservationSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.create(&auth.actor, body.into_inner())
		.await?;

	Ok(HttpResponse::Created().json(reservation_response(&reservation)))
}

#[get("/reservations/my-reservations")]
pub async fn get_my_reservations_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservations = data.reservations.list_mine(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(reservations_response(&reservations)))
}

#[get("/reservations/owner-reservations")]
pub async fn get_owner_reservations_handler(
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservations = data.reservations.list_for_owner(&auth.actor).await?;

	Ok(HttpResponse::Ok().json(reservations_response(&reservations)))
}

#[get("/reservations/{id}")]
pub async fn get_reservation_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.get(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(reservation_response(&reservation)))
}

#[patch("/reservations/{id}")]
pub async fn update_reservation_handler(
	path: Path<Uuid>,
	body: web::Json<UpdateReservationSchema>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.update(&auth.actor, path.into_inner(), body.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(reservation_response(&reservation)))
}

#[patch("/reservations/{id}/cancel")]
pub async fn cancel_reservation_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.cancel(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(reservation_response(&reservation)))
}

#[patch("/reservations/{id}/confirm")]
pub async fn confirm_reservation_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.confirm(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(reservation_response(&reservation)))
}

#[patch("/reservations/{id}/complete")]
pub async fn complete_reservation_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	let reservation = data
		.reservations
		.complete(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::Ok().json(reservation_response(&reservation)))
}

#[delete("/reservations/{id}")]
pub async fn delete_reservation_handler(
	path: Path<Uuid>,
	data: web::Data<AppState>,
	auth: JwtMiddleware,
) -> Result<HttpResponse, CustomError> {
	data.reservations
		.delete(&auth.actor, path.into_inner())
		.await?;

	Ok(HttpResponse::NoContent().finish())
}
