use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use actix_web_grants::GrantsMiddleware;
use serde_json::{json, Value};

use bars_api::config::Config;
use bars_api::jwt_auth::extract;
use bars_api::models::{LoginUserSchema, RegisterUserSchema, Role};
use bars_api::{controllers, AppState};

fn test_config() -> Config {
	Config {
		database_url: String::new(),
		database_max_connections: 1,
		jwt_secret: "integration-secret".to_string(),
		jwt_maxage: 60,
		host: "127.0.0.1".to_string(),
		port: 0,
		uploads_dir: std::env::temp_dir(),
	}
}

macro_rules! test_app {
	($state:expr) => {
		test::init_service(
			App::new()
				.app_data($state.clone())
				.configure(controllers::config)
				.wrap(GrantsMiddleware::with_extractor(extract)),
		)
		.await
	};
}

/// Registers and logs in directly through the services, returning a bearer header value.
async fn bearer(state: &AppState, email: &str, role: Role) -> String {
	state
		.users
		.register(RegisterUserSchema {
			email: email.to_string(),
			password: "password123".to_string(),
			name: "Tester".to_string(),
			role: Some(role),
		})
		.await
		.unwrap();
	let session = state
		.users
		.login(LoginUserSchema {
			email: email.to_string(),
			password: "password123".to_string(),
		})
		.await
		.unwrap();

	format!("Bearer {}", session.access_token)
}

#[actix_web::test]
async fn register_login_and_me() {
	let state = web::Data::new(AppState::in_memory(test_config()));
	let app = test_app!(state);

	let req = test::TestRequest::post()
		.uri("/api/auth/register")
		.set_json(json!({"email": "ana@bars.test", "password": "secret1", "name": "Ana"}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::CREATED);

	let req = test::TestRequest::post()
		.uri("/api/auth/register")
		.set_json(json!({"email": "ana@bars.test", "password": "secret1", "name": "Ana"}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);

	let req = test::TestRequest::post()
		.uri("/api/auth/login")
		.set_json(json!({"email": "ana@bars.test", "password": "secret1"}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["status"], "success");
	let token = body["data"]["accessToken"].as_str().unwrap().to_string();

	let req = test::TestRequest::get()
		.uri("/api/users/me")
		.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["user"]["email"], "ana@bars.test");
	assert_eq!(body["data"]["user"]["role"], "client");
}

#[actix_web::test]
async fn protected_routes_need_a_token_and_a_role() {
	let state = web::Data::new(AppState::in_memory(test_config()));
	let client = bearer(&state, "client@bars.test", Role::Client).await;
	let app = test_app!(state);

	let req = test::TestRequest::get()
		.uri("/api/reservations/my-reservations")
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

	let req = test::TestRequest::post()
		.uri("/api/bars")
		.insert_header((header::AUTHORIZATION, client))
		.set_json(json!({"nameBar": "Sneaky", "location": "Nowhere"}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn reservation_lifecycle_over_http() {
	let state = web::Data::new(AppState::in_memory(test_config()));
	let owner = bearer(&state, "owner@bars.test", Role::Owner).await;
	let client = bearer(&state, "client@bars.test", Role::Client).await;
	let app = test_app!(state);

	let req = test::TestRequest::post()
		.uri("/api/bars")
		.insert_header((header::AUTHORIZATION, owner.clone()))
		.set_json(json!({"nameBar": "La Taberna", "location": "Calle Mayor 1"}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	let bar_id = body["data"]["bar"]["id"].as_str().unwrap().to_string();

	let req = test::TestRequest::post()
		.uri("/api/reservations")
		.insert_header((header::AUTHORIZATION, client.clone()))
		.set_json(json!({
			"barId": bar_id,
			"reservationDate": "2030-06-01T20:00:00Z",
			"numberOfPeople": 4,
			"customerName": "Ana",
			"customerPhone": "600111222"
		}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["reservation"]["status"], "pending");
	let id = body["data"]["reservation"]["id"].as_str().unwrap().to_string();

	let req = test::TestRequest::patch()
		.uri(&format!("/api/reservations/{}/confirm", id))
		.insert_header((header::AUTHORIZATION, client.clone()))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);

	for step in ["confirm", "complete"] {
		let req = test::TestRequest::patch()
			.uri(&format!("/api/reservations/{}/{}", id, step))
			.insert_header((header::AUTHORIZATION, owner.clone()))
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
	}

	let req = test::TestRequest::patch()
		.uri(&format!("/api/reservations/{}/cancel", id))
		.insert_header((header::AUTHORIZATION, client.clone()))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["status"], "fail");

	let req = test::TestRequest::get()
		.uri("/api/reservations/owner-reservations")
		.insert_header((header::AUTHORIZATION, owner))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["reservations_count"], 1);
	assert_eq!(body["data"]["reservations"][0]["status"], "completed");
}

#[actix_web::test]
async fn reviews_drive_the_bar_rating() {
	let state = web::Data::new(AppState::in_memory(test_config()));
	let owner = bearer(&state, "owner@bars.test", Role::Owner).await;
	let first = bearer(&state, "first@bars.test", Role::Client).await;
	let second = bearer(&state, "second@bars.test", Role::Client).await;
	let app = test_app!(state);

	let req = test::TestRequest::post()
		.uri("/api/bars")
		.insert_header((header::AUTHORIZATION, owner.clone()))
		.set_json(json!({"nameBar": "El Rincón", "location": "Plaza 2"}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	let bar_id = body["data"]["bar"]["id"].as_str().unwrap().to_string();

	for (token, rating) in [(&first, 4), (&second, 5)] {
		let req = test::TestRequest::post()
			.uri("/api/reviews")
			.insert_header((header::AUTHORIZATION, token.clone()))
			.set_json(json!({"barId": bar_id, "rating": rating, "comment": "Lovely place to spend an evening"}))
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::CREATED);
	}

	let req = test::TestRequest::post()
		.uri("/api/reviews")
		.insert_header((header::AUTHORIZATION, first))
		.set_json(json!({"barId": bar_id, "rating": 1, "comment": "Changed my mind about it"}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);

	let req = test::TestRequest::post()
		.uri("/api/reviews")
		.insert_header((header::AUTHORIZATION, owner))
		.set_json(json!({"barId": bar_id, "rating": 5, "comment": "Best bar in town, trust me"}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

	let req = test::TestRequest::get()
		.uri(&format!("/api/bars/{}", bar_id))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["bar"]["averageRating"], 4.5);
	assert_eq!(body["data"]["bar"]["totalReviews"], 2);

	let req = test::TestRequest::get()
		.uri(&format!("/api/reviews/bar/{}/stats", bar_id))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["totalReviews"], 2);
	assert_eq!(body["data"]["ratingDistribution"]["5"], 1);
}

#[actix_web::test]
async fn featured_promotions_carry_a_score() {
	let state = web::Data::new(AppState::in_memory(test_config()));
	let owner = bearer(&state, "owner@bars.test", Role::Owner).await;
	let app = test_app!(state);

	let req = test::TestRequest::post()
		.uri("/api/bars")
		.insert_header((header::AUTHORIZATION, owner.clone()))
		.set_json(json!({"nameBar": "Cervecería Sur", "location": "Avenida 9"}))
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	let bar_id = body["data"]["bar"]["id"].as_str().unwrap().to_string();

	let req = test::TestRequest::post()
		.uri("/api/promotions")
		.insert_header((header::AUTHORIZATION, owner.clone()))
		.set_json(json!({
			"title": "Happy hour",
			"barId": bar_id,
			"discountPercentage": 50.0,
			"validFrom": "2020-01-01T00:00:00Z",
			"validUntil": "2099-01-01T00:00:00Z"
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::CREATED);

	let req = test::TestRequest::post()
		.uri("/api/promotions")
		.insert_header((header::AUTHORIZATION, owner))
		.set_json(json!({
			"title": "Backwards",
			"barId": bar_id,
			"validFrom": "2099-01-01T00:00:00Z",
			"validUntil": "2020-01-01T00:00:00Z"
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

	let req = test::TestRequest::get()
		.uri("/api/promotions/featured")
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["promotions_count"], 1);
	let promotion = &body["data"]["promotions"][0];
	assert_eq!(promotion["title"], "Happy hour");
	assert_eq!(promotion["barName"], "Cervecería Sur");
	assert!(promotion["score"].as_f64().unwrap() >= 20.0);

	let req = test::TestRequest::get()
		.uri("/api/promotions/active")
		.to_request();
	let body: Value = test::call_and_read_body_json(&app, req).await;
	assert_eq!(body["data"]["promotions_count"], 1);
}
