use std::future::{ready, Ready};

use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{http, web, Error as ActixWebError, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::api::CustomError;
use crate::models::{Actor, Role, TokenClaims, User};
use crate::AppState;

pub const TOKEN_COOKIE: &str = "token";

pub fn encode_token(
	user: &User,
	now: DateTime<Utc>,
	maxage_minutes: i64,
	secret: &str,
) -> Result<String, CustomError> {
	let claims = TokenClaims {
		sub: user.id.to_string(),
		role: user.role,
		iat: now.timestamp() as usize,
		exp: (now + Duration::minutes(maxage_minutes)).timestamp() as usize,
	};

	encode(
		&Header::default(),
		&claims,
		&EncodingKey::from_secret(secret.as_ref()),
	)
	.map_err(|e| CustomError::Internal(format!("Could not sign token: {}", e)))
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims, CustomError> {
	decode::<TokenClaims>(
		token,
		&DecodingKey::from_secret(secret.as_ref()),
		&Validation::default(),
	)
	.map(|data| data.claims)
	.map_err(|_| CustomError::unauthorized("Invalid token"))
}

/// Token from the `token` cookie, falling back to an `Authorization: Bearer` header.
fn token_from(cookie: Option<String>, authorization: Option<&http::header::HeaderValue>) -> Option<String> {
	cookie.or_else(|| {
		authorization
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
			.map(|token| token.trim().to_string())
	})
}

fn actor_from_claims(claims: &TokenClaims) -> Result<Actor, CustomError> {
	let user_id = Uuid::parse_str(&claims.sub)
		.map_err(|_| CustomError::unauthorized("Invalid token"))?;
	Ok(Actor::new(user_id, claims.role))
}

/// Extractor for routes that need an authenticated actor.
pub struct JwtMiddleware {
	pub actor: Actor,
}

impl FromRequest for JwtMiddleware {
	type Error = ActixWebError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		let Some(data) = req.app_data::<web::Data<AppState>>() else {
			return ready(Err(
				CustomError::Internal("application state is not configured".to_string()).into(),
			));
		};

		let token = token_from(
			req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()),
			req.headers().get(http::header::AUTHORIZATION),
		);
		let Some(token) = token else {
			return ready(Err(CustomError::unauthorized(
				"You are not logged in, please provide token",
			)
			.into()));
		};

		let actor = match decode_token(&token, &data.env.jwt_secret)
			.and_then(|claims| actor_from_claims(&claims))
		{
			Ok(actor) => actor,
			Err(e) => return ready(Err(e.into())),
		};

		req.extensions_mut().insert::<Uuid>(actor.user_id);
		ready(Ok(JwtMiddleware { actor }))
	}
}

/// Role source for `GrantsMiddleware`. Requests without a valid token carry no roles.
pub async fn extract(req: &ServiceRequest) -> Result<Vec<Role>, ActixWebError> {
	let Some(data) = req.app_data::<web::Data<AppState>>() else {
		return Ok(Vec::new());
	};

	let token = token_from(
		req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()),
		req.headers().get(http::header::AUTHORIZATION),
	);

	Ok(token
		.and_then(|token| decode_token(&token, &data.env.jwt_secret).ok())
		.map(|claims| vec![claims.role])
		.unwrap_or_default())
}
