use std::sync::Arc;

use argon2::{
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
use rand_core::OsRng;
use uuid::Uuid;

use super::{require_length, require_text};
use crate::api::{CustomError, UserStore};
use crate::jwt_auth;
use crate::models::{
	Actor, LoginUserSchema, RegisterUserSchema, Role, UpdateUserSchema, User,
};
use crate::utils::{Clock, IdGenerator};

const BAD_CREDENTIALS: &str = "Invalid email or password";
const PASSWORD_MIN: usize = 6;
const NAME_MAX: usize = 50;

pub fn hash_password(password: &str) -> Result<String, CustomError> {
	let salt = SaltString::generate(&mut OsRng);
	Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| CustomError::Internal(format!("Error while hashing password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
	match PasswordHash::new(hash) {
		Ok(parsed) => Argon2::default()
			.verify_password(password.as_bytes(), &parsed)
			.is_ok(),
		Err(_) => false,
	}
}

fn normalize_email(email: &str) -> Result<String, CustomError> {
	let email = email.trim().to_lowercase();
	let valid = email
		.split_once('@')
		.map_or(false, |(local, domain)| !local.is_empty() && domain.contains('.'));
	if !valid {
		return Err(CustomError::bad_request("email must be a valid address"));
	}
	Ok(email)
}

fn validate_password(password: &str) -> Result<(), CustomError> {
	if password.chars().count() < PASSWORD_MIN {
		return Err(CustomError::bad_request(format!(
			"password must be at least {} characters",
			PASSWORD_MIN
		)));
	}
	Ok(())
}

fn validate_name(name: &str) -> Result<(), CustomError> {
	require_text(name, "name")?;
	require_length(name.trim(), "name", 1, NAME_MAX)
}

/// Issued credentials returned by a successful login.
#[derive(Debug, Clone)]
pub struct Session {
	pub access_token: String,
	pub user: User,
}

pub struct UserService {
	users: Arc<dyn UserStore>,
	clock: Arc<dyn Clock>,
	ids: Arc<dyn IdGenerator>,
	jwt_secret: String,
	jwt_maxage: i64,
}

impl UserService {
	pub fn new(
		users: Arc<dyn UserStore>,
		clock: Arc<dyn Clock>,
		ids: Arc<dyn IdGenerator>,
		jwt_secret: String,
		jwt_maxage: i64,
	) -> Self {
		UserService {
			users,
			clock,
			ids,
			jwt_secret,
			jwt_maxage,
		}
	}

	pub async fn register(&self, body: RegisterUserSchema) -> Result<User, CustomError> {
		let email = normalize_email(&body.email)?;
		validate_password(&body.password)?;
		validate_name(&body.name)?;

		let role = body.role.unwrap_or_default();
		if role == Role::Admin {
			return Err(CustomError::bad_request(
				"Administrator accounts cannot be self-registered",
			));
		}
		if self.users.find_user_by_email(&email).await?.is_some() {
			return Err(CustomError::conflict("This email is already registered"));
		}

		let now = self.clock.now();
		let user = User {
			id: self.ids.next_id(),
			email,
			password: hash_password(&body.password)?,
			name: body.name.trim().to_string(),
			phone: None,
			role,
			created_at: now,
			updated_at: now,
		};

		let user = self.users.insert_user(user).await?;
		log::info!("Registered user {} as {}", user.id, user.role);
		Ok(user)
	}

	pub async fn login(&self, body: LoginUserSchema) -> Result<Session, CustomError> {
		let email = body.email.trim().to_lowercase();
		let user = self
			.users
			.find_user_by_email(&email)
			.await?
			.ok_or_else(|| CustomError::unauthorized(BAD_CREDENTIALS))?;

		if !verify_password(&body.password, &user.password) {
			log::warn!("Failed login for {}", email);
			return Err(CustomError::unauthorized(BAD_CREDENTIALS));
		}

		let access_token = jwt_auth::encode_token(
			&user,
			self.clock.now(),
			self.jwt_maxage,
			&self.jwt_secret,
		)?;
		Ok(Session { access_token, user })
	}

	pub async fn me(&self, actor: &Actor) -> Result<User, CustomError> {
		self.find(actor.user_id).await
	}

	pub async fn list(&self, actor: &Actor) -> Result<Vec<User>, CustomError> {
		if !actor.is_admin() {
			return Err(CustomError::forbidden("Only administrators can list users"));
		}
		self.users.list_users().await
	}

	pub async fn get(&self, id: Uuid) -> Result<User, CustomError> {
		self.find(id).await
	}

	/// Name, phone and password only; email and role never change here.
	pub async fn update(
		&self,
		actor: &Actor,
		id: Uuid,
		patch: UpdateUserSchema,
	) -> Result<User, CustomError> {
		ensure_self_or_admin(actor, id)?;
		let mut user = self.find(id).await?;

		if let Some(name) = patch.name {
			validate_name(&name)?;
			user.name = name.trim().to_string();
		}
		if let Some(phone) = patch.phone {
			require_length(phone.trim(), "phone", 9, 15)?;
			user.phone = Some(phone.trim().to_string());
		}
		if let Some(password) = patch.password {
			validate_password(&password)?;
			user.password = hash_password(&password)?;
		}
		user.updated_at = self.clock.now();

		self.users.update_user(user).await
	}

	pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), CustomError> {
		ensure_self_or_admin(actor, id)?;
		if !self.users.delete_user(id).await? {
			return Err(CustomError::not_found(format!("User with id {} not found", id)));
		}
		log::info!("User {} deleted by {}", id, actor.user_id);
		Ok(())
	}

	async fn find(&self, id: Uuid) -> Result<User, CustomError> {
		self.users
			.find_user(id)
			.await?
			.ok_or_else(|| CustomError::not_found(format!("User with id {} not found", id)))
	}
}

fn ensure_self_or_admin(actor: &Actor, id: Uuid) -> Result<(), CustomError> {
	if actor.user_id != id && !actor.is_admin() {
		return Err(CustomError::forbidden(
			"You can only manage your own account",
		));
	}
	Ok(())
}
