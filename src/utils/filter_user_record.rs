use crate::models::{FilteredUser, User};

pub fn filter_user_record(user: &User) -> FilteredUser {
	FilteredUser {
		id: user.id.to_string(),
		email: user.email.to_owned(),
		name: user.name.to_owned(),
		phone: user.phone.to_owned(),
		role: user.role,
		created_at: user.created_at,
		updated_at: user.updated_at,
	}
}
