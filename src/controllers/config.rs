use actix_web::{error, web};

use crate::api::CustomError;

use crate::controllers::auth::{get_me_handler, login_handler, logout_handler, register_handler};
use crate::controllers::bars::*;
use crate::controllers::favorites::*;
use crate::controllers::menus::*;
use crate::controllers::promotions::*;
use crate::controllers::reservations::*;
use crate::controllers::reviews::*;
use crate::controllers::users::*;

// Literal segments are registered before `{id}` so they are not swallowed by it.
pub fn config(conf: &mut web::ServiceConfig) {
	let json_config = web::JsonConfig::default().error_handler(|err, _| {
		error::Error::from(CustomError::bad_request(err.to_string()))
	});
	let query_config = web::QueryConfig::default().error_handler(|err, _| {
		error::Error::from(CustomError::bad_request(err.to_string()))
	});

	let scope = web::scope("/api")
		.app_data(json_config)
		.app_data(query_config)
		.service(register_handler)
		.service(login_handler)
		.service(logout_handler)
		.service(get_me_handler)
		.service(get_users_handler)
		.service(get_user_handler)
		.service(update_user_handler)
		.service(delete_user_handler)
		.service(create_bar_handler)
		.service(get_bars_handler)
		.service(get_my_bars_handler)
		.service(get_bar_handler)
		.service(update_bar_handler)
		.service(delete_bar_handler)
		.service(create_reservation_handler)
		.service(get_my_reservations_handler)
		.service(get_owner_reservations_handler)
		.service(get_reservation_handler)
		.service(update_reservation_handler)
		.service(cancel_reservation_handler)
		.service(confirm_reservation_handler)
		.service(complete_reservation_handler)
		.service(delete_reservation_handler)
		.service(create_review_handler)
		.service(get_bar_reviews_handler)
		.service(get_bar_review_stats_handler)
		.service(get_my_reviews_handler)
		.service(get_my_bars_reviews_handler)
		.service(get_review_handler)
		.service(update_review_handler)
		.service(delete_review_handler)
		.service(respond_review_handler)
		.service(review_visibility_handler)
		.service(create_promotion_handler)
		.service(get_promotions_handler)
		.service(get_active_promotions_handler)
		.service(get_featured_promotions_handler)
		.service(get_my_promotions_handler)
		.service(get_bar_promotions_handler)
		.service(get_promotion_handler)
		.service(update_promotion_handler)
		.service(delete_promotion_handler)
		.service(delete_promotion_photo_handler)
		.service(create_menu_handler)
		.service(get_menus_handler)
		.service(get_my_menus_handler)
		.service(get_bar_menus_handler)
		.service(get_menu_handler)
		.service(update_menu_handler)
		.service(delete_menu_handler)
		.service(delete_menu_photo_handler)
		.service(add_favorite_handler)
		.service(remove_favorite_handler)
		.service(get_favorites_handler);

	conf.service(scope);
}
