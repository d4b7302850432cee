pub mod auth;
pub mod bars;
pub mod config;
pub mod favorites;
pub mod menus;
pub mod promotions;
pub mod reservations;
pub mod reviews;
pub mod users;

pub use self::config::config;
