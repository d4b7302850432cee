pub mod api;
pub mod config;
pub mod controllers;
pub mod jwt_auth;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use self::state::AppState;
