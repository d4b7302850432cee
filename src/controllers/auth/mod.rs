pub mod login;
pub mod logout;
pub mod me;
pub mod register;

pub use self::login::login_handler;
pub use self::logout::logout_handler;
pub use self::me::get_me_handler;
pub use self::register::register_handler;
