pub mod menus;

pub use self::menus::*;
