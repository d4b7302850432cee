pub mod promotions;

pub use self::promotions::*;
