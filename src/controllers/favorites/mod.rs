pub mod favorites;

pub use self::favorites::*;
