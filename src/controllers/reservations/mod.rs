pub mod reservations;

pub use self::reservations::*;
