pub mod bars;
pub mod menus;
pub mod promotions;
pub mod reservations;
pub mod reviews;
pub mod users;

pub use self::bars::*;
pub use self::menus::*;
pub use self::promotions::*;
pub use self::reservations::*;
pub use self::reviews::*;
pub use self::users::*;
