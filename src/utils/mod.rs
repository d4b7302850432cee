pub mod clock;
pub mod filter_bar_record;
pub mod filter_menu_record;
pub mod filter_promotion_record;
pub mod filter_reservation_record;
pub mod filter_review_record;
pub mod filter_user_record;
pub mod uploads;

pub use self::clock::*;
pub use self::filter_bar_record::filter_bar_record;
pub use self::filter_menu_record::filter_menu_record;
pub use self::filter_promotion_record::*;
pub use self::filter_reservation_record::filter_reservation_record;
pub use self::filter_review_record::filter_review_record;
pub use self::filter_user_record::filter_user_record;
pub use self::uploads::UploadDir;
