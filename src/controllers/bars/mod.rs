pub mod bars;

pub use self::bars::*;
