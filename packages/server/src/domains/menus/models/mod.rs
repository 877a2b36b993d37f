pub mod flat;
pub mod menu;
pub mod scrape;

pub use flat::*;
pub use menu::*;
pub use scrape::*;
