// HTTP routes
pub mod fallback;
pub mod health;
pub mod scrape;

pub use fallback::*;
pub use health::*;
pub use scrape::*;
