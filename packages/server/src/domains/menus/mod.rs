//! Menus domain - turn restaurant pages into structured menus.

pub mod actions;
pub mod models;
pub mod prompts;

pub use actions::{scrape_batch, scrape_url};
pub use models::*;
