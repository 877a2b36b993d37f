// Restaurant Menu Scraper - API Core
//
// Fetches restaurant pages, asks Gemini for a flat menu listing and rebuilds
// it into menus, sections and items. One HTTP endpoint takes a batch of URLs.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
