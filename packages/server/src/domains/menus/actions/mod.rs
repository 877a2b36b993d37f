//! Menu domain actions
//!
//! The pipeline for one URL is fetch -> reduce -> extract -> reconcile.
//! `scrape_batch` runs it for every URL in a request.

pub mod extract_menu;
pub mod reconcile;
pub mod reduce_content;
pub mod scrape_batch;

pub use extract_menu::{build_extraction_prompt, request_menu_extraction};
pub use reconcile::{reconcile, reconcile_at, validate_flat_response};
pub use reduce_content::{reduce_content, ReducedContent, MAX_MARKUP_CHARS, TRUNCATION_MARKER};
pub use scrape_batch::{scrape_batch, scrape_url};
