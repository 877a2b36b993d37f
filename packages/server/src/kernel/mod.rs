//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod gemini;
pub mod http_fetcher;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use gemini::GeminiAI;
pub use http_fetcher::{HttpPageFetcher, USER_AGENT};
pub use test_dependencies::{MockAI, MockAIResponse, MockPage, MockPageFetcher, TestDependencies};
pub use traits::*;
