//! Server dependencies (using traits for testability)
//!
//! Built once at startup and shared read-only by every request and every
//! per-URL unit of work.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::kernel::{BaseAI, BasePageFetcher, GeminiAI, HttpPageFetcher};

#[derive(Clone)]
pub struct ServerDeps {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn BasePageFetcher>,
    pub ai: Arc<dyn BaseAI>,
}

impl ServerDeps {
    pub fn new(
        config: Arc<Config>,
        fetcher: Arc<dyn BasePageFetcher>,
        ai: Arc<dyn BaseAI>,
    ) -> Self {
        Self { config, fetcher, ai }
    }

    /// Real HTTP fetcher and Gemini client from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = Arc::new(HttpPageFetcher::new(config.fetch_timeout)?);
        let ai = Arc::new(GeminiAI::from_config(&config));
        Ok(Self::new(Arc::new(config), fetcher, ai))
    }
}
