use serde::{Deserialize, Serialize};

use super::MenuResult;

/// Body of `POST /`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
}

/// Outcome for one requested URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MenuResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn succeeded(url: impl Into<String>, data: MenuResult) -> Self {
        Self {
            url: url.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Results in the same order as the request's `urls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub results: Vec<ScrapeResult>,
}
