//! Typed errors for the menu extraction pipeline.
//!
//! Each stage has its own error type; `PipelineError` wraps them so a unit of
//! work can use `?` across stages and report one message per URL.

use std::fmt;

use thiserror::Error;

/// Page fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Not an absolute http(s) URL
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request exceeded the fetch timeout
    #[error("timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },

    /// Connection or transport failure
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Non-success HTTP status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::Status { url, .. } => url,
        }
    }
}

/// Embedded structured data could not be used. Recoverable: the reducer falls
/// back to the markup path.
#[derive(Debug, Error)]
pub enum ReductionError {
    #[error("invalid application/ld+json block: {0}")]
    InvalidStructuredData(#[from] serde_json::Error),
}

/// Model invocation failed.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// No model credential configured
    #[error("GEMINI_API_KEY not found in configuration")]
    MissingCredential,

    /// Model call exceeded its timeout
    #[error("model request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Transport or API error from the model service
    #[error("model API error: {0}")]
    Remote(String),

    /// The call succeeded but produced no text
    #[error("no response from model")]
    EmptyResponse,
}

/// Model output was not JSON.
#[derive(Debug, Error)]
#[error("failed to parse model response: {source}")]
pub struct MalformedResponseError {
    #[from]
    pub source: serde_json::Error,
}

/// One schema violation in the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// JSON path, e.g. `items[2].price`
    pub path: String,
    pub problem: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// Model output was JSON but did not match the flat schema.
#[derive(Debug, Error)]
pub struct SchemaValidationError {
    pub violations: Vec<FieldViolation>,
}

impl SchemaValidationError {
    /// True if any violation is on a field with this name (last path segment).
    pub fn names_field(&self, field: &str) -> bool {
        let suffix = format!(".{}", field);
        self.violations
            .iter()
            .any(|v| v.path == field || v.path.ends_with(&suffix))
    }
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("model response failed schema validation: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

/// Any failure inside one URL's unit of work.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),

    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),
}

impl PipelineError {
    /// Stage label used in logs.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Extraction(_) => "extraction",
            PipelineError::MalformedResponse(_) | PipelineError::SchemaValidation(_) => {
                "reconciliation"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_all_violations() {
        let err = SchemaValidationError {
            violations: vec![
                FieldViolation::new("items[0].price", "missing required field"),
                FieldViolation::new("items[1].currency", "expected string"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "model response failed schema validation: items[0].price: missing required field; items[1].currency: expected string"
        );
        assert!(err.names_field("price"));
        assert!(err.names_field("currency"));
        assert!(!err.names_field("name"));
    }

    #[test]
    fn pipeline_error_is_transparent() {
        let err: PipelineError = FetchError::Status {
            url: "https://example.com".into(),
            status: 404,
        }
        .into();

        assert_eq!(err.to_string(), "HTTP 404 fetching https://example.com");
        assert_eq!(err.stage(), "fetch");
    }
}
