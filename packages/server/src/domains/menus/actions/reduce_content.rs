//! Reduce a raw page to something the model can read within its token budget.
//!
//! Noise elements and comments are removed from the parsed tree. If the page
//! embeds valid JSON-LD, that wins outright; otherwise the body markup is
//! bounded to `MAX_MARKUP_CHARS` characters.

use lazy_static::lazy_static;
use scraper::{Html, Node, Selector};
use tracing::{debug, warn};

use crate::common::ReductionError;

/// Ceiling for markup sent to the model (~7500 tokens).
pub const MAX_MARKUP_CHARS: usize = 30_000;

/// Appended to markup that hit the ceiling.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Elements that never carry menu content.
const NOISE_ELEMENTS: &[&str] = &["style", "noscript", "svg", "canvas", "script"];

lazy_static! {
    static ref LD_JSON_SELECTOR: Selector =
        Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    static ref BODY_SELECTOR: Selector = Selector::parse("body").unwrap();
}

/// Page content ready for the extraction prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducedContent {
    /// Parsed JSON-LD block
    Structured { payload: serde_json::Value },
    /// Cleaned body markup, bounded in size
    Markup { content: String, truncated: bool },
}

impl ReducedContent {
    pub fn is_truncated(&self) -> bool {
        matches!(self, ReducedContent::Markup { truncated: true, .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReducedContent::Structured { .. } => "structured",
            ReducedContent::Markup { .. } => "markup",
        }
    }
}

pub fn reduce_content(html: &str) -> ReducedContent {
    let mut document = Html::parse_document(html);

    // Script bodies are removed with the noise, so read JSON-LD first
    let structured_blocks: Vec<String> = document
        .select(&LD_JSON_SELECTOR)
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect();

    strip_noise(&mut document);

    for (index, block) in structured_blocks.iter().enumerate() {
        match parse_structured_block(block) {
            Ok(payload) => {
                debug!(block = index, "Using ld+json block");
                return ReducedContent::Structured { payload };
            }
            Err(e) => warn!(block = index, error = %e, "Ignoring ld+json block"),
        }
    }

    if structured_blocks.is_empty() {
        debug!("No ld+json found");
    }

    let markup = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_else(|| document.root_element().html());

    bound_markup(markup)
}

fn parse_structured_block(block: &str) -> Result<serde_json::Value, ReductionError> {
    Ok(serde_json::from_str(block.trim())?)
}

/// Detach comment nodes and noise elements from the tree.
fn strip_noise(document: &mut Html) {
    let doomed: Vec<_> = document
        .tree
        .nodes()
        .filter(|node| match node.value() {
            Node::Comment(_) => true,
            Node::Element(element) => NOISE_ELEMENTS.contains(&element.name()),
            _ => false,
        })
        .map(|node| node.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn bound_markup(markup: String) -> ReducedContent {
    let content_len = markup.chars().count();
    debug!(content_len, "Cleaned body markup");

    if content_len <= MAX_MARKUP_CHARS {
        return ReducedContent::Markup {
            content: markup,
            truncated: false,
        };
    }

    let keep = MAX_MARKUP_CHARS - TRUNCATION_MARKER.chars().count();
    let mut content: String = markup.chars().take(keep).collect();
    content.push_str(TRUNCATION_MARKER);

    ReducedContent::Markup {
        content,
        truncated: true,
    }
}
