//! Comment rendering pipeline

use super::link::LinkProcessor;
use super::processor::{ContentProcessor, ProcessorChain};
use super::quote::QuoteParser;
use super::sanitizer::Sanitizer;
use crate::comment::Comment;
use crate::config::{EngineConfig, ProcessorKind};
use tracing::trace;

/// Renders raw comment bodies: sanitize, split quotes and paragraphs, run
/// the processors, then wrap everything in a single container element.
pub struct CommentFormatter {
    sanitizer: Sanitizer,
    quotes: QuoteParser,
    chain: ProcessorChain,
    container_tag: String,
}

impl CommentFormatter {
    pub fn new(sanitizer: Sanitizer, quotes: QuoteParser, chain: ProcessorChain) -> Self {
        Self {
            sanitizer,
            quotes,
            chain,
            container_tag: "div".to_string(),
        }
    }

    /// Replace the wrapping element
    pub fn with_container(mut self, tag: impl Into<String>) -> Self {
        self.container_tag = tag.into();
        self
    }

    /// Build the pipeline described by the configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        let formatting = &config.formatting;
        let mut chain = ProcessorChain::new();
        for kind in &formatting.processors {
            match kind {
                ProcessorKind::Link => chain.register(Box::new(LinkProcessor::new(&formatting.link))),
            }
        }

        Self::new(
            Sanitizer::from_config(&config.sanitizer),
            QuoteParser::new(formatting.quote_class.clone()),
            chain,
        )
        .with_container(formatting.container_tag.clone())
    }

    /// Append a processor after the configured ones
    pub fn register(&mut self, processor: Box<dyn ContentProcessor>) {
        self.chain.register(processor);
    }

    /// Render a raw body to markup. Never fails.
    pub fn format(&self, raw: &str) -> String {
        let sanitized = self.sanitizer.sanitize(raw);
        let blocks = self.quotes.render(&sanitized);
        let processed = self.chain.apply(&blocks);
        trace!(
            raw_len = raw.len(),
            rendered_len = processed.len(),
            "Formatted comment body"
        );
        format!("<{tag}>{}</{tag}>", processed, tag = self.container_tag)
    }

    /// Render a stored comment's body
    pub fn format_comment(&self, comment: &Comment) -> String {
        self.format(&comment.body)
    }

    pub fn processor_names(&self) -> Vec<&str> {
        self.chain.names()
    }
}

impl Default for CommentFormatter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
