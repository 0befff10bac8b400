//! Content processor trait and chain

use super::sanitizer::TAG_RE;
use crate::error::Result;
use tracing::warn;

/// Trait for markup enrichment steps run after sanitization.
///
/// A processor only replaces the substrings it recognizes and must escape any
/// user text it re-emits; all other markup passes through byte-identical.
pub trait ContentProcessor: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Transform the markup
    fn apply(&self, markup: &str) -> Result<String>;
}

/// Ordered list of processors
#[derive(Default)]
pub struct ProcessorChain {
    processors: Vec<Box<dyn ContentProcessor>>,
}

impl ProcessorChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor; processors run in registration order
    pub fn register(&mut self, processor: Box<dyn ContentProcessor>) {
        self.processors.push(processor);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, processor: impl ContentProcessor + 'static) -> Self {
        self.register(Box::new(processor));
        self
    }

    /// Run every processor in order. A failing processor is skipped: its
    /// input flows unchanged to the next one.
    pub fn apply(&self, markup: &str) -> String {
        let mut current = markup.to_string();
        for processor in &self.processors {
            match processor.apply(&current) {
                Ok(next) => current = next,
                Err(e) => {
                    warn!(processor = processor.name(), "Content processor failed, skipping: {}", e);
                }
            }
        }
        current
    }

    /// Names of the registered processors, in order
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

/// Apply `rewrite` to text outside tags, leaving tags and anchor contents intact
pub fn rewrite_text(markup: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut output = String::with_capacity(markup.len());
    let mut anchor_depth = 0usize;
    let mut last = 0;

    for caps in TAG_RE.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        push_segment(&markup[last..whole.start()], anchor_depth, &mut rewrite, &mut output);
        output.push_str(whole.as_str());

        if caps[2].eq_ignore_ascii_case("a") {
            if caps[1].is_empty() {
                anchor_depth += 1;
            } else {
                anchor_depth = anchor_depth.saturating_sub(1);
            }
        }
        last = whole.end();
    }
    push_segment(&markup[last..], anchor_depth, &mut rewrite, &mut output);
    output
}

fn push_segment(
    text: &str,
    anchor_depth: usize,
    rewrite: &mut impl FnMut(&str) -> String,
    output: &mut String,
) {
    if text.is_empty() {
        return;
    }
    if anchor_depth == 0 {
        output.push_str(&rewrite(text));
    } else {
        output.push_str(text);
    }
}
