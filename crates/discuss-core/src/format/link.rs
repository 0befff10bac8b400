//! Bare URL to anchor rewriting

use super::processor::{rewrite_text, ContentProcessor};
use super::sanitizer::escape_attribute;
use crate::config::LinkConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

/// http(s) URL in sanitized text; `&` only as the `&amp;` entity
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bhttps?://(?:[^\s<>"'&]|&amp;)+"#).unwrap());

/// Characters that end a sentence rather than a URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\''];

/// Turns bare URLs into anchors opening in a new window without referrer trust
#[derive(Debug, Clone)]
pub struct LinkProcessor {
    target: String,
    rel: String,
}

impl LinkProcessor {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            target: escape_attribute(&config.target),
            rel: escape_attribute(&config.rel),
        }
    }

    fn linkify(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for m in URL_RE.find_iter(text) {
            let url = trim_url(m.as_str());
            output.push_str(&text[last..m.start()]);
            output.push_str(&format!(
                "<a href=\"{url}\" target=\"{}\" rel=\"{}\">{url}</a>",
                self.target, self.rel
            ));
            last = m.start() + url.len();
        }
        output.push_str(&text[last..]);
        output
    }
}

impl Default for LinkProcessor {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl ContentProcessor for LinkProcessor {
    fn name(&self) -> &str {
        "link"
    }

    fn apply(&self, markup: &str) -> Result<String> {
        Ok(rewrite_text(markup, |text| self.linkify(text)))
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        let Some(last) = candidate.chars().last() else { break };
        let unbalanced_paren =
            last == ')' && candidate.matches(')').count() > candidate.matches('(').count();
        if TRAILING_PUNCTUATION.contains(&last) || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    &url[..end]
}
