//! User input sanitization
//!
//! Strips every tag that is not allow-listed and every attribute that is not
//! allow-listed, escapes stray `<` and bare `&`, and keeps existing entities
//! so that sanitizing twice gives the same result. `>` is left alone: the
//! quote parser runs afterwards and needs the line-leading markers.

use crate::config::SanitizerConfig;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

/// An opening, closing or self-closing tag
pub(crate) static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^<>]*)>").unwrap());

/// HTML comments, including an unterminated one running to the end
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());

/// Elements removed together with their content
static RAW_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?(?:</(?:script|style)\s*>|$)").unwrap()
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(?:[a-zA-Z][a-zA-Z0-9]*|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap());

/// Elements without content, always rendered self-closed
const VOID_TAGS: &[&str] = &["br", "hr", "wbr"];

/// Character reference, as a browser would decode it inside an attribute
static CHAR_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#([0-9]+);?|#[xX]([0-9a-fA-F]+);?|([a-zA-Z][a-zA-Z0-9]*);)").unwrap()
});

/// URL schemes never allowed in an attribute value
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Attributes whose value the browser treats as a URL
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "cite",
    "poster",
    "background",
    "xlink:href",
];

/// Schemes a URL attribute may carry; scheme-less URLs are relative
const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Named references that can spell out URL syntax
const NAMED_REFS: &[(&str, char)] = &[
    ("Tab", '\t'),
    ("NewLine", '\n'),
    ("colon", ':'),
    ("sol", '/'),
    ("quest", '?'),
    ("num", '#'),
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("lpar", '('),
    ("rpar", ')'),
    ("period", '.'),
    ("comma", ','),
    ("semi", ';'),
    ("nbsp", '\u{a0}'),
];

/// Allow-list based markup sanitizer
#[derive(Debug, Clone)]
pub struct Sanitizer {
    allowed_tags: HashSet<String>,
    allowed_attributes: HashSet<String>,
}

impl Sanitizer {
    /// Create a sanitizer with explicit allow-lists
    pub fn new(
        tags: impl IntoIterator<Item = impl Into<String>>,
        attributes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            allowed_tags: tags.into_iter().map(|t| t.into().to_ascii_lowercase()).collect(),
            allowed_attributes: attributes
                .into_iter()
                .map(|a| a.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Create a sanitizer from configuration
    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self::new(&config.allowed_tags, &config.allowed_attributes)
    }

    /// Sanitize raw user input. Never fails.
    pub fn sanitize(&self, input: &str) -> String {
        let without_comments = COMMENT_RE.replace_all(input, "");
        let text = RAW_TEXT_RE.replace_all(&without_comments, "");

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for caps in TAG_RE.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            escape_text_into(&text[last..whole.start()], &mut output);
            if let Some(tag) = self.rebuild_tag(&caps) {
                output.push_str(&tag);
            }
            last = whole.end();
        }
        escape_text_into(&text[last..], &mut output);
        output
    }

    /// Check if a tag name is allow-listed
    pub fn allows_tag(&self, name: &str) -> bool {
        self.allowed_tags.contains(&name.to_ascii_lowercase())
    }

    fn rebuild_tag(&self, caps: &Captures<'_>) -> Option<String> {
        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        if !self.allowed_tags.contains(&name) {
            return None;
        }

        let is_void = VOID_TAGS.contains(&name.as_str());
        if closing {
            return (!is_void).then(|| format!("</{}>", name));
        }

        let mut tag = format!("<{}", name);
        for attr in ATTR_RE.captures_iter(&caps[3]) {
            let attr_name = attr[1].to_ascii_lowercase();
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| m.as_str())
                .unwrap_or("");
            if self.allows_attribute(&attr_name, value) {
                tag.push_str(&format!(" {}=\"{}\"", attr_name, escape_attribute(value)));
            }
        }
        tag.push_str(if is_void { " />" } else { ">" });
        Some(tag)
    }

    fn allows_attribute(&self, name: &str, value: &str) -> bool {
        if name.starts_with("on") || !self.allowed_attributes.contains(name) {
            return false;
        }
        let normalized: String = decode_char_refs(value)
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();
        if BLOCKED_SCHEMES.iter().any(|s| normalized.starts_with(s)) {
            return false;
        }
        !URL_ATTRIBUTES.contains(&name) || has_allowed_scheme(&normalized)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::from_config(&SanitizerConfig::default())
    }
}

/// Scheme-less, or one of [`URL_SCHEMES`]. A leftover `&` before the
/// first path character is an unknown reference that could hide a colon.
fn has_allowed_scheme(url: &str) -> bool {
    let head_end = url.find(['/', '?', '#']).unwrap_or(url.len());
    let head = &url[..head_end];
    if head.contains('&') {
        return false;
    }
    match head.split_once(':') {
        Some((scheme, _)) => URL_SCHEMES.contains(&scheme),
        None => true,
    }
}

/// Decode numeric and common named character references
fn decode_char_refs(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let Some(caps) = CHAR_REF_RE.captures(rest) else {
            decoded.push('&');
            rest = &rest[1..];
            continue;
        };
        let code = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok()
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok()
        } else {
            None
        };
        let named = caps.get(3).and_then(|name| {
            NAMED_REFS
                .iter()
                .find(|(n, _)| *n == name.as_str())
                .map(|(_, c)| *c)
        });

        match (caps.get(3), named) {
            (Some(_), None) => decoded.push_str(&caps[0]),
            (Some(_), Some(c)) => decoded.push(c),
            (None, _) => decoded.push(
                code.and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            ),
        }
        rest = &rest[caps[0].len()..];
    }
    decoded.push_str(rest);
    decoded
}

/// Escape text outside tags: stray `<` and `&` that does not start an entity
fn escape_text_into(text: &str, output: &mut String) {
    for (i, c) in text.char_indices() {
        match c {
            '<' => output.push_str("&lt;"),
            '&' if !ENTITY_RE.is_match(&text[i..]) => output.push_str("&amp;"),
            _ => output.push(c),
        }
    }
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' if !ENTITY_RE.is_match(&value[i..]) => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
