//! Quoted-reply detection
//!
//! Line-oriented state machine turning `>`-prefixed runs into quote blocks
//! and everything else into blank-line separated paragraphs.

use super::sanitizer::escape_attribute;

/// Marker joining lines of one paragraph
const LINE_BREAK: &str = "\n<br />";

/// A structural block of a comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines of an ordinary paragraph
    Paragraph(Vec<String>),
    /// Paragraphs of a quote, each a list of lines
    Quote(Vec<Vec<String>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InQuote,
}

/// Parser for `>` quoted blocks
#[derive(Debug, Clone)]
pub struct QuoteParser {
    quote_class: String,
}

impl QuoteParser {
    /// Create a parser rendering quotes with the given CSS class
    pub fn new(quote_class: impl Into<String>) -> Self {
        Self {
            quote_class: escape_attribute(&quote_class.into()),
        }
    }

    /// Split sanitized text into blocks
    pub fn parse(&self, text: &str) -> Vec<Block> {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();

        let mut blocks = Vec::new();
        let mut paragraph: Vec<String> = Vec::new();
        let mut quote: Vec<Vec<String>> = Vec::new();
        let mut state = State::Outside;

        for (i, line) in lines.iter().enumerate() {
            let quoted = quoted_content(line);
            let blank = line.trim().is_empty();

            match (state, quoted) {
                (State::Outside, Some(content)) => {
                    flush_paragraph(&mut paragraph, &mut blocks);
                    quote.push(Vec::new());
                    push_quote_line(&mut quote, content);
                    state = State::InQuote;
                }
                (State::Outside, None) => {
                    if blank {
                        flush_paragraph(&mut paragraph, &mut blocks);
                    } else {
                        paragraph.push(line.trim_end().to_string());
                    }
                }
                (State::InQuote, Some(content)) => push_quote_line(&mut quote, content),
                (State::InQuote, None) if blank => {
                    let quote_continues = lines
                        .get(i + 1)
                        .is_some_and(|next| quoted_content(next).is_some());
                    if quote_continues {
                        quote.push(Vec::new());
                    } else {
                        flush_quote(&mut quote, &mut blocks);
                        state = State::Outside;
                    }
                }
                (State::InQuote, None) => {
                    flush_quote(&mut quote, &mut blocks);
                    paragraph.push(line.trim_end().to_string());
                    state = State::Outside;
                }
            }
        }

        flush_quote(&mut quote, &mut blocks);
        flush_paragraph(&mut paragraph, &mut blocks);
        blocks
    }

    /// Parse and render to markup
    pub fn render(&self, text: &str) -> String {
        self.parse(text)
            .iter()
            .map(|block| self.render_block(block))
            .collect()
    }

    fn render_block(&self, block: &Block) -> String {
        match block {
            Block::Paragraph(lines) => render_paragraph(lines),
            Block::Quote(paragraphs) => {
                let inner: String = paragraphs.iter().map(|p| render_paragraph(p)).collect();
                format!("<blockquote class=\"{}\">{}</blockquote>", self.quote_class, inner)
            }
        }
    }
}

impl Default for QuoteParser {
    fn default() -> Self {
        Self::new("comment__quote")
    }
}

/// Text after `>` and one optional space, `None` for unquoted lines
fn quoted_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest).trim_end())
}

/// Empty content starts a new paragraph inside the quote
fn push_quote_line(quote: &mut Vec<Vec<String>>, content: &str) {
    if content.trim().is_empty() {
        quote.push(Vec::new());
    } else if let Some(current) = quote.last_mut() {
        current.push(content.to_string());
    }
}

fn flush_paragraph(paragraph: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(paragraph)));
    }
}

fn flush_quote(quote: &mut Vec<Vec<String>>, blocks: &mut Vec<Block>) {
    let paragraphs: Vec<Vec<String>> = std::mem::take(quote)
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    if !paragraphs.is_empty() {
        blocks.push(Block::Quote(paragraphs));
    }
}

fn render_paragraph(lines: &[String]) -> String {
    format!("<p>{}</p>", lines.join(LINE_BREAK))
}
