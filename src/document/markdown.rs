//! Markdown parser for topic bodies
//!
//! Turns markdown (or markdown produced from HTML) into content blocks,
//! keeping inline markers for the renderer.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::html;
use super::model::ContentBlock;

/// Accumulates blocks while walking the parser's event stream
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<ContentBlock>,
    /// Inline text of the paragraph, heading or list item being read
    text: String,
    heading: Option<u8>,
    /// Language and body of an open code block
    code: Option<(Option<String>, String)>,
    /// Whether the outermost open list is ordered, and its items so far
    list: Option<(bool, Vec<String>)>,
    list_depth: usize,
    item: String,
    quote: Option<String>,
    /// Alt text of an open image
    image: Option<String>,
}

impl BlockBuilder {
    fn flush_paragraph(&mut self) {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.blocks.push(ContentBlock::Paragraph(trimmed.to_string()));
        }
    }

    /// Move pending inline text into the current list item
    fn absorb_into_item(&mut self) {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !self.item.is_empty() {
                self.item.push(' ');
            }
            self.item.push_str(trimmed);
        }
    }

    fn finish_item(&mut self) {
        self.absorb_into_item();
        let item = std::mem::take(&mut self.item);
        if let Some((_, items)) = self.list.as_mut() {
            if !item.is_empty() {
                items.push(item);
            }
        }
    }

    fn push_inline(&mut self, s: &str) {
        if let Some((_, body)) = self.code.as_mut() {
            body.push_str(s);
        } else if let Some(alt) = self.image.as_mut() {
            alt.push_str(s);
        } else {
            self.text.push_str(s);
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_paragraph();
                self.heading = Some(heading_level(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                let text = std::mem::take(&mut self.text);
                if let Some(level) = self.heading.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.blocks.push(ContentBlock::Heading { level, text: text.to_string() });
                    }
                }
            }

            Event::End(TagEnd::Paragraph) => {
                if let Some(quote) = self.quote.as_mut() {
                    let text = std::mem::take(&mut self.text);
                    quote.push_str(text.trim());
                    quote.push('\n');
                } else if self.list_depth > 0 {
                    self.absorb_into_item();
                } else {
                    self.flush_paragraph();
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_paragraph();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                        Some(lang.trim().to_string())
                    }
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, body)) = self.code.take() {
                    self.blocks
                        .push(ContentBlock::Code { language, code: body.trim_end().to_string() });
                }
            }

            Event::Start(Tag::List(first_number)) => {
                if self.list_depth == 0 {
                    self.flush_paragraph();
                    self.list = Some((first_number.is_some(), Vec::new()));
                } else {
                    // Nested lists are flattened into the outer one
                    self.finish_item();
                }
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    if let Some((ordered, items)) = self.list.take() {
                        if !items.is_empty() {
                            self.blocks.push(ContentBlock::List { ordered, items });
                        }
                    }
                }
            }
            Event::Start(Tag::Item) => {
                self.item.clear();
            }
            Event::End(TagEnd::Item) => self.finish_item(),

            Event::Start(Tag::BlockQuote(_)) => {
                self.flush_paragraph();
                self.quote = Some(String::new());
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                let rest = std::mem::take(&mut self.text);
                if let Some(mut quote) = self.quote.take() {
                    quote.push_str(rest.trim());
                    let quote = quote.trim();
                    if !quote.is_empty() {
                        self.blocks.push(ContentBlock::Quote(quote.to_string()));
                    }
                }
            }

            Event::Start(Tag::Image { .. }) => {
                self.image = Some(String::new());
            }
            Event::End(TagEnd::Image) => {
                if let Some(alt) = self.image.take() {
                    if self.list_depth == 0 && self.heading.is_none() {
                        self.flush_paragraph();
                        self.blocks.push(ContentBlock::Image { alt: alt.trim().to_string() });
                    } else {
                        self.text.push_str(alt.trim());
                    }
                }
            }

            Event::Rule => {
                self.flush_paragraph();
                self.blocks.push(ContentBlock::Rule);
            }

            Event::Text(text) => self.push_inline(&text),
            Event::Code(code) => {
                self.text.push('`');
                self.text.push_str(&code);
                self.text.push('`');
            }
            Event::Start(Tag::Emphasis) | Event::End(TagEnd::Emphasis) => self.push_inline("*"),
            Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => self.push_inline("**"),
            Event::TaskListMarker(done) => self.push_inline(if done { "[x] " } else { "[ ] " }),
            Event::SoftBreak => self.push_inline(" "),
            Event::HardBreak => {
                if self.code.is_some() {
                    self.push_inline("\n");
                } else {
                    self.push_inline(" ");
                }
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                let text = html::strip_tags(&raw);
                if !text.trim().is_empty() {
                    self.push_inline(text.trim());
                }
            }

            _ => {}
        }
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_paragraph();
        self.blocks
    }
}

/// Parse a markdown string into content blocks
pub fn parse_markdown(markdown: &str) -> Vec<ContentBlock> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, options) {
        builder.handle(event);
    }
    builder.finish()
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
