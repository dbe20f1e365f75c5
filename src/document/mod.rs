//! Topic content processing
//!
//! Topic bodies arrive as HTML or markdown. Both end up as a [`Document`]
//! made of [`ContentBlock`]s that the reader screen renders.

pub mod html;
pub mod markdown;
pub mod model;

pub use markdown::parse_markdown;
pub use model::{ContentBlock, Document};

use crate::api::Topic;

/// Parse a topic body, converting HTML to markdown first when needed
pub fn parse_content(content: &str) -> Vec<ContentBlock> {
    if html::looks_like_html(content) {
        parse_markdown(&html::html_to_markdown(content))
    } else {
        parse_markdown(content)
    }
}

/// Build the page for a topic
///
/// `fallback_title` is used when the topic record carries no title, which
/// is the common case for the `/topic/{id}` endpoint.
pub fn parse_topic(topic: &Topic, fallback_title: &str) -> Document {
    let title = topic
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback_title)
        .to_string();

    let mut blocks = parse_content(&topic.content);
    append_section(&mut blocks, "Key points", &topic.key_points);
    append_section(&mut blocks, "Examples", &topic.examples);

    Document { title, blocks }
}

fn append_section(blocks: &mut Vec<ContentBlock>, heading: &str, items: &[String]) {
    let items: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            if html::looks_like_html(item) { html::strip_tags(item) } else { item.to_string() }
        })
        .collect();
    if items.is_empty() {
        return;
    }
    blocks.push(ContentBlock::Heading { level: 3, text: heading.to_string() });
    blocks.push(ContentBlock::List { ordered: false, items });
}
