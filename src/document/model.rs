//! Renderable content model for topic pages

use serde::{Deserialize, Serialize};

/// A block of topic content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    /// A heading (level 1-6)
    Heading { level: u8, text: String },
    /// A paragraph with inline markdown markers (`code`, **bold**, *italic*)
    Paragraph(String),
    /// A code block with optional language annotation
    Code { language: Option<String>, code: String },
    /// A bulleted or numbered list
    List { ordered: bool, items: Vec<String> },
    /// A blockquote
    Quote(String),
    /// An image reference, shown by its alt text
    Image { alt: String },
    /// A horizontal rule
    Rule,
}

impl ContentBlock {
    /// Plain text of the block, if it has any
    pub fn plain_text(&self) -> Option<String> {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph(text)
            | ContentBlock::Quote(text) => Some(text.clone()),
            ContentBlock::Code { code, .. } => Some(code.clone()),
            ContentBlock::List { ordered, items } => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        if *ordered {
                            format!("{}. {}", i + 1, item)
                        } else {
                            format!("- {}", item)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            ContentBlock::Image { alt } if !alt.is_empty() => Some(format!("[Image: {}]", alt)),
            ContentBlock::Image { .. } | ContentBlock::Rule => None,
        }
    }
}

/// A parsed topic page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page title
    pub title: String,
    /// Body blocks in reading order
    pub blocks: Vec<ContentBlock>,
}

impl Document {
    /// Whether there is anything to show besides the title
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text rendering, used by the non-interactive CLI
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.title.is_empty() {
            parts.push(self.title.clone());
        }
        parts.extend(self.blocks.iter().filter_map(ContentBlock::plain_text));
        parts.join("\n\n")
    }
}
