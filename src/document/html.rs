//! HTML handling for topic bodies
//!
//! The backend stores topic content as HTML fragments. They are rewritten to
//! markdown so a single parser produces the content blocks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an opening, closing or self-closing tag
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?[a-z][a-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

/// Matches decimal and hexadecimal character references
static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

/// A run of digits followed by a list delimiter at the start of a text run
static LIST_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*\d+)([.)])").unwrap());

/// Characters markdown would treat as syntax inside running text
const MARKDOWN_SPECIALS: &[char] = &['\\', '`', '*', '_', '#', '<', '>', '[', ']', '&', '~'];

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&ndash;", "–"),
    ("&mdash;", "—"),
    ("&hellip;", "…"),
    ("&deg;", "°"),
    ("&times;", "×"),
    ("&rarr;", "→"),
];

/// Whether the text contains HTML markup
pub fn looks_like_html(text: &str) -> bool {
    TAG_RE.is_match(text)
}

/// Replace character references with the characters they name
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32).map(String::from).unwrap_or_default()
    });

    let mut decoded = numeric.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    // Last, so "&amp;lt;" stays "&lt;"
    decoded.replace("&amp;", "&")
}

/// Remove all tags and decode entities
pub fn strip_tags(html: &str) -> String {
    decode_entities(&TAG_RE.replace_all(html, ""))
}

/// Backslash-escape text so markdown reads it literally
pub fn escape_markdown(text: &str) -> String {
    let trimmed = text.trim_start();
    let lead = text.len() - trimmed.len();
    let mut escaped = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        let bullet = i == lead && matches!(c, '-' | '+') && trimmed[1..].starts_with(' ');
        if MARKDOWN_SPECIALS.contains(&c) || bullet {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LIST_NUMBER_RE.replace(&escaped, "${1}\\${2}").into_owned()
}

/// A tag split into its parts
struct ParsedTag<'a> {
    name: String,
    closing: bool,
    raw: &'a str,
}

fn parse_tag(raw: &str) -> ParsedTag<'_> {
    let inner = raw.trim_start_matches('<').trim_end_matches('>').trim_end_matches('/');
    let closing = inner.starts_with('/');
    let name = inner
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    ParsedTag { name, closing, raw }
}

/// Read an attribute value from a raw tag
fn attribute(raw: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"(?i)\s{}\s*=\s*(?:"([^"]*)"|'([^']*)')"#, regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(raw)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| decode_entities(m.as_str()))
}

/// Language hinted by `class="language-xxx"` (or `lang-xxx`)
fn code_language(raw: &str) -> Option<String> {
    attribute(raw, "class")?.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .map(str::to_string)
    })
}

/// Streaming HTML to markdown rewriter
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    /// Open lists, with the next number for ordered ones
    lists: Vec<Option<u32>>,
    pre_depth: usize,
    /// Open inline `<code>` elements, whose text is taken verbatim
    code_depth: usize,
    /// Open `<script>`/`<style>` elements whose text is dropped
    hidden_depth: usize,
    /// A code fence was opened and still awaits its line break
    fence_pending: bool,
}

impl MarkdownWriter {
    fn settle_fence(&mut self) {
        if self.fence_pending {
            self.out.push('\n');
            self.fence_pending = false;
        }
    }

    fn block_break(&mut self) {
        self.out.push_str("\n\n");
    }

    fn text(&mut self, text: &str) {
        if self.hidden_depth > 0 {
            return;
        }
        self.settle_fence();
        let decoded = decode_entities(text);
        if self.pre_depth > 0 {
            self.out.push_str(&decoded);
            return;
        }
        let collapsed = WHITESPACE_RE.replace_all(&decoded, " ");
        if self.code_depth > 0 {
            self.out.push_str(&collapsed);
        } else {
            self.out.push_str(&escape_markdown(&collapsed));
        }
    }

    fn tag(&mut self, tag: ParsedTag<'_>) {
        if matches!(tag.name.as_str(), "script" | "style") {
            if tag.closing {
                self.hidden_depth = self.hidden_depth.saturating_sub(1);
            } else {
                self.hidden_depth += 1;
            }
            return;
        }
        if self.hidden_depth > 0 {
            return;
        }

        if self.fence_pending && tag.name == "code" && !tag.closing {
            if let Some(lang) = code_language(tag.raw) {
                self.out.push_str(&lang);
            }
            self.settle_fence();
            return;
        }
        self.settle_fence();

        if tag.closing {
            self.close(&tag.name);
        } else {
            self.open(&tag);
        }
    }

    fn open(&mut self, tag: &ParsedTag<'_>) {
        match tag.name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag.name[1..].parse::<usize>().unwrap_or(1);
                self.block_break();
                self.out.push_str(&"#".repeat(level));
                self.out.push(' ');
            }
            "p" | "div" | "section" | "article" => self.block_break(),
            "br" => self.out.push('\n'),
            "hr" => self.out.push_str("\n\n---\n\n"),
            "ul" => {
                self.lists.push(None);
                self.out.push('\n');
            }
            "ol" => {
                self.lists.push(Some(1));
                self.out.push('\n');
            }
            "li" => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.out.push('\n');
                self.out.push_str(&indent);
                self.out.push_str(&marker);
            }
            "pre" => {
                self.block_break();
                self.out.push_str("```");
                if let Some(lang) = code_language(tag.raw) {
                    self.out.push_str(&lang);
                }
                self.fence_pending = true;
                self.pre_depth += 1;
            }
            "code" if self.pre_depth == 0 => {
                self.code_depth += 1;
                self.out.push('`');
            }
            "blockquote" => {
                self.block_break();
                self.out.push_str("> ");
            }
            "em" | "i" => self.out.push('*'),
            "strong" | "b" => self.out.push_str("**"),
            "img" => {
                let alt = attribute(tag.raw, "alt").unwrap_or_default();
                self.out.push_str(&format!("![{}]()", alt));
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "div" | "section" | "article"
            | "blockquote" => self.block_break(),
            "ul" | "ol" => {
                self.lists.pop();
                self.block_break();
            }
            "pre" => {
                self.pre_depth = self.pre_depth.saturating_sub(1);
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.out.push_str("```");
                self.block_break();
            }
            "code" if self.pre_depth == 0 => {
                self.code_depth = self.code_depth.saturating_sub(1);
                self.out.push('`');
            }
            "em" | "i" => self.out.push('*'),
            "strong" | "b" => self.out.push_str("**"),
            _ => {}
        }
    }

    fn finish(self) -> String {
        BLANK_LINES_RE.replace_all(&self.out, "\n\n").trim().to_string()
    }
}

/// Rewrite an HTML fragment as markdown
pub fn html_to_markdown(html: &str) -> String {
    let mut writer = MarkdownWriter::default();
    let mut last = 0;

    for found in TAG_RE.find_iter(html) {
        if found.start() > last {
            writer.text(&html[last..found.start()]);
        }
        writer.tag(parse_tag(found.as_str()));
        last = found.end();
    }
    if last < html.len() {
        writer.text(&html[last..]);
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_markup() {
        assert!(looks_like_html("<p>Hello</p>"));
        assert!(looks_like_html("line<br/>break"));
        assert!(!looks_like_html("2 < 3 and 5 > 4"));
        assert!(!looks_like_html("Plain text"));
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("&lt;b&gt; &amp; &#65;&#x42;"), "<b> & AB");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strips_tags() {
        assert_eq!(strip_tags("<strong>Bold</strong> text"), "Bold text");
    }

    #[test]
    fn headings_and_paragraphs() {
        let md = html_to_markdown("<h2>Reactions</h2><p>Atoms   rearrange.</p>");
        assert_eq!(md, "## Reactions\n\nAtoms rearrange.");
    }

    #[test]
    fn ordered_list_is_numbered() {
        let md = html_to_markdown("<ol><li>Mix</li><li>Heat</li></ol>");
        assert_eq!(md, "1. Mix\n2. Heat");
    }

    #[test]
    fn unordered_list_uses_dashes() {
        let md = html_to_markdown("<ul>\n  <li>Safe</li>\n  <li>Fun</li>\n</ul>");
        assert!(md.contains("- Safe"));
        assert!(md.contains("- Fun"));
    }

    #[test]
    fn pre_code_becomes_fence_with_language() {
        let md = html_to_markdown(
            "<pre><code class=\"language-python\">x = 1\nprint(x)</code></pre>",
        );
        assert_eq!(md, "```python\nx = 1\nprint(x)\n```");
    }

    #[test]
    fn inline_formatting() {
        let md = html_to_markdown("<p><strong>Note:</strong> use <code>H2O</code></p>");
        assert_eq!(md, "**Note:** use `H2O`");
    }

    #[test]
    fn literal_markdown_syntax_is_escaped() {
        assert_eq!(
            html_to_markdown("<p>Use the &lt;b&gt; tag for bold.</p>"),
            r"Use the \<b\> tag for bold."
        );
        assert_eq!(html_to_markdown("<p># of moles</p>"), r"\# of moles");
        assert_eq!(html_to_markdown("<p>1. is the first element</p>"), r"1\. is the first element");
        assert_eq!(html_to_markdown("<p>- not a bullet</p>"), r"\- not a bullet");
        assert_eq!(html_to_markdown("<p>a_b * c</p>"), r"a\_b \* c");
    }

    #[test]
    fn code_text_is_not_escaped() {
        assert_eq!(html_to_markdown("<p><code>a*b</code></p>"), "`a*b`");
        assert_eq!(html_to_markdown("<pre>x_1 = 2</pre>"), "```\nx_1 = 2\n```");
    }

    #[test]
    fn scripts_are_dropped() {
        let md = html_to_markdown("<p>Keep</p><script>alert('x')</script>");
        assert_eq!(md, "Keep");
    }

    #[test]
    fn image_alt_is_kept() {
        let md = html_to_markdown(r#"<img src="a.png" alt="Diagram">"#);
        assert_eq!(md, "![Diagram]()");
    }
}
