use std::sync::OnceLock;

use regex::Regex;

use super::{
    blocks::{Alignment, Block, ListItem},
    escape::unescape,
    fence,
    inline::InlineRuleEngine,
    slug::{HeadingIdStrategy, HeadingIds},
};

/// One heading as listed in a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    /// The rendered heading's text content: tags dropped, entities decoded.
    pub text: String,
    pub id: String,
}

/// HTML for a block sequence plus the heading data collected on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHtml {
    pub html: String,
    pub heading_ids: Vec<String>,
    pub toc: Vec<TocEntry>,
}

/// Turns blocks into HTML, running the inline engine over every text field.
///
/// Code blocks are written as their fence placeholder; the orchestrator swaps
/// in the `<pre>` element after post-processing.
pub struct HtmlWriter<'a> {
    engine: &'a InlineRuleEngine,
    ids: HeadingIds,
    out: BlockHtml,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(engine: &'a InlineRuleEngine, strategy: HeadingIdStrategy) -> Self {
        Self {
            engine,
            ids: HeadingIds::new(strategy),
            out: BlockHtml::default(),
        }
    }

    pub fn write(mut self, blocks: &[Block]) -> BlockHtml {
        let parts: Vec<String> = blocks.iter().map(|block| self.block(block)).collect();
        self.out.html = parts.join("\n");
        self.out
    }

    fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Heading { level, text } => self.heading(*level, text),
            Block::Hr => "<hr>".to_string(),
            Block::Blockquote { text } => {
                format!("<blockquote>{}</blockquote>", self.engine.apply(text))
            }
            Block::List { ordered, items } => self.list(*ordered, items),
            Block::Table {
                header,
                alignments,
                rows,
            } => self.table(header, alignments, rows),
            Block::CodeBlock { id, .. } => fence::placeholder(*id),
            Block::Paragraph { text } => format!("<p>{}</p>", self.engine.apply(text)),
            Block::Raw { html } => html.clone(),
        }
    }

    fn heading(&mut self, level: u8, text: &str) -> String {
        let id = self.ids.next_id(text);
        let content = self.engine.apply(text);

        self.out.heading_ids.push(id.clone());
        self.out.toc.push(TocEntry {
            level,
            text: text_content(&content),
            id: id.clone(),
        });

        if id.is_empty() {
            format!("<h{level} class=\"heading-{level}\">{content}</h{level}>")
        } else {
            format!("<h{level} id=\"{id}\" class=\"heading-{level}\">{content}</h{level}>")
        }
    }

    fn list(&self, ordered: bool, items: &[ListItem]) -> String {
        let tag = if ordered { "ol" } else { "ul" };
        let mut html = format!("<{tag}>\n");
        for item in items {
            let text = self.engine.apply(&item.text);
            if item.is_task {
                let checked = if item.checked { " checked" } else { "" };
                html.push_str(&format!(
                    "<li class=\"task-list-item\"><input type=\"checkbox\"{checked} disabled> {text}</li>\n"
                ));
            } else {
                html.push_str(&format!("<li>{text}</li>\n"));
            }
        }
        html.push_str(&format!("</{tag}>"));
        html
    }

    fn table(&self, header: &[String], alignments: &[Alignment], rows: &[Vec<String>]) -> String {
        let mut html = String::from("<table>\n<thead>\n");
        html.push_str(&self.row(header, alignments, "th"));
        html.push_str("</thead>\n<tbody>\n");
        for row in rows {
            html.push_str(&self.row(row, alignments, "td"));
        }
        html.push_str("</tbody>\n</table>");
        html
    }

    fn row(&self, cells: &[String], alignments: &[Alignment], tag: &str) -> String {
        let mut html = String::from("<tr>");
        for (i, cell) in cells.iter().enumerate() {
            let style = alignments
                .get(i)
                .and_then(|a| a.css())
                .map(|css| format!(" style=\"text-align: {css}\""))
                .unwrap_or_default();
            html.push_str(&format!("<{tag}{style}>{}</{tag}>", self.engine.apply(cell)));
        }
        html.push_str("</tr>\n");
        html
    }
}

/// Text a browser would show for an inline HTML fragment.
fn text_content(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
    unescape(&tag.replace_all(html, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(blocks: &[Block]) -> BlockHtml {
        let engine = InlineRuleEngine::default();
        HtmlWriter::new(&engine, HeadingIdStrategy::Preserve).write(blocks)
    }

    fn item(text: &str, is_task: bool, checked: bool) -> ListItem {
        ListItem {
            text: text.to_string(),
            is_task,
            checked,
        }
    }

    #[test]
    fn heading_gets_id_and_toc_entry() {
        let out = write(&[Block::Heading {
            level: 2,
            text: "Fish &amp; **Chips**".to_string(),
        }]);
        assert_eq!(
            out.html,
            "<h2 id=\"fish-chips\" class=\"heading-2\">Fish &amp; <strong>Chips</strong></h2>"
        );
        assert_eq!(out.heading_ids, vec!["fish-chips"]);
        assert_eq!(
            out.toc,
            vec![TocEntry {
                level: 2,
                text: "Fish & Chips".to_string(),
                id: "fish-chips".to_string(),
            }]
        );
    }

    #[test]
    fn heading_without_slug_has_no_id() {
        let out = write(&[Block::Heading {
            level: 1,
            text: "???".to_string(),
        }]);
        assert_eq!(out.html, "<h1 class=\"heading-1\">???</h1>");
        assert_eq!(out.heading_ids, vec![""]);
    }

    #[test]
    fn toc_text_drops_links_and_code_markup() {
        let out = write(&[Block::Heading {
            level: 3,
            text: "See [docs](/d) for `a &lt; b`".to_string(),
        }]);
        assert_eq!(out.toc[0].text, "See docs for a < b");
    }

    #[test]
    fn task_and_plain_items() {
        let out = write(&[Block::List {
            ordered: false,
            items: vec![
                item("plain", false, false),
                item("todo", true, false),
                item("done", true, true),
            ],
        }]);
        assert_eq!(
            out.html,
            "<ul>\n\
             <li>plain</li>\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" disabled> todo</li>\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" checked disabled> done</li>\n\
             </ul>"
        );
    }

    #[test]
    fn ordered_list() {
        let out = write(&[Block::List {
            ordered: true,
            items: vec![item("*one*", false, false)],
        }]);
        assert_eq!(out.html, "<ol>\n<li><em>one</em></li>\n</ol>");
    }

    #[test]
    fn table_with_alignment() {
        let out = write(&[Block::Table {
            header: vec!["a".to_string(), "b".to_string()],
            alignments: vec![Alignment::None, Alignment::Right],
            rows: vec![vec!["1".to_string(), "`2`".to_string()]],
        }]);
        assert_eq!(
            out.html,
            "<table>\n<thead>\n\
             <tr><th>a</th><th style=\"text-align: right\">b</th></tr>\n\
             </thead>\n<tbody>\n\
             <tr><td>1</td><td style=\"text-align: right\"><code>2</code></td></tr>\n\
             </tbody>\n</table>"
        );
    }

    #[test]
    fn blocks_are_joined_by_newlines() {
        let out = write(&[
            Block::Paragraph {
                text: "a".to_string(),
            },
            Block::Hr,
            Block::Blockquote {
                text: "q".to_string(),
            },
            Block::Raw {
                html: "<div></div>".to_string(),
            },
        ]);
        assert_eq!(
            out.html,
            "<p>a</p>\n<hr>\n<blockquote>q</blockquote>\n<div></div>"
        );
    }

    #[test]
    fn code_block_is_left_as_placeholder() {
        let out = write(&[Block::CodeBlock {
            id: 3,
            language: None,
            code: "**x**".to_string(),
        }]);
        assert_eq!(out.html, fence::placeholder(3));
    }
}
