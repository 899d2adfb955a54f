//! Markdown event processor producing HTML.

use std::fmt::Write;
use std::path::PathBuf;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::asset::{AssetManifest, ImageRef};
use crate::html;
use crate::state::{
    HeadingIds, OpenCode, OpenHeading, OpenImage, TableCursor, TocEntry, escape_html,
};

const PARSER_OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS);

/// Result of rendering markdown.
#[derive(Clone, Debug, Default)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 (if title extraction was enabled).
    pub title: Option<String>,
    /// Outline of H2+ headings in document order.
    pub toc: Vec<TocEntry>,
    /// Plain-text blocks (if text extraction was enabled).
    pub blocks: Vec<TextBlock>,
    /// Problems found while rendering, e.g. unresolved images.
    pub warnings: Vec<String>,
}

/// Kind of a [`TextBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
}

/// Plain-text block of a page, used to build search records.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
    /// Heading level for [`BlockKind::Heading`], 0 otherwise.
    pub level: u8,
    /// Anchor of the nearest heading above this block.
    pub anchor: Option<String>,
}

/// Markdown renderer.
///
/// Handles GFM tables, strikethrough and task lists, heading anchors,
/// relative `.md`/`.mdx` link rewriting and hashed image URLs. Raw HTML
/// (including JSX from MDX bodies) is passed through.
pub struct MarkdownRenderer<'a> {
    output: String,
    heading: Option<OpenHeading>,
    code: Option<OpenCode>,
    image: Option<OpenImage>,
    table: TableCursor,
    ids: HeadingIds,
    toc: Vec<TocEntry>,
    title: Option<String>,
    extract_title: bool,
    /// Collection URL and collection-relative source directory.
    link_base: Option<(String, String)>,
    assets: Option<(&'a AssetManifest, PathBuf)>,
    blocks: Option<Vec<TextBlock>>,
    pending_text: String,
    anchor: Option<String>,
    warnings: Vec<String>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Create a new renderer with tables, strikethrough and task lists enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            heading: None,
            code: None,
            image: None,
            table: TableCursor::default(),
            ids: HeadingIds::default(),
            toc: Vec::new(),
            title: None,
            extract_title: false,
            link_base: None,
            assets: None,
            blocks: None,
            pending_text: String::new(),
            anchor: None,
            warnings: Vec::new(),
        }
    }

    /// Report the first H1 as [`RenderResult::title`].
    ///
    /// The heading is still rendered but left out of the outline.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Rewrite relative markdown links against `dir`, the collection-relative
    /// directory of the source file, below the collection URL `root`.
    ///
    /// Links that climb above the collection root are left as written.
    #[must_use]
    pub fn with_link_base(mut self, root: impl Into<String>, dir: impl Into<String>) -> Self {
        self.link_base = Some((root.into(), dir.into()));
        self
    }

    /// Rewrite relative image references through `manifest`, resolving them
    /// against `source_dir` (the content-root-relative directory of the file).
    #[must_use]
    pub fn with_assets(
        mut self,
        manifest: &'a AssetManifest,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        self.assets = Some((manifest, source_dir.into()));
        self
    }

    /// Collect plain-text blocks into [`RenderResult::blocks`].
    #[must_use]
    pub fn with_text_extraction(mut self) -> Self {
        self.blocks = Some(Vec::new());
        self
    }

    /// Render markdown text.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, PARSER_OPTIONS);
        self.render(parser)
    }

    /// Render markdown events and return the result.
    pub fn render<'e, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.flush_text();

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.title.take(),
            toc: std::mem::take(&mut self.toc),
            blocks: self.blocks.as_mut().map(std::mem::take).unwrap_or_default(),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(raw) => self.output.push_str(&raw),
            Event::InlineHtml(raw) => self.push_inline(&raw),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{checked}>"#).unwrap();
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.flush_text();
                self.heading = Some(OpenHeading::new(level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                self.flush_text();
                self.code = Some(match kind {
                    CodeBlockKind::Fenced(info) => OpenCode::fenced(&info),
                    CodeBlockKind::Indented => OpenCode::default(),
                });
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(n)) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.set_head(true);
                self.table.start_row();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let (tag, style) = self.table.next_cell();
                write!(self.output, "<{tag}{style}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let href = match &self.link_base {
                    Some((root, dir)) => html::resolve_link(&dest_url, root, dir),
                    None => dest_url.to_string(),
                };
                let mut tag = String::new();
                html::link_start(&href, &title, &mut tag);
                self.push_inline(&tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(OpenImage {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.output.push_str("</p>");
                self.flush_text();
            }
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => {
                self.flush_text();
                self.output.push_str("</blockquote>");
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    html::code_block(code.lang.as_deref(), &code.source, &mut self.output);
                    let text = code.source.trim_end().to_owned();
                    self.push_block(BlockKind::Code, text, 0);
                }
            }
            TagEnd::List(true) => self.output.push_str("</ol>"),
            TagEnd::List(false) => self.output.push_str("</ul>"),
            TagEnd::Item => {
                self.flush_text();
                self.output.push_str("</li>");
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.flush_text();
                self.table.set_head(false);
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => {
                self.flush_text();
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                write!(self.output, "</{}>", self.table.cell_tag()).unwrap();
                self.pending_text.push(' ');
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => self.finish_image(),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn finish_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let text = heading.text.trim().to_owned();
        let id = self.ids.allocate(&text);
        write!(
            self.output,
            r#"<h{level} id="{id}">{html}</h{level}>"#,
            level = heading.level,
            html = heading.html.trim()
        )
        .unwrap();

        let is_title = heading.level == HeadingLevel::H1 as u8;
        if is_title && self.extract_title && self.title.is_none() {
            self.title = Some(text.clone());
        } else if !is_title {
            self.toc.push(TocEntry {
                level: heading.level,
                title: text.clone(),
                id: id.clone(),
            });
        }
        self.anchor = Some(id);
        self.push_block(BlockKind::Heading, text, heading.level);
    }

    fn finish_image(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };
        let src = match &self.assets {
            Some((manifest, dir)) => match manifest.resolve(&image.src, dir) {
                ImageRef::Resolved(url) => url.to_owned(),
                ImageRef::External => image.src,
                ImageRef::Missing => {
                    self.warnings
                        .push(format!("unresolved image reference: {}", image.src));
                    image.src
                }
            },
            None => image.src,
        };
        let mut tag = String::new();
        html::image(&src, &image.alt, &image.title, &mut tag);
        self.push_inline(&tag);
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.source.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else if let Some(heading) = &mut self.heading {
            heading.text.push_str(text);
            heading.html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
            self.pending_text.push_str(text);
        }
    }

    fn inline_code(&mut self, code: &str) {
        let tag = format!("<code>{}</code>", escape_html(code));
        if let Some(heading) = &mut self.heading {
            heading.text.push_str(code);
            heading.html.push_str(&tag);
        } else {
            self.output.push_str(&tag);
            self.pending_text.push_str(code);
        }
    }

    fn soft_break(&mut self) {
        if let Some(heading) = &mut self.heading {
            heading.text.push(' ');
            heading.html.push('\n');
        } else {
            self.output.push('\n');
            self.pending_text.push(' ');
        }
    }

    fn push_inline(&mut self, content: &str) {
        match &mut self.heading {
            Some(heading) => heading.html.push_str(content),
            None => self.output.push_str(content),
        }
    }

    /// Turn collected inline text into a paragraph block.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.pending_text);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        self.push_block(BlockKind::Paragraph, text, 0);
    }

    fn push_block(&mut self, kind: BlockKind, text: String, level: u8) {
        if text.is_empty() {
            return;
        }
        if let Some(blocks) = &mut self.blocks {
            blocks.push(TextBlock {
                kind,
                text,
                level,
                anchor: self.anchor.clone(),
            });
        }
    }
}

impl Default for MarkdownRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
