//! Markdown/MDX rendering for documentation pages.
//!
//! [`MarkdownRenderer`] is a pulldown-cmark event processor producing HTML,
//! a heading outline ([`TocEntry`]) and, on request, plain-text blocks for
//! search indexing ([`TextBlock`]).
//!
//! Image references are rewritten through an [`AssetManifest`] built from
//! hashed asset files. A reference the manifest doesn't know is rendered
//! as written and reported in [`RenderResult::warnings`].
//!
//! # Example
//!
//! ```
//! use ds_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\n## Usage\n\n**Bold** text");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert_eq!(result.toc[0].id, "usage");
//! ```

mod asset;
mod html;
mod mdx;
mod renderer;
mod state;

pub use asset::{AssetManifest, ImageRef};
pub use html::resolve_link;
pub use mdx::strip_esm;
pub use renderer::{BlockKind, MarkdownRenderer, RenderResult, TextBlock};
pub use state::{TocEntry, escape_html, slugify};
