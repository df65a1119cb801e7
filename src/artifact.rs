//! The artifact model: one source file (or directory) mapped to one output file.
//!
//! An [`Artifact`] is created at discovery time with its kind and destination
//! fixed. Everything else lives in its [`Context`], which the pipeline phases
//! fill in one step at a time:
//!
//! | Phase | Keys written |
//! |-------|--------------|
//! | Setup | `src`, `dst`, `url`, `title`, `kind`, `raw_content` |
//! | BuildContext | `sub_pages` |
//! | ConvertContent | `content` |
//! | RenderContent | `rendered_content` |
//! | RenderArtifact | `html` |
//!
//! Other artifacts never see the full context, only [`Artifact::summary`].
//!
//! ## Destinations
//!
//! ```text
//! index.md            → index.html
//! about.md            → about/index.html
//! blog/index.html     → blog/index.html
//! blog/First Post.md  → blog/first-post/index.html   (prettified)
//! blog/               → blog/index.html              (nav page)
//! css/Site.css        → css/Site.css                 (asset: file name kept)
//! ```

use crate::context::Context;
use crate::convert::{self, Format};
use crate::naming::{prettify_dir, slug_to_title};
use crate::template::{TemplateError, Templates};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    #[error("{0} is outside the output directory")]
    OutsideOutput(PathBuf),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("missing `{0}`; an earlier phase did not run")]
    MissingKey(&'static str),
}

/// Closed set of artifact kinds, decided once at discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    HtmlPage,
    MarkdownPage,
    PlainTextPage,
    GenericPage,
    NavPage,
    Asset,
}

impl ArtifactKind {
    /// Dispatch a page file to its kind by extension.
    ///
    /// Explicit formats are checked first; anything else is a generic page.
    pub fn for_page(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match Format::from_extension(ext) {
            Format::Html => ArtifactKind::HtmlPage,
            Format::Markdown => ArtifactKind::MarkdownPage,
            Format::PlainText => ArtifactKind::PlainTextPage,
            Format::Other(_) => ArtifactKind::GenericPage,
        }
    }

    pub fn is_page(self) -> bool {
        self != ArtifactKind::Asset
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::HtmlPage => "html",
            ArtifactKind::MarkdownPage => "markdown",
            ArtifactKind::PlainTextPage => "text",
            ArtifactKind::GenericPage => "generic",
            ArtifactKind::NavPage => "nav",
            ArtifactKind::Asset => "asset",
        }
    }
}

/// Pipeline phases in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Setup,
    BuildContext,
    ConvertContent,
    RenderContent,
    RenderArtifact,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::BuildContext => "build-context",
            Phase::ConvertContent => "convert",
            Phase::RenderContent => "render-content",
            Phase::RenderArtifact => "render",
            Phase::Write => "write",
        };
        f.write_str(name)
    }
}

/// Whether an artifact is still moving through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Live,
    Failed { phase: Phase, reason: String },
}

/// Which template wraps an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRole {
    Page,
    Nav,
}

impl TemplateRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateRole::Page => "page",
            TemplateRole::Nav => "nav",
        }
    }
}

/// Maps source paths to output paths and URLs.
#[derive(Debug, Clone)]
pub struct Layout {
    pub source: PathBuf,
    pub output: PathBuf,
    pub prettify: bool,
}

const INDEX_HTML: &str = "index.html";

impl Layout {
    fn segments(&self, rel_dir: &Path) -> Option<String> {
        let mut parts = Vec::new();
        for component in rel_dir.components() {
            parts.push(component.as_os_str().to_str()?.to_string());
        }
        let joined = parts.join("/");
        Some(if self.prettify {
            prettify_dir(&joined)
        } else {
            joined
        })
    }

    fn index_under(&self, dir: &str) -> PathBuf {
        let mut out = self.output.clone();
        for part in dir.split('/').filter(|p| !p.is_empty()) {
            out.push(part);
        }
        out.push(INDEX_HTML);
        out
    }

    /// `about.md` → `about/index.html`, `index.md` → `index.html`.
    pub fn page_destination(&self, path: &Path) -> Option<PathBuf> {
        let rel = path.strip_prefix(&self.source).ok()?;
        let stem = rel.file_stem()?;
        let parent = rel.parent().unwrap_or(Path::new(""));
        let dir = if stem == "index" {
            parent.to_path_buf()
        } else {
            parent.join(stem)
        };
        Some(self.index_under(&self.segments(&dir)?))
    }

    /// `blog/` → `blog/index.html`.
    pub fn dir_destination(&self, dir: &Path) -> Option<PathBuf> {
        let rel = dir.strip_prefix(&self.source).ok()?;
        Some(self.index_under(&self.segments(rel)?))
    }

    /// Assets keep their file name; only the directories are prettified.
    pub fn asset_destination(&self, path: &Path) -> Option<PathBuf> {
        let rel = path.strip_prefix(&self.source).ok()?;
        let name = rel.file_name()?;
        let dir = self.segments(rel.parent().unwrap_or(Path::new("")))?;
        let mut out = self.output.clone();
        for part in dir.split('/').filter(|p| !p.is_empty()) {
            out.push(part);
        }
        out.push(name);
        Some(out)
    }

    /// Site-absolute URL of a destination.
    ///
    /// Pages drop their `index.html` (`/blog/`, or `/` for the root);
    /// assets keep the file name. Every segment is percent-encoded.
    pub fn url(&self, destination: &Path, is_page: bool) -> Result<String, ArtifactError> {
        let rel = destination
            .strip_prefix(&self.output)
            .map_err(|_| ArtifactError::OutsideOutput(destination.to_path_buf()))?;
        let rel = if is_page {
            rel.parent().unwrap_or(Path::new(""))
        } else {
            rel
        };
        let mut encoded = Vec::new();
        for component in rel.components() {
            let part = component
                .as_os_str()
                .to_str()
                .ok_or_else(|| ArtifactError::NonUtf8Path(destination.to_path_buf()))?;
            encoded.push(urlencoding::encode(part).into_owned());
        }
        let mut url = format!("/{}", encoded.join("/"));
        if is_page && !encoded.is_empty() {
            url.push('/');
        }
        Ok(url)
    }

    /// Source-relative path with `/` separators.
    pub fn relative_source(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.source).ok()?;
        let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
        Some(parts?.join("/"))
    }
}

/// Display title for a source path.
///
/// Files use their stem; `index.*` files and directories use their directory
/// name. The root index keeps "Index".
pub fn title_for(source: &Path, kind: ArtifactKind, root: &Path) -> String {
    let name = match kind {
        ArtifactKind::NavPage => source.file_name(),
        _ => match source.file_stem() {
            Some(stem) if stem == "index" && source.parent() != Some(root) => {
                source.parent().and_then(Path::file_name)
            }
            stem => stem,
        },
    };
    slug_to_title(&name.map(|n| n.to_string_lossy()).unwrap_or_default())
}

/// One unit of build output.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: ArtifactKind,
    context: Context,
    status: Status,
}

/// Keys exposed to other artifacts.
const SUMMARY_KEYS: &[&str] = &["url", "title", "src", "dst", "kind"];

impl Artifact {
    pub fn new(source: PathBuf, destination: PathBuf, kind: ArtifactKind) -> Self {
        Self {
            source,
            destination,
            kind,
            context: Context::new(),
            status: Status::Live,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_live(&self) -> bool {
        self.status == Status::Live
    }

    /// Mark the artifact dead; later phases skip it.
    pub fn fail(&mut self, phase: Phase, reason: impl Into<String>) {
        self.status = Status::Failed {
            phase,
            reason: reason.into(),
        };
    }

    pub fn url(&self) -> Option<&str> {
        self.context.get_str("url")
    }

    pub fn title(&self) -> Option<&str> {
        self.context.get_str("title")
    }

    /// Read-only view shared with other artifacts.
    pub fn summary(&self) -> Value {
        self.context.project(SUMMARY_KEYS)
    }

    pub fn template_role(&self) -> Option<TemplateRole> {
        match self.kind {
            ArtifactKind::Asset => None,
            ArtifactKind::NavPage => Some(TemplateRole::Nav),
            _ => Some(TemplateRole::Page),
        }
    }

    fn format(&self) -> Option<Format> {
        match self.kind {
            ArtifactKind::NavPage | ArtifactKind::Asset => None,
            _ => {
                let ext = self.source.extension().and_then(|e| e.to_str()).unwrap_or("");
                Some(Format::from_extension(ext))
            }
        }
    }

    fn require_str(&self, key: &'static str) -> Result<&str, ArtifactError> {
        self.context.get_str(key).ok_or(ArtifactError::MissingKey(key))
    }

    // =========================================================================
    // Phases
    // =========================================================================

    /// Populate identity fields and read the raw content.
    ///
    /// An unreadable source is not fatal: content becomes empty and a warning
    /// is logged.
    pub fn setup(&mut self, layout: &Layout) -> Result<(), ArtifactError> {
        let src = layout
            .relative_source(&self.source)
            .ok_or_else(|| ArtifactError::NonUtf8Path(self.source.clone()))?;
        let dst = self
            .destination
            .strip_prefix(&layout.output)
            .ok()
            .and_then(Path::to_str)
            .ok_or_else(|| ArtifactError::NonUtf8Path(self.destination.clone()))?
            .replace('\\', "/");
        let url = layout.url(&self.destination, self.kind.is_page())?;
        let title = title_for(&self.source, self.kind, &layout.source);

        self.context.insert("src", src);
        self.context.insert("dst", dst);
        self.context.insert("url", url);
        self.context.insert("title", title);
        self.context.insert("kind", self.kind.as_str());

        if self.kind.is_page() {
            let raw = match self.kind {
                ArtifactKind::NavPage => String::new(),
                _ => read_content(&self.source),
            };
            self.context.insert("raw_content", raw);
        }
        Ok(())
    }

    pub fn build_context(&mut self, sub_pages: Vec<Value>) {
        if self.kind.is_page() {
            self.context.insert("sub_pages", sub_pages);
        }
    }

    /// Convert raw content to an HTML fragment.
    ///
    /// Unsupported formats pass through unchanged with a warning.
    pub fn convert_content(&mut self) -> Result<(), ArtifactError> {
        let Some(format) = self.format() else {
            if self.kind == ArtifactKind::NavPage {
                self.context.insert("content", "");
            }
            return Ok(());
        };
        let raw = self.require_str("raw_content")?;
        let content = match convert::to_html(raw, &format) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(path = %self.source.display(), error = %e, "passing content through unconverted");
                raw.to_string()
            }
        };
        self.context.insert("content", content);
        Ok(())
    }

    /// Render the converted fragment as a template against site + own context.
    pub fn render_content(&mut self, site: &Context, templates: &Templates) -> Result<(), ArtifactError> {
        if !self.kind.is_page() {
            return Ok(());
        }
        let rendered = templates.render_fragment(self.require_str("content")?, &[site, &self.context])?;
        self.context.insert("rendered_content", rendered);
        Ok(())
    }

    /// Wrap the rendered fragment in the page or nav template.
    pub fn render_artifact(&mut self, site: &Context, templates: &Templates) -> Result<(), ArtifactError> {
        let Some(role) = self.template_role() else {
            return Ok(());
        };
        let content = self.require_str("rendered_content")?;
        let html = templates.render(role, &[site, &self.context], content)?;
        self.context.insert("html", html);
        Ok(())
    }

    /// Write the rendered page, or copy the asset bytes.
    pub fn write(&self) -> Result<(), ArtifactError> {
        match self.kind {
            ArtifactKind::Asset => crate::write::copy_file(&self.source, &self.destination)?,
            _ => crate::write::write_file(&self.destination, self.require_str("html")?.as_bytes())?,
        }
        Ok(())
    }
}

fn read_content(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read content; using empty page");
            String::new()
        }
    }
}
