//! # Pagewright
//!
//! A static site generator for plain directories of pages. The source tree
//! is the site: page files (HTML, Markdown, plain text) become pretty URLs,
//! assets are copied through, and directories without an index page get a
//! generated listing.
//!
//! # Architecture: Phased Artifact Pipeline
//!
//! Every output file is an [`artifact::Artifact`]: one source path, one
//! destination, a kind fixed at discovery, and a context that the build phases
//! fill in:
//!
//! ```text
//! paths::discover   src/ → PathSet                  (globs, hidden + output excluded)
//! site::collect     PathSet → Vec<Artifact>         (pages, nav pages, assets)
//! Setup             src/dst/url/title/raw_content
//! site context      pages, root_pages, home, stylesheets, user context
//! BuildContext      sub_pages
//! ConvertContent    markdown / text / html → HTML fragment
//! RenderContent     fragment rendered as a template
//! RenderArtifact    fragment wrapped in the page or nav template
//! Write             output/…, plus a root redirect when nothing owns index.html
//! ```
//!
//! Phases run one after another over all artifacts; inside a phase artifacts
//! are processed in parallel with rayon. An artifact that fails a phase is
//! logged and skipped from then on. The rest of the site still builds.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Source discovery and the page-directory model |
//! | [`artifact`] | Artifact kinds, destinations, URLs, and per-artifact phases |
//! | [`nav`] | Directory collapsing, auto nav pages, listings and sub-pages |
//! | [`home`] | Choosing the home page |
//! | [`site`] | The pipeline driver and build report |
//! | [`template`] | Jinja page, nav and content templates (minijinja) |
//! | [`context`] | Ordered key/value contexts for templates |
//! | [`convert`] | Markdown and plain-text conversion |
//! | [`naming`] | Display titles and prettified URL paths |
//! | [`config`] | `pagewright.toml` loading, validation, built-in stylesheets |
//! | [`write`] | Output files, the root redirect, `clean` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Index Pages Own Their Directory
//!
//! `about.md` and `about/index.md` both land at `about/index.html`, so every
//! page URL ends in `/`. A page named like a sibling directory (`guides.md`
//! next to `guides/`) introduces that directory: it claims the URL and lists
//! the directory's pages as its `sub_pages`.
//!
//! ## Collapsing
//!
//! A directory with a single navigable child is not a level of navigation.
//! It gets no page, and links to it resolve through to the child. This is
//! applied repeatedly, so `docs/guide/intro.md` alone shows up at the root as
//! a link to `/docs/guide/intro/`.
//!
//! ## Templates In Content
//!
//! Page content is itself a template. A Markdown page can write
//! `{{ name }}` or loop over `root_pages` without a separate layout. Values
//! are HTML-escaped on output; only the rendered body passed to the page
//! template as `content` is trusted as markup.

pub mod artifact;
pub mod config;
pub mod context;
pub mod convert;
pub mod home;
pub mod naming;
pub mod nav;
pub mod output;
pub mod paths;
pub mod site;
pub mod template;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;
