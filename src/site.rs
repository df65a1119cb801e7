//! The build pipeline.
//!
//! ```text
//! discover → collect artifacts → Setup → site BuildContext (+ home)
//!          → BuildContext → ConvertContent → RenderContent → RenderArtifact → Write
//!          → root redirect (only when nothing owns index.html)
//! ```
//!
//! Every phase runs over all artifacts before the next one starts. Within a
//! phase, artifacts are processed in parallel on the rayon pool; each one only
//! mutates itself and reads data computed by earlier phases.
//!
//! Errors split in two. Whole-build problems (config, discovery, no content,
//! a broken page or nav template) abort with [`BuildError`]. A failure in one
//! artifact is logged with its source path, marks that artifact dead, and the
//! rest of the site still builds.

use crate::artifact::{Artifact, ArtifactError, ArtifactKind, Layout, Phase, Status, TemplateRole};
use crate::config::{self, ConfigError, SiteConfig};
use crate::context::Context;
use crate::home::{self, HomeError, HomeSource};
use crate::nav::{self, Navigator};
use crate::paths::{self, DiscoveryError, DiscoveryRules, PathSet};
use crate::template::{TemplateError, Templates};
use crate::write;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("{0}")]
    Home(#[from] HomeError),
    #[error("{role} template: {source}")]
    Template {
        role: &'static str,
        source: TemplateError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn compile(templates: &mut Templates, role: TemplateRole, body: String) -> Result<(), BuildError> {
    templates.add(role, body).map_err(|source| BuildError::Template {
        role: role.as_str(),
        source,
    })
}

/// Create one artifact per discovered path plus nav pages for directories.
///
/// Pages claim destinations first, then nav pages, then assets. A path whose
/// destination is already claimed is dropped with a warning.
pub fn collect_artifacts(paths: &PathSet, layout: &Layout, auto_nav: bool) -> Vec<Artifact> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut artifacts = Vec::new();

    let mut claim = |source: &Path, destination: Option<PathBuf>, kind: ArtifactKind, out: &mut Vec<Artifact>| {
        let Some(destination) = destination else {
            tracing::warn!(path = %source.display(), "no output path for source; skipping");
            return;
        };
        if !claimed.insert(destination.clone()) {
            tracing::warn!(
                path = %source.display(),
                destination = %destination.display(),
                "output path already taken; skipping"
            );
            return;
        }
        out.push(Artifact::new(source.to_path_buf(), destination, kind));
    };

    for path in &paths.page_paths {
        claim(path.as_path(), layout.page_destination(path), ArtifactKind::for_page(path), &mut artifacts);
    }

    if auto_nav {
        let pages_claimed: HashSet<PathBuf> = artifacts.iter().map(|a| a.destination.clone()).collect();
        for dir in nav::auto_nav_dirs(paths, layout, &pages_claimed) {
            claim(dir.as_path(), layout.dir_destination(&dir), ArtifactKind::NavPage, &mut artifacts);
        }
    }

    for path in &paths.asset_paths {
        claim(path.as_path(), layout.asset_destination(path), ArtifactKind::Asset, &mut artifacts);
    }

    artifacts
}

/// Run one phase over every live artifact.
///
/// A failing artifact is logged and marked dead for all later phases.
fn run_phase<F>(artifacts: &mut [Artifact], phase: Phase, f: F)
where
    F: Fn(usize, &mut Artifact) -> Result<(), ArtifactError> + Sync + Send,
{
    tracing::info!(%phase, "running phase");
    artifacts
        .par_iter_mut()
        .enumerate()
        .filter(|(_, artifact)| artifact.is_live())
        .for_each(|(i, artifact)| {
            if let Err(e) = f(i, artifact) {
                tracing::warn!(
                    path = %artifact.source.display(),
                    %phase,
                    error = %e,
                    "artifact skipped"
                );
                artifact.fail(phase, e.to_string());
            }
        });
}

/// A discovered, set-up site ready to render.
#[derive(Debug)]
pub struct Site {
    pub layout: Layout,
    pub paths: PathSet,
    pub artifacts: Vec<Artifact>,
    /// Site-wide template context.
    pub context: Context,
    pub home: usize,
    pub home_source: HomeSource,
    /// Top-level pages, home first.
    pub root_pages: Vec<usize>,
    templates: Templates,
}

impl Site {
    /// Discover sources, run Setup, and build the site context.
    ///
    /// `config_path` is excluded from discovery.
    pub fn load(config: &SiteConfig, config_path: Option<&Path>) -> Result<Self, BuildError> {
        let sources = config::load_templates(config, &config.source)?;
        let mut templates = Templates::new();
        compile(&mut templates, TemplateRole::Page, sources.page)?;
        compile(&mut templates, TemplateRole::Nav, sources.nav)?;

        let mut excluded = sources.files;
        excluded.extend(config_path.map(Path::to_path_buf));
        let rules = DiscoveryRules {
            pages: &config.pages,
            assets: &config.assets,
            excluded: &excluded,
        };
        let paths = paths::discover(&config.source, &config.output, &rules)?;
        let layout = Layout {
            source: paths.source.clone(),
            output: paths::absolutize(&config.output)?,
            prettify: config.prettify_urls,
        };

        let mut artifacts = collect_artifacts(&paths, &layout, config.auto_nav_pages);
        run_phase(&mut artifacts, Phase::Setup, |_, a| a.setup(&layout));

        tracing::info!(phase = "site-context", "running phase");
        let navigator = Navigator::new(&paths, &layout, &artifacts);
        let mut root_pages = navigator.root_pages();
        let (home, home_source) =
            home::resolve_home(config.home.as_deref(), &layout.source, &artifacts, &root_pages)?;
        home::home_first(&mut root_pages, home);
        let context = site_context(config, &layout, &artifacts, &root_pages, home);

        Ok(Self {
            layout,
            paths,
            artifacts,
            context,
            home,
            home_source,
            root_pages,
            templates,
        })
    }

    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.paths, &self.layout, &self.artifacts)
    }

    pub fn home_url(&self) -> &str {
        self.artifacts[self.home].url().unwrap_or("/")
    }

    /// Run BuildContext through RenderArtifact.
    pub fn render(&mut self) {
        let sub_pages: Vec<Vec<Value>> = {
            let navigator = self.navigator();
            (0..self.artifacts.len())
                .into_par_iter()
                .map(|i| navigator.sub_page_summaries(i))
                .collect()
        };
        run_phase(&mut self.artifacts, Phase::BuildContext, |i, a| {
            a.build_context(sub_pages[i].clone());
            Ok(())
        });

        run_phase(&mut self.artifacts, Phase::ConvertContent, |_, a| a.convert_content());

        let site = &self.context;
        let templates = &self.templates;
        run_phase(&mut self.artifacts, Phase::RenderContent, |_, a| a.render_content(site, templates));
        run_phase(&mut self.artifacts, Phase::RenderArtifact, |_, a| {
            a.render_artifact(site, templates)
        });
    }

    /// Write every live artifact, then the root redirect if needed.
    pub fn write(&mut self) -> Result<BuildReport, BuildError> {
        run_phase(&mut self.artifacts, Phase::Write, |_, a| a.write());

        let root_index = self.layout.output.join("index.html");
        let redirect = if self.artifacts.iter().any(|a| a.destination == root_index) {
            None
        } else {
            let url = self.home_url().to_string();
            write::write_redirect(&self.layout.output, &url)?;
            Some(url)
        };
        Ok(self.report(redirect))
    }

    fn report(&self, redirect: Option<String>) -> BuildReport {
        let mut report = BuildReport {
            output: self.layout.output.clone(),
            home: self.home_url().to_string(),
            redirect,
            ..BuildReport::default()
        };
        for artifact in &self.artifacts {
            let ctx = artifact.context();
            let src = ctx
                .get_str("src")
                .map(str::to_string)
                .unwrap_or_else(|| artifact.source.display().to_string());
            match artifact.status() {
                Status::Failed { phase, reason } => report.failures.push(Failure {
                    src,
                    phase: *phase,
                    reason: reason.clone(),
                }),
                Status::Live if artifact.kind == ArtifactKind::Asset => report.assets += 1,
                Status::Live => report.pages.push(ReportEntry {
                    title: artifact.title().unwrap_or("").to_string(),
                    kind: artifact.kind,
                    src,
                    dst: ctx.get_str("dst").unwrap_or("").to_string(),
                }),
            }
        }
        report
    }
}

/// Resolve an `icon`/`logo` setting to a URL.
///
/// Full URLs pass through; anything else must be a discovered asset.
fn asset_url(setting: &Path, layout: &Layout, artifacts: &[Artifact]) -> Option<String> {
    let raw = setting.to_string_lossy();
    if raw.contains("://") {
        return Some(raw.into_owned());
    }
    let wanted = layout.source.join(setting);
    let wanted = paths::absolutize(&wanted).unwrap_or(wanted);
    let found = artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Asset && a.is_live() && a.source == wanted)
        .and_then(|a| a.url().map(str::to_string));
    if found.is_none() {
        tracing::warn!(path = %setting.display(), "branding image is not a discovered asset; ignoring");
    }
    found
}

/// Site-wide context shared by every template.
///
/// User `context` values go in first so built-in keys take precedence.
fn site_context(
    config: &SiteConfig,
    layout: &Layout,
    artifacts: &[Artifact],
    root_pages: &[usize],
    home: usize,
) -> Context {
    let mut ctx = Context::from(config.context_json());
    let live = || artifacts.iter().filter(|a| a.is_live());

    let all: Vec<Value> = live().map(Artifact::summary).collect();
    let pages: Vec<Value> = live().filter(|a| a.kind.is_page()).map(Artifact::summary).collect();
    let stylesheets: Vec<Value> = live()
        .filter(|a| a.kind == ArtifactKind::Asset)
        .filter(|a| a.source.extension().is_some_and(|e| e.eq_ignore_ascii_case("css")))
        .filter_map(|a| a.url().map(Value::from))
        .collect();
    let roots: Vec<Value> = root_pages.iter().map(|&i| artifacts[i].summary()).collect();

    let icon = config.icon.as_deref().and_then(|p| asset_url(p, layout, artifacts));
    let logo = config
        .logo
        .as_deref()
        .and_then(|p| asset_url(p, layout, artifacts))
        .or_else(|| icon.clone());

    ctx.insert("name", config.name.clone());
    ctx.insert("artifacts", all);
    ctx.insert("pages", pages);
    ctx.insert("stylesheets", stylesheets);
    ctx.insert("stylesheet", config.stylesheet_url());
    ctx.insert("root_pages", roots);
    ctx.insert("home", artifacts[home].url().unwrap_or("/"));
    ctx.insert("icon", icon);
    ctx.insert("logo", logo);
    ctx
}

/// One rendered page in a [`BuildReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub title: String,
    pub kind: ArtifactKind,
    pub src: String,
    pub dst: String,
}

/// An artifact that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub src: String,
    pub phase: Phase,
    pub reason: String,
}

/// What a build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub output: PathBuf,
    pub home: String,
    pub pages: Vec<ReportEntry>,
    pub assets: usize,
    pub failures: Vec<Failure>,
    /// Home URL the root redirect points to, when one was written.
    pub redirect: Option<String>,
}

/// Full build: load, render, write.
pub fn build(config: &SiteConfig, config_path: Option<&Path>) -> Result<BuildReport, BuildError> {
    let mut site = Site::load(config, config_path)?;
    site.render();
    site.write()
}
