//! Directory collapsing and navigation listings.
//!
//! A directory with exactly one navigable child (a page, or a directory that
//! holds pages) is noise: it gets no page of its own, and links to it go
//! straight through to that child. Every other page directory without an
//! index file gets a synthetic nav page when `auto_nav_pages` is on.
//!
//! ```text
//! src/
//! ├── index.md
//! ├── blog/            two children, no index → nav page /blog/
//! │   ├── post1.md
//! │   └── post2.md
//! └── docs/            one child → collapses
//!     └── guide/       one child → collapses
//!         └── intro.md root page listing shows /docs/guide/intro/
//! ```
//!
//! [`Navigator`] answers "what does this path link to" with an iterative
//! drill-down guarded by a visited set.

use crate::artifact::{Artifact, Layout};
use crate::paths::PathSet;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Whether `dir` has exactly one navigable child.
pub fn collapses(paths: &PathSet, dir: &Path) -> bool {
    paths.children(dir).len() == 1
}

/// Page directories that need a synthetic nav page.
///
/// A directory qualifies when no page already claims its destination and it
/// does not collapse.
pub fn auto_nav_dirs(paths: &PathSet, layout: &Layout, claimed: &HashSet<PathBuf>) -> Vec<PathBuf> {
    paths
        .page_dirs
        .iter()
        .filter(|dir| {
            layout
                .dir_destination(dir)
                .is_some_and(|dest| !claimed.contains(&dest))
        })
        .filter(|dir| !collapses(paths, dir))
        .cloned()
        .collect()
}

/// Resolves source paths to the artifacts that represent them.
pub struct Navigator<'a> {
    paths: &'a PathSet,
    layout: &'a Layout,
    artifacts: &'a [Artifact],
    by_source: HashMap<&'a Path, usize>,
    by_destination: HashMap<&'a Path, usize>,
}

impl<'a> Navigator<'a> {
    pub fn new(paths: &'a PathSet, layout: &'a Layout, artifacts: &'a [Artifact]) -> Self {
        let mut by_source = HashMap::new();
        let mut by_destination = HashMap::new();
        for (i, artifact) in artifacts.iter().enumerate() {
            if artifact.kind.is_page() {
                by_source.insert(artifact.source.as_path(), i);
                by_destination.insert(artifact.destination.as_path(), i);
            }
        }
        Self {
            paths,
            layout,
            artifacts,
            by_source,
            by_destination,
        }
    }

    fn live(&self, index: usize) -> Option<usize> {
        self.artifacts[index].is_live().then_some(index)
    }

    /// The artifact a page file or page directory links to.
    ///
    /// Files map to their own artifact. A directory maps to the page that
    /// claims its destination, else drills into its single child while it
    /// collapses, else to its nav page. `None` when nothing represents it.
    pub fn resolve(&self, start: &Path) -> Option<usize> {
        let mut current = start;
        let mut visited: HashSet<&Path> = HashSet::new();
        loop {
            if !visited.insert(current) {
                tracing::warn!(path = %current.display(), "navigation cycle; skipping");
                return None;
            }
            if self.paths.page_paths.contains(current) {
                return self.by_source.get(current).and_then(|&i| self.live(i));
            }
            if let Some(&i) = self
                .layout
                .dir_destination(current)
                .and_then(|dest| self.by_destination.get(dest.as_path()))
            {
                return self.live(i);
            }
            let children = self.paths.children(current);
            if let [only] = children.as_slice() {
                current = *only;
                continue;
            }
            return self.by_source.get(current).and_then(|&i| self.live(i));
        }
    }

    /// One entry per navigable child of `dir`, in path order, deduplicated.
    pub fn listing(&self, dir: &Path) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.paths
            .children(dir)
            .into_iter()
            .filter_map(|child| self.resolve(child))
            .filter(|i| seen.insert(*i))
            .collect()
    }

    /// Top-level navigable units of the site.
    pub fn root_pages(&self) -> Vec<usize> {
        self.listing(&self.paths.source)
    }

    /// The directory whose contents a page introduces.
    ///
    /// Nav pages stand for their directory, `index.*` for its parent, and
    /// `name.*` for a sibling `name/` directory when one holds pages.
    pub fn represented_dir(&self, artifact: &Artifact) -> Option<PathBuf> {
        if !artifact.kind.is_page() {
            return None;
        }
        if artifact.kind == crate::artifact::ArtifactKind::NavPage {
            return Some(artifact.source.clone());
        }
        let stem = artifact.source.file_stem()?;
        let parent = artifact.source.parent()?;
        if stem == "index" {
            return Some(parent.to_path_buf());
        }
        let sibling = parent.join(stem);
        self.paths.page_dirs.contains(&sibling).then_some(sibling)
    }

    /// Pages listed under artifact `index`, sorted by title.
    pub fn sub_pages(&self, index: usize) -> Vec<usize> {
        let Some(dir) = self.represented_dir(&self.artifacts[index]) else {
            return Vec::new();
        };
        let mut subs: Vec<usize> = self
            .listing(&dir)
            .into_iter()
            .filter(|&i| i != index)
            .collect();
        subs.sort_by(|&a, &b| self.sort_title(a).cmp(&self.sort_title(b)));
        subs
    }

    /// Summaries of [`Self::sub_pages`], ready for a template context.
    pub fn sub_page_summaries(&self, index: usize) -> Vec<Value> {
        self.sub_pages(index)
            .into_iter()
            .map(|i| self.artifacts[i].summary())
            .collect()
    }

    fn sort_title(&self, index: usize) -> String {
        self.artifacts[index].title().unwrap_or("").to_lowercase()
    }
}
