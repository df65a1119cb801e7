//! Shared test utilities for the pagewright test suite.
//!
//! Two kinds of fixture:
//!
//! - [`write_tree`] lays out real files in a temp directory for tests that
//!   touch the filesystem (discovery, phases, full builds).
//! - [`model`] builds an in-memory site from a list of page paths under a
//!   synthetic `/site/src` root, for navigation and home tests that only care
//!   about path shapes.
//!
//! ```rust
//! let m = model(&["index.md", "blog/a.md", "blog/b.md"], true);
//! let nav = m.navigator();
//! let blog = m.find("blog");
//! assert_eq!(nav.sub_pages(blog).len(), 2);
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, Layout};
use crate::nav::Navigator;
use crate::paths::PathSet;
use crate::site::collect_artifacts;

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(root).unwrap();
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}

// =========================================================================
// In-memory site model
// =========================================================================

pub struct Model {
    pub paths: PathSet,
    pub layout: Layout,
    pub artifacts: Vec<Artifact>,
}

impl Model {
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.paths, &self.layout, &self.artifacts)
    }

    /// Index of the artifact whose source is `rel` under the site root.
    pub fn find(&self, rel: &str) -> usize {
        let wanted = self.paths.source.join(rel);
        self.artifacts
            .iter()
            .position(|a| a.source == wanted)
            .unwrap_or_else(|| panic!("no artifact for '{rel}'"))
    }
}

/// Collect and set up artifacts for `pages` without touching the disk.
///
/// Sources do not exist, so every page has empty content.
pub fn model(pages: &[&str], auto_nav: bool) -> Model {
    let source = PathBuf::from("/site/src");
    let page_paths: BTreeSet<PathBuf> = pages.iter().map(|p| source.join(p)).collect();
    let paths = PathSet::new(source.clone(), page_paths, BTreeSet::new());
    let layout = Layout {
        source,
        output: PathBuf::from("/site/out"),
        prettify: true,
    };
    let mut artifacts = collect_artifacts(&paths, &layout, auto_nav);
    for artifact in &mut artifacts {
        artifact.setup(&layout).unwrap();
    }
    Model {
        paths,
        layout,
        artifacts,
    }
}
