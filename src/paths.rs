//! Source discovery: glob patterns to classified file sets.
//!
//! Walks the source tree once and matches every file's source-relative path
//! against the page and asset patterns. The result is a [`PathSet`] of
//! absolute, sorted, deduplicated paths plus the derived directory set that
//! navigation works from.
//!
//! ## Exclusions
//!
//! Applied in order:
//! 1. anything inside the output directory (a previous build)
//! 2. explicitly excluded files (the config file, template files)
//! 3. for pages, anything that also matches an asset pattern
//!
//! Hidden entries (`.git`, `.DS_Store`, ...) are never traversed.

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("symlink cycle: {path} points back to {ancestor}")]
    SymlinkCycle { path: PathBuf, ancestor: PathBuf },
    #[error("cannot traverse source tree: {0}")]
    Walk(#[from] walkdir::Error),
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// What to look for and what to leave out.
#[derive(Debug, Clone)]
pub struct DiscoveryRules<'a> {
    pub pages: &'a [String],
    pub assets: &'a [String],
    /// Files never returned, whatever they match.
    pub excluded: &'a [PathBuf],
}

/// Classified source paths for one build.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    /// Canonical source root.
    pub source: PathBuf,
    pub page_paths: BTreeSet<PathBuf>,
    pub asset_paths: BTreeSet<PathBuf>,
    /// Every ancestor directory of a page, source root excluded.
    pub page_dirs: BTreeSet<PathBuf>,
}

impl PathSet {
    /// Build a path set from already-classified pages and assets.
    pub fn new(source: PathBuf, page_paths: BTreeSet<PathBuf>, asset_paths: BTreeSet<PathBuf>) -> Self {
        let page_dirs = page_paths
            .iter()
            .flat_map(|p| p.ancestors().skip(1))
            .filter(|dir| dir.starts_with(&source) && *dir != source.as_path())
            .map(Path::to_path_buf)
            .collect();
        Self {
            source,
            page_paths,
            asset_paths,
            page_dirs,
        }
    }

    /// The union of pages and page directories.
    pub fn page_dirs_and_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.page_dirs.iter().chain(self.page_paths.iter())
    }

    /// Immediate navigable children of `dir`, sorted by path.
    pub fn children(&self, dir: &Path) -> Vec<&Path> {
        let mut out: Vec<&Path> = self
            .page_dirs_and_paths()
            .filter(|p| p.parent() == Some(dir))
            .map(PathBuf::as_path)
            .collect();
        out.sort();
        out
    }

    /// Source-relative form of a path, with `/` separators.
    pub fn relative(&self, path: &Path) -> Option<String> {
        relative_str(&self.source, path)
    }
}

fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DiscoveryError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| DiscoveryError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], rel: &str) -> bool {
    patterns.iter().any(|p| p.matches_with(rel, MATCH_OPTIONS))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Make a path absolute, resolving symlinks when it exists.
pub fn absolutize(path: &Path) -> Result<PathBuf, std::io::Error> {
    match fs::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(_) => std::path::absolute(path),
    }
}

/// Walk `source` and classify every file against the rules.
pub fn discover(source: &Path, output: &Path, rules: &DiscoveryRules) -> Result<PathSet, DiscoveryError> {
    let source = fs::canonicalize(source).map_err(|_| DiscoveryError::MissingSource(source.to_path_buf()))?;
    if !source.is_dir() {
        return Err(DiscoveryError::MissingSource(source));
    }
    let output = absolutize(output)?;
    let excluded: Vec<PathBuf> = rules
        .excluded
        .iter()
        .map(|p| absolutize(p))
        .collect::<Result<_, _>>()?;

    let page_patterns = compile(rules.pages)?;
    let asset_patterns = compile(rules.assets)?;

    let mut pages = BTreeSet::new();
    let mut assets = BTreeSet::new();

    let walker = WalkDir::new(&source)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e) && !e.path().starts_with(&output));

    for entry in walker {
        let entry = entry.map_err(|err| {
            if let Some(ancestor) = err.loop_ancestor() {
                return DiscoveryError::SymlinkCycle {
                    path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                    ancestor: ancestor.to_path_buf(),
                };
            }
            DiscoveryError::Walk(err)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if excluded.iter().any(|x| x == path) {
            continue;
        }
        let Some(rel) = relative_str(&source, path) else {
            continue;
        };

        if matches_any(&asset_patterns, &rel) {
            assets.insert(path.to_path_buf());
        } else if matches_any(&page_patterns, &rel) {
            pages.insert(path.to_path_buf());
        }
    }

    tracing::info!(pages = pages.len(), assets = assets.len(), "discovered sources");
    Ok(PathSet::new(source, pages, assets))
}
