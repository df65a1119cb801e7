//! CLI output formatting.
//!
//! Output leads with what a page *is* (positional index and title) and shows
//! paths as secondary context on indented lines, so `check` reads as a content
//! inventory and `build` as a table of where each page went.
//!
//! ## Check
//!
//! ```text
//! Home: Welcome → / (title contains "welcome")
//!
//! Pages
//! 001 Welcome
//!     Source: index.md
//! 002 Blog (nav)
//!     Source: blog/
//!     001 First Post
//!         Source: blog/first-post.md
//!
//! Assets
//!     css/site.css
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Welcome → index.html
//! 002 Blog → blog/index.html
//! 003 First Post → blog/first-post/index.html
//!
//! Skipped
//!     broken.md (render-content): template error: syntax error: unexpected end of input (in <string>:3)
//!
//! Built 2 pages, 1 nav page, 1 asset
//! ```
//!
//! Each view has a `format_*` function returning lines and a `print_*`
//! wrapper. Format functions do no I/O.

use crate::artifact::{ArtifactKind, Status};
use crate::home::HomeSource;
use crate::site::{BuildReport, Site};
use std::collections::HashSet;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 Blog (nav)` for nav pages, `001 About` otherwise.
fn entity_header(index: usize, title: &str, kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::NavPage => format!("{} {} (nav)", format_index(index), title),
        _ => format!("{} {}", format_index(index), title),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

fn home_reason(source: HomeSource) -> String {
    match source {
        HomeSource::Configured => "configured".to_string(),
        HomeSource::Keyword(word) => format!("title contains \"{}\"", word),
        HomeSource::FirstRootPage => "first root page".to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// A flattened node from walking root pages and their sub-pages.
struct TreeNode {
    depth: usize,
    position: usize,
    artifact: usize,
}

fn walk_pages(site: &Site) -> Vec<TreeNode> {
    let navigator = site.navigator();
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(0, site.root_pages.clone(), 0)];

    while let Some((depth, items, next)) = stack.pop() {
        let Some(&artifact) = items.get(next) else {
            continue;
        };
        stack.push((depth, items, next + 1));
        if !seen.insert(artifact) {
            continue;
        }
        nodes.push(TreeNode {
            depth,
            position: next + 1,
            artifact,
        });
        // The root index already lists every root page
        if navigator.represented_dir(&site.artifacts[artifact]).as_deref() == Some(site.paths.source.as_path()) {
            continue;
        }
        let children = navigator.sub_pages(artifact);
        if !children.is_empty() {
            stack.push((depth + 1, children, 0));
        }
    }
    nodes
}

/// Format the planned site: home choice, page tree, assets, setup failures.
pub fn format_check_output(site: &Site) -> Vec<String> {
    let mut lines = Vec::new();
    let home = &site.artifacts[site.home];
    lines.push(format!(
        "Home: {} \u{2192} {} ({})",
        home.title().unwrap_or(""),
        home.url().unwrap_or("/"),
        home_reason(site.home_source)
    ));

    lines.push(String::new());
    lines.push("Pages".to_string());
    for node in walk_pages(site) {
        let artifact = &site.artifacts[node.artifact];
        let base = indent(node.depth);
        let title = artifact.title().unwrap_or("");
        lines.push(format!("{}{}", base, entity_header(node.position, title, artifact.kind)));
        let src = artifact.context().get_str("src").unwrap_or("");
        let suffix = if artifact.kind == ArtifactKind::NavPage { "/" } else { "" };
        lines.push(format!("{}    Source: {}{}", base, src, suffix));
    }

    let assets: Vec<&str> = site
        .artifacts
        .iter()
        .filter(|a| a.kind == ArtifactKind::Asset && a.is_live())
        .filter_map(|a| a.context().get_str("src"))
        .collect();
    if !assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for src in assets {
            lines.push(format!("    {}", src));
        }
    }

    let failed: Vec<String> = site
        .artifacts
        .iter()
        .filter_map(|a| match a.status() {
            Status::Failed { phase, reason } => {
                Some(format!("    {} ({}): {}", a.source.display(), phase, reason))
            }
            Status::Live => None,
        })
        .collect();
    if !failed.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        lines.extend(failed);
    }

    lines
}

pub fn print_check_output(site: &Site) {
    for line in format_check_output(site) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format build results: one line per written page, failures, totals.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.title,
            page.dst
        ));
    }

    if let Some(url) = &report.redirect {
        lines.push(format!("Redirect index.html \u{2192} {}", url));
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "    {} ({}): {}",
                failure.src, failure.phase, failure.reason
            ));
        }
    }

    let nav = report
        .pages
        .iter()
        .filter(|p| p.kind == ArtifactKind::NavPage)
        .count();
    lines.push(String::new());
    lines.push(format!(
        "Built {}, {}, {}",
        plural(report.pages.len() - nav, "page", "pages"),
        plural(nav, "nav page", "nav pages"),
        plural(report.assets, "asset", "assets")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
