//! Site configuration module.
//!
//! Handles loading, validating, and merging `pagewright.toml`. Stock defaults
//! are the base layer; the user's file only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "."                 # Directory scanned for pages and assets
//! output = "output"            # Directory the site is written to
//! pages = ["**/*.html", "**/*.md", "**/*.txt"]
//! assets = ["**/*.css", "**/*.js", "**/*.png", "CNAME"]  # (abridged)
//! prettify_urls = true         # my_Dir/Page.md -> /my-dir/page/
//! auto_nav_pages = true        # Generate index pages for directories
//!
//! # home = "welcome.md"        # Source file used as the home page
//! # name = "My Site"
//! # icon = "favicon.png"       # Asset paths, relative to `source`
//! # logo = "logo.svg"          # Falls back to `icon`
//! # stylesheet = "water"       # Built-in name or any URL
//! # template = "layout.html"   # Path, or inline markup
//! # nav_template = "nav.html"
//!
//! [context]                    # Extra values available to every template
//! # author = "Jane"
//!
//! [processing]
//! # max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pagewright.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("cannot read template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Site configuration loaded from `pagewright.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory scanned for content.
    pub source: PathBuf,
    /// Directory the built site is written to.
    pub output: PathBuf,
    /// Glob patterns (relative to `source`) selecting page files.
    pub pages: Vec<String>,
    /// Glob patterns selecting files copied verbatim.
    pub assets: Vec<String>,
    /// Source file of the home page, relative to `source`.
    pub home: Option<PathBuf>,
    /// Page template: inline markup or a path relative to `source`.
    pub template: Option<String>,
    /// Template for generated directory pages.
    pub nav_template: Option<String>,
    /// Normalize directory names in URLs.
    pub prettify_urls: bool,
    /// Generate navigation pages for directories without an index.
    pub auto_nav_pages: bool,
    /// Site name, exposed to templates as `name`.
    pub name: Option<String>,
    pub icon: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    /// Built-in stylesheet name (see [`BUILTIN_STYLESHEETS`]) or a URL.
    pub stylesheet: Option<String>,
    /// Free-form values merged into every template context.
    pub context: toml::Table,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

fn default_pages() -> Vec<String> {
    ["**/*.html", "**/*.md", "**/*.txt"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_assets() -> Vec<String> {
    [
        "**/*.css",
        "**/*.js",
        "**/*.png",
        "**/*.svg",
        "**/*.jpg",
        "**/*.jpeg",
        "**/*.gif",
        "CNAME",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            output: PathBuf::from("output"),
            pages: default_pages(),
            assets: default_assets(),
            home: None,
            template: None,
            nav_template: None,
            prettify_urls: true,
            auto_nav_pages: true,
            name: None,
            icon: None,
            logo: None,
            stylesheet: None,
            context: toml::Table::new(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.is_empty() {
            return Err(ConfigError::Validation("pages must not be empty".into()));
        }
        if self.pages.iter().chain(&self.assets).any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "glob patterns must not be blank".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.stylesheet.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "stylesheet must not be empty".into(),
            ));
        }
        if self.home.as_ref().is_some_and(|h| h.as_os_str().is_empty()) {
            return Err(ConfigError::Validation("home must not be empty".into()));
        }
        Ok(())
    }

    /// Resolve `source` and `output` against a base directory.
    ///
    /// Paths in a config file are relative to the directory that holds it.
    pub fn rooted_at(mut self, base: &Path) -> Self {
        if self.source.is_relative() {
            self.source = base.join(&self.source);
        }
        if self.output.is_relative() {
            self.output = base.join(&self.output);
        }
        self
    }

    /// The `context` table as a JSON object for templates.
    pub fn context_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.context
            .iter()
            .filter_map(|(key, value)| {
                serde_json::to_value(value)
                    .ok()
                    .map(|json| (key.clone(), json))
            })
            .collect()
    }

    /// The stylesheet URL, with built-in names resolved.
    pub fn stylesheet_url(&self) -> Option<String> {
        self.stylesheet
            .as_deref()
            .map(|value| builtin_stylesheet(value).unwrap_or(value).to_string())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Stylesheets
// =============================================================================

/// Classless stylesheets selectable by name in `stylesheet = "..."`.
pub const BUILTIN_STYLESHEETS: &[(&str, &str)] = &[
    ("almond", "https://unpkg.com/almond.css@latest/dist/almond.lite.min.css"),
    ("axist", "https://unpkg.com/axist@latest/dist/axist.min.css"),
    ("bahunya", "https://cdn.jsdelivr.net/gh/kimeiga/bahunya/dist/bahunya.min.css"),
    ("bolt", "https://unpkg.com/boltcss/bolt.min.css"),
    (
        "concrete",
        "https://cdnjs.cloudflare.com/ajax/libs/concrete.css/3.0.0/concrete.min.css",
    ),
    ("holiday", "https://cdn.jsdelivr.net/npm/holiday.css@0.11.2"),
    ("magick", "https://unpkg.com/magick.css"),
    ("mvp", "https://unpkg.com/mvp.css"),
    ("new", "https://cdn.jsdelivr.net/npm/@exampledev/new.css@1/new.min.css"),
    (
        "pico",
        "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.classless.min.css",
    ),
    ("sakura", "https://cdn.jsdelivr.net/npm/sakura.css/css/sakura.css"),
    ("spcss", "https://cdn.jsdelivr.net/npm/spcss@0.9.0"),
    ("style", "https://unpkg.com/style.css"),
    (
        "tacit",
        "https://cdn.jsdelivr.net/gh/yegor256/tacit@gh-pages/tacit-css-1.8.1.min.css",
    ),
    ("tiny", "https://cdn.jsdelivr.net/npm/tiny.css@0/dist/tiny.css"),
    ("tty", "https://unpkg.com/tty.css"),
    ("water", "https://cdn.jsdelivr.net/npm/water.css@2/out/water.css"),
];

/// Look up a built-in stylesheet by name (case-insensitive).
pub fn builtin_stylesheet(name: &str) -> Option<&'static str> {
    BUILTIN_STYLESHEETS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
        .map(|(_, url)| *url)
}

// =============================================================================
// Templates
// =============================================================================

const DEFAULT_PAGE_TEMPLATE: &str = include_str!("../static/page.html");
const DEFAULT_NAV_TEMPLATE: &str = include_str!("../static/nav.html");

static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</\S+ *>").expect("closing tag pattern is valid"));

/// Template bodies for a build, plus the files they were read from.
#[derive(Debug, Clone)]
pub struct TemplateSources {
    pub page: String,
    pub nav: String,
    /// Template files on disk; never treated as pages.
    pub files: Vec<PathBuf>,
}

/// Resolve the page and nav templates.
///
/// A value containing a closing tag is inline markup; anything else is a path
/// relative to `source`. Unset values use the built-in templates.
pub fn load_templates(config: &SiteConfig, source: &Path) -> Result<TemplateSources, ConfigError> {
    let mut files = Vec::new();
    let page = resolve_template(config.template.as_deref(), DEFAULT_PAGE_TEMPLATE, source, &mut files)?;
    let nav = resolve_template(config.nav_template.as_deref(), DEFAULT_NAV_TEMPLATE, source, &mut files)?;
    Ok(TemplateSources { page, nav, files })
}

fn resolve_template(
    value: Option<&str>,
    fallback: &str,
    source: &Path,
    files: &mut Vec<PathBuf>,
) -> Result<String, ConfigError> {
    let Some(value) = value else {
        return Ok(fallback.to_string());
    };
    if CLOSING_TAG.is_match(value) {
        return Ok(value.to_string());
    }
    let path = source.join(value);
    let body = fs::read_to_string(&path).map_err(|source| ConfigError::Template {
        path: path.clone(),
        source,
    })?;
    files.push(path);
    Ok(body)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to defaults when absent.
///
/// Relative `source`/`output` values are resolved against the file's
/// directory.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let config = resolve_config(base, overlay)?;
    let dir = path.parent().unwrap_or(Path::new("."));
    Ok(config.rooted_at(dir))
}

/// Returns a fully-commented stock `pagewright.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Pagewright Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Relative paths are resolved against the directory holding this file.
# Unknown keys will cause an error.

# Directory scanned for pages and assets.
source = "."

# Directory the site is written to. Never scanned for content.
output = "output"

# ---------------------------------------------------------------------------
# Discovery
# ---------------------------------------------------------------------------
# Glob patterns relative to `source`. A file matching an asset pattern is
# never a page.
pages = ["**/*.html", "**/*.md", "**/*.txt"]
assets = ["**/*.css", "**/*.js", "**/*.png", "**/*.svg", "**/*.jpg", "**/*.jpeg", "**/*.gif", "CNAME"]

# ---------------------------------------------------------------------------
# Structure
# ---------------------------------------------------------------------------
# Lowercase and hyphenate directory names in URLs: "My Notes/" -> "/my-notes/".
prettify_urls = true

# Generate a navigation page for every directory that has no index file and
# more than one child.
auto_nav_pages = true

# Source file of the home page. When unset, a top-level page whose title
# contains "home", "main", "landing" or "welcome" is used, else the first one.
# home = "welcome.md"

# ---------------------------------------------------------------------------
# Presentation
# ---------------------------------------------------------------------------
# name = "My Site"
# icon = "favicon.png"
# logo = "logo.svg"          # Defaults to the icon.

# A built-in classless stylesheet or any URL. Built-ins: almond, axist,
# bahunya, bolt, concrete, holiday, magick, mvp, new, pico, sakura, spcss,
# style, tacit, tiny, tty, water.
# stylesheet = "water"

# Templates: a path relative to `source`, or inline markup.
# template = "layout.html"
# nav_template = "nav.html"

# ---------------------------------------------------------------------------
# Template context
# ---------------------------------------------------------------------------
# Every key here is available to templates, e.g. {{ author }}.
[context]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_paths() {
        let config = SiteConfig::default();
        assert_eq!(config.source, PathBuf::from("."));
        assert_eq!(config.output, PathBuf::from("output"));
    }

    #[test]
    fn default_config_globs() {
        let config = SiteConfig::default();
        assert_eq!(config.pages, vec!["**/*.html", "**/*.md", "**/*.txt"]);
        assert!(config.assets.contains(&"CNAME".to_string()));
        assert!(config.assets.contains(&"**/*.css".to_string()));
    }

    #[test]
    fn default_config_flags() {
        let config = SiteConfig::default();
        assert!(config.prettify_urls);
        assert!(config.auto_nav_pages);
        assert!(config.home.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
home = "welcome.md"
prettify_urls = false
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        // Overridden values
        assert_eq!(config.home, Some(PathBuf::from("welcome.md")));
        assert!(!config.prettify_urls);
        // Default values preserved
        assert!(config.auto_nav_pages);
        assert_eq!(config.pages.len(), 3);
    }

    #[test]
    fn parse_context_table() {
        let toml = r#"
[context]
author = "Jane"
year = 2024
tags = ["a", "b"]
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let ctx = config.context_json();
        assert_eq!(ctx["author"], serde_json::json!("Jane"));
        assert_eq!(ctx["year"], serde_json::json!(2024));
        assert_eq!(ctx["tags"], serde_json::json!(["a", "b"]));
    }

    // =========================================================================
    // Stylesheet tests
    // =========================================================================

    #[test]
    fn builtin_stylesheet_resolves_names() {
        assert_eq!(
            builtin_stylesheet("water"),
            Some("https://cdn.jsdelivr.net/npm/water.css@2/out/water.css")
        );
        assert_eq!(builtin_stylesheet("Sakura"), builtin_stylesheet("sakura"));
        assert_eq!(builtin_stylesheet("nope"), None);
    }

    #[test]
    fn stylesheet_url_passes_custom_urls_through() {
        let config = SiteConfig {
            stylesheet: Some("/css/site.css".into()),
            ..SiteConfig::default()
        };
        assert_eq!(config.stylesheet_url().as_deref(), Some("/css/site.css"));
    }

    #[test]
    fn stylesheet_url_resolves_builtin() {
        let config = SiteConfig {
            stylesheet: Some("mvp".into()),
            ..SiteConfig::default()
        };
        assert_eq!(config.stylesheet_url().as_deref(), Some("https://unpkg.com/mvp.css"));
    }

    // =========================================================================
    // Template loading tests
    // =========================================================================

    #[test]
    fn load_templates_uses_builtins_by_default() {
        let tmp = TempDir::new().unwrap();
        let templates = load_templates(&SiteConfig::default(), tmp.path()).unwrap();
        assert!(templates.page.contains("{{ content }}"));
        assert!(templates.nav.contains("sub_pages"));
        assert!(templates.files.is_empty());
    }

    #[test]
    fn load_templates_accepts_inline_markup() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            template: Some("<main>{{ content }}</main>".into()),
            ..SiteConfig::default()
        };
        let templates = load_templates(&config, tmp.path()).unwrap();
        assert_eq!(templates.page, "<main>{{ content }}</main>");
        assert!(templates.files.is_empty());
    }

    #[test]
    fn load_templates_reads_paths_relative_to_source() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("layout.html"), "<body>{{ content }}</body>").unwrap();
        let config = SiteConfig {
            template: Some("layout.html".into()),
            ..SiteConfig::default()
        };
        let templates = load_templates(&config, tmp.path()).unwrap();
        assert_eq!(templates.page, "<body>{{ content }}</body>");
        assert_eq!(templates.files, vec![tmp.path().join("layout.html")]);
    }

    #[test]
    fn load_templates_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            nav_template: Some("missing.html".into()),
            ..SiteConfig::default()
        };
        let result = load_templates(&config, tmp.path());
        assert!(matches!(result, Err(ConfigError::Template { .. })));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();

        assert!(config.prettify_urls);
        assert_eq!(config.source, tmp.path().join("."));
        assert_eq!(config.output, tmp.path().join("output"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);

        fs::write(
            &config_path,
            r#"
source = "content"
name = "Notes"
stylesheet = "water"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.source, tmp.path().join("content"));
        assert_eq!(config.name.as_deref(), Some("Notes"));
        assert_eq!(config.stylesheet.as_deref(), Some("water"));
    }

    #[test]
    fn load_config_keeps_absolute_paths() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        let out = tmp.path().join("elsewhere");
        fs::write(&config_path, format!("output = {:?}\n", out.to_str().unwrap())).unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.output, out);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml [[[").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn default_processing_config() {
        let config = ProcessingConfig::default();
        assert_eq!(config.max_processes, None);
    }

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let threads = effective_threads(&config);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let threads = effective_threads(&config);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"prettify_urls = true"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"prettify_urls = false"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("prettify_urls").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[context]
author = "Jane"
year = 2023
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[context]
year = 2024
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let ctx = merged.get("context").unwrap();
        assert_eq!(ctx.get("author").unwrap().as_str(), Some("Jane"));
        assert_eq!(ctx.get("year").unwrap().as_integer(), Some(2024));
    }

    #[test]
    fn merge_toml_lists_replace() {
        let base: toml::Value = toml::from_str(r#"pages = ["**/*.md", "**/*.txt"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"pages = ["**/*.md"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("pages").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
prettyfy_urls = false
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = r#"
[processing]
workers = 2
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn context_accepts_any_key() {
        let toml_str = r#"
[context]
anything_goes = { nested = true }
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_ok());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "outptu = \"site\"\n").unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_pages() {
        let config = SiteConfig {
            pages: vec![],
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "pages = []\n").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let content = stock_config_toml();
        let config: SiteConfig = toml::from_str(content).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.pages, defaults.pages);
        assert_eq!(config.assets, defaults.assets);
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.prettify_urls, defaults.prettify_urls);
        assert_eq!(config.auto_nav_pages, defaults.auto_nav_pages);
    }

    #[test]
    fn stock_config_toml_lists_every_builtin_stylesheet() {
        let content = stock_config_toml();
        for (name, _) in BUILTIN_STYLESHEETS {
            assert!(content.contains(name), "missing {name}");
        }
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        assert!(val.get("processing").is_some());
        assert!(val.get("home").is_none());
    }
}
