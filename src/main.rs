use clap::{Parser, Subcommand};
use pagewright::{config, output, site, write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagewright")]
#[command(about = "Static site generator for plain directories of pages")]
#[command(long_about = "\
Static site generator for plain directories of pages

Your filesystem is the site. Every page file becomes a pretty URL, assets are
copied as-is, and directories without an index get a generated listing page.

Content structure:

  src/
  ├── pagewright.toml       # Site config (optional)
  ├── index.md              # → /
  ├── about.md              # → /about/
  ├── blog/                 # Two pages, no index → nav page at /blog/
  │   ├── first-post.md     # → /blog/first-post/
  │   └── second-post.md    # → /blog/second-post/
  ├── docs/                 # One child → collapses, links go straight through
  │   └── intro.md          # → /docs/intro/
  └── css/site.css          # Asset → /css/site.css

Page content is a Jinja template: {{ placeholders }}, {% for %} and
{% if %} blocks see the site context and the page's own fields.

Run 'pagewright gen-config' to generate a documented pagewright.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./pagewright.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source directory (overrides config)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log progress at info level (RUST_LOG takes over when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site: discover → set up → render → write
    Build {
        /// Remove the output directory first
        #[arg(long)]
        clean: bool,
    },
    /// Remove the output directory
    Clean,
    /// Discover and plan the site without writing anything
    Check,
    /// Print a stock pagewright.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Build { clean } => {
            let (site_config, config_path) = load_site_config(&cli)?;
            init_thread_pool(&site_config.processing);
            if *clean && write::clean(&site_config.output)? {
                println!("==> Cleaned {}", site_config.output.display());
            }
            println!(
                "==> Building {} \u{2192} {}",
                site_config.source.display(),
                site_config.output.display()
            );
            let report = site::build(&site_config, config_path.as_deref())?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", report.output.display());
            if !report.failures.is_empty() {
                return Err(format!("{} artifact(s) skipped", report.failures.len()).into());
            }
        }
        Command::Clean => {
            let (site_config, _) = load_site_config(&cli)?;
            if write::clean(&site_config.output)? {
                println!("==> Removed {}", site_config.output.display());
            } else {
                println!("==> Nothing to clean at {}", site_config.output.display());
            }
        }
        Command::Check => {
            let (site_config, config_path) = load_site_config(&cli)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", site_config.source.display());
            let site = site::Site::load(&site_config, config_path.as_deref())?;
            output::print_check_output(&site);
            println!("==> Site is valid");
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or info with `--verbose`.
fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("info"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file (explicit or `./pagewright.toml`) and apply CLI overrides.
///
/// Returns the config file path when one was read, so discovery can skip it.
fn load_site_config(cli: &Cli) -> Result<(config::SiteConfig, Option<PathBuf>), config::ConfigError> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE_NAME));
    if cli.config.is_some() && !path.exists() {
        return Err(config::ConfigError::Validation(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let mut site_config = config::load_config(&path)?;
    if let Some(source) = &cli.source {
        site_config.source = source.clone();
    }
    if let Some(output) = &cli.output {
        site_config.output = output.clone();
    }
    let read = path.exists().then(|| absolute_or(&path));
    Ok((site_config, read))
}

fn absolute_or(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
