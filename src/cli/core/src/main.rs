/* src/cli/core/src/main.rs */

mod build;
mod check;
mod config;
mod data;
mod select;
mod serve;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{PseoConfig, config_dir, find_pseo_config, load_pseo_config};

#[derive(Parser)]
#[command(name = "pseo", about = "Programmatic SEO site tooling")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Enumerate URLs, validate them and write the partitioned sitemap
  Build {
    /// Path to pseo.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Build salt (overrides PSEO_BUILD_SALT and [build].salt)
    #[arg(long)]
    salt: Option<String>,
    /// Output directory (overrides [build].out_dir)
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Check blocks, categories, locales and sitemap URLs
  Validate {
    /// Path to pseo.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
  },
  /// Print the block selection for one page path
  Select {
    /// Site-relative page path, e.g. /fr/currency/usd-eur
    path: String,
    /// Path to pseo.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Build salt (overrides PSEO_BUILD_SALT and [build].salt)
    #[arg(long)]
    salt: Option<String>,
    /// Print the full page view instead of block ids
    #[arg(long)]
    full: bool,
  },
  /// Serve sitemaps, page and admin APIs over HTTP
  Serve {
    /// Path to pseo.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Build salt (overrides PSEO_BUILD_SALT and [build].salt)
    #[arg(long)]
    salt: Option<String>,
    /// Port (overrides [server].port)
    #[arg(short, long)]
    port: Option<u16>,
  },
}

/// Resolve config path (explicit or auto-detected) and parse it
fn resolve_config(explicit: Option<PathBuf>) -> Result<(PathBuf, PseoConfig)> {
  let path = match explicit {
    Some(p) => p,
    None => {
      let cwd = std::env::current_dir().context("failed to get cwd")?;
      find_pseo_config(&cwd)?
    }
  };
  let config = load_pseo_config(&path)?;
  Ok((config_dir(&path), config))
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  // stderr keeps `pseo select` output pipeable
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  match cli.command {
    Command::Build { config, salt, out } => {
      let (base_dir, config) = resolve_config(config)?;
      let salt = config.build_salt(salt.as_deref());
      build::run_build(&config, &base_dir, &salt, out)?;
    }
    Command::Validate { config } => {
      let (base_dir, config) = resolve_config(config)?;
      check::run_validate(&config, &base_dir)?;
    }
    Command::Select { path, config, salt, full } => {
      let (base_dir, config) = resolve_config(config)?;
      let salt = config.build_salt(salt.as_deref());
      select::run_select(&config, &base_dir, &path, &salt, full)?;
    }
    Command::Serve { config, salt, port } => {
      let (base_dir, config) = resolve_config(config)?;
      let salt = config.build_salt(salt.as_deref());
      serve::run_serve(&config, &base_dir, &salt, port).await?;
    }
  }

  Ok(())
}
