/* src/cli/core/src/data.rs */

use std::path::Path;

use anyhow::{Context, Result};
use pseo_server::SiteServer;
use pseo_server::pseo_engine::{Category, ContentBlock, Locale};
use serde::de::DeserializeOwned;

use crate::config::PseoConfig;

/// Blocks, categories and locales read from the configured JSON files.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
  pub blocks: Vec<ContentBlock>,
  pub categories: Vec<Category>,
  pub locales: Vec<Locale>,
}

fn read_json<T: DeserializeOwned>(base_dir: &Path, rel: &str) -> Result<Vec<T>> {
  let path = base_dir.join(rel);
  let content =
    std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

impl SiteData {
  pub fn load(config: &PseoConfig, base_dir: &Path) -> Result<Self> {
    let data = Self {
      blocks: read_json(base_dir, &config.data.blocks)?,
      categories: read_json(base_dir, &config.data.categories)?,
      locales: read_json(base_dir, &config.data.locales)?,
    };
    tracing::debug!(
      blocks = data.blocks.len(),
      categories = data.categories.len(),
      locales = data.locales.len(),
      "site data loaded"
    );
    Ok(data)
  }

  /// Wire the data and config into a server builder.
  pub fn into_server(self, config: &PseoConfig, salt: &str, lastmod: &str) -> SiteServer {
    SiteServer::new(&config.site.base_url)
      .fallback_locale(&config.site.default_locale)
      .build_salt(salt)
      .site_name(&config.project.name)
      .selection(config.selection.settings())
      .sitemap(config.sitemap.config(&config.site.base_url))
      .cms_pages(config.sitemap.cms_pages.clone())
      .lastmod(lastmod)
      .blocks(self.blocks)
      .categories(self.categories)
      .locales(self.locales)
  }
}

/// `[sitemap].lastmod`, else today's UTC date.
pub fn lastmod(config: &PseoConfig) -> String {
  config
    .sitemap
    .lastmod
    .clone()
    .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
}
