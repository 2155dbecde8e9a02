/* src/cli/core/src/config/types.rs */

use anyhow::{Result, bail};
use pseo_server::SelectionSettings;
use pseo_server::pseo_engine::{
  ChangeFreq, CmsPage, DEFAULT_SLOTS, ExclusionScope, LocalePolicy, RankingPolicy, SelectionPolicy,
  SitemapConfig,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PseoConfig {
  pub project: ProjectConfig,
  pub site: SiteSection,
  #[serde(default)]
  pub data: DataSection,
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub selection: SelectionSection,
  #[serde(default)]
  pub sitemap: SitemapSection,
  #[serde(default)]
  pub server: ServerSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
  pub base_url: String,
  #[serde(default = "default_locale")]
  pub default_locale: String,
}

impl SiteSection {
  pub fn validate(&self) -> Result<()> {
    let url = self.base_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
      bail!("site.base_url must be an absolute http(s) URL, got \"{}\"", self.base_url);
    }
    if self.default_locale.trim().is_empty() {
      bail!("site.default_locale must not be empty");
    }
    Ok(())
  }
}

fn default_locale() -> String {
  "en".to_string()
}

/// JSON data files, relative to the directory holding `pseo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
  #[serde(default = "default_blocks_path")]
  pub blocks: String,
  #[serde(default = "default_categories_path")]
  pub categories: String,
  #[serde(default = "default_locales_path")]
  pub locales: String,
}

impl Default for DataSection {
  fn default() -> Self {
    Self {
      blocks: default_blocks_path(),
      categories: default_categories_path(),
      locales: default_locales_path(),
    }
  }
}

fn default_blocks_path() -> String {
  "data/blocks.json".to_string()
}

fn default_categories_path() -> String {
  "data/categories.json".to_string()
}

fn default_locales_path() -> String {
  "data/locales.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
  #[serde(default = "default_out_dir")]
  pub out_dir: String,
  pub salt: Option<String>,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self { out_dir: default_out_dir(), salt: None }
  }
}

fn default_out_dir() -> String {
  "dist".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionSection {
  pub slots: Option<Vec<String>>,
  pub max_per_slot: Option<usize>,
  #[serde(default)]
  pub locale_policy: LocalePolicy,
  #[serde(default)]
  pub ranking: RankingPolicy,
  #[serde(default)]
  pub exclusion_scope: ExclusionScope,
}

impl SelectionSection {
  pub fn settings(&self) -> SelectionSettings {
    let defaults = SelectionSettings::default();
    SelectionSettings {
      slots: self
        .slots
        .clone()
        .unwrap_or_else(|| DEFAULT_SLOTS.iter().map(|s| (*s).to_string()).collect()),
      max_per_slot: self.max_per_slot.unwrap_or(defaults.max_per_slot),
      policy: SelectionPolicy {
        locale: self.locale_policy,
        ranking: self.ranking,
        exclusion_scope: self.exclusion_scope,
      },
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitemapSection {
  pub max_urls_per_sitemap: Option<usize>,
  pub max_sitemap_size: Option<usize>,
  pub changefreq: Option<ChangeFreq>,
  pub priority: Option<f64>,
  pub sample_identifiers: Option<usize>,
  /// Fixed `<lastmod>`; the build date when omitted.
  pub lastmod: Option<String>,
  #[serde(default)]
  pub cms_pages: Vec<CmsPage>,
}

impl SitemapSection {
  pub fn validate(&self) -> Result<()> {
    if let Some(p) = self.priority {
      if !(0.0..=1.0).contains(&p) {
        bail!("sitemap.priority must be between 0.0 and 1.0, got {p}");
      }
    }
    if self.max_urls_per_sitemap == Some(0) {
      bail!("sitemap.max_urls_per_sitemap must be at least 1");
    }
    Ok(())
  }

  pub fn config(&self, base_url: &str) -> SitemapConfig {
    let defaults = SitemapConfig::new(base_url);
    SitemapConfig {
      max_urls_per_sitemap: self.max_urls_per_sitemap.unwrap_or(defaults.max_urls_per_sitemap),
      max_sitemap_size: self.max_sitemap_size.unwrap_or(defaults.max_sitemap_size),
      changefreq: self.changefreq.unwrap_or(defaults.changefreq),
      priority: self.priority.unwrap_or(defaults.priority),
      sample_identifiers: self.sample_identifiers.unwrap_or(defaults.sample_identifiers),
      ..defaults
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_port")]
  pub port: u16,
}

impl Default for ServerSection {
  fn default() -> Self {
    Self { port: default_port() }
  }
}

fn default_port() -> u16 {
  3000
}

pub const SALT_ENV: &str = "PSEO_BUILD_SALT";

/// Build salt precedence: explicit flag, then `PSEO_BUILD_SALT`, then
/// `[build].salt`, then `"dev"`. Blank values are skipped.
pub fn resolve_salt(flag: Option<&str>, env: Option<&str>, configured: Option<&str>) -> String {
  [flag, env, configured]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or("dev")
    .to_string()
}

impl PseoConfig {
  pub fn validate(&self) -> Result<()> {
    self.site.validate()?;
    self.sitemap.validate()?;
    if self.selection.max_per_slot == Some(0) {
      bail!("selection.max_per_slot must be at least 1");
    }
    Ok(())
  }

  /// Salt for this run, reading `PSEO_BUILD_SALT` from the environment.
  pub fn build_salt(&self, flag: Option<&str>) -> String {
    let env = std::env::var(SALT_ENV).ok();
    resolve_salt(flag, env.as_deref(), self.build.salt.as_deref())
  }
}
