/* src/server/engine/rust/src/enumerate.rs */

//! Collects the public URL set fed into sitemap partitioning.

use serde::{Deserialize, Serialize};

use crate::category::{Category, Locale, TemplateType, category_index_path, generate_page_path};
use crate::sitemap::{ChangeFreq, MAX_SITEMAP_BYTES, MAX_URLS_PER_SITEMAP, SitemapEntry};

const CURRENCY_PAIRS: &[&str] = &[
  "usd-eur", "eur-usd", "gbp-usd", "usd-gbp", "jpy-usd", "usd-jpy", "eur-gbp", "gbp-eur",
  "usd-cad", "cad-usd", "aud-usd", "usd-aud", "usd-chf", "chf-usd", "usd-cny", "cny-usd",
  "usd-inr", "inr-usd",
];

const SWIFT_CODES: &[&str] = &[
  "BOFAUS3N", "CHASUS33", "CITIUS33", "DEUTDEFF", "UBSWCHZH", "RZBAATWW", "BNPAFRPP", "CRESCHZZ",
  "DABADKKK", "ESSEGB2L", "GENODEF1", "HANDDEFF", "INGBNL2A", "JPMBCH6L", "KREUTZZ",
];

const COUNTRIES: &[&str] = &[
  "usa", "india", "uk", "germany", "france", "japan", "canada", "australia", "china", "brazil",
  "russia", "south-korea", "italy", "spain", "netherlands", "switzerland", "sweden", "norway",
];

const BANKING_TYPES: &[&str] = &[
  "swift-code", "iban-number", "routing-number", "sort-code", "bsb-code", "ifsc-code",
  "micr-code", "account-number",
];

/// Built-in identifier sets per template type, capped at `max`.
/// Custom (or unset) templates get `sample-1..=max`.
pub fn sample_identifiers(template_type: Option<TemplateType>, max: usize) -> Vec<String> {
  let set = match template_type {
    Some(TemplateType::Converter) => CURRENCY_PAIRS,
    Some(TemplateType::Directory) => SWIFT_CODES,
    Some(TemplateType::News) => COUNTRIES,
    Some(TemplateType::Information) => BANKING_TYPES,
    Some(TemplateType::Custom) | None => {
      return (1..=max).map(|i| format!("sample-{i}")).collect();
    }
  };
  set.iter().take(max).map(|s| (*s).to_string()).collect()
}

fn default_max_urls() -> usize {
  MAX_URLS_PER_SITEMAP
}
fn default_max_size() -> usize {
  MAX_SITEMAP_BYTES
}
fn default_changefreq() -> ChangeFreq {
  ChangeFreq::Weekly
}
fn default_priority() -> f64 {
  0.5
}
fn default_sample_count() -> usize {
  20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapConfig {
  pub base_url: String,
  #[serde(default = "default_max_urls")]
  pub max_urls_per_sitemap: usize,
  #[serde(default = "default_max_size")]
  pub max_sitemap_size: usize,
  #[serde(default = "default_changefreq")]
  pub changefreq: ChangeFreq,
  #[serde(default = "default_priority")]
  pub priority: f64,
  /// Identifiers enumerated per category and locale.
  #[serde(default = "default_sample_count")]
  pub sample_identifiers: usize,
}

impl SitemapConfig {
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      max_urls_per_sitemap: default_max_urls(),
      max_sitemap_size: default_max_size(),
      changefreq: default_changefreq(),
      priority: default_priority(),
      sample_identifiers: default_sample_count(),
    }
  }
}

/// An editorial page listed alongside the programmatic ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmsPage {
  /// Site-relative path, e.g. `/about`.
  pub path: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lastmod: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub changefreq: Option<ChangeFreq>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<f64>,
}

/// Accumulates sitemap entries. Programmatic and category index pages come
/// first in insertion order, CMS pages after them.
#[derive(Debug, Clone)]
pub struct UrlEnumerator {
  config: SitemapConfig,
  default_locale: String,
  lastmod: Option<String>,
  programmatic: Vec<SitemapEntry>,
  cms: Vec<SitemapEntry>,
}

impl UrlEnumerator {
  pub fn new(config: SitemapConfig, default_locale: impl Into<String>) -> Self {
    Self {
      config,
      default_locale: default_locale.into(),
      lastmod: None,
      programmatic: Vec::new(),
      cms: Vec::new(),
    }
  }

  /// Timestamp stamped on every generated entry.
  pub fn lastmod(mut self, lastmod: impl Into<String>) -> Self {
    self.lastmod = Some(lastmod.into());
    self
  }

  pub fn config(&self) -> &SitemapConfig {
    &self.config
  }

  fn url_for(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url)
  }

  fn stamp(&self, entry: SitemapEntry) -> SitemapEntry {
    match self.lastmod {
      Some(ref lastmod) => entry.lastmod(lastmod.clone()),
      None => entry,
    }
  }

  /// One entry per active category, supported active locale and sample
  /// identifier.
  pub fn add_programmatic_pages(&mut self, categories: &[Category], locales: &[Locale]) {
    for category in categories.iter().filter(|c| c.is_active) {
      let identifiers = sample_identifiers(category.template_type, self.config.sample_identifiers);
      for locale in supported_locales(category, locales) {
        for identifier in &identifiers {
          let path = generate_page_path(category, identifier, &locale.code, &self.default_locale);
          let entry = SitemapEntry::new(self.url_for(&path))
            .changefreq(self.config.changefreq)
            .priority(self.config.priority);
          let entry = self.stamp(entry);
          self.programmatic.push(entry);
        }
      }
    }
  }

  /// Category landing pages, refreshed daily at higher priority.
  pub fn add_category_index_pages(&mut self, categories: &[Category], locales: &[Locale]) {
    for category in categories.iter().filter(|c| c.is_active) {
      for locale in supported_locales(category, locales) {
        let path = category_index_path(category, &locale.code, &self.default_locale);
        let entry =
          SitemapEntry::new(self.url_for(&path)).changefreq(ChangeFreq::Daily).priority(0.8);
        let entry = self.stamp(entry);
        self.programmatic.push(entry);
      }
    }
  }

  /// Per-page values override the config defaults.
  pub fn add_cms_pages(&mut self, pages: &[CmsPage]) {
    for page in pages {
      let mut entry = SitemapEntry::new(self.url_for(&page.path))
        .changefreq(page.changefreq.unwrap_or(self.config.changefreq))
        .priority(page.priority.unwrap_or(self.config.priority));
      entry = match page.lastmod {
        Some(ref lastmod) => entry.lastmod(lastmod.clone()),
        None => self.stamp(entry),
      };
      self.cms.push(entry);
    }
  }

  pub fn len(&self) -> usize {
    self.programmatic.len() + self.cms.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn into_entries(self) -> Vec<SitemapEntry> {
    let mut entries = self.programmatic;
    entries.extend(self.cms);
    entries
  }
}

fn supported_locales<'a>(
  category: &'a Category,
  locales: &'a [Locale],
) -> impl Iterator<Item = &'a Locale> + 'a {
  locales.iter().filter(|l| l.is_active && category.supports_locale(&l.code))
}
