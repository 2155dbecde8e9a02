/* src/server/core/rust/src/sitemap.rs */

use std::sync::Arc;

use pseo_engine::category::default_locale_code;
use pseo_engine::sitemap::{chunk_index, oversized_chunks};
use pseo_engine::{
  Category, CmsPage, Locale, SitemapChunk, SitemapConfig, SitemapEntry, SitemapOptions,
  SitemapStats, UrlEnumerator, ValidationResult, chunk, index_xml, robots_txt, stats, urlset_xml,
  validate,
};
use serde::Serialize;

use crate::errors::PseoError;
use crate::store::Repository;

/// A validated, partitioned sitemap ready to be served or written out.
#[derive(Debug, Clone)]
pub struct SitemapBuild {
  pub chunks: Vec<SitemapChunk>,
  pub stats: SitemapStats,
  options: SitemapOptions,
}

impl SitemapBuild {
  pub fn index_xml(&self) -> String {
    index_xml(&self.chunks, &self.options)
  }

  pub fn robots_txt(&self) -> String {
    robots_txt(&self.chunks, &self.options)
  }

  /// Rendered urlset for `sitemap-N.xml`, if that chunk exists.
  pub fn chunk_xml(&self, filename: &str) -> Option<String> {
    let index = chunk_index(filename)?;
    self.chunks.get(index).map(|c| urlset_xml(&c.urls))
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSummary {
  pub index: usize,
  pub filename: String,
  pub url_count: usize,
  pub size_bytes: usize,
  /// First few locations, for eyeballing.
  pub sample_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapReport {
  pub validation: ValidationResult,
  pub chunks: Vec<ChunkSummary>,
  pub statistics: SitemapStats,
  pub oversized: Vec<String>,
}

pub struct SitemapService {
  categories: Arc<dyn Repository<Category>>,
  locales: Arc<dyn Repository<Locale>>,
  config: SitemapConfig,
  fallback_locale: String,
  cms_pages: Vec<CmsPage>,
  lastmod: Option<String>,
}

impl SitemapService {
  pub fn new(
    categories: Arc<dyn Repository<Category>>,
    locales: Arc<dyn Repository<Locale>>,
    config: SitemapConfig,
    fallback_locale: &str,
  ) -> Self {
    Self {
      categories,
      locales,
      config,
      fallback_locale: fallback_locale.to_string(),
      cms_pages: Vec::new(),
      lastmod: None,
    }
  }

  pub fn cms_pages(mut self, pages: Vec<CmsPage>) -> Self {
    self.cms_pages = pages;
    self
  }

  pub fn lastmod(mut self, lastmod: Option<String>) -> Self {
    self.lastmod = lastmod;
    self
  }

  pub fn config(&self) -> &SitemapConfig {
    &self.config
  }

  fn options(&self) -> SitemapOptions {
    let options = SitemapOptions::new(&self.config.base_url);
    match self.lastmod {
      Some(ref lastmod) => options.with_lastmod(lastmod.clone()),
      None => options,
    }
  }

  /// Enumerate every public URL from the current store contents.
  pub fn entries(&self) -> Result<Vec<SitemapEntry>, PseoError> {
    let categories = self.categories.list()?;
    let locales = self.locales.list()?;
    let default_locale = default_locale_code(&locales, &self.fallback_locale);

    let mut enumerator = UrlEnumerator::new(self.config.clone(), default_locale);
    if let Some(ref lastmod) = self.lastmod {
      enumerator = enumerator.lastmod(lastmod.clone());
    }
    enumerator.add_programmatic_pages(&categories, &locales);
    enumerator.add_category_index_pages(&categories, &locales);
    enumerator.add_cms_pages(&self.cms_pages);
    Ok(enumerator.into_entries())
  }

  /// Enumerate, validate and partition. Fails closed: any validation error
  /// aborts the build and no partial sitemap is produced.
  pub fn build(&self) -> Result<SitemapBuild, PseoError> {
    let entries = self.entries()?;
    let validation = validate(&entries);
    if !validation.valid {
      tracing::error!(errors = validation.errors.len(), "sitemap validation failed");
      return Err(PseoError::internal("Sitemap validation failed").with_details(validation.errors));
    }

    let chunks = chunk(&entries, self.config.max_urls_per_sitemap);
    for big in oversized_chunks(&chunks, self.config.max_sitemap_size) {
      tracing::warn!(chunk = %big.filename, bytes = big.size, "sitemap chunk exceeds size limit");
    }
    let stats = stats(&entries, &chunks);
    tracing::info!(
      urls = stats.total_urls,
      chunks = stats.total_chunks,
      bytes = stats.total_size,
      largest = stats.largest_chunk,
      "sitemap built"
    );

    Ok(SitemapBuild { chunks, stats, options: self.options() })
  }

  /// robots.txt for the current chunk layout. Only the chunk count matters
  /// here, so entries are not validated.
  pub fn robots_txt(&self) -> Result<String, PseoError> {
    let entries = self.entries()?;
    let chunks = chunk(&entries, self.config.max_urls_per_sitemap);
    Ok(robots_txt(&chunks, &self.options()))
  }

  /// Validation and statistics without failing on invalid entries.
  pub fn report(&self) -> Result<SitemapReport, PseoError> {
    let entries = self.entries()?;
    let validation = validate(&entries);
    let chunks = chunk(&entries, self.config.max_urls_per_sitemap);
    let oversized = oversized_chunks(&chunks, self.config.max_sitemap_size)
      .iter()
      .map(|c| c.filename.clone())
      .collect();
    let summaries = chunks
      .iter()
      .enumerate()
      .map(|(index, c)| ChunkSummary {
        index,
        filename: c.filename.clone(),
        url_count: c.urls.len(),
        size_bytes: c.size,
        sample_urls: c.urls.iter().take(3).map(|u| u.loc.clone()).collect(),
      })
      .collect();
    Ok(SitemapReport {
      statistics: stats(&entries, &chunks),
      validation,
      chunks: summaries,
      oversized,
    })
  }
}
