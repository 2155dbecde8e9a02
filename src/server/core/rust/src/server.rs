/* src/server/core/rust/src/server.rs */

use std::sync::Arc;

use pseo_engine::{Category, CmsPage, ContentBlock, Locale, SitemapConfig};

use crate::admin::AdminService;
use crate::page::{PageResolver, SelectionSettings};
use crate::sitemap::SitemapService;
use crate::store::{InMemoryRepository, Repository};

/// Framework-agnostic parts extracted from `SiteServer`.
/// Adapter crates consume this to build framework-specific routers.
pub struct SiteParts {
  pub admin: Arc<AdminService>,
  pub pages: Arc<PageResolver>,
  pub sitemaps: Arc<SitemapService>,
}

pub struct SiteServer {
  base_url: String,
  fallback_locale: String,
  build_salt: String,
  selection: SelectionSettings,
  sitemap: Option<SitemapConfig>,
  cms_pages: Vec<CmsPage>,
  lastmod: Option<String>,
  site_name: String,
  blocks: Arc<dyn Repository<ContentBlock>>,
  categories: Arc<dyn Repository<Category>>,
  locales: Arc<dyn Repository<Locale>>,
}

impl SiteServer {
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      fallback_locale: "en".to_string(),
      build_salt: "dev".to_string(),
      selection: SelectionSettings::default(),
      sitemap: None,
      cms_pages: Vec::new(),
      lastmod: None,
      site_name: String::new(),
      blocks: Arc::new(InMemoryRepository::<ContentBlock>::default()),
      categories: Arc::new(InMemoryRepository::<Category>::default()),
      locales: Arc::new(InMemoryRepository::<Locale>::default()),
    }
  }

  /// Locale used when the store holds no default.
  pub fn fallback_locale(mut self, code: &str) -> Self {
    self.fallback_locale = code.to_string();
    self
  }

  pub fn build_salt(mut self, salt: &str) -> Self {
    self.build_salt = salt.to_string();
    self
  }

  pub fn selection(mut self, selection: SelectionSettings) -> Self {
    self.selection = selection;
    self
  }

  /// Override sitemap limits; `base_url` is always taken from the server.
  pub fn sitemap(mut self, config: SitemapConfig) -> Self {
    self.sitemap = Some(config);
    self
  }

  pub fn cms_pages(mut self, pages: Vec<CmsPage>) -> Self {
    self.cms_pages = pages;
    self
  }

  pub fn lastmod(mut self, lastmod: impl Into<String>) -> Self {
    self.lastmod = Some(lastmod.into());
    self
  }

  /// Publisher name for structured data.
  pub fn site_name(mut self, name: &str) -> Self {
    self.site_name = name.to_string();
    self
  }

  pub fn blocks(self, blocks: Vec<ContentBlock>) -> Self {
    self.block_store(Arc::new(InMemoryRepository::new(blocks)))
  }

  pub fn categories(self, categories: Vec<Category>) -> Self {
    self.category_store(Arc::new(InMemoryRepository::new(categories)))
  }

  pub fn locales(self, locales: Vec<Locale>) -> Self {
    self.locale_store(Arc::new(InMemoryRepository::new(locales)))
  }

  pub fn block_store(mut self, store: Arc<dyn Repository<ContentBlock>>) -> Self {
    self.blocks = store;
    self
  }

  pub fn category_store(mut self, store: Arc<dyn Repository<Category>>) -> Self {
    self.categories = store;
    self
  }

  pub fn locale_store(mut self, store: Arc<dyn Repository<Locale>>) -> Self {
    self.locales = store;
    self
  }

  /// Consume the builder, returning framework-agnostic parts for an adapter.
  /// All services share the same stores, so admin writes are visible to
  /// page resolution and sitemap builds immediately.
  pub fn into_parts(self) -> SiteParts {
    let mut sitemap = self.sitemap.unwrap_or_else(|| SitemapConfig::new(&self.base_url));
    sitemap.base_url.clone_from(&self.base_url);

    let admin = AdminService::new(
      Arc::clone(&self.blocks),
      Arc::clone(&self.categories),
      Arc::clone(&self.locales),
    );
    let pages = PageResolver::new(
      Arc::clone(&self.blocks),
      Arc::clone(&self.categories),
      Arc::clone(&self.locales),
      &self.base_url,
      &self.fallback_locale,
      &self.build_salt,
      self.selection,
    )
    .site_name(self.site_name)
    .lastmod(self.lastmod.clone());
    let sitemaps =
      SitemapService::new(self.categories, self.locales, sitemap, &self.fallback_locale)
        .cms_pages(self.cms_pages)
        .lastmod(self.lastmod);

    SiteParts { admin: Arc::new(admin), pages: Arc::new(pages), sitemaps: Arc::new(sitemaps) }
  }
}
