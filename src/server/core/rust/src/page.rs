/* src/server/core/rust/src/page.rs */

use std::collections::BTreeMap;
use std::sync::Arc;

use pseo_engine::category::{
  Breadcrumb, JsonLdSet, PageMeta, breadcrumbs, canonical_url, category_index_path,
  default_locale_code, generate_page_path, hreflang_map, page_json_ld, parse_page_path,
  seo_description, seo_title,
};
use pseo_engine::seo::{
  SeoConsistency, SeoPageData, SeoValidation, validate_seo, validate_seo_consistency,
};
use pseo_engine::{
  Category, ContentBlock, DEFAULT_SLOTS, Locale, PageIdentifier, SelectionContext,
  SelectionPolicy, SlotAssignments, sample_identifiers, select_blocks_with,
};
use serde::{Deserialize, Serialize};

use crate::errors::PseoError;
use crate::store::Repository;

fn default_slots() -> Vec<String> {
  DEFAULT_SLOTS.iter().map(|s| (*s).to_string()).collect()
}

fn default_max_per_slot() -> usize {
  3
}

/// How pages fill their slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSettings {
  #[serde(default = "default_slots")]
  pub slots: Vec<String>,
  #[serde(default = "default_max_per_slot")]
  pub max_per_slot: usize,
  #[serde(default)]
  pub policy: SelectionPolicy,
}

impl Default for SelectionSettings {
  fn default() -> Self {
    Self {
      slots: default_slots(),
      max_per_slot: default_max_per_slot(),
      policy: SelectionPolicy::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSeo {
  pub title: String,
  pub description: String,
  pub canonical: String,
  /// Locale code (plus `x-default`) -> alternate URL.
  pub hreflang: BTreeMap<String, String>,
  pub breadcrumbs: Vec<Breadcrumb>,
  pub json_ld: JsonLdSet,
}

impl PageSeo {
  /// The page as seen by the SEO guardrails.
  pub fn audit_data(&self, path: &str) -> SeoPageData {
    SeoPageData {
      path: Some(path.to_string()),
      title: Some(self.title.clone()),
      description: Some(self.description.clone()),
      canonical: Some(self.canonical.clone()),
      hreflang: Some(self.hreflang.clone()),
      json_ld: self.json_ld.documents(),
      breadcrumbs: self.breadcrumbs.clone(),
    }
  }
}

/// Everything a renderer needs for one programmatic page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
  pub path: String,
  pub identifier: PageIdentifier,
  pub seo: PageSeo,
  pub slots: SlotAssignments,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageAudit {
  pub path: String,
  pub validation: SeoValidation,
}

/// SEO guardrails over a sample of every active category and locale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAudit {
  pub pages: Vec<PageAudit>,
  pub consistency: SeoConsistency,
  /// Mean page score; 0 when nothing resolved.
  pub average_score: u8,
  /// Sample paths that failed to resolve, with the reason.
  pub unresolved: Vec<String>,
}

impl SeoAudit {
  pub fn error_count(&self) -> usize {
    self.pages.iter().map(|p| p.validation.errors.len()).sum::<usize>()
      + self.consistency.errors.len()
  }
}

pub struct PageResolver {
  blocks: Arc<dyn Repository<ContentBlock>>,
  categories: Arc<dyn Repository<Category>>,
  locales: Arc<dyn Repository<Locale>>,
  base_url: String,
  fallback_locale: String,
  build_salt: String,
  selection: SelectionSettings,
  site_name: String,
  lastmod: Option<String>,
}

impl PageResolver {
  pub fn new(
    blocks: Arc<dyn Repository<ContentBlock>>,
    categories: Arc<dyn Repository<Category>>,
    locales: Arc<dyn Repository<Locale>>,
    base_url: &str,
    fallback_locale: &str,
    build_salt: &str,
    selection: SelectionSettings,
  ) -> Self {
    Self {
      blocks,
      categories,
      locales,
      base_url: base_url.trim_end_matches('/').to_string(),
      fallback_locale: fallback_locale.to_string(),
      build_salt: build_salt.to_string(),
      selection,
      site_name: String::new(),
      lastmod: None,
    }
  }

  /// Organization named in `Article` JSON-LD.
  pub fn site_name(mut self, name: impl Into<String>) -> Self {
    self.site_name = name.into();
    self
  }

  /// Date stamped on `Article` JSON-LD.
  pub fn lastmod(mut self, lastmod: Option<String>) -> Self {
    self.lastmod = lastmod;
    self
  }

  pub fn build_salt(&self) -> &str {
    &self.build_salt
  }

  /// Resolve `locale/category/identifier` into a page view.
  ///
  /// The locale must be active and supported by the category; the
  /// identifier must match the category's URL pattern. Block selection
  /// uses the page's site-relative path as its key.
  pub fn resolve(
    &self,
    locale: &str,
    category_slug: &str,
    identifier: &str,
  ) -> Result<PageView, PseoError> {
    let categories = self.categories.list()?;
    let locales = self.locales.list()?;
    let default_locale = default_locale_code(&locales, &self.fallback_locale).to_string();

    let active_codes: Vec<String> =
      locales.iter().filter(|l| l.is_active).map(|l| l.code.clone()).collect();
    if !active_codes.iter().any(|c| c == locale) {
      return Err(PseoError::not_found(format!("Unknown locale '{locale}'")));
    }

    let raw_path = format!("{locale}/{category_slug}/{identifier}");
    let page = parse_page_path(&raw_path, &categories, &active_codes, &default_locale)
      .ok_or_else(|| PseoError::not_found("Page not found"))?;
    let category = categories
      .iter()
      .find(|c| c.slug == page.category)
      .ok_or_else(|| PseoError::not_found("Page not found"))?;
    if !category.supports_locale(&page.locale) {
      return Err(PseoError::not_found(format!(
        "Category '{}' is not available in '{}'",
        category.slug, page.locale
      )));
    }

    let path = generate_page_path(category, &page.identifier, &page.locale, &default_locale);

    let pool = self.blocks.list()?;
    let context = SelectionContext::new(&category.id, &page.locale, &path, &self.build_salt);
    let slots: Vec<&str> = self.selection.slots.iter().map(String::as_str).collect();
    let assignments = select_blocks_with(
      &self.selection.policy,
      &pool,
      &context,
      &slots,
      self.selection.max_per_slot,
    );

    let settings = &category.seo_settings;
    let hreflang =
      hreflang_map(&self.base_url, category, &page.identifier, &locales, &default_locale);
    let title = seo_title(&settings.title_template, &page.params, category);
    let description = seo_description(&settings.description_template, &page.params, category);
    let canonical =
      canonical_url(&self.base_url, category, &page.identifier, &page.locale, &default_locale);
    let category_url = format!(
      "{}{}",
      self.base_url,
      category_index_path(category, &page.locale, &default_locale)
    );
    let trail = breadcrumbs(&self.base_url, category, &category_url, &page.params, &canonical);
    let selected: Vec<&ContentBlock> = assignments.values().flatten().collect();
    let meta = PageMeta {
      title: &title,
      description: &description,
      url: &canonical,
      site_name: &self.site_name,
      modified: self.lastmod.as_deref(),
    };
    let json_ld = page_json_ld(&meta, category, &trail, &selected);
    let seo = PageSeo { title, description, canonical, hreflang, breadcrumbs: trail, json_ld };

    tracing::debug!(
      page = %path,
      filled = assignments.values().filter(|v| !v.is_empty()).count(),
      "page resolved"
    );
    Ok(PageView { path, identifier: page, seo, slots: assignments })
  }

  /// Resolve a site-relative path such as `/fr/currency/usd-eur`. The
  /// locale prefix is omitted for the default locale.
  pub fn resolve_path(&self, path: &str) -> Result<PageView, PseoError> {
    let categories = self.categories.list()?;
    let locales = self.locales.list()?;
    let default_locale = default_locale_code(&locales, &self.fallback_locale);
    let active_codes: Vec<String> =
      locales.iter().filter(|l| l.is_active).map(|l| l.code.clone()).collect();
    let page = parse_page_path(path, &categories, &active_codes, default_locale)
      .ok_or_else(|| PseoError::not_found("Page not found"))?;
    self.resolve(&page.locale, &page.category, &page.identifier)
  }

  /// Resolve up to `samples` sample identifiers per active category and
  /// supported locale, then run the per-page and cross-page SEO checks.
  pub fn audit(&self, samples: usize) -> Result<SeoAudit, PseoError> {
    let categories = self.categories.list()?;
    let locales = self.locales.list()?;

    let mut pages = Vec::new();
    let mut data = Vec::new();
    let mut unresolved = Vec::new();
    for category in categories.iter().filter(|c| c.is_active) {
      let identifiers = sample_identifiers(category.template_type, samples);
      for locale in locales.iter().filter(|l| l.is_active && category.supports_locale(&l.code)) {
        for identifier in &identifiers {
          match self.resolve(&locale.code, &category.slug, identifier) {
            Ok(view) => {
              let page = view.seo.audit_data(&view.path);
              pages.push(PageAudit { path: view.path, validation: validate_seo(&page) });
              data.push(page);
            }
            Err(e) => unresolved.push(format!(
              "{}/{}/{identifier}: {}",
              locale.code, category.slug, e.message()
            )),
          }
        }
      }
    }

    let total: usize = pages.iter().map(|p| usize::from(p.validation.score)).sum();
    let average_score = match pages.len() {
      0 => 0,
      n => u8::try_from(total / n).unwrap_or(u8::MAX),
    };
    let consistency = validate_seo_consistency(&data);
    tracing::info!(
      pages = pages.len(),
      unresolved = unresolved.len(),
      average_score,
      "seo audit finished"
    );
    Ok(SeoAudit { pages, consistency, average_score, unresolved })
  }
}
