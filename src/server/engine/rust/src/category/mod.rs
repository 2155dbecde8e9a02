/* src/server/engine/rust/src/category/mod.rs */

//! Page families and locales, plus URL pattern matching and SEO text.

mod jsonld;
mod pattern;
mod seo;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use jsonld::{
  Breadcrumb, JsonLdCheck, JsonLdSet, MAX_JSON_LD_CHARS, PageMeta, breadcrumb_json_ld,
  breadcrumbs, page_json_ld, validate_json_ld,
};
pub use pattern::{
  build_url_from_pattern, category_index_path, extract_params_from_url, generate_page_path,
  parse_page_path, parse_url_pattern,
};
pub use seo::{canonical_url, hreflang_map, seo_description, seo_title};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
  Converter,
  Directory,
  News,
  Information,
  Custom,
}

impl TemplateType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Converter => "converter",
      Self::Directory => "directory",
      Self::News => "news",
      Self::Information => "information",
      Self::Custom => "custom",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
  /// Supports `{category}` plus any URL parameter, e.g. `{base}`.
  #[serde(default)]
  pub title_template: String,
  #[serde(default)]
  pub description_template: String,
  /// Supports `{locale}`, `{category}` and `{identifier}`.
  #[serde(default)]
  pub canonical_pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub slug: String,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Identifier template, e.g. `:base-:quote` or `:country/:bank`.
  #[serde(default)]
  pub url_pattern: String,
  #[serde(default)]
  pub template_type: Option<TemplateType>,
  #[serde(default)]
  pub locales: Vec<String>,
  #[serde(default)]
  pub priority: i64,
  #[serde(default)]
  pub is_active: bool,
  #[serde(default)]
  pub seo_settings: SeoSettings,
}

impl Category {
  pub fn supports_locale(&self, code: &str) -> bool {
    self.locales.iter().any(|l| l == code)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub native_name: String,
  #[serde(default = "default_true")]
  pub is_active: bool,
  #[serde(default)]
  pub is_default: bool,
}

fn default_true() -> bool {
  true
}

/// The default locale's code: the one flagged default, else the first
/// active one, else `fallback`.
pub fn default_locale_code<'a>(locales: &'a [Locale], fallback: &'a str) -> &'a str {
  locales
    .iter()
    .find(|l| l.is_default)
    .or_else(|| locales.iter().find(|l| l.is_active))
    .map_or(fallback, |l| l.code.as_str())
}

/// A concrete page resolved from a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIdentifier {
  /// Category slug.
  pub category: String,
  pub identifier: String,
  pub locale: String,
  pub params: BTreeMap<String, String>,
}

/// Active categories, highest priority first. Equal priorities keep input order.
pub fn active_categories(categories: &[Category]) -> Vec<&Category> {
  let mut active: Vec<&Category> = categories.iter().filter(|c| c.is_active).collect();
  active.sort_by(|a, b| b.priority.cmp(&a.priority));
  active
}

pub fn category_by_slug<'a>(categories: &'a [Category], slug: &str) -> Option<&'a Category> {
  categories.iter().find(|c| c.slug == slug)
}
