/* src/server/engine/rust/src/category/seo.rs */

use std::collections::BTreeMap;

use super::{Category, Locale};

const TITLE_MAX: usize = 60;
const DESCRIPTION_MAX: usize = 160;
const DEFAULT_CANONICAL_PATTERN: &str = "/{locale}/{category}/{identifier}";

fn fill_template(template: &str, params: &BTreeMap<String, String>, category: &Category) -> String {
  let mut out = template.replace("{category}", &category.name);
  for (key, value) in params {
    out = out.replace(&format!("{{{key}}}"), value);
  }
  out
}

/// Cut to `max` characters, ending in `...` when shortened.
fn truncate_chars(text: String, max: usize) -> String {
  if text.chars().count() <= max {
    return text;
  }
  let mut cut: String = text.chars().take(max - 3).collect();
  cut.push_str("...");
  cut
}

pub fn seo_title(template: &str, params: &BTreeMap<String, String>, category: &Category) -> String {
  truncate_chars(fill_template(template, params, category), TITLE_MAX)
}

pub fn seo_description(
  template: &str,
  params: &BTreeMap<String, String>,
  category: &Category,
) -> String {
  truncate_chars(fill_template(template, params, category), DESCRIPTION_MAX)
}

/// Absolute canonical URL from the category's `canonicalPattern`.
/// The default locale's `{locale}` segment is dropped.
pub fn canonical_url(
  base_url: &str,
  category: &Category,
  identifier: &str,
  locale: &str,
  default_locale: &str,
) -> String {
  let pattern = match category.seo_settings.canonical_pattern.trim() {
    "" => DEFAULT_CANONICAL_PATTERN,
    p => p,
  };
  let locale_part = if locale == default_locale { "" } else { locale };
  let filled = pattern
    .replace("{locale}", locale_part)
    .replace("{category}", &category.slug)
    .replace("{identifier}", identifier);
  let path: Vec<&str> = filled.split('/').filter(|s| !s.is_empty()).collect();
  format!("{}/{}", base_url.trim_end_matches('/'), path.join("/"))
}

/// Alternate URLs for every active locale the category supports, plus
/// `x-default` pointing at the default locale (or the first alternate).
pub fn hreflang_map(
  base_url: &str,
  category: &Category,
  identifier: &str,
  locales: &[Locale],
  default_locale: &str,
) -> BTreeMap<String, String> {
  let supported: Vec<&Locale> =
    locales.iter().filter(|l| l.is_active && category.supports_locale(&l.code)).collect();

  let mut map: BTreeMap<String, String> = supported
    .iter()
    .map(|l| {
      let url = canonical_url(base_url, category, identifier, &l.code, default_locale);
      (l.code.clone(), url)
    })
    .collect();

  let x_default = supported.iter().find(|l| l.is_default).or_else(|| supported.first());
  if let Some(l) = x_default {
    let url = canonical_url(base_url, category, identifier, &l.code, default_locale);
    map.insert("x-default".to_string(), url);
  }
  map
}
