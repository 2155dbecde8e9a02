/* src/server/engine/rust/src/category/pattern.rs */

use std::collections::BTreeMap;

use regex::Regex;

use super::{Category, PageIdentifier, category_by_slug};

struct Placeholder<'a> {
  start: usize,
  end: usize,
  name: &'a str,
}

/// Scan `:name` tokens where name is `[A-Za-z0-9_]+`.
fn placeholders(pattern: &str) -> Vec<Placeholder<'_>> {
  let bytes = pattern.as_bytes();
  let mut out = Vec::new();
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b':' {
      let mut end = i + 1;
      while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
      }
      if end > i + 1 {
        out.push(Placeholder { start: i, end, name: &pattern[i + 1..end] });
        i = end;
        continue;
      }
    }
    i += 1;
  }
  out
}

/// Placeholder names in order of appearance: `:base-:quote` -> `[base, quote]`.
pub fn parse_url_pattern(pattern: &str) -> Vec<String> {
  placeholders(pattern).into_iter().map(|p| p.name.to_string()).collect()
}

/// Substitute placeholders with percent-encoded values. Placeholders without
/// a value are left in place.
pub fn build_url_from_pattern(pattern: &str, params: &BTreeMap<String, String>) -> String {
  let mut out = String::with_capacity(pattern.len() + 16);
  let mut cursor = 0;
  for p in placeholders(pattern) {
    out.push_str(&pattern[cursor..p.start]);
    match params.get(p.name) {
      Some(value) => out.push_str(&urlencoding::encode(value)),
      None => out.push_str(&pattern[p.start..p.end]),
    }
    cursor = p.end;
  }
  out.push_str(&pattern[cursor..]);
  out
}

/// Match `url` against `pattern` and return the decoded parameters.
///
/// Single-segment patterns (`:base-:quote`) are matched as a whole with each
/// placeholder capturing `[^/]+`; multi-segment patterns are compared segment
/// by segment, where a segment starting with `:` captures that segment.
pub fn extract_params_from_url(pattern: &str, url: &str) -> Option<BTreeMap<String, String>> {
  if pattern.contains('/') {
    return extract_segments(pattern, url);
  }

  let holes = placeholders(pattern);
  let mut source = String::from("^");
  let mut cursor = 0;
  for p in &holes {
    source.push_str(&regex::escape(&pattern[cursor..p.start]));
    source.push_str("([^/]+)");
    cursor = p.end;
  }
  source.push_str(&regex::escape(&pattern[cursor..]));
  source.push('$');

  let re = Regex::new(&source).ok()?;
  let caps = re.captures(url)?;
  let mut params = BTreeMap::new();
  for (i, p) in holes.iter().enumerate() {
    let raw = caps.get(i + 1)?.as_str();
    params.insert(p.name.to_string(), urlencoding::decode(raw).ok()?.into_owned());
  }
  Some(params)
}

fn extract_segments(pattern: &str, url: &str) -> Option<BTreeMap<String, String>> {
  let pattern_parts: Vec<&str> = pattern.split('/').collect();
  let url_parts: Vec<&str> = url.split('/').collect();
  if pattern_parts.len() != url_parts.len() {
    return None;
  }

  let mut params = BTreeMap::new();
  for (pat, part) in pattern_parts.iter().zip(&url_parts) {
    if let Some(name) = pat.strip_prefix(':') {
      params.insert(name.to_string(), urlencoding::decode(part).ok()?.into_owned());
    } else if pat != part {
      return None;
    }
  }
  Some(params)
}

/// Site-relative path for a page. The default locale is served unprefixed.
pub fn generate_page_path(
  category: &Category,
  identifier: &str,
  locale: &str,
  default_locale: &str,
) -> String {
  if locale == default_locale {
    format!("/{}/{identifier}", category.slug)
  } else {
    format!("/{locale}/{}/{identifier}", category.slug)
  }
}

/// Site-relative path of a category landing page.
pub fn category_index_path(category: &Category, locale: &str, default_locale: &str) -> String {
  if locale == default_locale {
    format!("/{}", category.slug)
  } else {
    format!("/{locale}/{}", category.slug)
  }
}

/// Resolve `[locale/]category/identifier` against the active categories.
///
/// The first segment counts as a locale only when it appears in `locales`;
/// otherwise `default_locale` is assumed. Returns `None` for unknown or
/// inactive categories and identifiers that do not fit the category pattern.
pub fn parse_page_path(
  path: &str,
  categories: &[Category],
  locales: &[String],
  default_locale: &str,
) -> Option<PageIdentifier> {
  let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
  if parts.len() < 2 {
    return None;
  }

  let has_locale = locales.iter().any(|l| l == parts[0]);
  let (locale, rest) =
    if has_locale { (parts[0], &parts[1..]) } else { (default_locale, &parts[..]) };
  let (slug, identifier_parts) = rest.split_first()?;
  let identifier = identifier_parts.join("/");

  let category = category_by_slug(categories, slug).filter(|c| c.is_active)?;
  let params = extract_params_from_url(&category.url_pattern, &identifier)?;

  Some(PageIdentifier {
    category: category.slug.clone(),
    identifier,
    locale: locale.to_string(),
    params,
  })
}
