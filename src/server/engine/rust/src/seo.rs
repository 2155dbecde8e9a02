/* src/server/engine/rust/src/seo.rs */

//! SEO guardrails for rendered pages: a per-page check with a 0-100 score,
//! and a cross-page check for duplicated titles and descriptions.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::category::{Breadcrumb, MAX_JSON_LD_CHARS};

pub const MIN_TITLE_CHARS: usize = 10;
pub const MAX_TITLE_CHARS: usize = 60;
pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 160;
pub const MAX_CANONICAL_CHARS: usize = 2048;

/// What a page exposes to crawlers. Absent and empty fields count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPageData {
  /// Label used in cross-page findings; `Page N` when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub canonical: Option<String>,
  #[serde(default)]
  pub hreflang: Option<BTreeMap<String, String>>,
  #[serde(default)]
  pub json_ld: Vec<Value>,
  #[serde(default)]
  pub breadcrumbs: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoValidation {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
  pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoConsistency {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
  pub duplicate_titles: Vec<String>,
  pub duplicate_descriptions: Vec<String>,
}

fn present(field: Option<&String>) -> Option<&str> {
  field.map(String::as_str).filter(|s| !s.is_empty())
}

fn is_url(s: &str) -> bool {
  Url::parse(s).is_ok()
}

struct Tally {
  errors: Vec<String>,
  warnings: Vec<String>,
  score: i32,
}

impl Tally {
  fn error(&mut self, message: String, cost: i32) {
    self.errors.push(message);
    self.score -= cost;
  }

  fn warn(&mut self, message: String, cost: i32) {
    self.warnings.push(message);
    self.score -= cost;
  }
}

/// Score starts at 100 and loses points per finding, floored at 0.
pub fn validate_seo(data: &SeoPageData) -> SeoValidation {
  let mut t = Tally { errors: Vec::new(), warnings: Vec::new(), score: 100 };

  match present(data.title.as_ref()) {
    Some(title) => {
      let n = title.chars().count();
      if n < MIN_TITLE_CHARS {
        t.error(format!("Title too short: {n} characters (min: {MIN_TITLE_CHARS})"), 20);
      } else if n > MAX_TITLE_CHARS {
        t.error(format!("Title too long: {n} characters (max: {MAX_TITLE_CHARS})"), 15);
      }
    }
    None => t.error("Missing title".to_string(), 25),
  }

  match present(data.description.as_ref()) {
    Some(description) => {
      let n = description.chars().count();
      if n < MIN_DESCRIPTION_CHARS {
        t.warn(format!("Description too short: {n} characters (min: {MIN_DESCRIPTION_CHARS})"), 10);
      } else if n > MAX_DESCRIPTION_CHARS {
        t.warn(format!("Description too long: {n} characters (max: {MAX_DESCRIPTION_CHARS})"), 5);
      }
    }
    None => t.warn("Missing description".to_string(), 15),
  }

  match present(data.canonical.as_ref()) {
    Some(canonical) => {
      let n = canonical.chars().count();
      if n > MAX_CANONICAL_CHARS {
        t.error(format!("Canonical URL too long: {n} characters (max: {MAX_CANONICAL_CHARS})"), 10);
      }
      if !is_url(canonical) {
        t.error("Invalid canonical URL format".to_string(), 15);
      }
    }
    None => t.warn("Missing canonical URL".to_string(), 10),
  }

  if let Some(ref hreflang) = data.hreflang {
    if hreflang.is_empty() {
      t.warn("No hreflang tags found".to_string(), 10);
    } else {
      if !hreflang.contains_key("x-default") {
        t.warn("Missing x-default hreflang".to_string(), 5);
      }
      for (lang, url) in hreflang {
        if !is_url(url) {
          t.error(format!("Invalid hreflang URL for {lang}: {url}"), 5);
        }
      }
    }
  }

  if data.json_ld.is_empty() {
    t.warn("No JSON-LD structured data found".to_string(), 15);
  }
  for (i, schema) in data.json_ld.iter().enumerate() {
    let n = schema.to_string().chars().count();
    if n > MAX_JSON_LD_CHARS {
      t.error(
        format!("JSON-LD schema {} too large: {n} characters (max: {MAX_JSON_LD_CHARS})", i + 1),
        10,
      );
    }
    if schema.get("@context").is_none() || schema.get("@type").is_none() {
      t.error(
        format!("JSON-LD schema {} missing required fields (@context or @type)", i + 1),
        15,
      );
    }
  }

  if data.breadcrumbs.is_empty() {
    t.warn("No breadcrumb navigation found".to_string(), 10);
  } else {
    if data.breadcrumbs.len() < 2 {
      t.warn("Breadcrumbs should have at least 2 levels".to_string(), 5);
    }
    for crumb in &data.breadcrumbs {
      if !is_url(&crumb.url) {
        t.error(format!("Invalid breadcrumb URL: {}", crumb.url), 5);
      }
    }
  }

  SeoValidation {
    valid: t.errors.is_empty(),
    errors: t.errors,
    warnings: t.warnings,
    score: u8::try_from(t.score.clamp(0, 100)).unwrap_or(0),
  }
}

/// Groups normalized (trimmed, lowercased) text by first appearance.
#[derive(Default)]
struct Occurrences {
  order: Vec<String>,
  pages: HashMap<String, Vec<String>>,
}

impl Occurrences {
  fn add(&mut self, text: &str, label: &str) {
    let key = text.trim().to_lowercase();
    let pages = self.pages.entry(key.clone()).or_insert_with(|| {
      self.order.push(key);
      Vec::new()
    });
    pages.push(label.to_string());
  }

  fn duplicates(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
    self
      .order
      .iter()
      .filter_map(|key| self.pages.get(key).map(|p| (key.as_str(), p.as_slice())))
      .filter(|(_, pages)| pages.len() > 1)
  }
}

/// Duplicate titles are errors, duplicate descriptions warnings.
pub fn validate_seo_consistency(pages: &[SeoPageData]) -> SeoConsistency {
  let mut titles = Occurrences::default();
  let mut descriptions = Occurrences::default();

  for (i, page) in pages.iter().enumerate() {
    let label = page.path.clone().unwrap_or_else(|| format!("Page {}", i + 1));
    if let Some(title) = present(page.title.as_ref()) {
      titles.add(title, &label);
    }
    if let Some(description) = present(page.description.as_ref()) {
      descriptions.add(description, &label);
    }
  }

  let mut report = SeoConsistency::default();
  for (title, used_on) in titles.duplicates() {
    let count = used_on.len();
    report.duplicate_titles.push(format!("{title} (used on: {})", used_on.join(", ")));
    report.errors.push(format!("Duplicate title found: \"{title}\" used on {count} pages"));
  }
  for (description, used_on) in descriptions.duplicates() {
    let count = used_on.len();
    report.duplicate_descriptions.push(format!("{description} (used on: {})", used_on.join(", ")));
    report
      .warnings
      .push(format!("Duplicate description found: \"{description}\" used on {count} pages"));
  }
  report.valid = report.errors.is_empty();
  report
}
