/* src/server/engine/rust/src/validate.rs */

//! Shape and consistency checks for admin writes and data files.
//! Every validator accumulates messages instead of stopping at the first.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::block::{BlockType, ContentBlock};
use crate::category::{Category, Locale, parse_url_pattern};

const TITLE_MAX_CHARS: usize = 100;
const BODY_MAX_CHARS: usize = 1000;

fn slug_re() -> Option<&'static Regex> {
  static RE: OnceLock<Option<Regex>> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").ok()).as_ref()
}

/// Lowercase letters, digits and hyphens only.
fn is_slug(s: &str) -> bool {
  slug_re().is_some_and(|re| re.is_match(s))
}

pub fn validate_block(block: &ContentBlock) -> Vec<String> {
  let mut errors = Vec::new();

  if block.id.trim().is_empty() {
    errors.push("Block ID is required".to_string());
  } else if !is_slug(&block.id) {
    errors.push("Block ID must contain only lowercase letters, numbers, and hyphens".to_string());
  }

  if block.block_type == BlockType::Unknown {
    errors.push("Block type must be one of: benefit, cta, faq, promo, info".to_string());
  }

  if block.title.trim().is_empty() {
    errors.push("Block title is required".to_string());
  } else if block.title.chars().count() > TITLE_MAX_CHARS {
    errors.push("Block title must be 100 characters or less".to_string());
  }

  if block.body.trim().is_empty() {
    errors.push("Block body is required".to_string());
  } else if block.body.chars().count() > BODY_MAX_CHARS {
    errors.push("Block body must be 1000 characters or less".to_string());
  }

  if !(1..=100).contains(&block.weight) {
    errors.push("Block weight must be a number between 1 and 100".to_string());
  }

  if block.locale.trim().is_empty() {
    errors.push("Block locale is required".to_string());
  }

  errors
}

/// Cross-block findings for `block` against the rest of the pool:
/// other blocks that already declare it exclusive, and slots it shares with
/// blocks restricted to an overlapping category.
pub fn validate_block_constraints(block: &ContentBlock, all: &[ContentBlock]) -> Vec<String> {
  let mut errors = Vec::new();
  let constraints = &block.constraints;
  let others = || all.iter().filter(|b| b.id != block.id);

  if !constraints.mutually_exclusive.is_empty() {
    let conflicting: Vec<&str> =
      others().filter(|b| b.excludes(&block.id)).map(|b| b.id.as_str()).collect();
    if !conflicting.is_empty() {
      errors.push(format!(
        "Block conflicts with mutually exclusive blocks: {}",
        conflicting.join(", ")
      ));
    }
  }

  if !constraints.slots.is_empty() && !constraints.categories.is_empty() {
    let same_category: Vec<&ContentBlock> = others()
      .filter(|b| b.constraints.categories.iter().any(|c| constraints.categories.contains(c)))
      .collect();
    for slot in &constraints.slots {
      let users: Vec<&str> = same_category
        .iter()
        .filter(|b| b.constraints.slots.contains(slot))
        .map(|b| b.id.as_str())
        .collect();
      if !users.is_empty() {
        errors.push(format!("Slot \"{slot}\" already used by blocks: {}", users.join(", ")));
      }
    }
  }

  errors
}

/// Validate a whole data file of blocks: per-block shape plus duplicate ids.
pub fn validate_block_set(blocks: &[ContentBlock]) -> Vec<String> {
  let mut errors = Vec::new();
  let mut seen = HashSet::new();
  for (index, block) in blocks.iter().enumerate() {
    let block_errors = validate_block(block);
    if !block_errors.is_empty() {
      errors.push(format!("Block {} ({}): {}", index + 1, block.id, block_errors.join(", ")));
    }
    if !block.id.is_empty() && !seen.insert(block.id.as_str()) {
      errors.push(format!("Duplicate block ID: {}", block.id));
    }
  }
  errors
}

pub fn validate_category(category: &Category) -> Vec<String> {
  let mut errors = Vec::new();

  if category.slug.is_empty() {
    errors.push("Category slug is required".to_string());
  } else if !is_slug(&category.slug) {
    errors.push("Category slug must be lowercase alphanumeric with hyphens only".to_string());
  }

  if category.url_pattern.is_empty() {
    errors.push("URL pattern is required".to_string());
  } else if parse_url_pattern(&category.url_pattern).is_empty() {
    errors
      .push("URL pattern must contain at least one parameter (e.g., :code, :country)".to_string());
  }

  if category.name.trim().is_empty() {
    errors.push("Category name is required".to_string());
  }

  if category.template_type.is_none() {
    errors.push("Template type is required".to_string());
  }

  if category.locales.is_empty() {
    errors.push("At least one locale must be specified".to_string());
  }

  errors
}

/// Slug and URL pattern must be unique; `candidate` may already be in
/// `existing` under its own id (an update).
pub fn validate_category_uniqueness(existing: &[Category], candidate: &Category) -> Vec<String> {
  let mut errors = Vec::new();
  let others = || existing.iter().filter(|c| c.id != candidate.id);

  if others().any(|c| c.slug == candidate.slug) {
    errors.push(format!("Category slug \"{}\" already exists", candidate.slug));
  }
  if others().any(|c| c.url_pattern == candidate.url_pattern) {
    errors.push(format!("URL pattern \"{}\" already exists", candidate.url_pattern));
  }
  errors
}

/// Validate every category of a data file, including pairwise uniqueness.
pub fn validate_category_set(categories: &[Category]) -> Vec<String> {
  let mut errors = Vec::new();
  for (index, category) in categories.iter().enumerate() {
    let mut found = validate_category(category);
    found.extend(validate_category_uniqueness(&categories[..index], category));
    if !found.is_empty() {
      errors.push(format!("Category {} ({}): {}", index + 1, category.slug, found.join(", ")));
    }
  }
  errors
}

pub fn validate_locale(locale: &Locale, existing: &[Locale]) -> Vec<String> {
  let mut errors = Vec::new();

  if locale.code.chars().count() != 2 {
    errors.push("Locale code must be exactly 2 characters".to_string());
  }
  if locale.name.trim().is_empty() {
    errors.push("Locale name is required".to_string());
  }
  if locale.native_name.trim().is_empty() {
    errors.push("Native name is required".to_string());
  }
  if existing.iter().any(|l| l.code == locale.code) {
    errors.push("Locale code already exists".to_string());
  }

  errors
}

/// Validate a locale data file: per-locale shape, duplicates, and at most
/// one default.
pub fn validate_locale_set(locales: &[Locale]) -> Vec<String> {
  let mut errors = Vec::new();
  for (index, locale) in locales.iter().enumerate() {
    let found = validate_locale(locale, &locales[..index]);
    if !found.is_empty() {
      errors.push(format!("Locale {} ({}): {}", index + 1, locale.code, found.join(", ")));
    }
  }
  if locales.iter().filter(|l| l.is_default).count() > 1 {
    errors.push("Only one locale may be the default".to_string());
  }
  errors
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::block::BlockConstraints;
  use crate::category::TemplateType;

  fn good_block(id: &str) -> ContentBlock {
    ContentBlock {
      id: id.into(),
      block_type: BlockType::Faq,
      title: "How do rates update?".into(),
      body: "Every minute.".into(),
      weight: 10,
      reviewed: true,
      locale: "en".into(),
      ..Default::default()
    }
  }

  fn good_category(id: &str) -> Category {
    Category {
      id: id.into(),
      slug: id.into(),
      name: "Currency".into(),
      url_pattern: format!(":{id}-code"),
      template_type: Some(TemplateType::Converter),
      locales: vec!["en".into()],
      is_active: true,
      ..Default::default()
    }
  }

  fn good_locale(code: &str) -> Locale {
    Locale {
      code: code.into(),
      name: "French".into(),
      native_name: "Français".into(),
      is_active: true,
      is_default: false,
    }
  }

  #[test]
  fn valid_block_has_no_errors() {
    assert!(validate_block(&good_block("faq-rates")).is_empty());
  }

  #[test]
  fn block_rules_accumulate() {
    let block = ContentBlock { weight: 0, ..Default::default() };
    let errors = validate_block(&block);
    assert_eq!(
      errors,
      vec![
        "Block ID is required",
        "Block type must be one of: benefit, cta, faq, promo, info",
        "Block title is required",
        "Block body is required",
        "Block weight must be a number between 1 and 100",
        "Block locale is required",
      ]
    );
  }

  #[test]
  fn block_id_format_and_lengths() {
    let mut block = good_block("Bad_ID");
    block.title = "t".repeat(101);
    block.body = "b".repeat(1001);
    block.weight = 101;
    let errors = validate_block(&block);
    assert!(errors.contains(
      &"Block ID must contain only lowercase letters, numbers, and hyphens".to_string()
    ));
    assert!(errors.contains(&"Block title must be 100 characters or less".to_string()));
    assert!(errors.contains(&"Block body must be 1000 characters or less".to_string()));
    assert!(errors.contains(&"Block weight must be a number between 1 and 100".to_string()));
  }

  #[test]
  fn weight_bounds_inclusive() {
    for w in [1, 100] {
      let mut block = good_block("w");
      block.weight = w;
      assert!(validate_block(&block).is_empty(), "weight {w}");
    }
  }

  #[test]
  fn constraint_reverse_exclusion_reported() {
    let mut existing = good_block("promo-a");
    existing.constraints.mutually_exclusive = vec!["promo-b".into()];
    let mut new = good_block("promo-b");
    new.constraints.mutually_exclusive = vec!["promo-a".into()];
    let errors = validate_block_constraints(&new, &[existing]);
    assert_eq!(errors, vec!["Block conflicts with mutually exclusive blocks: promo-a"]);
  }

  #[test]
  fn constraint_slot_overlap_in_shared_category() {
    let scoped = |id: &str, cat: &str| {
      let mut b = good_block(id);
      b.constraints = BlockConstraints {
        slots: vec!["faq".into()],
        categories: vec![cat.into()],
        ..Default::default()
      };
      b
    };
    let pool = [scoped("a", "currency"), scoped("b", "swift")];
    let errors = validate_block_constraints(&scoped("c", "currency"), &pool);
    assert_eq!(errors, vec!["Slot \"faq\" already used by blocks: a"]);
    assert!(validate_block_constraints(&scoped("d", "news"), &pool).is_empty());
  }

  #[test]
  fn constraint_check_ignores_self() {
    let mut b = good_block("self");
    b.constraints.mutually_exclusive = vec!["self".into()];
    assert!(validate_block_constraints(&b, std::slice::from_ref(&b)).is_empty());
  }

  #[test]
  fn block_set_reports_index_and_duplicates() {
    let mut bad = good_block("x");
    bad.title.clear();
    let errors = validate_block_set(&[good_block("a"), bad, good_block("a")]);
    assert_eq!(errors, vec!["Block 2 (x): Block title is required", "Duplicate block ID: a"]);
  }

  #[test]
  fn category_rules() {
    assert!(validate_category(&good_category("currency")).is_empty());
    let errors = validate_category(&Category::default());
    assert_eq!(errors.len(), 5);
    let mut c = good_category("currency");
    c.slug = "Currency".into();
    c.url_pattern = "static".into();
    let errors = validate_category(&c);
    assert_eq!(
      errors,
      vec![
        "Category slug must be lowercase alphanumeric with hyphens only",
        "URL pattern must contain at least one parameter (e.g., :code, :country)",
      ]
    );
  }

  #[test]
  fn pattern_needs_a_named_placeholder() {
    let missing = "URL pattern must contain at least one parameter (e.g., :code, :country)";
    for pattern in ["a:", ":", "static:-x"] {
      let mut c = good_category("currency");
      c.url_pattern = pattern.into();
      assert_eq!(validate_category(&c), vec![missing], "pattern {pattern:?}");
    }
    let mut c = good_category("banks");
    c.url_pattern = ":country/branch/:code".into();
    assert!(validate_category(&c).is_empty());
  }

  #[test]
  fn slug_format() {
    assert!(is_slug("usd-eur-2"));
    for bad in ["", "USD", "usd_eur", "usd eur", "caf\u{e9}"] {
      assert!(!is_slug(bad), "{bad:?}");
    }
  }

  #[test]
  fn category_uniqueness_excludes_self() {
    let a = good_category("currency");
    let mut b = good_category("swift");
    b.slug = "currency".into();
    b.url_pattern = a.url_pattern.clone();
    let errors = validate_category_uniqueness(std::slice::from_ref(&a), &b);
    assert_eq!(errors.len(), 2);
    assert!(validate_category_uniqueness(std::slice::from_ref(&a), &a).is_empty());
  }

  #[test]
  fn locale_rules() {
    assert!(validate_locale(&good_locale("fr"), &[]).is_empty());
    let bad = Locale { code: "fra".into(), ..Default::default() };
    assert_eq!(
      validate_locale(&bad, &[]),
      vec![
        "Locale code must be exactly 2 characters",
        "Locale name is required",
        "Native name is required",
      ]
    );
    let dup = validate_locale(&good_locale("fr"), &[good_locale("fr")]);
    assert_eq!(dup, vec!["Locale code already exists"]);
  }

  #[test]
  fn locale_set_single_default() {
    let mut en = good_locale("en");
    en.is_default = true;
    let mut fr = good_locale("fr");
    fr.is_default = true;
    let errors = validate_locale_set(&[en, fr]);
    assert_eq!(errors, vec!["Only one locale may be the default"]);
  }
}
