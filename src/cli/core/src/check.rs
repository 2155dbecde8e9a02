/* src/cli/core/src/check.rs */

use std::path::Path;

use anyhow::{Result, bail};
use pseo_server::SeoAudit;
use pseo_server::pseo_engine::validate::{
  validate_block_constraints, validate_block_set, validate_category_set, validate_locale_set,
};

use crate::config::PseoConfig;
use crate::data::{self, SiteData};
use crate::ui;

/// Errors per data file plus non-blocking constraint warnings.
#[derive(Debug, Default)]
pub struct Findings {
  pub blocks: Vec<String>,
  pub categories: Vec<String>,
  pub locales: Vec<String>,
  pub warnings: Vec<String>,
}

impl Findings {
  pub fn error_count(&self) -> usize {
    self.blocks.len() + self.categories.len() + self.locales.len()
  }
}

pub fn collect(data: &SiteData) -> Findings {
  let warnings = data
    .blocks
    .iter()
    .flat_map(|b| {
      validate_block_constraints(b, &data.blocks).into_iter().map(move |w| format!("{}: {w}", b.id))
    })
    .collect();
  Findings {
    blocks: validate_block_set(&data.blocks),
    categories: validate_category_set(&data.categories),
    locales: validate_locale_set(&data.locales),
    warnings,
  }
}

/// Page errors, cross-page duplicates and samples that did not resolve.
pub fn seo_findings(audit: &SeoAudit) -> Vec<String> {
  let pages = audit
    .pages
    .iter()
    .flat_map(|p| p.validation.errors.iter().map(move |e| format!("{}: {e}", p.path)));
  let unresolved = audit.unresolved.iter().map(|u| format!("unresolved sample {u}"));
  pages.chain(audit.consistency.errors.iter().cloned()).chain(unresolved).collect()
}

fn report(label: &str, count: usize, errors: &[String]) {
  if errors.is_empty() {
    ui::ok(&format!("{label}: {count} valid"));
  } else {
    ui::fail(&format!("{label}: {} error(s)", errors.len()));
    for e in errors {
      ui::detail(e);
    }
  }
}

pub fn run_validate(config: &PseoConfig, base_dir: &Path) -> Result<()> {
  ui::banner("validate");
  let data = SiteData::load(config, base_dir)?;
  let findings = collect(&data);

  report("blocks", data.blocks.len(), &findings.blocks);
  report("categories", data.categories.len(), &findings.categories);
  report("locales", data.locales.len(), &findings.locales);
  for w in &findings.warnings {
    ui::warn(w);
  }

  // Sitemap URLs are checked without writing anything.
  let lastmod = data::lastmod(config);
  let parts = data.into_server(config, "dev", &lastmod).into_parts();
  let sitemap = parts.sitemaps.report()?;
  report("sitemap urls", sitemap.statistics.total_urls, &sitemap.validation.errors);

  // SEO guardrails are advisory: they never fail validation.
  let audit = parts.pages.audit(parts.sitemaps.config().sample_identifiers)?;
  let seo = seo_findings(&audit);
  let summary =
    format!("seo: {} page(s), average score {}", audit.pages.len(), audit.average_score);
  if seo.is_empty() {
    ui::ok(&summary);
  } else {
    ui::warn(&format!("{summary}, {} finding(s)", seo.len()));
    for f in &seo {
      ui::detail(f);
    }
  }

  let total = findings.error_count() + sitemap.validation.errors.len();
  ui::blank();
  if total > 0 {
    bail!("validation failed with {total} error(s)");
  }
  ui::ok("all data valid");
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn data() -> SiteData {
    SiteData {
      blocks: serde_json::from_value(json!([
        {"id": "faq-a", "type": "faq", "title": "A", "body": "a", "weight": 10, "locale": "en",
         "constraints": {"slots": ["faq"], "categories": ["currency"]}},
        {"id": "faq-b", "type": "faq", "title": "B", "body": "b", "weight": 10, "locale": "en",
         "constraints": {"slots": ["faq"], "categories": ["currency"]}},
        {"id": "faq-a", "type": "nope", "title": "", "body": "c", "weight": 500, "locale": "en"}
      ]))
      .unwrap(),
      categories: serde_json::from_value(json!([
        {"id": "currency", "slug": "currency", "name": "Currency", "urlPattern": ":base-:quote",
         "templateType": "converter", "locales": ["en"], "isActive": true}
      ]))
      .unwrap(),
      locales: serde_json::from_value(json!([
        {"code": "en", "name": "English", "nativeName": "English", "isDefault": true},
        {"code": "fr", "name": "French", "nativeName": "Français", "isDefault": true}
      ]))
      .unwrap(),
    }
  }

  #[test]
  fn collects_errors_per_file() {
    let findings = collect(&data());
    assert!(findings.blocks.iter().any(|e| e == "Duplicate block ID: faq-a"));
    assert!(findings.blocks.iter().any(|e| e.starts_with("Block 3 (faq-a):")));
    assert!(findings.categories.is_empty());
    assert_eq!(findings.locales, vec!["Only one locale may be the default"]);
    assert!(findings.error_count() >= 3);
  }

  #[test]
  fn seo_findings_name_the_page() {
    let data = data();
    let parts = pseo_server::SiteServer::new("https://example.com")
      .categories(data.categories)
      .locales(vec![data.locales[0].clone()])
      .into_parts();
    let audit = parts.pages.audit(2).unwrap();
    assert_eq!(audit.pages.len(), 2);
    // no title template: every sampled page lacks a title
    assert_eq!(
      seo_findings(&audit),
      vec!["/currency/usd-eur: Missing title", "/currency/eur-usd: Missing title"]
    );
  }

  #[test]
  fn shared_slots_are_warnings() {
    let findings = collect(&data());
    assert!(findings.warnings.iter().any(|w| w.starts_with("faq-b: Slot \"faq\"")));
  }
}
