/* src/server/engine/rust/src/category/jsonld.rs */

//! Breadcrumb trails and schema.org JSON-LD for programmatic pages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{Category, TemplateType, parse_url_pattern};
use crate::block::{BlockType, ContentBlock};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Serialized size limit for one JSON-LD document, in characters.
pub const MAX_JSON_LD_CHARS: usize = 10_000;
const NAME_MAX_CHARS: usize = 60;
const DESCRIPTION_MAX_CHARS: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
  pub name: String,
  pub url: String,
}

/// Page facts shared by every JSON-LD document of one page.
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
  pub title: &'a str,
  pub description: &'a str,
  /// Absolute canonical URL.
  pub url: &'a str,
  /// Organization named as author and publisher; omitted when empty.
  pub site_name: &'a str,
  /// Stamped on `Article` documents.
  pub modified: Option<&'a str>,
}

/// The JSON-LD documents emitted for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLdSet {
  pub web_page: Value,
  pub breadcrumb: Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category_specific: Option<Value>,
}

impl JsonLdSet {
  pub fn documents(&self) -> Vec<Value> {
    let mut docs = vec![self.web_page.clone(), self.breadcrumb.clone()];
    docs.extend(self.category_specific.clone());
    docs
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonLdCheck {
  pub valid: bool,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
}

/// Parameter values in pattern order: `:base-:quote` -> `usd - eur`.
fn params_label(category: &Category, params: &BTreeMap<String, String>) -> String {
  let values: Vec<&str> = parse_url_pattern(&category.url_pattern)
    .iter()
    .filter_map(|name| params.get(name).map(String::as_str))
    .collect();
  values.join(" - ")
}

/// Home, then the category landing page, then the page itself when it has
/// parameters.
pub fn breadcrumbs(
  base_url: &str,
  category: &Category,
  category_url: &str,
  params: &BTreeMap<String, String>,
  page_url: &str,
) -> Vec<Breadcrumb> {
  let mut trail = vec![
    Breadcrumb { name: "Home".to_string(), url: base_url.trim_end_matches('/').to_string() },
    Breadcrumb { name: category.name.clone(), url: category_url.to_string() },
  ];
  let label = params_label(category, params);
  if !label.is_empty() {
    trail.push(Breadcrumb { name: label, url: page_url.to_string() });
  }
  trail
}

pub fn breadcrumb_json_ld(trail: &[Breadcrumb]) -> Value {
  let items: Vec<Value> = trail
    .iter()
    .enumerate()
    .map(|(i, crumb)| {
      json!({
        "@type": "ListItem",
        "position": i + 1,
        "name": crumb.name,
        "item": crumb.url,
      })
    })
    .collect();
  json!({
    "@context": SCHEMA_CONTEXT,
    "@type": "BreadcrumbList",
    "itemListElement": items,
  })
}

fn base_document(kind: &str, meta: &PageMeta<'_>) -> Map<String, Value> {
  let mut doc = Map::new();
  doc.insert("@context".into(), SCHEMA_CONTEXT.into());
  doc.insert("@type".into(), kind.into());
  doc.insert("name".into(), meta.title.into());
  doc.insert("description".into(), meta.description.into());
  doc.insert("url".into(), meta.url.into());
  doc
}

fn organization(name: &str) -> Value {
  json!({"@type": "Organization", "name": name})
}

fn converter_document(meta: &PageMeta<'_>) -> Value {
  let mut doc = base_document("WebApplication", meta);
  doc.insert("applicationCategory".into(), "FinanceApplication".into());
  doc.insert("operatingSystem".into(), "Web Browser".into());
  doc.insert("offers".into(), json!({"@type": "Offer", "price": "0", "priceCurrency": "USD"}));
  doc.insert(
    "featureList".into(),
    json!(["Real-time exchange rates", "Multiple currency support", "Instant conversion"]),
  );
  Value::Object(doc)
}

fn article_document(meta: &PageMeta<'_>) -> Value {
  let mut doc = base_document("Article", meta);
  doc.insert("headline".into(), meta.title.into());
  if let Some(date) = meta.modified {
    doc.insert("datePublished".into(), date.into());
    doc.insert("dateModified".into(), date.into());
  }
  if !meta.site_name.is_empty() {
    doc.insert("author".into(), organization(meta.site_name));
    doc.insert("publisher".into(), organization(meta.site_name));
  }
  Value::Object(doc)
}

/// Questions come from the FAQ blocks selected for the page; no FAQ blocks,
/// no document.
fn faq_document(meta: &PageMeta<'_>, blocks: &[&ContentBlock]) -> Option<Value> {
  let questions: Vec<Value> = blocks
    .iter()
    .filter(|b| b.block_type == BlockType::Faq)
    .map(|b| {
      json!({
        "@type": "Question",
        "name": b.title,
        "acceptedAnswer": {"@type": "Answer", "text": b.body},
      })
    })
    .collect();
  if questions.is_empty() {
    return None;
  }
  let mut doc = base_document("FAQPage", meta);
  doc.insert("mainEntity".into(), Value::Array(questions));
  Some(Value::Object(doc))
}

/// WebPage + BreadcrumbList, plus a template-specific document:
/// converters get a `WebApplication`, news an `Article`, information pages
/// an `FAQPage`.
pub fn page_json_ld(
  meta: &PageMeta<'_>,
  category: &Category,
  trail: &[Breadcrumb],
  blocks: &[&ContentBlock],
) -> JsonLdSet {
  let breadcrumb = breadcrumb_json_ld(trail);
  let mut web_page = base_document("WebPage", meta);
  web_page.insert("breadcrumb".into(), breadcrumb.clone());

  let category_specific = match category.template_type {
    Some(TemplateType::Converter) => Some(converter_document(meta)),
    Some(TemplateType::News) => Some(article_document(meta)),
    Some(TemplateType::Information) => faq_document(meta, blocks),
    _ => None,
  };

  JsonLdSet { web_page: Value::Object(web_page), breadcrumb, category_specific }
}

fn text_field<'a>(schema: &'a Value, key: &str) -> Option<&'a str> {
  schema.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Required keys and size limit are errors; long `name` or `description`
/// only warn.
pub fn validate_json_ld(schema: &Value) -> JsonLdCheck {
  let mut errors = Vec::new();
  let mut warnings = Vec::new();

  if text_field(schema, "@context").is_none() {
    errors.push("Missing @context".to_string());
  }
  if text_field(schema, "@type").is_none() {
    errors.push("Missing @type".to_string());
  }

  let size = schema.to_string().chars().count();
  if size > MAX_JSON_LD_CHARS {
    errors.push(format!("JSON-LD too large: {size} characters (max: {MAX_JSON_LD_CHARS})"));
  }

  if let Some(name) = text_field(schema, "name") {
    let n = name.chars().count();
    if n > NAME_MAX_CHARS {
      warnings.push(format!("Name too long: {n} characters (max: {NAME_MAX_CHARS})"));
    }
  }
  if let Some(description) = text_field(schema, "description") {
    let n = description.chars().count();
    if n > DESCRIPTION_MAX_CHARS {
      warnings
        .push(format!("Description too long: {n} characters (max: {DESCRIPTION_MAX_CHARS})"));
    }
  }

  JsonLdCheck { valid: errors.is_empty(), errors, warnings }
}
