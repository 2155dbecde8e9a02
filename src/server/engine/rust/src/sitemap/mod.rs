/* src/server/engine/rust/src/sitemap/mod.rs */

// Sitemap partitioning: chunk a flat URL list into bounded files, validate
// entries, aggregate statistics, and render index/robots output.
// Input order is preserved everywhere; nothing here sorts.

mod xml;


use serde::{Deserialize, Serialize};

pub use xml::{index_xml, robots_txt, urlset_xml};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
/// sitemaps.org limit on URLs per file.
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;
/// sitemaps.org limit on uncompressed file size.
pub const MAX_SITEMAP_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
  Always,
  Hourly,
  Daily,
  Weekly,
  Monthly,
  Yearly,
  Never,
}

impl ChangeFreq {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Always => "always",
      Self::Hourly => "hourly",
      Self::Daily => "daily",
      Self::Weekly => "weekly",
      Self::Monthly => "monthly",
      Self::Yearly => "yearly",
      Self::Never => "never",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
  #[serde(default)]
  pub loc: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lastmod: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub changefreq: Option<ChangeFreq>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub priority: Option<f64>,
}

impl SitemapEntry {
  pub fn new(loc: impl Into<String>) -> Self {
    Self { loc: loc.into(), ..Default::default() }
  }

  pub fn lastmod(mut self, lastmod: impl Into<String>) -> Self {
    self.lastmod = Some(lastmod.into());
    self
  }

  pub fn changefreq(mut self, changefreq: ChangeFreq) -> Self {
    self.changefreq = Some(changefreq);
    self
  }

  pub fn priority(mut self, priority: f64) -> Self {
    self.priority = Some(priority);
    self
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapChunk {
  pub filename: String,
  pub urls: Vec<SitemapEntry>,
  /// UTF-8 byte length of the chunk's urlset document.
  pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
  pub valid: bool,
  pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapStats {
  pub total_urls: usize,
  pub total_chunks: usize,
  pub total_size: usize,
  pub average_urls_per_chunk: f64,
  pub largest_chunk: usize,
}

/// Public URL layout for index and robots output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapOptions {
  /// Site origin without trailing slash, e.g. `https://example.com`.
  pub base_url: String,
  /// Shared `<lastmod>` for index entries; omitted when `None`.
  pub lastmod: Option<String>,
}

impl SitemapOptions {
  pub fn new(base_url: &str) -> Self {
    Self { base_url: base_url.trim_end_matches('/').to_string(), lastmod: None }
  }

  pub fn with_lastmod(mut self, lastmod: impl Into<String>) -> Self {
    self.lastmod = Some(lastmod.into());
    self
  }

  pub fn index_url(&self) -> String {
    format!("{}/sitemap.xml", self.base_url)
  }

  pub fn chunk_url(&self, chunk: &SitemapChunk) -> String {
    format!("{}/sitemaps/{}", self.base_url, chunk.filename)
  }
}

pub fn chunk_filename(index: usize) -> String {
  format!("sitemap-{index}.xml")
}

/// Inverse of `chunk_filename`: `sitemap-3.xml` -> 3. Only the canonical
/// spelling is accepted, so `sitemap-03.xml` is rejected.
pub fn chunk_index(filename: &str) -> Option<usize> {
  let digits = filename.strip_prefix("sitemap-")?.strip_suffix(".xml")?;
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  if digits.len() > 1 && digits.starts_with('0') {
    return None;
  }
  digits.parse().ok()
}

/// Split `entries` into consecutive chunks of at most `max_per_chunk` URLs.
/// A limit of 0 is treated as 1.
pub fn chunk(entries: &[SitemapEntry], max_per_chunk: usize) -> Vec<SitemapChunk> {
  entries
    .chunks(max_per_chunk.max(1))
    .enumerate()
    .map(|(index, urls)| SitemapChunk {
      filename: chunk_filename(index),
      urls: urls.to_vec(),
      size: urlset_xml(urls).len(),
    })
    .collect()
}

/// Accumulating validation. An empty list, a missing or non-absolute `loc`,
/// or a priority outside [0, 1] each add an error.
pub fn validate(entries: &[SitemapEntry]) -> ValidationResult {
  let mut errors = Vec::new();

  if entries.is_empty() {
    errors.push("No URLs found in sitemap".to_string());
  }

  for entry in entries {
    if entry.loc.trim().is_empty() {
      errors.push("URL missing location".to_string());
      continue;
    }
    if !is_absolute_http_url(&entry.loc) {
      errors.push(format!("Invalid URL format: {}", entry.loc));
    }
    if let Some(p) = entry.priority {
      if !(0.0..=1.0).contains(&p) {
        errors.push(format!("Invalid priority value: {p} for {}", entry.loc));
      }
    }
  }

  ValidationResult { valid: errors.is_empty(), errors }
}

fn is_absolute_http_url(loc: &str) -> bool {
  match url::Url::parse(loc) {
    Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
    Err(_) => false,
  }
}

pub fn stats(entries: &[SitemapEntry], chunks: &[SitemapChunk]) -> SitemapStats {
  let total_urls = entries.len();
  let total_chunks = chunks.len();
  let average_urls_per_chunk =
    if total_chunks == 0 { 0.0 } else { total_urls as f64 / total_chunks as f64 };
  SitemapStats {
    total_urls,
    total_chunks,
    total_size: chunks.iter().map(|c| c.size).sum(),
    average_urls_per_chunk,
    largest_chunk: chunks.iter().map(|c| c.urls.len()).max().unwrap_or(0),
  }
}

/// Chunks whose rendered size exceeds `max_bytes`. Informational; chunking
/// itself is bounded by URL count only.
pub fn oversized_chunks(chunks: &[SitemapChunk], max_bytes: usize) -> Vec<&SitemapChunk> {
  chunks.iter().filter(|c| c.size > max_bytes).collect()
}
