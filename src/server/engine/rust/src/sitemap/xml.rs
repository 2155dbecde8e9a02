/* src/server/engine/rust/src/sitemap/xml.rs */

use super::{SITEMAP_NAMESPACE, SitemapChunk, SitemapEntry, SitemapOptions};
use crate::escape::xml_escape;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// `1.0` renders as `1.0`, `0.75` as `0.75`.
fn format_priority(p: f64) -> String {
  if p.fract() == 0.0 { format!("{p:.1}") } else { format!("{p}") }
}

fn url_element(entry: &SitemapEntry) -> String {
  let mut out = format!("  <url><loc>{}</loc>", xml_escape(&entry.loc));
  if let Some(ref lastmod) = entry.lastmod {
    out.push_str(&format!("<lastmod>{}</lastmod>", xml_escape(lastmod)));
  }
  if let Some(freq) = entry.changefreq {
    out.push_str(&format!("<changefreq>{}</changefreq>", freq.as_str()));
  }
  if let Some(p) = entry.priority {
    out.push_str(&format!("<priority>{}</priority>", format_priority(p)));
  }
  out.push_str("</url>");
  out
}

/// Render a sitemaps.org `urlset` document.
pub fn urlset_xml(entries: &[SitemapEntry]) -> String {
  let mut lines = Vec::with_capacity(entries.len() + 3);
  lines.push(XML_DECL.to_string());
  lines.push(format!(r#"<urlset xmlns="{SITEMAP_NAMESPACE}">"#));
  lines.extend(entries.iter().map(url_element));
  lines.push("</urlset>".to_string());
  lines.join("\n")
}

/// Render a `sitemapindex` referencing every chunk at `/sitemaps/<filename>`.
pub fn index_xml(chunks: &[SitemapChunk], options: &SitemapOptions) -> String {
  let mut lines = Vec::with_capacity(chunks.len() + 3);
  lines.push(XML_DECL.to_string());
  lines.push(format!(r#"<sitemapindex xmlns="{SITEMAP_NAMESPACE}">"#));
  for chunk in chunks {
    let mut line = format!("  <sitemap><loc>{}</loc>", xml_escape(&options.chunk_url(chunk)));
    if let Some(ref lastmod) = options.lastmod {
      line.push_str(&format!("<lastmod>{}</lastmod>", xml_escape(lastmod)));
    }
    line.push_str("</sitemap>");
    lines.push(line);
  }
  lines.push("</sitemapindex>".to_string());
  lines.join("\n")
}

/// robots.txt allowing everything and listing the index plus every chunk.
pub fn robots_txt(chunks: &[SitemapChunk], options: &SitemapOptions) -> String {
  let mut lines = vec![
    "User-agent: *".to_string(),
    "Allow: /".to_string(),
    String::new(),
    format!("Sitemap: {}", options.index_url()),
  ];
  lines.extend(chunks.iter().map(|c| format!("Sitemap: {}", options.chunk_url(c))));
  lines.push(String::new());
  lines.push("# Crawl-delay: 1".to_string());
  lines.push("# Disallow: /admin/".to_string());
  lines.push("# Disallow: /api/".to_string());
  lines.join("\n")
}
