/* src/server/engine/rust/src/escape.rs */

/// Escape the five XML special characters for use in element text.
///
/// Sitemap `<loc>` values must be entity-escaped; `&` in query strings is
/// the common case. Input without special characters is returned as-is.
pub fn xml_escape(text: &str) -> String {
  if !text.contains(['&', '<', '>', '"', '\'']) {
    return text.to_string();
  }
  let mut out = String::with_capacity(text.len() + 16);
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(ch),
    }
  }
  out
}
