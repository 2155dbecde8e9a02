/* src/cli/core/src/build.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use pseo_server::SitemapBuild;
use pseo_server::pseo_engine::sitemap::{MAX_SITEMAP_BYTES, oversized_chunks};
use pseo_server::pseo_engine::{SitemapStats, urlset_xml};
use serde::Serialize;

use crate::config::PseoConfig;
use crate::data::{self, SiteData};
use crate::ui;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFile<'a> {
  filename: &'a str,
  url_count: usize,
  size_bytes: usize,
}

/// `sitemaps/manifest.json`: what was written and with which salt.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
  build_salt: &'a str,
  lastmod: &'a str,
  statistics: &'a SitemapStats,
  files: Vec<ManifestFile<'a>>,
}

fn write_file(path: &Path, content: &str) -> Result<()> {
  std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Write every chunk, the index and robots.txt under `out_dir`.
pub fn write_output(
  build: &SitemapBuild,
  out_dir: &Path,
  salt: &str,
  lastmod: &str,
) -> Result<Vec<PathBuf>> {
  let sitemaps_dir = out_dir.join("sitemaps");
  std::fs::create_dir_all(&sitemaps_dir)
    .with_context(|| format!("failed to create {}", sitemaps_dir.display()))?;

  let mut written = Vec::with_capacity(build.chunks.len() + 3);
  for chunk in &build.chunks {
    let path = sitemaps_dir.join(&chunk.filename);
    write_file(&path, &urlset_xml(&chunk.urls))?;
    written.push(path);
  }

  let index = out_dir.join("sitemap.xml");
  write_file(&index, &build.index_xml())?;
  written.push(index);

  let robots = out_dir.join("robots.txt");
  write_file(&robots, &build.robots_txt())?;
  written.push(robots);

  let manifest = Manifest {
    build_salt: salt,
    lastmod,
    statistics: &build.stats,
    files: build
      .chunks
      .iter()
      .map(|c| ManifestFile { filename: &c.filename, url_count: c.urls.len(), size_bytes: c.size })
      .collect(),
  };
  let manifest_path = sitemaps_dir.join("manifest.json");
  let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
  write_file(&manifest_path, &json)?;
  written.push(manifest_path);

  Ok(written)
}

pub fn run_build(
  config: &PseoConfig,
  base_dir: &Path,
  salt: &str,
  out_dir: Option<PathBuf>,
) -> Result<()> {
  ui::banner("build");
  let out_dir = out_dir.unwrap_or_else(|| base_dir.join(&config.build.out_dir));

  ui::step(1, 3, "Loading site data");
  let data = SiteData::load(config, base_dir)?;
  ui::detail_ok(&format!(
    "{} blocks, {} categories, {} locales",
    data.blocks.len(),
    data.categories.len(),
    data.locales.len()
  ));

  ui::step(2, 3, "Building sitemap");
  let lastmod = data::lastmod(config);
  let parts = data.into_server(config, salt, &lastmod).into_parts();
  let build = match parts.sitemaps.build() {
    Ok(build) => build,
    Err(err) => {
      for detail in err.details() {
        ui::fail(detail);
      }
      bail!("{}: nothing was written", err.message());
    }
  };
  ui::detail_ok(&format!(
    "{} URLs in {} chunk(s), largest {}",
    build.stats.total_urls, build.stats.total_chunks, build.stats.largest_chunk
  ));
  let size_limit = config.sitemap.max_sitemap_size.unwrap_or(MAX_SITEMAP_BYTES);
  for chunk in oversized_chunks(&build.chunks, size_limit) {
    ui::warn(&format!("{} is {}", chunk.filename, ui::format_size(chunk.size as u64)));
  }

  ui::step(3, 3, "Writing output");
  let written = write_output(&build, &out_dir, salt, &lastmod)?;
  for path in &written {
    let rel = path.strip_prefix(&out_dir).unwrap_or(path);
    ui::detail(&rel.display().to_string());
  }

  ui::blank();
  ui::ok(&format!("wrote {} files to {}", written.len(), out_dir.display()));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn setup(dir: &Path, base_url: &str) -> PseoConfig {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    std::fs::write(dir.join("data/blocks.json"), "[]").unwrap();
    std::fs::write(
      dir.join("data/categories.json"),
      r#"[{"id": "currency", "slug": "currency", "name": "Currency", "urlPattern": ":base-:quote",
          "templateType": "converter", "locales": ["en", "fr"], "isActive": true}]"#,
    )
    .unwrap();
    std::fs::write(
      dir.join("data/locales.json"),
      r#"[{"code": "en", "name": "English", "isDefault": true}, {"code": "fr", "name": "French"}]"#,
    )
    .unwrap();
    toml::from_str(&format!(
      r#"
[project]
name = "fx"

[site]
base_url = "{base_url}"

[sitemap]
max_urls_per_sitemap = 5
sample_identifiers = 4
lastmod = "2024-06-01"
"#
    ))
    .unwrap()
  }

  #[test]
  fn build_writes_chunks_index_and_robots() {
    let tmp = tempfile::tempdir().unwrap();
    let config = setup(tmp.path(), "https://example.com");
    run_build(&config, tmp.path(), "s1", None).unwrap();

    let out = tmp.path().join("dist");
    // 4 identifiers x 2 locales + 2 index pages = 10 -> 2 chunks of 5
    assert!(out.join("sitemaps/sitemap-0.xml").is_file());
    assert!(out.join("sitemaps/sitemap-1.xml").is_file());
    assert!(!out.join("sitemaps/sitemap-2.xml").exists());

    let index = std::fs::read_to_string(out.join("sitemap.xml")).unwrap();
    assert!(index.contains("https://example.com/sitemaps/sitemap-1.xml"));
    let robots = std::fs::read_to_string(out.join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));

    let manifest: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(out.join("sitemaps/manifest.json")).unwrap())
        .unwrap();
    assert_eq!(manifest["buildSalt"], "s1");
    assert_eq!(manifest["statistics"]["totalUrls"], 10);
    assert_eq!(manifest["files"][1]["urlCount"], 5);
  }

  #[test]
  fn invalid_sitemap_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = setup(tmp.path(), "https://example.com");
    config.site.base_url = "example.com".to_string();
    let out = tmp.path().join("out");
    let err = run_build(&config, tmp.path(), "s1", Some(out.clone())).unwrap_err();
    assert!(err.to_string().contains("Sitemap validation failed"));
    assert!(!out.exists());
  }
}
