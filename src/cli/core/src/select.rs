/* src/cli/core/src/select.rs */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use pseo_server::PageView;
use pseo_server::pseo_engine::derive_seed;
use serde::Serialize;

use crate::config::PseoConfig;
use crate::data::{self, SiteData};
use crate::ui;

/// Compact view: block ids per slot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionSummary<'a> {
  path: &'a str,
  locale: &'a str,
  build_salt: &'a str,
  seed: String,
  slots: BTreeMap<&'a str, Vec<&'a str>>,
}

fn summarize<'a>(view: &'a PageView, salt: &'a str) -> SelectionSummary<'a> {
  SelectionSummary {
    path: &view.path,
    locale: &view.identifier.locale,
    build_salt: salt,
    seed: format!("{:016x}", derive_seed(&view.path, salt)),
    slots: view
      .slots
      .iter()
      .map(|(slot, blocks)| (slot.as_str(), blocks.iter().map(|b| b.id.as_str()).collect()))
      .collect(),
  }
}

/// Resolve `path` and render the selection as pretty JSON.
pub fn render_selection(
  config: &PseoConfig,
  data: SiteData,
  path: &str,
  salt: &str,
  full: bool,
) -> Result<String> {
  let lastmod = data::lastmod(config);
  let parts = data.into_server(config, salt, &lastmod).into_parts();
  let view = parts.pages.resolve_path(path).with_context(|| format!("cannot resolve {path}"))?;
  let json = if full {
    serde_json::to_string_pretty(&view)
  } else {
    serde_json::to_string_pretty(&summarize(&view, salt))
  };
  json.context("failed to serialize selection")
}

pub fn run_select(
  config: &PseoConfig,
  base_dir: &Path,
  path: &str,
  salt: &str,
  full: bool,
) -> Result<()> {
  let data = SiteData::load(config, base_dir)?;
  ui::raw(&render_selection(config, data, path, salt, full)?);
  Ok(())
}
