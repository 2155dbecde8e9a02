/* src/cli/core/src/serve.rs */

use std::path::Path;

use anyhow::{Result, anyhow};
use pseo_server_axum::IntoAxumRouter;

use crate::config::PseoConfig;
use crate::data::{self, SiteData};
use crate::ui;

pub async fn run_serve(
  config: &PseoConfig,
  base_dir: &Path,
  salt: &str,
  port: Option<u16>,
) -> Result<()> {
  ui::banner("serve");
  let data = SiteData::load(config, base_dir)?;
  let lastmod = data::lastmod(config);
  let port = port.unwrap_or(config.server.port);

  ui::arrow(&format!("build salt {salt}"));
  let base_url = config.site.base_url.trim_end_matches('/');
  ui::arrow(&format!("sitemap index at {base_url}/sitemap.xml"));
  ui::ok(&format!("listening on http://localhost:{port}"));
  ui::blank();

  let server = data.into_server(config, salt, &lastmod);
  server.serve(&format!("0.0.0.0:{port}")).await.map_err(|e| anyhow!("server error: {e}"))
}
