/* src/server/adapter/axum/src/handler/sitemap.rs */

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use pseo_server::pseo_engine::sitemap::chunk_index;
use pseo_server::{PseoError, SitemapBuild};

use super::{AppState, blocking};
use crate::error::AxumError;

const CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=3600";

fn cached(content_type: &'static str, body: String) -> Response {
  ([(header::CONTENT_TYPE, content_type), (header::CACHE_CONTROL, CACHE_CONTROL)], body)
    .into_response()
}

async fn build(state: &AppState) -> Result<SitemapBuild, PseoError> {
  let sitemaps = Arc::clone(&state.sitemaps);
  blocking(move || sitemaps.build()).await
}

pub(super) async fn handle_index(
  State(state): State<Arc<AppState>>,
) -> Result<Response, AxumError> {
  let build = build(&state).await?;
  Ok(cached("application/xml", build.index_xml()))
}

pub(super) async fn handle_chunk(
  State(state): State<Arc<AppState>>,
  Path(filename): Path<String>,
) -> Result<Response, AxumError> {
  if chunk_index(&filename).is_none() {
    return Err(PseoError::validation("Invalid sitemap filename").into());
  }
  let build = build(&state).await?;
  let xml =
    build.chunk_xml(&filename).ok_or_else(|| PseoError::not_found("Sitemap chunk not found"))?;
  Ok(cached("application/xml", xml))
}

pub(super) async fn handle_robots(
  State(state): State<Arc<AppState>>,
) -> Result<Response, AxumError> {
  let sitemaps = Arc::clone(&state.sitemaps);
  let robots = blocking(move || sitemaps.robots_txt()).await?;
  Ok(cached("text/plain", robots))
}
