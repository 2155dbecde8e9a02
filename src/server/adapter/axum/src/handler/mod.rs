/* src/server/adapter/axum/src/handler/mod.rs */

mod admin;
mod ops;
mod page;
mod sitemap;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use pseo_server::{AdminService, PageResolver, PseoError, SiteParts, SitemapService};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) struct AppState {
  pub admin: Arc<AdminService>,
  pub pages: Arc<PageResolver>,
  pub sitemaps: Arc<SitemapService>,
}

/// Success body: `{"ok": true, "data": ..}`.
#[derive(Serialize)]
pub(super) struct Envelope<T> {
  ok: bool,
  data: T,
}

pub(super) fn ok<T: Serialize>(data: T) -> axum::Json<Envelope<T>> {
  axum::Json(Envelope { ok: true, data })
}

pub(super) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, PseoError> {
  serde_json::from_slice(body).map_err(|e| PseoError::validation(e.to_string()))
}

/// Run blocking service work off the async executor.
pub(super) async fn blocking<T, F>(work: F) -> Result<T, PseoError>
where
  T: Send + 'static,
  F: FnOnce() -> Result<T, PseoError> + Send + 'static,
{
  tokio::task::spawn_blocking(work)
    .await
    .map_err(|e| PseoError::internal(e.to_string()))? // JoinError -> Internal (task panic)
}

pub(crate) fn build_router(parts: SiteParts) -> Router {
  let state =
    Arc::new(AppState { admin: parts.admin, pages: parts.pages, sitemaps: parts.sitemaps });

  Router::new()
    .route("/sitemap.xml", get(sitemap::handle_index))
    .route("/sitemaps/{filename}", get(sitemap::handle_chunk))
    .route("/robots.txt", get(sitemap::handle_robots))
    .route("/api/page/{*path}", get(page::handle_page))
    .route("/api/admin/blocks", get(admin::list_blocks).post(admin::create_block))
    .route(
      "/api/admin/blocks/{id}",
      get(admin::get_block).put(admin::update_block).delete(admin::delete_block),
    )
    .route("/api/admin/categories", get(admin::list_categories).post(admin::create_category))
    .route(
      "/api/admin/categories/{id}",
      get(admin::get_category).put(admin::update_category).delete(admin::delete_category),
    )
    .route("/api/admin/locales", get(admin::list_locales).post(admin::create_locale))
    .route("/api/admin/locales/{code}", put(admin::update_locale).delete(admin::delete_locale))
    .route("/api/admin/locales/{code}/default", post(admin::set_default_locale))
    .route("/api/ops/sitemaps/validate", get(ops::validate_sitemaps))
    .route("/api/ops/sitemaps/list", get(ops::list_sitemaps))
    .route("/api/ops/blocks/stats", get(ops::block_stats))
    .route("/api/ops/seo/validate", get(ops::audit_seo).post(ops::check_seo))
    .with_state(state)
}
