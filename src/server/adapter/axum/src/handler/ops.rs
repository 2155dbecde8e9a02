/* src/server/adapter/axum/src/handler/ops.rs */

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use pseo_server::pseo_engine::block::BlockStatistics;
use pseo_server::pseo_engine::seo::{
  SeoConsistency, SeoPageData, SeoValidation, validate_seo, validate_seo_consistency,
};
use pseo_server::{ChunkSummary, SeoAudit, SitemapReport};
use serde::Serialize;

use super::{AppState, Envelope, blocking, ok, parse_body};
use crate::error::AxumError;

/// Validation, chunk layout and statistics; never fails on invalid URLs.
pub(super) async fn validate_sitemaps(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<SitemapReport>>, AxumError> {
  let sitemaps = Arc::clone(&state.sitemaps);
  let report = blocking(move || sitemaps.report()).await?;
  if !report.validation.valid {
    tracing::warn!(errors = report.validation.errors.len(), "sitemap report has errors");
  }
  Ok(ok(report))
}

pub(super) async fn list_sitemaps(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<ChunkSummary>>>, AxumError> {
  let sitemaps = Arc::clone(&state.sitemaps);
  let report = blocking(move || sitemaps.report()).await?;
  Ok(ok(report.chunks))
}

pub(super) async fn block_stats(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<BlockStatistics>>, AxumError> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.block_statistics()).await?))
}

/// SEO checks over the same sample pages the sitemap lists.
pub(super) async fn audit_seo(
  State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<SeoAudit>>, AxumError> {
  let pages = Arc::clone(&state.pages);
  let samples = state.sitemaps.config().sample_identifiers;
  let audit = blocking(move || pages.audit(samples)).await?;
  if audit.error_count() > 0 {
    tracing::warn!(errors = audit.error_count(), "seo audit has errors");
  }
  Ok(ok(audit))
}

#[derive(Serialize)]
pub(super) struct SeoCheck {
  results: Vec<SeoValidation>,
  consistency: SeoConsistency,
}

/// Check caller-supplied page data, e.g. from a rendered frontend.
pub(super) async fn check_seo(body: Bytes) -> Result<Json<Envelope<SeoCheck>>, AxumError> {
  let pages: Vec<SeoPageData> = parse_body(&body)?;
  let results = pages.iter().map(validate_seo).collect();
  let consistency = validate_seo_consistency(&pages);
  Ok(ok(SeoCheck { results, consistency }))
}
