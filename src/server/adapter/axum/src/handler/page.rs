/* src/server/adapter/axum/src/handler/page.rs */

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use pseo_server::PageView;

use super::{AppState, Envelope, blocking, ok};
use crate::error::AxumError;

/// `[locale/]category/identifier...`; identifiers may span several segments.
pub(super) async fn handle_page(
  State(state): State<Arc<AppState>>,
  Path(path): Path<String>,
) -> Result<Json<Envelope<PageView>>, AxumError> {
  let pages = Arc::clone(&state.pages);
  let view = blocking(move || pages.resolve_path(&format!("/{path}"))).await?;
  Ok(ok(view))
}
