/* src/server/adapter/axum/src/handler/admin.rs */

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use pseo_server::pseo_engine::{Category, ContentBlock, Locale};
use pseo_server::{BlockFilter, BlockListing, BlockWrite, LocaleListing, PseoError};
use serde::Serialize;

use super::{AppState, Envelope, blocking, ok, parse_body};
use crate::error::AxumError;

type Reply<T> = Result<Json<Envelope<T>>, AxumError>;
type Created<T> = Result<(StatusCode, Json<Envelope<T>>), AxumError>;

// -- Blocks --

pub(super) async fn list_blocks(
  State(state): State<Arc<AppState>>,
  query: Result<Query<BlockFilter>, QueryRejection>,
) -> Reply<BlockListing> {
  let Query(filter) = query.map_err(|e| PseoError::validation(e.body_text()))?;
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.list_blocks(&filter)).await?))
}

pub(super) async fn get_block(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Reply<ContentBlock> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.get_block(&id)).await?))
}

pub(super) async fn create_block(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Created<BlockWrite> {
  let block: ContentBlock = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  let written = blocking(move || admin.create_block(block)).await?;
  Ok((StatusCode::CREATED, ok(written)))
}

pub(super) async fn update_block(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Reply<BlockWrite> {
  let block: ContentBlock = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.update_block(&id, block)).await?))
}

pub(super) async fn delete_block(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Reply<ContentBlock> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.delete_block(&id)).await?))
}

// -- Categories --

#[derive(Serialize)]
pub(super) struct CategoryListing {
  categories: Vec<Category>,
  total: usize,
}

pub(super) async fn list_categories(State(state): State<Arc<AppState>>) -> Reply<CategoryListing> {
  let admin = Arc::clone(&state.admin);
  let categories = blocking(move || admin.list_categories()).await?;
  Ok(ok(CategoryListing { total: categories.len(), categories }))
}

pub(super) async fn get_category(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Reply<Category> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.get_category(&id)).await?))
}

pub(super) async fn create_category(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Created<Category> {
  let category: Category = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  let created = blocking(move || admin.create_category(category)).await?;
  Ok((StatusCode::CREATED, ok(created)))
}

pub(super) async fn update_category(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Reply<Category> {
  let category: Category = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.update_category(&id, category)).await?))
}

pub(super) async fn delete_category(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Reply<Category> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.delete_category(&id)).await?))
}

// -- Locales --

pub(super) async fn list_locales(State(state): State<Arc<AppState>>) -> Reply<LocaleListing> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.list_locales()).await?))
}

pub(super) async fn create_locale(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Created<Locale> {
  let locale: Locale = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  let created = blocking(move || admin.create_locale(locale)).await?;
  Ok((StatusCode::CREATED, ok(created)))
}

pub(super) async fn update_locale(
  State(state): State<Arc<AppState>>,
  Path(code): Path<String>,
  body: Bytes,
) -> Reply<Locale> {
  let locale: Locale = parse_body(&body)?;
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.update_locale(&code, locale)).await?))
}

pub(super) async fn set_default_locale(
  State(state): State<Arc<AppState>>,
  Path(code): Path<String>,
) -> Reply<Locale> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.set_default_locale(&code)).await?))
}

pub(super) async fn delete_locale(
  State(state): State<Arc<AppState>>,
  Path(code): Path<String>,
) -> Reply<Locale> {
  let admin = Arc::clone(&state.admin);
  Ok(ok(blocking(move || admin.delete_locale(&code)).await?))
}
