/* src/server/core/rust/src/admin.rs */

use std::sync::Arc;

use pseo_engine::block::{BlockStatistics, block_statistics};
use pseo_engine::validate::{
  validate_block, validate_block_constraints, validate_category, validate_category_uniqueness,
  validate_locale,
};
use pseo_engine::{BlockType, Category, ContentBlock, DEFAULT_SLOTS, Locale};
use serde::{Deserialize, Serialize};

use crate::errors::PseoError;
use crate::store::Repository;

/// Query filters for the block listing; absent fields do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockFilter {
  #[serde(rename = "type")]
  pub block_type: Option<BlockType>,
  pub locale: Option<String>,
  pub category: Option<String>,
  pub reviewed: Option<bool>,
}

impl BlockFilter {
  fn matches(&self, block: &ContentBlock) -> bool {
    self.block_type.is_none_or(|t| block.block_type == t)
      && self.locale.as_ref().is_none_or(|l| &block.locale == l)
      && self.category.as_ref().is_none_or(|c| block.constraints.categories.contains(c))
      && self.reviewed.is_none_or(|r| block.reviewed == r)
  }
}

#[derive(Debug, Serialize)]
pub struct BlockListing {
  pub blocks: Vec<ContentBlock>,
  pub total: usize,
  pub types: Vec<&'static str>,
  pub slots: Vec<&'static str>,
}

/// A stored block plus non-blocking constraint findings.
#[derive(Debug, Serialize)]
pub struct BlockWrite {
  pub block: ContentBlock,
  pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LocaleListing {
  /// Active locales only.
  pub locales: Vec<Locale>,
  pub total: usize,
  pub active: usize,
}

/// Validated CRUD over blocks, categories and locales.
pub struct AdminService {
  blocks: Arc<dyn Repository<ContentBlock>>,
  categories: Arc<dyn Repository<Category>>,
  locales: Arc<dyn Repository<Locale>>,
}

fn reject(reason: &str, errors: Vec<String>) -> Result<(), PseoError> {
  if errors.is_empty() {
    return Ok(());
  }
  tracing::debug!(reason, ?errors, "admin write rejected");
  Err(PseoError::validation(reason).with_details(errors))
}

/// Swap the store's generic 404 message for an entity-specific one.
fn not_found_as(message: &'static str) -> impl Fn(PseoError) -> PseoError {
  move |err| if err.status() == 404 { PseoError::not_found(message) } else { err }
}

impl AdminService {
  pub fn new(
    blocks: Arc<dyn Repository<ContentBlock>>,
    categories: Arc<dyn Repository<Category>>,
    locales: Arc<dyn Repository<Locale>>,
  ) -> Self {
    Self { blocks, categories, locales }
  }

  // -- Blocks --

  pub fn list_blocks(&self, filter: &BlockFilter) -> Result<BlockListing, PseoError> {
    let blocks: Vec<ContentBlock> =
      self.blocks.list()?.into_iter().filter(|b| filter.matches(b)).collect();
    Ok(BlockListing {
      total: blocks.len(),
      blocks,
      types: BlockType::ALL.iter().map(|t| t.as_str()).collect(),
      slots: DEFAULT_SLOTS.to_vec(),
    })
  }

  pub fn get_block(&self, id: &str) -> Result<ContentBlock, PseoError> {
    self.blocks.get(id)?.ok_or_else(|| PseoError::not_found("Block not found"))
  }

  pub fn create_block(&self, block: ContentBlock) -> Result<BlockWrite, PseoError> {
    reject("Validation failed", validate_block(&block))?;

    let mut warnings = Vec::new();
    self.blocks.apply(&mut |items| {
      if items.iter().any(|b| b.id == block.id) {
        return Err(PseoError::conflict("Block with this ID already exists"));
      }
      warnings = validate_block_constraints(&block, items);
      items.push(block.clone());
      Ok(())
    })?;

    tracing::info!(block = %block.id, warnings = warnings.len(), "block created");
    Ok(BlockWrite { block, warnings })
  }

  /// Replace the block stored under `id`. The path id wins over the body.
  pub fn update_block(&self, id: &str, mut block: ContentBlock) -> Result<BlockWrite, PseoError> {
    block.id = id.to_string();
    reject("Validation failed", validate_block(&block))?;

    let mut warnings = Vec::new();
    self.blocks.apply(&mut |items| {
      let index = items
        .iter()
        .position(|b| b.id == block.id)
        .ok_or_else(|| PseoError::not_found("Block not found"))?;
      warnings = validate_block_constraints(&block, items);
      items[index] = block.clone();
      Ok(())
    })?;

    tracing::info!(block = %block.id, "block updated");
    Ok(BlockWrite { block, warnings })
  }

  pub fn delete_block(&self, id: &str) -> Result<ContentBlock, PseoError> {
    let removed = self.blocks.delete(id).map_err(not_found_as("Block not found"))?;
    tracing::info!(block = %id, "block deleted");
    Ok(removed)
  }

  pub fn block_statistics(&self) -> Result<BlockStatistics, PseoError> {
    Ok(block_statistics(&self.blocks.list()?))
  }

  // -- Categories --

  pub fn list_categories(&self) -> Result<Vec<Category>, PseoError> {
    self.categories.list()
  }

  pub fn get_category(&self, id: &str) -> Result<Category, PseoError> {
    self.categories.get(id)?.ok_or_else(|| PseoError::not_found("Category not found"))
  }

  /// A category without an id is keyed by its slug.
  pub fn create_category(&self, mut category: Category) -> Result<Category, PseoError> {
    if category.id.is_empty() {
      category.id = category.slug.clone();
    }
    reject("Validation failed", validate_category(&category))?;

    self.categories.apply(&mut |items| {
      if items.iter().any(|c| c.id == category.id) {
        return Err(PseoError::conflict("Category with this ID already exists"));
      }
      reject("Uniqueness validation failed", validate_category_uniqueness(items, &category))?;
      items.push(category.clone());
      Ok(())
    })?;

    tracing::info!(category = %category.id, "category created");
    Ok(category)
  }

  pub fn update_category(&self, id: &str, mut category: Category) -> Result<Category, PseoError> {
    category.id = id.to_string();
    reject("Validation failed", validate_category(&category))?;

    self.categories.apply(&mut |items| {
      let index = items
        .iter()
        .position(|c| c.id == category.id)
        .ok_or_else(|| PseoError::not_found("Category not found"))?;
      reject("Uniqueness validation failed", validate_category_uniqueness(items, &category))?;
      items[index] = category.clone();
      Ok(())
    })?;

    tracing::info!(category = %category.id, "category updated");
    Ok(category)
  }

  pub fn delete_category(&self, id: &str) -> Result<Category, PseoError> {
    let removed = self.categories.delete(id).map_err(not_found_as("Category not found"))?;
    tracing::info!(category = %id, "category deleted");
    Ok(removed)
  }

  // -- Locales --

  pub fn list_locales(&self) -> Result<LocaleListing, PseoError> {
    let all = self.locales.list()?;
    let total = all.len();
    let locales: Vec<Locale> = all.into_iter().filter(|l| l.is_active).collect();
    Ok(LocaleListing { active: locales.len(), locales, total })
  }

  /// The first locale ever created becomes the default; a new default
  /// clears the flag on every other locale.
  pub fn create_locale(&self, mut locale: Locale) -> Result<Locale, PseoError> {
    self.locales.apply(&mut |items| {
      reject("Validation failed", validate_locale(&locale, items))?;
      if items.is_empty() {
        locale.is_default = true;
      }
      if locale.is_default {
        items.iter_mut().for_each(|l| l.is_default = false);
      }
      items.push(locale.clone());
      Ok(())
    })?;

    tracing::info!(locale = %locale.code, default = locale.is_default, "locale created");
    Ok(locale)
  }

  pub fn update_locale(&self, code: &str, mut locale: Locale) -> Result<Locale, PseoError> {
    locale.code = code.to_string();
    self.locales.apply(&mut |items| {
      let index = items
        .iter()
        .position(|l| l.code == locale.code)
        .ok_or_else(|| PseoError::not_found("Locale not found"))?;
      let others: Vec<Locale> =
        items.iter().filter(|l| l.code != locale.code).cloned().collect();
      reject("Validation failed", validate_locale(&locale, &others))?;
      if locale.is_default {
        items.iter_mut().for_each(|l| l.is_default = false);
      }
      items[index] = locale.clone();
      Ok(())
    })?;

    tracing::info!(locale = %locale.code, "locale updated");
    Ok(locale)
  }

  pub fn set_default_locale(&self, code: &str) -> Result<Locale, PseoError> {
    let mut locale =
      self.locales.get(code)?.ok_or_else(|| PseoError::not_found("Locale not found"))?;
    locale.is_default = true;
    self.update_locale(code, locale)
  }

  /// Deleting the default hands the flag to the next active locale. A
  /// default with no active locale to take over cannot be deleted.
  pub fn delete_locale(&self, code: &str) -> Result<Locale, PseoError> {
    let mut removed = None;
    self.locales.apply(&mut |items| {
      let index = items
        .iter()
        .position(|l| l.code == code)
        .ok_or_else(|| PseoError::not_found("Locale not found"))?;
      let successor = items.iter().any(|l| l.code != code && l.is_active);
      if items[index].is_default && !successor {
        return Err(PseoError::validation("Cannot delete the only default locale"));
      }
      let gone = items.remove(index);
      if gone.is_default {
        if let Some(next) = items.iter_mut().find(|l| l.is_active) {
          next.is_default = true;
        }
      }
      removed = Some(gone);
      Ok(())
    })?;

    tracing::info!(locale = %code, "locale deleted");
    removed.ok_or_else(|| PseoError::internal("delete produced no locale"))
  }
}
