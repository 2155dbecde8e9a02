/* src/server/engine/rust/src/block.rs */

//! Content block model plus the lookup helpers used by the admin listing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SLOTS: [&str; 5] = ["benefits", "cta", "faq", "promo", "info"];

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
  Benefit,
  Cta,
  Faq,
  Promo,
  Info,
  /// Any value outside the closed set. Kept so validators can report it.
  #[default]
  #[serde(other)]
  Unknown,
}

impl BlockType {
  pub const ALL: [BlockType; 5] =
    [BlockType::Benefit, BlockType::Cta, BlockType::Faq, BlockType::Promo, BlockType::Info];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Benefit => "benefit",
      Self::Cta => "cta",
      Self::Faq => "faq",
      Self::Promo => "promo",
      Self::Info => "info",
      Self::Unknown => "unknown",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|t| t.as_str() == s)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConstraints {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub slots: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub mutually_exclusive: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMedia {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alt: Option<String>,
}

/// Every field defaults so a partially filled document still deserializes;
/// shape problems are reported by `validate::validate_block` and make the
/// block ineligible for selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
  #[serde(default)]
  pub id: String,
  #[serde(rename = "type", default)]
  pub block_type: BlockType,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub body: String,
  #[serde(default)]
  pub weight: i64,
  #[serde(default)]
  pub constraints: BlockConstraints,
  #[serde(default)]
  pub reviewed: bool,
  #[serde(default)]
  pub locale: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub media: Option<BlockMedia>,
}

impl ContentBlock {
  /// Required fields present and type known. Weight range is not checked
  /// here; selection clamps it.
  pub fn is_well_formed(&self) -> bool {
    !self.id.trim().is_empty()
      && !self.title.trim().is_empty()
      && !self.body.trim().is_empty()
      && self.block_type != BlockType::Unknown
  }

  /// Weight clamped into [1, 100].
  pub fn effective_weight(&self) -> u32 {
    self.weight.clamp(1, 100) as u32
  }

  pub fn allows_slot(&self, slot: &str) -> bool {
    self.constraints.slots.is_empty() || self.constraints.slots.iter().any(|s| s == slot)
  }

  pub fn allows_category(&self, category_id: &str) -> bool {
    self.constraints.categories.is_empty()
      || self.constraints.categories.iter().any(|c| c == category_id)
  }

  pub fn excludes(&self, other_id: &str) -> bool {
    self.constraints.mutually_exclusive.iter().any(|id| id == other_id)
  }
}

pub fn blocks_by_type(blocks: &[ContentBlock], block_type: BlockType) -> Vec<&ContentBlock> {
  blocks.iter().filter(|b| b.block_type == block_type).collect()
}

pub fn blocks_by_locale<'a>(blocks: &'a [ContentBlock], locale: &str) -> Vec<&'a ContentBlock> {
  blocks.iter().filter(|b| b.locale == locale).collect()
}

/// Blocks explicitly restricted to `category_id` (unconstrained blocks excluded).
pub fn blocks_by_category<'a>(
  blocks: &'a [ContentBlock],
  category_id: &str,
) -> Vec<&'a ContentBlock> {
  blocks.iter().filter(|b| b.constraints.categories.iter().any(|c| c == category_id)).collect()
}

/// Blocks explicitly restricted to `slot` (unconstrained blocks excluded).
pub fn blocks_by_slot<'a>(blocks: &'a [ContentBlock], slot: &str) -> Vec<&'a ContentBlock> {
  blocks.iter().filter(|b| b.constraints.slots.iter().any(|s| s == slot)).collect()
}

pub fn blocks_by_review(blocks: &[ContentBlock], reviewed: bool) -> Vec<&ContentBlock> {
  blocks.iter().filter(|b| b.reviewed == reviewed).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockStatistics {
  pub total: usize,
  pub by_type: BTreeMap<String, usize>,
  pub by_locale: BTreeMap<String, usize>,
  pub by_category: BTreeMap<String, usize>,
  pub reviewed: usize,
  pub unreviewed: usize,
}

pub fn block_statistics(blocks: &[ContentBlock]) -> BlockStatistics {
  let mut stats = BlockStatistics { total: blocks.len(), ..Default::default() };
  for block in blocks {
    *stats.by_type.entry(block.block_type.as_str().to_string()).or_default() += 1;
    *stats.by_locale.entry(block.locale.clone()).or_default() += 1;
    for category in &block.constraints.categories {
      *stats.by_category.entry(category.clone()).or_default() += 1;
    }
    if block.reviewed {
      stats.reviewed += 1;
    } else {
      stats.unreviewed += 1;
    }
  }
  stats
}
