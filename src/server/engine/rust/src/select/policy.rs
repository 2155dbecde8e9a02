/* src/server/engine/rust/src/select/policy.rs */

use serde::{Deserialize, Serialize};

/// How a block's `locale` is compared with the page locale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalePolicy {
  /// Block locale must equal the page locale.
  #[default]
  Exact,
  /// Blocks with an empty locale or `*` match every page locale.
  AllowGlobal,
}

impl LocalePolicy {
  pub fn matches(self, block_locale: &str, page_locale: &str) -> bool {
    match self {
      Self::Exact => block_locale == page_locale,
      Self::AllowGlobal => {
        block_locale == page_locale || block_locale.is_empty() || block_locale == "*"
      }
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Exact => "exact",
      Self::AllowGlobal => "allow_global",
    }
  }
}

/// Candidate ordering within a slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
  /// Weight descending; the seeded draw only breaks ties between equal weights.
  #[default]
  WeightFirst,
  /// A-ES weighted sampling: score `u^(1/weight)` descending.
  WeightedSampling,
}

impl RankingPolicy {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::WeightFirst => "weight_first",
      Self::WeightedSampling => "weighted_sampling",
    }
  }
}

/// Reach of the accepted-id set used for mutual exclusion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionScope {
  /// Shared across all slots of a page; a block fills at most one slot.
  #[default]
  Page,
  /// Reset for every slot.
  Slot,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
  #[serde(default)]
  pub locale: LocalePolicy,
  #[serde(default)]
  pub ranking: RankingPolicy,
  #[serde(default)]
  pub exclusion_scope: ExclusionScope,
}
