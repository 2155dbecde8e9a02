/* src/server/engine/rust/src/select/mod.rs */

// Deterministic content-block selection.
// Eligibility filter -> per-slot candidates -> seeded ranking -> symmetric
// mutual exclusion -> per-slot cap. Pure: no clock, no ambient randomness.

mod policy;
mod rank;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::block::{BlockType, ContentBlock};
use crate::rng::SeededRng;

pub use policy::{ExclusionScope, LocalePolicy, RankingPolicy, SelectionPolicy};
use rank::{rank_candidates, Candidate};

/// Slot name -> accepted blocks, in ranked order.
pub type SlotAssignments = BTreeMap<String, Vec<ContentBlock>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
  pub category_id: String,
  pub locale: String,
  /// Uniquely identifies the page, e.g. its canonical path.
  pub page_key: String,
  /// Build-wide constant such as a commit SHA.
  pub build_salt: String,
}

impl SelectionContext {
  pub fn new(
    category_id: impl Into<String>,
    locale: impl Into<String>,
    page_key: impl Into<String>,
    build_salt: impl Into<String>,
  ) -> Self {
    Self {
      category_id: category_id.into(),
      locale: locale.into(),
      page_key: page_key.into(),
      build_salt: build_salt.into(),
    }
  }
}

/// `select_blocks_with` under the default policy.
pub fn select_blocks(
  pool: &[ContentBlock],
  context: &SelectionContext,
  slots: &[&str],
  max_per_slot: usize,
) -> SlotAssignments {
  select_blocks_with(&SelectionPolicy::default(), pool, context, slots, max_per_slot)
}

/// Select up to `max_per_slot` blocks for every slot in `slots`.
///
/// Every requested slot appears in the result; a slot without eligible
/// candidates maps to an empty list. Slots are filled in the given order,
/// which matters under `ExclusionScope::Page` because blocks accepted for an
/// earlier slot constrain later ones.
pub fn select_blocks_with(
  policy: &SelectionPolicy,
  pool: &[ContentBlock],
  context: &SelectionContext,
  slots: &[&str],
  max_per_slot: usize,
) -> SlotAssignments {
  let rng = SeededRng::from_page(&context.page_key, &context.build_salt);

  let eligible: Vec<Candidate<'_>> = pool
    .iter()
    .enumerate()
    .filter(|(_, block)| is_eligible(policy, block, context))
    .map(|(index, block)| Candidate::new(block, index, &rng))
    .collect();

  let mut result = SlotAssignments::new();
  let mut page_accepted: Vec<&ContentBlock> = Vec::new();

  for &slot in slots {
    if result.contains_key(slot) {
      continue;
    }

    let candidates: Vec<Candidate<'_>> =
      eligible.iter().filter(|c| c.block.allows_slot(slot)).cloned().collect();
    let ranked = rank_candidates(policy.ranking, candidates);

    let mut accepted: Vec<&ContentBlock> = match policy.exclusion_scope {
      ExclusionScope::Page => page_accepted.clone(),
      ExclusionScope::Slot => Vec::new(),
    };
    let mut chosen = Vec::new();

    for candidate in ranked {
      if chosen.len() >= max_per_slot {
        break;
      }
      if conflicts(candidate.block, &accepted) {
        continue;
      }
      accepted.push(candidate.block);
      chosen.push(candidate.block.clone());
    }

    if policy.exclusion_scope == ExclusionScope::Page {
      page_accepted = accepted;
    }
    result.insert(slot.to_string(), chosen);
  }

  result
}

/// Weighted pick without slot logic: filter by type, score every block with
/// `u^(1/weight)` and keep the top `n`. Review status is not checked.
pub fn weighted_pick<'a>(
  pool: &'a [ContentBlock],
  page_key: &str,
  build_salt: &str,
  n: usize,
  allowed_types: &[BlockType],
) -> Vec<&'a ContentBlock> {
  let rng = SeededRng::from_page(page_key, build_salt);
  let candidates: Vec<Candidate<'a>> = pool
    .iter()
    .enumerate()
    .filter(|(_, b)| allowed_types.is_empty() || allowed_types.contains(&b.block_type))
    .map(|(index, block)| Candidate::new(block, index, &rng))
    .collect();
  rank_candidates(RankingPolicy::WeightedSampling, candidates)
    .into_iter()
    .take(n)
    .map(|c| c.block)
    .collect()
}

fn is_eligible(policy: &SelectionPolicy, block: &ContentBlock, context: &SelectionContext) -> bool {
  block.reviewed
    && block.is_well_formed()
    && policy.locale.matches(&block.locale, &context.locale)
    && block.allows_category(&context.category_id)
}

/// Exclusions are declared per block but enforced in both directions.
/// An id that is already accepted also counts as a conflict.
fn conflicts(candidate: &ContentBlock, accepted: &[&ContentBlock]) -> bool {
  let accepted_ids: HashSet<&str> = accepted.iter().map(|b| b.id.as_str()).collect();
  if accepted_ids.contains(candidate.id.as_str()) {
    return true;
  }
  if candidate.constraints.mutually_exclusive.iter().any(|id| accepted_ids.contains(id.as_str())) {
    return true;
  }
  accepted.iter().any(|b| b.excludes(&candidate.id))
}
