/* src/server/engine/rust/src/select/rank.rs */

use std::cmp::Ordering;

use crate::block::ContentBlock;
use crate::rng::SeededRng;

use super::RankingPolicy;

#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
  pub block: &'a ContentBlock,
  /// Position in the input pool; last-resort tie-break.
  pub index: usize,
  pub weight: u32,
  /// Uniform draw in [0, 1) from the page stream forked by block id.
  pub draw: f64,
}

impl<'a> Candidate<'a> {
  pub fn new(block: &'a ContentBlock, index: usize, page_rng: &SeededRng) -> Self {
    let draw = page_rng.fork(&block.id).next_f64();
    Self { block, index, weight: block.effective_weight(), draw }
  }

  /// A-ES key. Higher is better.
  fn sampling_score(&self) -> f64 {
    self.draw.powf(1.0 / f64::from(self.weight))
  }
}

pub(crate) fn rank_candidates(
  policy: RankingPolicy,
  mut candidates: Vec<Candidate<'_>>,
) -> Vec<Candidate<'_>> {
  match policy {
    RankingPolicy::WeightFirst => candidates.sort_by(|a, b| {
      b.weight
        .cmp(&a.weight)
        .then_with(|| b.draw.total_cmp(&a.draw))
        .then_with(|| stable_tail(a, b))
    }),
    RankingPolicy::WeightedSampling => candidates.sort_by(|a, b| {
      b.sampling_score().total_cmp(&a.sampling_score()).then_with(|| stable_tail(a, b))
    }),
  }
  candidates
}

fn stable_tail(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
  a.block.id.cmp(&b.block.id).then(a.index.cmp(&b.index))
}
