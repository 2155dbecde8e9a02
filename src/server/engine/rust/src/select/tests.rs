/* src/server/engine/rust/src/select/tests.rs */

use super::*;
use crate::block::BlockConstraints;

fn block(id: &str, block_type: BlockType, weight: i64, slots: &[&str]) -> ContentBlock {
  ContentBlock {
    id: id.into(),
    block_type,
    title: format!("{id} title"),
    body: format!("{id} body"),
    weight,
    reviewed: true,
    locale: "en".into(),
    constraints: BlockConstraints {
      slots: slots.iter().map(|s| s.to_string()).collect(),
      ..Default::default()
    },
    ..Default::default()
  }
}

fn ctx(page_key: &str) -> SelectionContext {
  SelectionContext::new("currency", "en", page_key, "build-sha")
}

fn ids(blocks: &[ContentBlock]) -> Vec<&str> {
  blocks.iter().map(|b| b.id.as_str()).collect()
}

fn mixed_pool() -> Vec<ContentBlock> {
  let mut pool = Vec::new();
  for (i, w) in [10, 10, 10, 7, 7, 3, 1].iter().enumerate() {
    pool.push(block(&format!("faq-{i}"), BlockType::Faq, *w, &["faq"]));
  }
  for (i, w) in [5, 5, 5, 5].iter().enumerate() {
    pool.push(block(&format!("cta-{i}"), BlockType::Cta, *w, &["cta"]));
  }
  pool.push(block("anywhere", BlockType::Info, 8, &[]));
  pool
}

#[test]
fn same_inputs_same_output() {
  let pool = mixed_pool();
  for key in ["/a", "/b", "/fr/currency/usd-eur"] {
    let first = select_blocks(&pool, &ctx(key), &["faq", "cta", "info"], 3);
    let second = select_blocks(&pool, &ctx(key), &["faq", "cta", "info"], 3);
    assert_eq!(first, second);
  }
}

#[test]
fn cap_respected_for_every_slot() {
  let pool = mixed_pool();
  for cap in 0..6 {
    let result = select_blocks(&pool, &ctx("/cap"), &["faq", "cta", "info", "promo"], cap);
    for blocks in result.values() {
      assert!(blocks.len() <= cap);
    }
  }
}

#[test]
fn every_requested_slot_present_even_when_starved() {
  let pool = vec![block("only-faq", BlockType::Faq, 5, &["faq"])];
  let result = select_blocks(&pool, &ctx("/p"), &["faq", "promo"], 2);
  assert_eq!(result.len(), 2);
  assert_eq!(ids(&result["faq"]), vec!["only-faq"]);
  assert!(result["promo"].is_empty());
}

#[test]
fn empty_pool_yields_empty_slots() {
  let result = select_blocks(&[], &ctx("/p"), &crate::block::DEFAULT_SLOTS, 3);
  assert_eq!(result.len(), 5);
  assert!(result.values().all(Vec::is_empty));
}

#[test]
fn unreviewed_never_selected() {
  let mut pool = mixed_pool();
  for b in pool.iter_mut().step_by(2) {
    b.reviewed = false;
  }
  for key in 0..50 {
    let result = select_blocks(&pool, &ctx(&format!("/k{key}")), &["faq", "cta", "info"], 10);
    for blocks in result.values() {
      assert!(blocks.iter().all(|b| b.reviewed));
    }
  }
}

#[test]
fn malformed_blocks_are_ineligible() {
  let mut no_title = block("no-title", BlockType::Faq, 100, &["faq"]);
  no_title.title.clear();
  let mut bad_type = block("bad-type", BlockType::Faq, 100, &["faq"]);
  bad_type.block_type = BlockType::Unknown;
  let mut no_id = block("x", BlockType::Faq, 100, &["faq"]);
  no_id.id = "  ".into();
  let good = block("good", BlockType::Faq, 1, &["faq"]);
  let pool = vec![no_title, bad_type, no_id, good];
  let result = select_blocks(&pool, &ctx("/p"), &["faq"], 5);
  assert_eq!(ids(&result["faq"]), vec!["good"]);
}

#[test]
fn category_restriction_applies() {
  let mut swift_only = block("swift-only", BlockType::Faq, 50, &["faq"]);
  swift_only.constraints.categories = vec!["swift".into()];
  let mut currency_only = block("currency-only", BlockType::Faq, 40, &["faq"]);
  currency_only.constraints.categories = vec!["currency".into()];
  let open = block("open", BlockType::Faq, 30, &["faq"]);
  let pool = vec![swift_only, currency_only, open];
  let result = select_blocks(&pool, &ctx("/p"), &["faq"], 5);
  assert_eq!(ids(&result["faq"]), vec!["currency-only", "open"]);
}

#[test]
fn weight_ten_beats_weight_five_for_single_slot() {
  // Five blocks, two reviewed faq blocks with weights 10 and 5.
  let mut pool = vec![
    block("faq-heavy", BlockType::Faq, 10, &["faq"]),
    block("faq-light", BlockType::Faq, 5, &["faq"]),
    block("draft-1", BlockType::Faq, 100, &["faq"]),
    block("draft-2", BlockType::Cta, 100, &["cta"]),
    block("draft-3", BlockType::Promo, 100, &["promo"]),
  ];
  for b in &mut pool[2..] {
    b.reviewed = false;
  }
  let first = select_blocks(&pool, &ctx("p1"), &["faq"], 1);
  assert_eq!(ids(&first["faq"]), vec!["faq-heavy"]);
  assert_eq!(first, select_blocks(&pool, &ctx("p1"), &["faq"], 1));
}

#[test]
fn weighted_sampling_is_reproducible_and_prefers_weight() {
  let policy = SelectionPolicy { ranking: RankingPolicy::WeightedSampling, ..Default::default() };
  let pool = vec![
    block("faq-heavy", BlockType::Faq, 10, &["faq"]),
    block("faq-light", BlockType::Faq, 5, &["faq"]),
  ];
  let mut heavy_wins = 0;
  for i in 0..600 {
    let c = ctx(&format!("/page-{i}"));
    let a = select_blocks_with(&policy, &pool, &c, &["faq"], 1);
    let b = select_blocks_with(&policy, &pool, &c, &["faq"], 1);
    assert_eq!(a, b);
    if a["faq"][0].id == "faq-heavy" {
      heavy_wins += 1;
    }
  }
  // Expected share for weights 10:5 under A-ES is 2/3.
  assert!(heavy_wins > 340 && heavy_wins < 460, "heavy won {heavy_wins} of 600");
}

#[test]
fn mutual_exclusion_both_declared() {
  let mut a = block("cta-a", BlockType::Cta, 5, &["cta"]);
  a.constraints.mutually_exclusive = vec!["cta-b".into()];
  let mut b = block("cta-b", BlockType::Cta, 5, &["cta"]);
  b.constraints.mutually_exclusive = vec!["cta-a".into()];
  let pool = vec![a, b];
  for i in 0..40 {
    let result = select_blocks(&pool, &ctx(&format!("/x{i}")), &["cta"], 2);
    assert_eq!(result["cta"].len(), 1);
  }
}

#[test]
fn mutual_exclusion_declared_on_one_side_is_symmetric() {
  // Only the lower-weight block declares the exclusion; it ranks second and
  // must still be skipped.
  let a = block("cta-a", BlockType::Cta, 9, &["cta"]);
  let mut b = block("cta-b", BlockType::Cta, 3, &["cta"]);
  b.constraints.mutually_exclusive = vec!["cta-a".into()];
  let c = block("cta-c", BlockType::Cta, 1, &["cta"]);
  let result = select_blocks(&[a.clone(), b.clone(), c.clone()], &ctx("/p"), &["cta"], 3);
  assert_eq!(ids(&result["cta"]), vec!["cta-a", "cta-c"]);

  // Declared on the higher-weight side instead.
  let mut a2 = a;
  a2.constraints.mutually_exclusive = vec!["cta-b".into()];
  b.constraints.mutually_exclusive.clear();
  let result = select_blocks(&[a2, b, c], &ctx("/p"), &["cta"], 3);
  assert_eq!(ids(&result["cta"]), vec!["cta-a", "cta-c"]);
}

#[test]
fn no_selected_pair_violates_exclusion() {
  let mut pool = mixed_pool();
  pool[0].constraints.mutually_exclusive = vec!["faq-1".into(), "faq-3".into()];
  pool[4].constraints.mutually_exclusive = vec!["faq-2".into()];
  for i in 0..100 {
    let result = select_blocks(&pool, &ctx(&format!("/m{i}")), &["faq"], 5);
    let chosen = &result["faq"];
    for x in chosen {
      for y in chosen {
        assert!(!x.excludes(&y.id), "{} excludes {}", x.id, y.id);
      }
    }
  }
}

#[test]
fn selection_is_prefix_of_weight_order() {
  let pool = mixed_pool();
  for i in 0..100 {
    let result = select_blocks(&pool, &ctx(&format!("/w{i}")), &["faq"], 4);
    let weights: Vec<i64> = result["faq"].iter().map(|b| b.weight).collect();
    // faq candidates weigh [10, 10, 10, 8, 7, 7, 3, 1] ("anywhere" has no slot limit)
    assert_eq!(weights, vec![10, 10, 10, 8]);
  }
}

#[test]
fn salt_redistributes_ties() {
  let pool: Vec<ContentBlock> =
    (0..4).map(|i| block(&format!("tie-{i}"), BlockType::Faq, 20, &["faq"])).collect();
  let mut differs = 0;
  for i in 0..50 {
    let key = format!("/en/currency/pair-{i}");
    let first = SelectionContext::new("currency", "en", &key, "sha-1");
    let second = SelectionContext::new("currency", "en", &key, "sha-2");
    let a = select_blocks(&pool, &first, &["faq"], 2);
    let b = select_blocks(&pool, &second, &["faq"], 2);
    if a != b {
      differs += 1;
    }
  }
  assert!(differs > 0);
}

#[test]
fn page_keys_spread_tied_blocks() {
  let pool: Vec<ContentBlock> =
    (0..3).map(|i| block(&format!("tie-{i}"), BlockType::Faq, 20, &["faq"])).collect();
  let mut firsts = std::collections::HashSet::new();
  for i in 0..60 {
    let result = select_blocks(&pool, &ctx(&format!("/spread-{i}")), &["faq"], 1);
    firsts.insert(result["faq"][0].id.clone());
  }
  assert_eq!(firsts.len(), 3);
}

#[test]
fn adding_a_block_keeps_existing_relative_order() {
  let pool: Vec<ContentBlock> =
    (0..5).map(|i| block(&format!("b-{i}"), BlockType::Faq, 10, &["faq"])).collect();
  let before = select_blocks(&pool, &ctx("/stable"), &["faq"], 5);

  let mut grown = pool.clone();
  grown.insert(2, block("newcomer", BlockType::Faq, 10, &["faq"]));
  let after = select_blocks(&grown, &ctx("/stable"), &["faq"], 6);

  let filtered: Vec<&str> =
    ids(&after["faq"]).into_iter().filter(|id| *id != "newcomer").collect();
  assert_eq!(filtered, ids(&before["faq"]));
}

#[test]
fn higher_weight_newcomer_does_not_reorder_others() {
  let pool = mixed_pool();
  let before = select_blocks(&pool, &ctx("/grow"), &["faq"], 7);
  let mut grown = pool.clone();
  grown.push(block("faq-star", BlockType::Faq, 99, &["faq"]));
  let after = select_blocks(&grown, &ctx("/grow"), &["faq"], 8);
  assert_eq!(after["faq"][0].id, "faq-star");
  assert_eq!(ids(&after["faq"][1..]), ids(&before["faq"]));
}

#[test]
fn page_scope_does_not_reuse_a_block_across_slots() {
  let pool =
    vec![block("shared", BlockType::Info, 50, &[]), block("faq-1", BlockType::Faq, 1, &["faq"])];
  let result = select_blocks(&pool, &ctx("/p"), &["info", "faq"], 2);
  assert_eq!(ids(&result["info"]), vec!["shared"]);
  assert_eq!(ids(&result["faq"]), vec!["faq-1"]);
}

#[test]
fn slot_scope_allows_reuse_across_slots() {
  let policy = SelectionPolicy { exclusion_scope: ExclusionScope::Slot, ..Default::default() };
  let pool =
    vec![block("shared", BlockType::Info, 50, &[]), block("faq-1", BlockType::Faq, 1, &["faq"])];
  let result = select_blocks_with(&policy, &pool, &ctx("/p"), &["info", "faq"], 2);
  assert_eq!(ids(&result["info"]), vec!["shared"]);
  assert_eq!(ids(&result["faq"]), vec!["shared", "faq-1"]);
}

#[test]
fn page_scope_exclusion_crosses_slots() {
  let cta = block("cta-main", BlockType::Cta, 10, &["cta"]);
  let mut promo = block("promo-rival", BlockType::Promo, 10, &["promo"]);
  promo.constraints.mutually_exclusive = vec!["cta-main".into()];
  let pool = vec![cta, promo];
  let result = select_blocks(&pool, &ctx("/p"), &["cta", "promo"], 1);
  assert_eq!(ids(&result["cta"]), vec!["cta-main"]);
  assert!(result["promo"].is_empty());
}

#[test]
fn duplicate_slot_names_are_filled_once() {
  let pool = mixed_pool();
  let once = select_blocks(&pool, &ctx("/d"), &["faq"], 2);
  let twice = select_blocks(&pool, &ctx("/d"), &["faq", "faq"], 2);
  assert_eq!(once, twice);
}

#[test]
fn exact_locale_policy_excludes_global_blocks() {
  let mut global = block("global", BlockType::Faq, 90, &["faq"]);
  global.locale = String::new();
  let mut french = block("french", BlockType::Faq, 80, &["faq"]);
  french.locale = "fr".into();
  let english = block("english", BlockType::Faq, 10, &["faq"]);
  let pool = vec![global, french, english];

  let exact = select_blocks(&pool, &ctx("/p"), &["faq"], 5);
  assert_eq!(ids(&exact["faq"]), vec!["english"]);

  let policy = SelectionPolicy { locale: LocalePolicy::AllowGlobal, ..Default::default() };
  let global_ok = select_blocks_with(&policy, &pool, &ctx("/p"), &["faq"], 5);
  assert_eq!(ids(&global_ok["faq"]), vec!["global", "english"]);
}

#[test]
fn input_pool_is_not_mutated() {
  let pool = mixed_pool();
  let snapshot = pool.clone();
  let _ = select_blocks(&pool, &ctx("/p"), &["faq", "cta"], 3);
  assert_eq!(pool, snapshot);
}

#[test]
fn weighted_pick_filters_by_type() {
  let pool = mixed_pool();
  let picked = weighted_pick(&pool, "/p", "sha", 3, &[BlockType::Cta]);
  assert_eq!(picked.len(), 3);
  assert!(picked.iter().all(|b| b.block_type == BlockType::Cta));
  let again = weighted_pick(&pool, "/p", "sha", 3, &[BlockType::Cta]);
  assert_eq!(picked, again);
}

#[test]
fn weighted_pick_without_type_filter_uses_whole_pool() {
  let pool = mixed_pool();
  assert_eq!(weighted_pick(&pool, "/p", "sha", 100, &[]).len(), pool.len());
}
