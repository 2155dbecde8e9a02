/* src/server/engine/rust/src/lib.rs */

pub mod block;
pub mod category;
pub mod enumerate;
pub mod escape;
pub mod rng;
pub mod select;
pub mod seo;
pub mod sitemap;
pub mod validate;

// Public API re-exports
pub use block::{BlockConstraints, BlockMedia, BlockType, ContentBlock, DEFAULT_SLOTS};
pub use category::{
  Breadcrumb, Category, JsonLdCheck, JsonLdSet, Locale, PageIdentifier, PageMeta, SeoSettings,
  TemplateType, breadcrumbs, page_json_ld, validate_json_ld,
};
pub use enumerate::{CmsPage, SitemapConfig, UrlEnumerator, sample_identifiers};
pub use escape::xml_escape;
pub use rng::{SeededRng, derive_seed};
pub use select::{
  ExclusionScope, LocalePolicy, RankingPolicy, SelectionContext, SelectionPolicy, SlotAssignments,
  select_blocks, select_blocks_with, weighted_pick,
};
pub use seo::{SeoConsistency, SeoPageData, SeoValidation, validate_seo, validate_seo_consistency};
pub use sitemap::{
  ChangeFreq, SitemapChunk, SitemapEntry, SitemapOptions, SitemapStats, ValidationResult, chunk,
  index_xml, oversized_chunks, robots_txt, stats, urlset_xml, validate,
};
