/* src/server/core/rust/src/lib.rs */

pub mod admin;
pub mod errors;
pub mod page;
pub mod server;
pub mod sitemap;
pub mod store;

// Re-exports for ergonomic use
pub use admin::{AdminService, BlockFilter, BlockListing, BlockWrite, LocaleListing};
pub use errors::PseoError;
pub use page::{PageAudit, PageResolver, PageSeo, PageView, SelectionSettings, SeoAudit};
pub use server::{SiteParts, SiteServer};
pub use sitemap::{ChunkSummary, SitemapBuild, SitemapReport, SitemapService};
pub use store::{InMemoryRepository, Record, Repository};

pub use pseo_engine;
