/* src/cli/core/src/config/mod.rs */

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{config_dir, find_pseo_config, load_pseo_config};
pub use types::{PseoConfig, resolve_salt};
