//! Configuration types and path resolution for corral.
//!
//! Settings are read from TOML at the platform's XDG config path
//! (e.g. `~/.config/corral/config.toml` on Linux) and from a per-project
//! `corral.toml`. Nothing is ever written back.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;
#[allow(unused_imports)]
pub use types::{ProviderConfig, ProviderEntry, ScriptConfig, ToolsConfig};

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?.unwrap_or_default();
        let project = Self::load_project(&std::env::current_dir()?)?;

        let mut config = match project {
            Some(proj) => Self::merge(global, proj),
            None => global,
        };

        config.resolve_substitutions();
        Ok(config)
    }
}
