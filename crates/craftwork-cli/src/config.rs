//! Craftwork configuration.
//!
//! Provides logging, recipe location, inventory shape and crafting policy
//! settings. Configuration can be loaded from and saved to a file.

use craftwork_common::WorldCoord;
use craftwork_core::{CraftPolicy, DEFAULT_STACK_LIMIT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "craftwork.toml";

/// Craftwork configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftworkConfig {
    // === Logging ===
    /// Default tracing directive (overridden by `RUST_LOG`)
    pub log_filter: String,

    // === Recipes ===
    /// Directory scanned for recipe files
    pub recipe_dir: PathBuf,

    // === Inventory ===
    /// Slots in an inventory snapshot
    pub inventory_capacity: usize,
    /// Maximum stack size per slot
    pub stack_limit: u32,

    // === Overflow ===
    /// Drop outputs that do not fit instead of discarding them
    pub drop_to_ground: bool,
    /// Where dropped items land
    pub drop_position: WorldCoord,

    // === Crafting ===
    /// Consumption and validation policy
    pub policy: CraftPolicy,
}

impl Default for CraftworkConfig {
    fn default() -> Self {
        Self {
            log_filter: "craftwork=info".to_string(),
            recipe_dir: PathBuf::from("recipes"),
            inventory_capacity: 36,
            stack_limit: DEFAULT_STACK_LIMIT,
            drop_to_ground: true,
            drop_position: WorldCoord::default(),
            policy: CraftPolicy::default(),
        }
    }
}

impl CraftworkConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(mut config) => {
                        info!("Loaded config from {}", path.display());
                        config.validate();
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.inventory_capacity = self.inventory_capacity.clamp(1, 1024);
        self.stack_limit = self.stack_limit.clamp(1, 9999);

        if self.log_filter.trim().is_empty() {
            self.log_filter = Self::default().log_filter;
        }
    }
}
