use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::cli::CliArgs;

/// Tuning for the motion highlight pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub enabled: bool,
    /// Width frames are downscaled to before differencing.
    pub analysis_width: u32,
    /// Gaussian kernel size; sigma is derived from it.
    pub blur_kernel: u32,
    /// Per-pixel intensity change (0-255) that counts as motion.
    pub threshold: u8,
    pub dilate_iterations: u8,
    /// Smallest contour area, in analysis pixels, that is reported.
    pub min_area: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            analysis_width: 500,
            blur_kernel: 21,
            threshold: 25,
            dilate_iterations: 2,
            min_area: 500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub last_directory: Option<PathBuf>,
    pub step_size: usize,
    pub motion: MotionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_directory: None,
            step_size: 1,
            motion: MotionConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", config_path.display(), e))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config)
                }
                Err(e) => {
                    log::warn!("Config file exists but has issues ({}), creating new one with defaults", e);
                    let new_config = Self::default();
                    new_config.save()
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    log::info!("Created new config file at {}", config_path.display());
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config.save()
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("frame-cruiser")
            .join("config.json")
    }

    /// Command line options win over the persisted values for this run.
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(step) = args.step {
            self.step_size = step;
        }
        if args.no_motion {
            self.motion.enabled = false;
        }
    }

    pub fn step_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.step_size).unwrap_or(NonZeroUsize::MIN)
    }

    /// Directory to open at startup: the `-d` argument, otherwise the last
    /// directory if it still exists.
    pub fn startup_directory(&self, args: &CliArgs) -> Option<PathBuf> {
        if let Some(ref dir) = args.directory {
            return Some(dir.clone());
        }
        match self.last_directory {
            Some(ref dir) if dir.is_dir() => {
                log::info!("Restoring last opened directory: {}", dir.display());
                Some(dir.clone())
            }
            Some(ref dir) => {
                log::warn!("Last opened directory no longer exists: {}", dir.display());
                None
            }
            None => None,
        }
    }

    /// Where the directory chooser starts.
    pub fn dialog_start_directory(&self) -> PathBuf {
        self.last_directory
            .clone()
            .filter(|dir| dir.is_dir())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}
