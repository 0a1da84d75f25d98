//! Application configuration management.
//!
//! The configuration names the external decoder and encoder, the VBR quality
//! handed to the encoder, where the artist/album tree and playlist are
//! written, and the log level. It is read from the user's config directory
//! (typically ~/.config/flac2mp3/config.toml); a missing file means defaults.

use serde::Deserialize;
use simplelog::LevelFilter;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::PLAYLIST_NAME;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_decoder")]
    pub decoder: String,
    #[serde(default = "default_encoder")]
    pub encoder: String,
    #[serde(default = "default_vbr_quality")]
    pub vbr_quality: u8,
    #[serde(default = "default_output_root")]
    pub output_root: String,
    #[serde(default = "default_playlist_name")]
    pub playlist_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_decoder() -> String {
    "sox".to_string()
}

fn default_encoder() -> String {
    "lame".to_string()
}

fn default_vbr_quality() -> u8 {
    2
}

fn default_output_root() -> String {
    ".".to_string()
}

fn default_playlist_name() -> String {
    PLAYLIST_NAME.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            decoder: default_decoder(),
            encoder: default_encoder(),
            vbr_quality: default_vbr_quality(),
            output_root: default_output_root(),
            playlist_name: default_playlist_name(),
            log_level: default_log_level(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("flac2mp3")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("flac2mp3")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            // Return default config instead of error
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Invalid config file {}: {e}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.vbr_quality > 9 {
            return Err(format!("vbr_quality must be 0-9, got {}", self.vbr_quality).into());
        }
        if self.decoder.trim().is_empty() || self.encoder.trim().is_empty() {
            return Err("decoder and encoder must not be empty".into());
        }
        if self.playlist_name.trim().is_empty() {
            return Err("playlist_name must not be empty".into());
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, Box<dyn Error>> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| format!("Unknown log level: {}", self.log_level).into())
    }

    /// Output root with `~` expanded, made absolute against the current
    /// directory so playlist entries are absolute paths.
    pub fn output_root_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        let expanded = PathBuf::from(shellexpand::tilde(&self.output_root).as_ref());
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(std::env::current_dir()?.join(expanded))
        }
    }

    pub fn decoder_program(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.decoder).as_ref())
    }

    pub fn encoder_program(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.encoder).as_ref())
    }
}
