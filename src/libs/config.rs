//! Host configuration.
//!
//! Settings that belong to the native host process itself rather than to the
//! extension: how long to wait for the browser to answer a call and how long
//! to let a freshly created playback host settle before sending it sound.
//! Nudge delays and sounds are extension settings, see
//! [`crate::libs::settings`].
//!
//! The configuration is stored as pretty-printed JSON in `config.json`
//! inside the platform data directory:
//! - **Windows**: `%LOCALAPPDATA%\drift-focus\drift\config.json`
//! - **macOS**: `~/Library/Application Support/drift-focus/drift/config.json`
//! - **Linux**: `~/.local/share/drift-focus/drift/config.json`
//!
//! A missing file is not an error; defaults are used instead.

use super::data_storage::DataStorage;
use super::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Native host runtime settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HostConfig {
    /// Milliseconds to wait for the browser to answer a call before giving up.
    ///
    /// A call that times out is treated like any other failed collaborator
    /// call: logged and abandoned.
    pub call_timeout_ms: u64,

    /// Milliseconds between ensuring the playback host exists and sending it
    /// a play command, so a just-created host has registered its listener.
    pub playback_delay_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            call_timeout_ms: 5000,
            playback_delay_ms: 100,
        }
    }
}

impl HostConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn playback_delay(&self) -> Duration {
        Duration::from_millis(self.playback_delay_ms)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostConfig>,
}

impl Config {
    pub fn path() -> Result<std::path::PathBuf> {
        DataStorage::new().get_path(CONFIG_FILE_NAME)
    }

    /// Reads the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = Self::path()?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration, overwriting any existing file.
    pub fn save(&self) -> Result<()> {
        let config_file_path = Self::path()?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn delete() -> Result<()> {
        let config_file_path = Self::path()?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    /// Interactive wizard for the host settings, pre-filled with the current ones.
    pub fn init() -> Result<Config> {
        let mut config = Config::read()?;
        let default = config.host_or_default();
        msg_print!(Message::HostConfigHeader, true);
        config.host = Some(HostConfig {
            call_timeout_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptCallTimeout.to_string())
                .default(default.call_timeout_ms)
                .interact_text()?,
            playback_delay_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPlaybackDelay.to_string())
                .default(default.playback_delay_ms)
                .interact_text()?,
        });
        Ok(config)
    }

    pub fn host_or_default(&self) -> HostConfig {
        self.host.clone().unwrap_or_default()
    }
}
