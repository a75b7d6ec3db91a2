//! Extension settings: a small persistent key-value store.
//!
//! The focus monitor only ever reads delays and sound choices from here, one
//! key per read, and never caches the result. The settings CLI writes them and
//! the monitor mirrors the current focus target under [`FOCUS_TAB_ID_KEY`] and
//! [`FOCUS_TAB_URL_KEY`] so the CLI can display it.
//!
//! ## Storage
//!
//! [`JsonSettingsStore`] keeps a flat JSON object in `settings.json` inside
//! the application data directory. A missing file reads as an empty store.
//! Every operation re-reads the file so external edits are picked up
//! immediately.

use crate::libs::data_storage::DataStorage;
use crate::libs::focus::FocusTarget;
use crate::libs::messages::Message;
use crate::libs::nudge::{NudgeKind, MAX_DELAY_SECS};
use crate::libs::sound::{resolve_choice, SoundKey};
use anyhow::Result;
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const FOCUS_TAB_ID_KEY: &str = "focusTabId";
pub const FOCUS_TAB_URL_KEY: &str = "focusTabUrl";

/// Smallest drift and video pause delay accepted by the settings wizard.
pub const MINIMUM_FOCUS_SECONDS: u64 = 5;
/// Smallest idle delay accepted by the settings wizard.
pub const MINIMUM_IDLE_SECONDS: u64 = 15;

/// Durable key-value settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, entries: Map<String, Value>) -> Result<()>;
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}

/// File-backed settings store.
pub struct JsonSettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store at its default location in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(DataStorage::new().get_path(SETTINGS_FILE_NAME)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store.
    pub async fn load(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, map: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }

    /// Deletes the settings file entirely.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut map = self.load().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, entries: Map<String, Value>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.extend(entries);
        self.save(&map).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        let before = map.len();
        for key in keys {
            map.remove(*key);
        }
        if map.len() == before {
            return Ok(());
        }
        self.save(&map).await
    }
}

/// Typed view of the user-editable settings, as shown and edited by the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct NudgeSettings {
    pub drift_seconds: u64,
    pub video_pause_seconds: u64,
    pub idle_seconds: u64,
    pub drift_sound: SoundKey,
    pub video_pause_sound: SoundKey,
    pub idle_sound: SoundKey,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            drift_seconds: NudgeKind::TabDrift.delay_policy().default_secs as u64,
            video_pause_seconds: NudgeKind::VideoPause.delay_policy().default_secs as u64,
            idle_seconds: NudgeKind::IdleReturn.delay_policy().default_secs as u64,
            drift_sound: SoundKey::default_for(NudgeKind::TabDrift),
            video_pause_sound: SoundKey::default_for(NudgeKind::VideoPause),
            idle_sound: SoundKey::default_for(NudgeKind::IdleReturn),
        }
    }
}

impl NudgeSettings {
    /// Builds the view from a raw store map, using the same fallbacks the monitor uses.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let seconds = |kind: NudgeKind| {
            let policy = kind.delay_policy();
            policy.resolve(map.get(policy.settings_key)).as_secs()
        };
        let sound = |kind: NudgeKind| resolve_choice(kind, map.get(kind.sound_setting_key())).unwrap_or(SoundKey::None);
        Self {
            drift_seconds: seconds(NudgeKind::TabDrift),
            video_pause_seconds: seconds(NudgeKind::VideoPause),
            idle_seconds: seconds(NudgeKind::IdleReturn),
            drift_sound: sound(NudgeKind::TabDrift),
            video_pause_sound: sound(NudgeKind::VideoPause),
            idle_sound: sound(NudgeKind::IdleReturn),
        }
    }

    pub fn seconds(&self, kind: NudgeKind) -> u64 {
        match kind {
            NudgeKind::TabDrift => self.drift_seconds,
            NudgeKind::VideoPause => self.video_pause_seconds,
            NudgeKind::IdleReturn => self.idle_seconds,
        }
    }

    pub fn sound(&self, kind: NudgeKind) -> SoundKey {
        match kind {
            NudgeKind::TabDrift => self.drift_sound,
            NudgeKind::VideoPause => self.video_pause_sound,
            NudgeKind::IdleReturn => self.idle_sound,
        }
    }

    /// Serializes the view into the entries written back to the store.
    pub fn to_entries(&self) -> Map<String, Value> {
        let mut entries = Map::new();
        for kind in NudgeKind::ALL {
            entries.insert(kind.delay_policy().settings_key.to_string(), Value::from(self.seconds(kind)));
            entries.insert(kind.sound_setting_key().to_string(), Value::from(self.sound(kind).as_str()));
        }
        entries
    }
}

/// The focus target last mirrored by a running host, if any.
pub async fn mirrored_target(store: &dyn SettingsStore) -> Result<Option<FocusTarget>> {
    let tab_id = store.get(FOCUS_TAB_ID_KEY).await?.and_then(|value| value.as_i64());
    let url = store.get(FOCUS_TAB_URL_KEY).await?.and_then(|value| value.as_str().map(str::to_string));
    Ok(match (tab_id, url) {
        (Some(tab_id), Some(url)) => Some(FocusTarget { tab_id, url }),
        _ => None,
    })
}

/// Minimum accepted by the settings wizard for a given timeline.
pub fn wizard_minimum(kind: NudgeKind) -> u64 {
    match kind {
        NudgeKind::IdleReturn => MINIMUM_IDLE_SECONDS,
        NudgeKind::TabDrift | NudgeKind::VideoPause => MINIMUM_FOCUS_SECONDS,
    }
}

/// Checks a delay typed into the wizard against its floor and the runtime maximum.
pub fn validate_seconds(kind: NudgeKind, seconds: u64) -> std::result::Result<(), String> {
    let min = wizard_minimum(kind);
    if seconds < min {
        return Err(Message::SecondsBelowMinimum(min).to_string());
    }
    if seconds as f64 > MAX_DELAY_SECS {
        return Err(Message::SecondsAboveMaximum(MAX_DELAY_SECS as u64).to_string());
    }
    Ok(())
}

impl NudgeSettings {
    /// Interactive wizard, pre-filled with `current`.
    pub fn init(current: &NudgeSettings) -> Result<NudgeSettings> {
        let mut settings = current.clone();
        for kind in NudgeKind::ALL {
            let prompt = match kind {
                NudgeKind::TabDrift => Message::PromptDriftSeconds,
                NudgeKind::VideoPause => Message::PromptVideoPauseSeconds,
                NudgeKind::IdleReturn => Message::PromptIdleSeconds,
            };
            let seconds: u64 = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt.to_string())
                .default(current.seconds(kind).max(wizard_minimum(kind)))
                .validate_with(|value: &u64| validate_seconds(kind, *value))
                .interact_text()?;

            let keys: Vec<&str> = SoundKey::ALL.iter().map(|sound| sound.as_str()).collect();
            let selected = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSound(kind.to_string()).to_string())
                .items(&keys)
                .default(SoundKey::ALL.iter().position(|sound| *sound == current.sound(kind)).unwrap_or(0))
                .interact()?;

            settings.set_seconds(kind, seconds);
            settings.set_sound(kind, SoundKey::ALL[selected]);
        }
        Ok(settings)
    }

    pub fn set_seconds(&mut self, kind: NudgeKind, seconds: u64) {
        match kind {
            NudgeKind::TabDrift => self.drift_seconds = seconds,
            NudgeKind::VideoPause => self.video_pause_seconds = seconds,
            NudgeKind::IdleReturn => self.idle_seconds = seconds,
        }
    }

    pub fn set_sound(&mut self, kind: NudgeKind, sound: SoundKey) {
        match kind {
            NudgeKind::TabDrift => self.drift_sound = sound,
            NudgeKind::VideoPause => self.video_pause_sound = sound,
            NudgeKind::IdleReturn => self.idle_sound = sound,
        }
    }
}
