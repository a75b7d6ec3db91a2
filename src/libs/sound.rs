//! Sound catalog and per-nudge sound resolution.

use crate::libs::messages::Message;
use crate::libs::nudge::NudgeKind;
use crate::libs::settings::SettingsStore;
use crate::msg_debug;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Sounds shipped with the extension. `None` means "do not play anything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKey {
    None,
    Nudge1,
    Nudge2,
    Nudge3,
    QuietNudge4,
    WhistleNudge5,
}

impl SoundKey {
    pub const ALL: [SoundKey; 6] = [
        SoundKey::None,
        SoundKey::Nudge1,
        SoundKey::Nudge2,
        SoundKey::Nudge3,
        SoundKey::QuietNudge4,
        SoundKey::WhistleNudge5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKey::None => "none",
            SoundKey::Nudge1 => "nudge1",
            SoundKey::Nudge2 => "nudge2",
            SoundKey::Nudge3 => "nudge3",
            SoundKey::QuietNudge4 => "quietNudge4",
            SoundKey::WhistleNudge5 => "whistleNudge5",
        }
    }

    /// Extension-relative path of the audio file, `None` for [`SoundKey::None`].
    pub fn path(&self) -> Option<&'static str> {
        match self {
            SoundKey::None => None,
            SoundKey::Nudge1 => Some("sounds/nudge1.wav"),
            SoundKey::Nudge2 => Some("sounds/nudge2.wav"),
            SoundKey::Nudge3 => Some("sounds/nudge3.wav"),
            SoundKey::QuietNudge4 => Some("sounds/quiet_nudge4.wav"),
            SoundKey::WhistleNudge5 => Some("sounds/whistle_nudge5.wav"),
        }
    }

    pub fn default_for(kind: NudgeKind) -> Self {
        match kind {
            NudgeKind::TabDrift => SoundKey::Nudge1,
            NudgeKind::VideoPause => SoundKey::QuietNudge4,
            NudgeKind::IdleReturn => SoundKey::Nudge2,
        }
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SoundKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| crate::msg_error_anyhow!(Message::UnknownSoundKey(s.to_string())))
    }
}

/// Interprets a stored sound choice for `kind`.
///
/// Missing, empty and non-string values select the nudge's default sound.
/// Unknown keys select nothing.
pub fn resolve_choice(kind: NudgeKind, stored: Option<&Value>) -> Option<SoundKey> {
    match stored.and_then(Value::as_str).filter(|choice| !choice.is_empty()) {
        Some(choice) => choice.parse().ok(),
        None => Some(SoundKey::default_for(kind)),
    }
}

/// Resolves the audio file to play for `kind`, or `None` when playback should be skipped.
pub async fn resolve_sound(store: &dyn SettingsStore, kind: NudgeKind) -> Option<&'static str> {
    let stored = match store.get(kind.sound_setting_key()).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = kind.sound_setting_key(), error = %e, "settings read failed, using default sound");
            None
        }
    };

    let path = resolve_choice(kind, stored.as_ref()).and_then(|key| key.path());
    if path.is_none() {
        msg_debug!(Message::NoSoundForNudge(kind.to_string()));
    }
    path
}
