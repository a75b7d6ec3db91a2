//! The three nudge kinds and everything fixed about them.
//!
//! Each kind carries a well-known notification id, the settings keys for its
//! delay and sound choice, and the fallback values used when those settings
//! are missing or invalid.

use crate::libs::messages::Message;
use crate::libs::settings::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DRIFT_NOTIFICATION_ID: &str = "driftNotification";
pub const VIDEO_PAUSE_NOTIFICATION_ID: &str = "videoPauseNotification";
pub const IDLE_NOTIFICATION_ID: &str = "idleNotification";

pub const NOTIFICATION_ICON: &str = "icons/icon128.png";

/// Characters of the focus URL quoted in drift and idle notifications.
const FOCUS_URL_PREVIEW: usize = 100;
/// Characters of the video URL quoted in the video pause notification.
const VIDEO_URL_PREVIEW: usize = 50;

/// Longest delay any timeline accepts from the settings store: one day.
pub const MAX_DELAY_SECS: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NudgeKind {
    TabDrift,
    VideoPause,
    #[serde(rename = "idleNudge")]
    IdleReturn,
}

/// Delay policy for a timeline: what to use when the stored value is unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    pub settings_key: &'static str,
    pub default_secs: f64,
    pub floor_secs: f64,
}

impl DelayPolicy {
    /// Applies the policy to a raw stored value.
    ///
    /// Only finite JSON numbers between the floor and [`MAX_DELAY_SECS`] are
    /// accepted; strings, booleans, NaN and anything out of range resolve to
    /// the default.
    pub fn resolve(&self, stored: Option<&Value>) -> Duration {
        stored
            .and_then(Value::as_f64)
            .filter(|secs| (self.floor_secs..=MAX_DELAY_SECS).contains(secs))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_else(|| self.default_delay())
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_secs_f64(self.default_secs)
    }
}

/// Content of a notification as handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon_url: String,
    pub title: String,
    pub message: String,
    pub priority: u8,
}

impl NotificationOptions {
    fn basic(title: Message, message: Message, priority: u8) -> Self {
        Self {
            kind: "basic".to_string(),
            icon_url: NOTIFICATION_ICON.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            priority,
        }
    }
}

impl NudgeKind {
    pub const ALL: [NudgeKind; 3] = [NudgeKind::TabDrift, NudgeKind::VideoPause, NudgeKind::IdleReturn];

    pub fn notification_id(&self) -> &'static str {
        match self {
            NudgeKind::TabDrift => DRIFT_NOTIFICATION_ID,
            NudgeKind::VideoPause => VIDEO_PAUSE_NOTIFICATION_ID,
            NudgeKind::IdleReturn => IDLE_NOTIFICATION_ID,
        }
    }

    /// Maps a clicked notification id back to its nudge, `None` for foreign ids.
    pub fn from_notification_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.notification_id() == id)
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        match self {
            NudgeKind::TabDrift => DelayPolicy {
                settings_key: "totalDriftSeconds",
                default_secs: 10.0,
                floor_secs: 1.0,
            },
            NudgeKind::VideoPause => DelayPolicy {
                settings_key: "totalVideoPauseSeconds",
                default_secs: 10.0,
                floor_secs: 1.0,
            },
            NudgeKind::IdleReturn => DelayPolicy {
                settings_key: "totalIdleSeconds",
                default_secs: 60.0,
                floor_secs: 15.0,
            },
        }
    }

    pub fn sound_setting_key(&self) -> &'static str {
        match self {
            NudgeKind::TabDrift => "tabDriftSoundChoice",
            NudgeKind::VideoPause => "videoPauseSoundChoice",
            NudgeKind::IdleReturn => "idleNudgeSoundChoice",
        }
    }

    /// Reads this timeline's delay from the store, falling back to the
    /// default when the value is missing, invalid, or the read fails.
    pub async fn resolve_delay(&self, store: &dyn SettingsStore) -> Duration {
        let policy = self.delay_policy();
        let stored = match store.get(policy.settings_key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = policy.settings_key, error = %e, "settings read failed, using default delay");
                None
            }
        };
        policy.resolve(stored.as_ref())
    }

    /// Notification shown when this nudge fires.
    ///
    /// `url` is the focus URL for drift and idle nudges and the reported video
    /// URL for video pause nudges.
    pub fn notification(&self, url: Option<&str>) -> NotificationOptions {
        match self {
            NudgeKind::TabDrift => NotificationOptions::basic(
                Message::DriftNotificationTitle,
                Message::DriftNotificationBody(preview(url.unwrap_or_default(), FOCUS_URL_PREVIEW)),
                2,
            ),
            NudgeKind::VideoPause => NotificationOptions::basic(
                Message::VideoPauseNotificationTitle,
                Message::VideoPauseNotificationBody(url.filter(|url| !url.is_empty()).map(|url| preview(url, VIDEO_URL_PREVIEW))),
                1,
            ),
            NudgeKind::IdleReturn => NotificationOptions::basic(
                Message::IdleNotificationTitle,
                Message::IdleNotificationBody(preview(url.unwrap_or_default(), FOCUS_URL_PREVIEW)),
                2,
            ),
        }
    }
}

impl fmt::Display for NudgeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NudgeKind::TabDrift => "tabDrift",
            NudgeKind::VideoPause => "videoPause",
            NudgeKind::IdleReturn => "idleNudge",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for NudgeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabDrift" | "tab-drift" => Ok(NudgeKind::TabDrift),
            "videoPause" | "video-pause" => Ok(NudgeKind::VideoPause),
            "idleNudge" | "idle" | "idle-return" => Ok(NudgeKind::IdleReturn),
            other => Err(crate::msg_error_anyhow!(Message::UnknownNudgeKind(other.to_string()))),
        }
    }
}

/// First `limit` characters of `text`, never splitting a code point.
pub fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
