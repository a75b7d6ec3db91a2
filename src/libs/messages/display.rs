//! Display implementation for drift messages.
//!
//! All message text is defined here, in one match. Notification titles and
//! bodies are shown to the user by the browser; status strings are returned
//! to the extension as message replies and must stay stable.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === MONITORING MESSAGES ===
            Message::MonitoringStarted(tab_id, url) => format!("Monitoring started for tab {} ({})", tab_id, url),
            Message::MonitoringStartedStatus(tab_id) => format!("Monitoring started for tab {}", tab_id),
            Message::FocusUrlUnknown(tab_id) => format!("Tab {} was sent without a URL; nudges will not name it", tab_id),
            Message::MonitoringStopped => "Monitoring stopped".to_string(),
            Message::MonitoringStoppedStatus => "Monitoring stopped".to_string(),
            Message::FocusTabClosed(tab_id) => format!("Focus tab {} was closed, monitoring stopped", tab_id),
            Message::FocusTabNavigated(tab_id, url) => format!("Focus tab {} navigated to {}", tab_id, url),
            Message::FocusTabMissing(tab_id) => format!("Focus tab {} no longer exists", tab_id),
            Message::ReturnedToFocusTab(tab_id) => format!("Returned to focus tab {}", tab_id),
            Message::DriftedAway(focus, active) => format!("Drifted away from tab {} to tab {}", focus, active),
            Message::IdleSuppressedByAudio(tab_id) => format!("Focus tab {} is playing audio, idle nudge suppressed", tab_id),
            Message::UnrecognizedMessage(error) => format!("Ignoring unrecognized message: {}", error),

            // === TIMELINE MESSAGES ===
            Message::TimelineArmed(kind, seconds, due) => format!("{} nudge armed for {}s, due at {}", kind, seconds, due),
            Message::DelayOutOfRange(kind, seconds) => format!("{} delay of {}s is out of range, not arming", kind, seconds),
            Message::StaleTimelineFire(kind, generation) => format!("Ignoring stale {} timer (generation {})", kind, generation),
            Message::NudgeSuppressedNoTarget(kind) => format!("{} nudge suppressed, no focus tab", kind),
            Message::NudgeFired(kind) => format!("{} nudge fired", kind),

            // === VIDEO MESSAGES ===
            Message::VideoPauseIgnored => "Video pause from a tab other than the focus tab ignored".to_string(),
            Message::VideoPauseIgnoredStatus => "Video pause ignored.".to_string(),
            Message::VideoPauseTriggeredStatus => "Video pause notification triggered.".to_string(),
            Message::VideoPlayed(url) => format!("Video playing again: {}", url),
            Message::VideoPlayedStatus => "Video pause notification clear and sound stop attempt.".to_string(),
            Message::VideoPauseTimerCancelled => "Video pause timer cancelled".to_string(),
            Message::PageUnreachable(tab_id, error) => format!("Could not reach page observer in tab {}: {}", tab_id, error),

            // === NOTIFICATION TEXT ===
            Message::DriftNotificationTitle => "Stay Focused!".to_string(),
            Message::DriftNotificationBody(url) => format!("Time to return to: {}", url),
            Message::VideoPauseNotificationTitle => "Video Paused".to_string(),
            Message::VideoPauseNotificationBody(Some(url)) => format!("Still watching? Your video on {}... is paused.", url),
            Message::VideoPauseNotificationBody(None) => "Still watching? Your video on the page is paused.".to_string(),
            Message::IdleNotificationTitle => "Still there?".to_string(),
            Message::IdleNotificationBody(url) => format!("You've been idle. Come back to: {}", url),

            // === SOUND MESSAGES ===
            Message::NoSoundForNudge(kind) => format!("No sound configured for {} nudge", kind),
            Message::PlayingSound(path, kind) => format!("Playing {} for {} nudge", path, kind),
            Message::PlaybackHostAbsent => "Playback host not running".to_string(),
            Message::PlaybackHostLaunchInFlight => "Playback host launch already in progress".to_string(),
            Message::PlaybackHostLaunched => "Playback host launched".to_string(),
            Message::PlaybackHostLaunchFailed(error) => format!("Failed to launch playback host: {}", error),
            Message::UnknownSoundKey(key) => format!("Unknown sound '{}'", key),
            Message::UnknownNudgeKind(kind) => format!("Unknown nudge kind '{}'", kind),

            // === BRIDGE MESSAGES ===
            Message::CollaboratorCallFailed(what, error) => format!("Failed to {}: {}", what, error),
            Message::OrphanReply(id) => format!("Dropping reply to call {} nobody is waiting for", id),
            Message::MalformedFrame(error) => format!("Skipping malformed frame: {}", error),
            Message::RespondFailed(request_id, error) => format!("Failed to answer request {}: {}", request_id, error),

            // === HOST MESSAGES ===
            Message::HostStarting(path) => format!("Native host started, settings at {}", path),
            Message::HostStopped => "Native host stopped".to_string(),
            Message::BrowserDisconnected => "Browser closed the native messaging channel".to_string(),
            Message::BridgeFailed(error) => format!("Native messaging failed: {}", error),
            Message::ShutdownSignalReceived => "Shutdown signal received".to_string(),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),

            // === SETTINGS MESSAGES ===
            Message::PromptDriftSeconds => "Seconds away from the focus tab before a nudge".to_string(),
            Message::PromptVideoPauseSeconds => "Seconds a video may stay paused before a nudge".to_string(),
            Message::PromptIdleSeconds => "Seconds idle before a nudge".to_string(),
            Message::PromptSound(kind) => format!("Sound for {} nudge", kind),
            Message::SecondsBelowMinimum(min) => format!("Must be at least {} seconds", min),
            Message::SecondsAboveMaximum(max) => format!("Must be at most {} seconds", max),
            Message::NotANumber => "Enter a whole number of seconds".to_string(),
            Message::SettingsSaved => "Settings saved".to_string(),
            Message::SettingsCleared => "Settings cleared".to_string(),
            Message::SettingsClearCancelled => "Settings left unchanged".to_string(),
            Message::ConfirmClearSettings => "Clear all nudge settings?".to_string(),
            Message::SettingsHeader => "Nudge settings".to_string(),
            Message::SettingsFileLocation(path) => format!("Settings file: {}", path),

            // === CONFIG MESSAGES ===
            Message::HostConfigHeader => "Host configuration".to_string(),
            Message::ConfigFileLocation(path) => format!("Config file: {}", path),
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::PromptCallTimeout => "Browser call timeout (ms)".to_string(),
            Message::PromptPlaybackDelay => "Playback host settle delay (ms)".to_string(),

            // === STATUS MESSAGES ===
            Message::NotMonitoring => "Not monitoring any tab".to_string(),
            Message::MonitoringTab(tab_id, url) => format!("Monitoring tab {}: {}", tab_id, url),
            Message::MonitoringSince(time) => format!("Recorded at {}", time),
            Message::SoundCatalogHeader => "Available sounds".to_string(),
        };

        write!(f, "{}", text)
    }
}
