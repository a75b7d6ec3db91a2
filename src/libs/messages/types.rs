//! Every user-facing and log message of the application.
//!
//! Text lives in [`super::display`]; this enum only names the messages and
//! carries their parameters.

use crate::libs::browser::TabId;

#[derive(Debug, Clone)]
pub enum Message {
    // === MONITORING MESSAGES ===
    MonitoringStarted(TabId, String), // tab id, url
    MonitoringStartedStatus(TabId),
    FocusUrlUnknown(TabId),
    MonitoringStopped,
    MonitoringStoppedStatus,
    FocusTabClosed(TabId),
    FocusTabNavigated(TabId, String),
    FocusTabMissing(TabId),
    ReturnedToFocusTab(TabId),
    DriftedAway(TabId, TabId), // focus tab, activated tab
    IdleSuppressedByAudio(TabId),
    UnrecognizedMessage(String),

    // === TIMELINE MESSAGES ===
    TimelineArmed(String, f64, String), // kind, seconds, due wall-clock time
    DelayOutOfRange(String, f64),
    StaleTimelineFire(String, u64),     // kind, generation
    NudgeSuppressedNoTarget(String),
    NudgeFired(String),

    // === VIDEO MESSAGES ===
    VideoPauseIgnored,
    VideoPauseIgnoredStatus,
    VideoPauseTriggeredStatus,
    VideoPlayed(String),
    VideoPlayedStatus,
    VideoPauseTimerCancelled,
    PageUnreachable(TabId, String),

    // === NOTIFICATION TEXT ===
    DriftNotificationTitle,
    DriftNotificationBody(String),
    VideoPauseNotificationTitle,
    VideoPauseNotificationBody(Option<String>),
    IdleNotificationTitle,
    IdleNotificationBody(String),

    // === SOUND MESSAGES ===
    NoSoundForNudge(String),
    PlayingSound(String, String), // sound path, kind
    PlaybackHostAbsent,
    PlaybackHostLaunchInFlight,
    PlaybackHostLaunched,
    PlaybackHostLaunchFailed(String),
    UnknownSoundKey(String),
    UnknownNudgeKind(String),

    // === BRIDGE MESSAGES ===
    CollaboratorCallFailed(String, String), // what, error
    OrphanReply(u64),
    MalformedFrame(String),
    RespondFailed(u64, String),

    // === HOST MESSAGES ===
    HostStarting(String), // settings path
    HostStopped,
    BrowserDisconnected,
    BridgeFailed(String),
    ShutdownSignalReceived,
    SignalHandlerFailed(String),

    // === SETTINGS MESSAGES ===
    PromptDriftSeconds,
    PromptVideoPauseSeconds,
    PromptIdleSeconds,
    PromptSound(String), // kind
    SecondsBelowMinimum(u64),
    SecondsAboveMaximum(u64),
    NotANumber,
    SettingsSaved,
    SettingsCleared,
    SettingsClearCancelled,
    ConfirmClearSettings,
    SettingsHeader,
    SettingsFileLocation(String),

    // === CONFIG MESSAGES ===
    HostConfigHeader,
    ConfigFileLocation(String),
    ConfigSaved,
    PromptCallTimeout,
    PromptPlaybackDelay,

    // === STATUS MESSAGES ===
    NotMonitoring,
    MonitoringTab(TabId, String),
    MonitoringSince(String),
    SoundCatalogHeader,
}
