//! The focus monitor: focus state plus the nudge timelines.
//!
//! The monitor is driven entirely by [`MonitorEvent`]s, handled one at a time
//! by [`FocusMonitor::handle`]. It owns the focus target and the tab-drift and
//! idle-return timelines; the video-pause timeline lives in the focus tab's
//! page observer, which the monitor can only ask to cancel.
//!
//! ## Races
//!
//! Browser events arrive in no guaranteed order relative to each other or to
//! timer expiries. Every disarm and clear is therefore idempotent, and every
//! deferred action (a timer expiry, the continuation after a settings read)
//! re-checks the focus state when it actually runs rather than trusting what
//! was true when it was scheduled.

use crate::libs::browser::{best_effort, NotificationSink, PageCommand, TabHost, TabId};
use crate::libs::focus::FocusState;
use crate::libs::messages::Message;
use crate::libs::nudge::NudgeKind;
use crate::libs::playback::SoundDispatcher;
use crate::libs::protocol::{IdleState, InboundMessage, MessageOutcome, MonitorEvent};
use crate::libs::settings::{SettingsStore, FOCUS_TAB_ID_KEY, FOCUS_TAB_URL_KEY};
use crate::libs::timeline::{Arming, NudgeTimeline};
use crate::{msg_debug, msg_info, msg_warning};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

/// Collaborators the monitor talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub settings: Arc<dyn SettingsStore>,
    pub notifications: Arc<dyn NotificationSink>,
    pub tabs: Arc<dyn TabHost>,
    pub sounds: SoundDispatcher,
}

pub struct FocusMonitor {
    state: FocusState,
    drift: NudgeTimeline,
    idle: NudgeTimeline,
    collaborators: Collaborators,
    /// Where timeline expiries are delivered; the same queue the monitor reads.
    events: UnboundedSender<MonitorEvent>,
}

impl FocusMonitor {
    pub fn new(collaborators: Collaborators, events: UnboundedSender<MonitorEvent>) -> Self {
        Self {
            state: FocusState::new(),
            drift: NudgeTimeline::new(NudgeKind::TabDrift),
            idle: NudgeTimeline::new(NudgeKind::IdleReturn),
            collaborators,
            events,
        }
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// The monitor-owned timeline for `kind`. Video pause timing belongs to
    /// the page observer, so there is none for [`NudgeKind::VideoPause`].
    pub fn timeline(&self, kind: NudgeKind) -> Option<&NudgeTimeline> {
        match kind {
            NudgeKind::TabDrift => Some(&self.drift),
            NudgeKind::IdleReturn => Some(&self.idle),
            NudgeKind::VideoPause => None,
        }
    }

    /// Handles one event to completion.
    pub async fn handle(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Message { sender_tab, message, .. } => {
                self.on_message(sender_tab, message).await;
            }
            MonitorEvent::TabActivated(tab_id) => self.on_tab_activated(tab_id).await,
            MonitorEvent::TabRemoved(tab_id) => self.on_tab_removed(tab_id).await,
            MonitorEvent::TabUpdated { tab_id, url } => self.on_tab_updated(tab_id, url),
            MonitorEvent::IdleStateChanged(idle_state) => self.on_idle_state_changed(idle_state).await,
            MonitorEvent::NotificationClicked(id) => self.on_notification_clicked(&id).await,
            MonitorEvent::TimelineFired { kind, generation } => self.on_timeline_fired(kind, generation).await,
        }
    }

    /// Dispatches a runtime message and produces its reply.
    pub async fn on_message(&mut self, sender_tab: Option<TabId>, message: Value) -> MessageOutcome {
        let message: InboundMessage = match serde_json::from_value(message) {
            Ok(message) => message,
            Err(e) => {
                msg_warning!(Message::UnrecognizedMessage(e.to_string()));
                return MessageOutcome::NotHandled;
            }
        };

        match message {
            InboundMessage::StartMonitoring { tab_id, tab_url } => self.start_monitoring(tab_id, tab_url).await,
            InboundMessage::StopMonitoring => self.stop_monitoring().await,
            InboundMessage::VideoPausedTooLong { video_url } => self.on_video_paused_too_long(sender_tab, video_url).await,
            InboundMessage::VideoPlayed { video_url } => self.on_video_played(video_url).await,
        }
    }

    pub async fn start_monitoring(&mut self, tab_id: TabId, url: String) -> MessageOutcome {
        self.state.start(tab_id, url.clone());
        self.drift.disarm();
        self.idle.disarm();
        msg_info!(Message::MonitoringStarted(tab_id, url.clone()));
        if url.is_empty() {
            msg_warning!(Message::FocusUrlUnknown(tab_id));
        }

        let mut mirror = Map::new();
        mirror.insert(FOCUS_TAB_ID_KEY.to_string(), Value::from(tab_id));
        mirror.insert(FOCUS_TAB_URL_KEY.to_string(), Value::from(url));
        best_effort("mirror focus target", self.collaborators.settings.set(mirror)).await;

        MessageOutcome::handled(Message::MonitoringStartedStatus(tab_id))
    }

    pub async fn stop_monitoring(&mut self) -> MessageOutcome {
        if let Some(target) = self.state.reset() {
            self.cancel_page_video_timer(target.tab_id).await;
        }
        self.drift.disarm();
        self.idle.disarm();
        for kind in NudgeKind::ALL {
            self.clear_notification(kind).await;
        }
        self.forget_mirrored_target().await;
        msg_info!(Message::MonitoringStopped);

        MessageOutcome::handled(Message::MonitoringStoppedStatus)
    }

    async fn on_tab_removed(&mut self, tab_id: TabId) {
        if !self.state.is_target(tab_id) {
            return;
        }
        msg_info!(Message::FocusTabClosed(tab_id));
        self.state.reset();
        self.drift.disarm();
        self.idle.disarm();
        for kind in NudgeKind::ALL {
            self.clear_notification(kind).await;
        }
        self.forget_mirrored_target().await;
    }

    fn on_tab_updated(&mut self, tab_id: TabId, url: Option<String>) {
        let Some(url) = url else {
            return;
        };
        if self.state.navigate(tab_id, url.clone()) {
            msg_debug!(Message::FocusTabNavigated(tab_id, url));
        }
    }

    async fn on_tab_activated(&mut self, tab_id: TabId) {
        let Some(target_id) = self.state.tab_id() else {
            return;
        };

        if tab_id == target_id {
            msg_debug!(Message::ReturnedToFocusTab(tab_id));
            self.drift.disarm();
            self.idle.disarm();
            for kind in NudgeKind::ALL {
                self.clear_notification(kind).await;
            }
            return;
        }

        msg_debug!(Message::DriftedAway(target_id, tab_id));
        let delay = NudgeKind::TabDrift.resolve_delay(self.collaborators.settings.as_ref()).await;
        // The target may have changed while the delay was being read.
        if self.state.tab_id() != Some(target_id) {
            return;
        }
        let Some(due) = Instant::now().checked_add(delay) else {
            msg_warning!(Message::DelayOutOfRange(NudgeKind::TabDrift.to_string(), delay.as_secs_f64()));
            return;
        };
        self.drift.arm(Arming::Deadline(due), &self.events);
        msg_debug!(Message::TimelineArmed(NudgeKind::TabDrift.to_string(), delay.as_secs_f64(), due_clock(delay)));

        self.cancel_page_video_timer(target_id).await;
    }

    async fn on_idle_state_changed(&mut self, idle_state: IdleState) {
        match idle_state {
            IdleState::Active => {
                // Cleared unconditionally, also when monitoring already stopped.
                self.idle.disarm();
                self.clear_notification(NudgeKind::IdleReturn).await;
            }
            IdleState::Idle | IdleState::Locked => {
                let Some(target_id) = self.state.tab_id() else {
                    return;
                };

                let tab = best_effort("look up focus tab", self.collaborators.tabs.get(target_id)).await.flatten();
                if tab.is_some_and(|tab| tab.audible) {
                    msg_debug!(Message::IdleSuppressedByAudio(target_id));
                    self.idle.disarm();
                    self.clear_notification(NudgeKind::IdleReturn).await;
                    return;
                }

                let delay = NudgeKind::IdleReturn.resolve_delay(self.collaborators.settings.as_ref()).await;
                if self.state.tab_id() != Some(target_id) {
                    return;
                }
                self.idle.arm(Arming::Delay(delay), &self.events);
                msg_debug!(Message::TimelineArmed(NudgeKind::IdleReturn.to_string(), delay.as_secs_f64(), due_clock(delay)));
            }
        }
    }

    async fn on_timeline_fired(&mut self, kind: NudgeKind, generation: u64) {
        let fired = match kind {
            NudgeKind::TabDrift => self.drift.fire(generation),
            NudgeKind::IdleReturn => self.idle.fire(generation),
            NudgeKind::VideoPause => false,
        };
        if !fired {
            msg_debug!(Message::StaleTimelineFire(kind.to_string(), generation));
            return;
        }

        let Some(url) = self.state.url().map(str::to_string) else {
            msg_debug!(Message::NudgeSuppressedNoTarget(kind.to_string()));
            return;
        };
        self.nudge(kind, Some(&url)).await;
    }

    async fn on_video_paused_too_long(&mut self, sender_tab: Option<TabId>, video_url: Option<String>) -> MessageOutcome {
        let from_target = matches!((self.state.tab_id(), sender_tab), (Some(target), Some(sender)) if target == sender);
        if !from_target {
            msg_debug!(Message::VideoPauseIgnored);
            return MessageOutcome::handled(Message::VideoPauseIgnoredStatus);
        }

        self.nudge(NudgeKind::VideoPause, video_url.as_deref()).await;
        MessageOutcome::handled(Message::VideoPauseTriggeredStatus)
    }

    async fn on_video_played(&mut self, video_url: Option<String>) -> MessageOutcome {
        msg_debug!(Message::VideoPlayed(video_url.unwrap_or_default()));
        self.clear_notification(NudgeKind::VideoPause).await;
        self.collaborators.sounds.stop().await;
        MessageOutcome::handled(Message::VideoPlayedStatus)
    }

    async fn on_notification_clicked(&mut self, notification_id: &str) {
        let Some(kind) = NudgeKind::from_notification_id(notification_id) else {
            return;
        };

        if let Some(target_id) = self.state.tab_id() {
            let tabs = &self.collaborators.tabs;
            match best_effort("look up focus tab", tabs.get(target_id)).await.flatten() {
                Some(tab) => {
                    best_effort("focus window", tabs.focus_window(tab.window_id)).await;
                    best_effort("activate focus tab", tabs.activate(tab.id)).await;
                }
                None => msg_warning!(Message::FocusTabMissing(target_id)),
            }
        }

        self.clear_notification(kind).await;
    }

    /// Plays the nudge's sound and shows its notification.
    async fn nudge(&self, kind: NudgeKind, url: Option<&str>) {
        msg_info!(Message::NudgeFired(kind.to_string()));
        self.collaborators.sounds.dispatch(kind);

        let options = kind.notification(url);
        best_effort(
            "show notification",
            self.collaborators.notifications.show(kind.notification_id(), &options),
        )
        .await;
    }

    async fn clear_notification(&self, kind: NudgeKind) {
        best_effort("clear notification", self.collaborators.notifications.clear(kind.notification_id())).await;
    }

    async fn cancel_page_video_timer(&self, tab_id: TabId) {
        // Pages without the observer (or privileged pages) reject the message.
        if let Err(e) = self.collaborators.tabs.send_to_page(tab_id, PageCommand::CancelVideoPauseTimer).await {
            msg_debug!(Message::PageUnreachable(tab_id, e.to_string()));
        }
    }

    async fn forget_mirrored_target(&self) {
        best_effort(
            "forget mirrored focus target",
            self.collaborators.settings.remove(&[FOCUS_TAB_ID_KEY, FOCUS_TAB_URL_KEY]),
        )
        .await;
    }
}

/// Wall-clock time at which a timer armed now with `delay` is due.
fn due_clock(delay: std::time::Duration) -> String {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delay| chrono::Local::now().checked_add_signed(delay))
        .map(|due| due.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
