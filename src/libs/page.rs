//! Video pause detection as done by the page observer in the focus tab.
//!
//! The observer owns the video-pause timeline: a pause arms a timer for
//! `totalVideoPauseSeconds`, and if the video is still paused when it expires
//! the observer reports `videoPausedTooLong` upward. Playing again disarms it
//! and reports `videoPlayed`. The monitor can disarm it remotely with
//! [`PageCommand::CancelVideoPauseTimer`] when the user drifts away.
//!
//! The host binary never runs this: the real observer is the relay's content
//! script. `VideoPauseWatch` is the reference model that script implements,
//! and the contract the monitor's video pause handling is tested against.

use crate::libs::browser::PageCommand;
use crate::libs::messages::Message;
use crate::libs::nudge::NudgeKind;
use crate::libs::protocol::InboundMessage;
use crate::libs::settings::SettingsStore;
use crate::msg_debug;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

pub struct VideoPauseWatch {
    settings: Arc<dyn SettingsStore>,
    /// Messages for the monitor, sent as runtime messages from this tab.
    outbox: UnboundedSender<InboundMessage>,
    timer: Option<JoinHandle<()>>,
}

impl VideoPauseWatch {
    pub fn new(settings: Arc<dyn SettingsStore>, outbox: UnboundedSender<InboundMessage>) -> Self {
        Self {
            settings,
            outbox,
            timer: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// The video was paused: (re)start the pause timer.
    pub async fn paused(&mut self, page_url: &str) {
        self.disarm();
        let delay = NudgeKind::VideoPause.resolve_delay(self.settings.as_ref()).await;

        let outbox = self.outbox.clone();
        let video_url = page_url.to_string();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = outbox.send(InboundMessage::VideoPausedTooLong { video_url: Some(video_url) });
        }));
    }

    /// The video started playing again.
    pub fn played(&mut self, page_url: &str) {
        self.disarm();
        let _ = self.outbox.send(InboundMessage::VideoPlayed {
            video_url: Some(page_url.to_string()),
        });
    }

    /// Handles a command from the monitor.
    pub fn command(&mut self, command: PageCommand) {
        match command {
            PageCommand::CancelVideoPauseTimer => self.cancel(),
        }
    }

    /// Disarms the pause timer without reporting anything upward.
    pub fn cancel(&mut self) {
        if self.disarm() {
            msg_debug!(Message::VideoPauseTimerCancelled);
        }
    }

    fn disarm(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                let was_pending = !timer.is_finished();
                timer.abort();
                was_pending
            }
            None => false,
        }
    }
}

impl Drop for VideoPauseWatch {
    fn drop(&mut self) {
        self.disarm();
    }
}
