//! Sound dispatch through the audio playback host.
//!
//! The playback host is created lazily the first time a nudge needs a sound.
//! Dispatches run as detached tasks, so two nudges firing back to back may
//! both try to bring the host up; an in-flight flag makes sure only one of
//! them actually asks for creation.

use crate::libs::browser::{best_effort, PlaybackCommand, PlaybackHost};
use crate::libs::messages::Message;
use crate::libs::nudge::NudgeKind;
use crate::libs::settings::SettingsStore;
use crate::libs::sound::resolve_sound;
use crate::{msg_debug, msg_error};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Clears the in-flight flag when dropped, however creation ended.
struct LaunchGuard<'a>(&'a AtomicBool);

impl Drop for LaunchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct SoundDispatcher {
    settings: Arc<dyn SettingsStore>,
    host: Arc<dyn PlaybackHost>,
    launching: Arc<AtomicBool>,
    /// Pause between bringing the host up and the first play command.
    settle_delay: Duration,
}

impl SoundDispatcher {
    pub fn new(settings: Arc<dyn SettingsStore>, host: Arc<dyn PlaybackHost>, settle_delay: Duration) -> Self {
        Self {
            settings,
            host,
            launching: Arc::new(AtomicBool::new(false)),
            settle_delay,
        }
    }

    /// Plays the configured sound for `kind` in the background.
    pub fn dispatch(&self, kind: NudgeKind) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.play_for(kind).await })
    }

    /// Resolves and plays the sound for `kind`. Never fails; problems are logged.
    pub async fn play_for(&self, kind: NudgeKind) {
        let Some(sound_path) = resolve_sound(self.settings.as_ref(), kind).await else {
            return;
        };

        msg_debug!(Message::PlayingSound(sound_path.to_string(), kind.to_string()));
        self.ensure_host().await;
        tokio::time::sleep(self.settle_delay).await;

        best_effort(
            "play sound",
            self.host.send(PlaybackCommand::Play {
                sound_path: sound_path.to_string(),
            }),
        )
        .await;
    }

    /// Stops whatever the host is playing, if the host exists at all.
    pub async fn stop(&self) {
        match self.host.is_running().await {
            Ok(true) => {
                best_effort("stop sound", self.host.send(PlaybackCommand::Stop)).await;
            }
            Ok(false) => msg_debug!(Message::PlaybackHostAbsent),
            Err(e) => msg_debug!(Message::CollaboratorCallFailed("query playback host".to_string(), e.to_string())),
        }
    }

    /// Creates the playback host unless it exists or is already being created.
    pub async fn ensure_host(&self) {
        if self.launching.swap(true, Ordering::AcqRel) {
            msg_debug!(Message::PlaybackHostLaunchInFlight);
            return;
        }
        let _guard = LaunchGuard(&self.launching);

        match self.host.is_running().await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => msg_debug!(Message::CollaboratorCallFailed("query playback host".to_string(), e.to_string())),
        }

        match self.host.launch().await {
            Ok(()) => msg_debug!(Message::PlaybackHostLaunched),
            Err(e) => msg_error!(Message::PlaybackHostLaunchFailed(e.to_string())),
        }
    }

    pub fn is_launching(&self) -> bool {
        self.launching.load(Ordering::Acquire)
    }
}
