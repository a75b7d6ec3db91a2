mod common;

#[cfg(test)]
mod tests {
    use super::common::{FakePlayback, MemoryStore};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use drift::libs::browser::{PlaybackCommand, PlaybackHost};
    use drift::libs::nudge::NudgeKind;
    use drift::libs::playback::SoundDispatcher;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher(store: MemoryStore, host: Arc<dyn PlaybackHost>) -> SoundDispatcher {
        SoundDispatcher::new(Arc::new(store), host, Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_sound_launches_host() {
        let host = Arc::new(FakePlayback::default());
        let sounds = dispatcher(MemoryStore::default(), host.clone());

        sounds.play_for(NudgeKind::TabDrift).await;

        assert_eq!(host.launches.load(Ordering::SeqCst), 1);
        assert_eq!(host.played(), vec!["sounds/nudge1.wav".to_string()]);
        assert!(!sounds.is_launching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_host_is_reused() {
        let host = Arc::new(FakePlayback::default());
        host.running.store(true, Ordering::SeqCst);
        let sounds = dispatcher(MemoryStore::default(), host.clone());

        sounds.play_for(NudgeKind::IdleReturn).await;
        sounds.play_for(NudgeKind::VideoPause).await;

        assert_eq!(host.launches.load(Ordering::SeqCst), 0);
        assert_eq!(
            host.played(),
            vec!["sounds/nudge2.wav".to_string(), "sounds/quiet_nudge4.wav".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_dispatches_launch_host_once() {
        let host = Arc::new(FakePlayback::default());
        *host.launch_time.lock() = Duration::from_secs(1);
        let sounds = dispatcher(MemoryStore::default(), host.clone());

        let first = sounds.dispatch(NudgeKind::TabDrift);
        let second = sounds.dispatch(NudgeKind::IdleReturn);
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(host.launches.load(Ordering::SeqCst), 1);
        assert_eq!(host.played().len(), 2);
        assert!(!sounds.is_launching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sound_none_plays_nothing() {
        let host = Arc::new(FakePlayback::default());
        let sounds = dispatcher(MemoryStore::with(&[("videoPauseSoundChoice", json!("none"))]), host.clone());

        sounds.play_for(NudgeKind::VideoPause).await;

        assert_eq!(host.launches.load(Ordering::SeqCst), 0);
        assert!(host.commands.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_only_reaches_running_host() {
        let host = Arc::new(FakePlayback::default());
        let sounds = dispatcher(MemoryStore::default(), host.clone());

        sounds.stop().await;
        assert!(host.commands.lock().is_empty());

        host.running.store(true, Ordering::SeqCst);
        sounds.stop().await;
        sounds.stop().await;
        assert_eq!(host.commands.lock().as_slice(), [PlaybackCommand::Stop, PlaybackCommand::Stop]);
        assert_eq!(host.launches.load(Ordering::SeqCst), 0);
    }

    /// Host whose creation always fails.
    #[derive(Default)]
    struct BrokenPlayback {
        launches: AtomicUsize,
    }

    #[async_trait]
    impl PlaybackHost for BrokenPlayback {
        async fn is_running(&self) -> Result<bool> {
            Ok(false)
        }

        async fn launch(&self) -> Result<()> {
            self.launches.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("Only a single offscreen document may be created."))
        }

        async fn send(&self, _command: PlaybackCommand) -> Result<()> {
            Err(anyhow!("Receiving end does not exist."))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_launch_releases_guard() {
        let host = Arc::new(BrokenPlayback::default());
        let sounds = dispatcher(MemoryStore::default(), host.clone());

        sounds.play_for(NudgeKind::TabDrift).await;
        assert!(!sounds.is_launching());

        sounds.play_for(NudgeKind::TabDrift).await;
        assert_eq!(host.launches.load(Ordering::SeqCst), 2);
    }
}
