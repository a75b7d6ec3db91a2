//! Shared fakes for drift's integration tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use drift::libs::browser::{NotificationSink, PageCommand, PlaybackCommand, PlaybackHost, TabHost, TabId, TabInfo, WindowId};
use drift::libs::monitor::{Collaborators, FocusMonitor};
use drift::libs::nudge::NotificationOptions;
use drift::libs::playback::SoundDispatcher;
use drift::libs::protocol::MonitorEvent;
use drift::libs::settings::SettingsStore;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// In-memory settings store.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<Map<String, Value>>,
    pub fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn with(entries: &[(&str, Value)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock();
            for (key, value) in entries {
                values.insert(key.to_string(), value.clone());
            }
        }
        store
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.lock().clone()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, entries: Map<String, Value>) -> Result<()> {
        self.values.lock().extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<()> {
        let mut values = self.values.lock();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

/// Notification sink that remembers what is on screen.
#[derive(Default)]
pub struct RecordingNotifications {
    visible: Mutex<HashMap<String, NotificationOptions>>,
    pub shown: Mutex<Vec<(String, NotificationOptions)>>,
    pub cleared: Mutex<Vec<String>>,
}

impl RecordingNotifications {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.lock().contains_key(id)
    }

    pub fn visible(&self, id: &str) -> Option<NotificationOptions> {
        self.visible.lock().get(id).cloned()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.lock().len()
    }

    pub fn shown_count(&self) -> usize {
        self.shown.lock().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifications {
    async fn show(&self, id: &str, options: &NotificationOptions) -> Result<()> {
        self.visible.lock().insert(id.to_string(), options.clone());
        self.shown.lock().push((id.to_string(), options.clone()));
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<bool> {
        self.cleared.lock().push(id.to_string());
        Ok(self.visible.lock().remove(id).is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabCall {
    Get(TabId),
    FocusWindow(WindowId),
    Activate(TabId),
    SendToPage(TabId, PageCommand),
}

/// Tab host backed by a fixed set of tabs.
#[derive(Default)]
pub struct FakeTabs {
    tabs: Mutex<HashMap<TabId, TabInfo>>,
    pub calls: Mutex<Vec<TabCall>>,
    /// Tabs whose page observer answers messages.
    pub observed: Mutex<HashSet<TabId>>,
}

impl FakeTabs {
    pub fn add(&self, id: TabId, window_id: WindowId, url: &str, audible: bool) {
        self.tabs.lock().insert(
            id,
            TabInfo {
                id,
                window_id,
                url: Some(url.to_string()),
                audible,
            },
        );
        self.observed.lock().insert(id);
    }

    pub fn calls(&self) -> Vec<TabCall> {
        self.calls.lock().clone()
    }

    pub fn page_commands(&self, tab_id: TabId) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, TabCall::SendToPage(id, _) if *id == tab_id))
            .count()
    }
}

#[async_trait]
impl TabHost for FakeTabs {
    async fn get(&self, tab_id: TabId) -> Result<Option<TabInfo>> {
        self.calls.lock().push(TabCall::Get(tab_id));
        Ok(self.tabs.lock().get(&tab_id).cloned())
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<()> {
        self.calls.lock().push(TabCall::FocusWindow(window_id));
        Ok(())
    }

    async fn activate(&self, tab_id: TabId) -> Result<()> {
        self.calls.lock().push(TabCall::Activate(tab_id));
        Ok(())
    }

    async fn send_to_page(&self, tab_id: TabId, command: PageCommand) -> Result<()> {
        self.calls.lock().push(TabCall::SendToPage(tab_id, command));
        if !self.observed.lock().contains(&tab_id) {
            return Err(anyhow!("Could not establish connection. Receiving end does not exist."));
        }
        Ok(())
    }
}

/// Playback host that counts launches and records commands.
#[derive(Default)]
pub struct FakePlayback {
    pub running: AtomicBool,
    pub launches: AtomicUsize,
    pub commands: Mutex<Vec<PlaybackCommand>>,
    /// How long a launch takes before the host counts as running.
    pub launch_time: Mutex<Duration>,
}

impl FakePlayback {
    pub fn played(&self) -> Vec<String> {
        self.commands
            .lock()
            .iter()
            .filter_map(|command| match command {
                PlaybackCommand::Play { sound_path } => Some(sound_path.clone()),
                PlaybackCommand::Stop => None,
            })
            .collect()
    }

    pub fn stops(&self) -> usize {
        self.commands.lock().iter().filter(|command| **command == PlaybackCommand::Stop).count()
    }
}

#[async_trait]
impl PlaybackHost for FakePlayback {
    async fn is_running(&self) -> Result<bool> {
        Ok(self.running.load(Ordering::SeqCst))
    }

    async fn launch(&self) -> Result<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let launch_time = *self.launch_time.lock();
        tokio::time::sleep(launch_time).await;
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.commands.lock().push(command);
        Ok(())
    }
}

/// A monitor wired to fakes, with its event queue exposed.
pub struct Harness {
    pub monitor: FocusMonitor,
    pub events: UnboundedReceiver<MonitorEvent>,
    pub store: Arc<MemoryStore>,
    pub notifications: Arc<RecordingNotifications>,
    pub tabs: Arc<FakeTabs>,
    pub playback: Arc<FakePlayback>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let notifications = Arc::new(RecordingNotifications::default());
        let tabs = Arc::new(FakeTabs::default());
        let playback = Arc::new(FakePlayback::default());

        let (events_tx, events) = mpsc::unbounded_channel();
        let collaborators = Collaborators {
            settings: store.clone(),
            notifications: notifications.clone(),
            tabs: tabs.clone(),
            sounds: SoundDispatcher::new(store.clone(), playback.clone(), Duration::from_millis(100)),
        };

        Self {
            monitor: FocusMonitor::new(collaborators, events_tx),
            events,
            store,
            notifications,
            tabs,
            playback,
        }
    }

    pub async fn handle(&mut self, event: MonitorEvent) {
        self.monitor.handle(event).await;
    }

    /// Handles every event currently queued, including ones queued meanwhile.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.monitor.handle(event).await;
            handled += 1;
        }
        handled
    }

    /// Lets `duration` of (paused) time pass, then handles whatever fired.
    pub async fn wait(&mut self, duration: Duration) -> usize {
        tokio::time::sleep(duration).await;
        self.drain().await
    }

    pub async fn start(&mut self, tab_id: TabId, url: &str) {
        self.monitor.start_monitoring(tab_id, url.to_string()).await;
    }
}
