//! The single process-wide focus target.

use crate::libs::browser::TabId;

/// The tab the user wants to stay on, with its last known URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub tab_id: TabId,
    pub url: String,
}

/// Focus state owned by the monitor.
///
/// The tab id and URL are always set and cleared together; only navigation
/// updates the URL on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    target: Option<FocusTarget>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `tab_id` the focus target, replacing any previous one.
    pub fn start(&mut self, tab_id: TabId, url: impl Into<String>) {
        self.target = Some(FocusTarget { tab_id, url: url.into() });
    }

    /// Forgets the focus target. Returns the target that was cleared, if any.
    pub fn reset(&mut self) -> Option<FocusTarget> {
        self.target.take()
    }

    /// Records a navigation of the focus tab. Ignored for any other tab.
    pub fn navigate(&mut self, tab_id: TabId, url: impl Into<String>) -> bool {
        match self.target.as_mut() {
            Some(target) if target.tab_id == tab_id => {
                target.url = url.into();
                true
            }
            _ => false,
        }
    }

    pub fn target(&self) -> Option<&FocusTarget> {
        self.target.as_ref()
    }

    pub fn tab_id(&self) -> Option<TabId> {
        self.target.as_ref().map(|target| target.tab_id)
    }

    pub fn url(&self) -> Option<&str> {
        self.target.as_ref().map(|target| target.url.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_target(&self, tab_id: TabId) -> bool {
        self.tab_id() == Some(tab_id)
    }
}
