use serde::Deserialize;

/// Per-tab page lifecycle as reported by the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Loading,
    Complete,
    #[serde(other)]
    Other,
}

/// One tab state change. Ephemeral; the browser emits one per update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub tab_id: i64,
    pub url: String,
    pub status: LifecycleStatus,
}
