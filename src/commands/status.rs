use crate::{
    libs::{
        messages::Message,
        settings::{mirrored_target, JsonSettingsStore},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{DateTime, Local};

/// Shows the focus target a running host last recorded.
pub async fn cmd() -> Result<()> {
    let store = JsonSettingsStore::open_default()?;
    let Some(target) = mirrored_target(&store).await? else {
        msg_info!(Message::NotMonitoring);
        return Ok(());
    };

    msg_print!(Message::MonitoringTab(target.tab_id, target.url.clone()), true);
    View::focus_target(&target);

    if let Ok(modified) = std::fs::metadata(store.path()).and_then(|meta| meta.modified()) {
        let since: DateTime<Local> = modified.into();
        msg_print!(Message::MonitoringSince(since.format("%Y-%m-%d %H:%M:%S").to_string()));
    }
    Ok(())
}
