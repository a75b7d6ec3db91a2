use crate::{
    libs::{
        messages::Message,
        settings::{JsonSettingsStore, NudgeSettings, SettingsStore},
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove all nudge settings instead of editing them
    #[arg(short, long)]
    delete: bool,
}

pub async fn cmd(init_args: InitArgs) -> Result<()> {
    let store = JsonSettingsStore::open_default()?;

    if init_args.delete {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearSettings.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::SettingsClearCancelled);
            return Ok(());
        }
        store.clear().await?;
        msg_success!(Message::SettingsCleared);
        return Ok(());
    }

    let current = NudgeSettings::from_map(&store.load().await?);
    let updated = NudgeSettings::init(&current)?;
    store.set(updated.to_entries()).await?;

    msg_success!(Message::SettingsSaved);
    msg_info!(Message::SettingsFileLocation(store.path().display().to_string()));
    Ok(())
}
