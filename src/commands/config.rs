use crate::{
    libs::{
        config::Config,
        messages::Message,
        settings::{JsonSettingsStore, NudgeSettings},
        view::View,
    },
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Edit the host settings interactively
    #[arg(short, long)]
    edit: bool,
}

pub async fn cmd(args: ConfigArgs) -> Result<()> {
    if args.edit {
        Config::init()?.save()?;
        msg_success!(Message::ConfigSaved);
        return Ok(());
    }

    let store = JsonSettingsStore::open_default()?;
    let settings = NudgeSettings::from_map(&store.load().await?);
    msg_print!(Message::SettingsHeader, true);
    View::settings(&settings);
    msg_print!(Message::SettingsFileLocation(store.path().display().to_string()));

    msg_print!(Message::HostConfigHeader, true);
    View::host_config(&Config::read()?.host_or_default());
    msg_print!(Message::ConfigFileLocation(Config::path()?.display().to_string()));
    Ok(())
}
