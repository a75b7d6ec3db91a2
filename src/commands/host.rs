use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HostArgs {
    /// Origin of the calling extension, passed by the browser.
    #[arg(hide = true)]
    origin: Option<String>,

    /// Parent window handle, passed by some browsers on Windows.
    #[arg(long = "parent-window", hide = true)]
    parent_window: Option<String>,
}

pub async fn cmd(_args: HostArgs) -> Result<()> {
    daemon::run_host().await
}
