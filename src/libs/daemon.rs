//! Native host lifecycle.
//!
//! The browser starts the host as a child process and talks to it over
//! stdin/stdout. The host runs until the browser closes stdin or a shutdown
//! signal arrives.
//!
//! ```text
//! stdin ──▶ pump task ──▶ event queue ──▶ event loop (FocusMonitor)
//!              │                ▲                 │
//!              ▼                │                 ▼
//!        call replies     timeline fires     calls, responses ──▶ stdout
//! ```

use crate::libs::bridge::NativeBridge;
use crate::libs::config::Config;
use crate::libs::messages::macros::force_debug_mode;
use crate::libs::messages::Message;
use crate::libs::monitor::{Collaborators, FocusMonitor};
use crate::libs::playback::SoundDispatcher;
use crate::libs::protocol::MonitorEvent;
use crate::libs::settings::{JsonSettingsStore, SettingsStore};
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::oneshot;

/// Runs the native host on the process's stdin/stdout.
pub async fn run_host() -> Result<()> {
    // stdout is the messaging channel from here on.
    force_debug_mode();

    let host_config = Config::read()?.host_or_default();
    let settings = Arc::new(JsonSettingsStore::open_default()?);
    msg_info!(Message::HostStarting(settings.path().display().to_string()));

    let bridge = NativeBridge::new(tokio::io::stdout(), host_config.call_timeout());
    let shutdown = shutdown_signal();

    let result = serve(
        bridge,
        tokio::io::stdin(),
        settings,
        host_config.playback_delay(),
        shutdown,
    )
    .await;

    msg_info!(Message::HostStopped);
    result
}

/// Serves one browser connection until the reader ends or `shutdown` fires.
///
/// A dropped `shutdown` sender is not a shutdown request.
pub async fn serve<R>(
    bridge: NativeBridge,
    reader: R,
    settings: Arc<dyn SettingsStore>,
    playback_delay: std::time::Duration,
    shutdown: oneshot::Receiver<()>,
) -> Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let host = Arc::new(bridge.clone());
    let collaborators = Collaborators {
        settings: settings.clone(),
        notifications: host.clone(),
        tabs: host.clone(),
        sounds: SoundDispatcher::new(settings, host, playback_delay),
    };
    let monitor = FocusMonitor::new(collaborators, events_tx.clone());

    let pump_bridge = bridge.clone();
    let mut pump = tokio::spawn(async move { pump_bridge.pump(reader, events_tx).await });
    let event_loop = run_event_loop(monitor, bridge, events_rx);

    tokio::select! {
        result = &mut pump => {
            match result {
                Ok(Ok(())) => msg_info!(Message::BrowserDisconnected),
                Ok(Err(e)) => msg_error!(Message::BridgeFailed(e.to_string())),
                Err(e) => msg_error!(Message::BridgeFailed(e.to_string())),
            }
        }
        _ = event_loop => {}
        Ok(()) = shutdown => {
            msg_info!(Message::ShutdownSignalReceived);
            pump.abort();
        }
    }

    Ok(())
}

/// Handles events one at a time until every sender is gone.
async fn run_event_loop(mut monitor: FocusMonitor, bridge: NativeBridge, mut events: UnboundedReceiver<MonitorEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            MonitorEvent::Message {
                request_id,
                sender_tab,
                message,
            } => {
                let outcome = monitor.on_message(sender_tab, message).await;
                if let Err(e) = bridge.respond(request_id, outcome).await {
                    msg_warning!(Message::RespondFailed(request_id, e.to_string()));
                }
            }
            event => monitor.handle(event).await,
        }
    }
}

/// Resolves once SIGTERM/SIGINT (or Ctrl-C on Windows) arrives.
fn shutdown_signal() -> oneshot::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::SignalHandlerFailed(e.to_string()));
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = shutdown_tx.send(());
                }
                Err(e) => msg_error!(Message::SignalHandlerFailed(e.to_string())),
            }
        });
    }

    #[cfg(not(any(unix, windows)))]
    drop(shutdown_tx);

    shutdown_rx
}
