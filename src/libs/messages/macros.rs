//! Convenient macros for application messaging and logging.
//!
//! Every macro routes through [`is_debug_mode`]: in debug mode messages go to
//! `tracing` (and from there to stderr), otherwise interactive commands print
//! them directly.
//!
//! ## Debug Mode Detection
//!
//! Debug mode is on when either variable is set:
//! - **`DRIFT_DEBUG`**: application-specific flag
//! - **`RUST_LOG`**: standard Rust logging configuration
//!
//! The native host always calls [`force_debug_mode`] before doing anything
//! else. Its stdout carries native messaging frames, so a stray `println!`
//! would corrupt the channel.
//!
//! ## Output Routing
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Macro Call    │    │   Debug Mode    │    │   Output        │
//! │   msg_info!()   │───▶│   Detection     │───▶│   Routing       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                 │                       │
//!                                 ▼                       ▼
//!                        ┌─────────────────┐    ┌─────────────────┐
//!                        │ forced, or      │    │ tracing::info!  │
//!                        │ DRIFT_DEBUG /   │    │ OR println!     │
//!                        │ RUST_LOG set?   │    │                 │
//!                        └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use drift::{msg_info, msg_error_anyhow};
//! use drift::libs::messages::Message;
//!
//! msg_info!(Message::SettingsSaved);
//! let error = msg_error_anyhow!(Message::UnknownSoundKey("bell".to_string()));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Cached result of the environment check.
static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Set by [`force_debug_mode`]; wins over the environment.
static FORCED: AtomicBool = AtomicBool::new(false);

/// Checks if debug mode is enabled.
///
/// The environment is read once and cached; a forced debug mode overrides it
/// regardless of when it was forced.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    if FORCED.load(Ordering::Relaxed) {
        return true;
    }
    *DEBUG_MODE.get_or_init(|| {
        // Check for application-specific debug flag
        std::env::var("DRIFT_DEBUG").is_ok() ||
        // Check for standard Rust logging configuration
        std::env::var("RUST_LOG").is_ok()
    })
}

/// Routes every message macro through `tracing` for the rest of the process.
pub fn force_debug_mode() {
    FORCED.store(true, Ordering::Relaxed);
}

/// Prints a general message with automatic debug mode routing.
///
/// ```ignore
/// msg_print!(Message::SettingsHeader);
/// msg_print!(Message::SettingsHeader, true); // surrounded by blank lines
/// ```
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

/// Prints a success message with ✅ prefix.
#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Prints an error message with ❌ prefix.
///
/// Outside debug mode errors go to stderr so they stay visible when stdout
/// is redirected.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

/// Prints a warning message with ⚠️ prefix.
#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("\n⚠️ {}\n", $msg);
        } else {
            println!("\n⚠️ {}\n", $msg);
        }
    };
}

/// Prints an informational message with ℹ️ prefix.
#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Debug-only message with 🔍 prefix. Silent outside debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Creates an `anyhow::Error` from a message.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
