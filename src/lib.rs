//! # Drift - focus tab nudge host
//!
//! A native messaging host for the Drift browser extension. The user picks a
//! focus tab; drift nudges them back with a notification and a sound when
//! they drift to other tabs, leave a video paused, or go idle.
//!
//! ## Features
//!
//! - **Tab drift**: nudge after a configurable time away from the focus tab
//! - **Video pause**: nudge when a video in the focus tab stays paused
//! - **Idle return**: nudge when the user goes idle, unless the tab plays audio
//! - **Notification routing**: clicking a nudge brings the focus tab back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drift::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
