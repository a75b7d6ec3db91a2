//! Core library modules for drift.
//!
//! ## Layout
//!
//! - **Monitoring**: [`focus`], [`monitor`], [`timeline`], [`nudge`]
//! - **Sound**: [`sound`], [`playback`]
//! - **Browser side**: [`browser`] collaborator traits, [`page`] video pause
//!   detection, [`protocol`] runtime messages and events
//! - **Native messaging**: [`native`] wire format, [`bridge`] call routing,
//!   [`daemon`] host lifecycle
//! - **Infrastructure**: [`config`], [`settings`], [`data_storage`],
//!   [`messages`], [`view`]

pub mod bridge;
pub mod browser;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod focus;
pub mod messages;
pub mod monitor;
pub mod native;
pub mod nudge;
pub mod page;
pub mod playback;
pub mod protocol;
pub mod settings;
pub mod sound;
pub mod timeline;
pub mod view;
