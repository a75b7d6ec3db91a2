//! User-facing text and the macros that print or log it.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
