//! Per-window keyboard language memory.
//!
//! The [`Tracker`] polls the desktop for the focused window, remembers the input
//! language last used in each window and asks the host to restore it when focus
//! comes back. UI layers embed the tracker and only call `start()`/`stop()`.

pub mod config;
pub mod error;
pub mod events;
pub mod services;
mod utils;

pub use config::Config;
pub use error::{Result, SwitcherError};
pub use services::{create_host, Host, Tracker};
