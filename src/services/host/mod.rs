//! Host service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the desktop:
//! which window holds input focus, which layout its thread uses, and posting a
//! layout change request. They MUST NOT remember anything between polls. All
//! per-window memory and restore decisions belong to the Reconciler.

mod dry_run;
#[cfg(test)]
pub(crate) mod scripted;
mod r#trait;
#[cfg(windows)]
mod win32;

pub use self::dry_run::SimulatedDesktop;
pub use self::r#trait::{create_host, Host, LayoutAccessor, WindowResolver};
