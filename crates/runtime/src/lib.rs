//! Click-to-play installer runtime.
//!
//! This crate runs the one-time installer: it asks the user to confirm the
//! manifest's permissions, writes the resulting grants, and then removes the
//! installer so the whole thing happens exactly once.
//!
//! # Overview
//!
//! - **ConfirmationGate**: builds the summary of all entries and asks once.
//! - **ApplicationEngine**: drives `Idle → Confirming → Applying →
//!   Finalizing → Done`, reporting failures through the prompt surface
//!   instead of returning them.
//! - **Host traits**: [`Prompt`] and [`ComponentRegistry`] are implemented by
//!   whatever hosts the installer.
//! - **Lifecycle**: [`launch`] waits for a window when the host is starting.
//!
//! # Example
//!
//! ```ignore
//! use grants::RunConfig;
//! use runtime::ApplicationEngine;
//! use storage::SqliteGrantStore;
//!
//! let config = RunConfig::load("installer.toml")?;
//! let store = SqliteGrantStore::open("permissions.db")?;
//! let report = ApplicationEngine::new(&config, &store, &prompt, &registry).run();
//! println!("wrote {} grants", report.written.len());
//! ```

mod confirm;
mod engine;
mod error;
mod host;
mod lifecycle;
#[cfg(test)]
mod testing;

pub use confirm::{ConfirmationGate, summary_message};
pub use engine::{ApplicationEngine, Confirmation, RunReport, RunState};
pub use error::{Error, Phase, Result};
pub use host::{Component, ComponentRegistry, HostError, Prompt};
pub use lifecycle::{LaunchReason, WindowEvent, WindowId, launch, wait_until_ready};
