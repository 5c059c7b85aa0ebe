#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Transient notification toasts rendered into a host document.
//!
//! ```
//! use std::time::Duration;
//! use toastbox::{MemoryDocument, Notifier, ToastKind, ToastOptions};
//!
//! let mut notifier = Notifier::new(MemoryDocument::new(), &ToastOptions::default());
//! let options = ToastOptions::new()
//!     .kind(ToastKind::Success)
//!     .duration(Duration::from_secs(1));
//! notifier.notify("Saved", &options)?;
//! assert!(notifier.tray().is_some());
//!
//! notifier.advance(Duration::from_millis(1600))?;
//! assert!(notifier.tray().is_none());
//! # Ok::<(), toastbox::error::Error>(())
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod notifier;
pub mod options;
pub mod service;
pub mod telemetry;
pub mod timer;
pub mod types;

pub use dom::{Document, ElementId, MemoryDocument};
pub use notifier::{ANIMATION_MARGIN, Event, Notifier, ToastState, show};
pub use options::{ToastConfig, ToastOptions};
pub use types::{Position, ToastKind};

pub type Result<T> = std::result::Result<T, error::Error>;
