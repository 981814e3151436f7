#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Transient tray-balloon notifications for Windows.
//!
//! ```no_run
//! use std::time::Duration;
//! use traytoast::{ToastRequest, Toaster};
//!
//! let toaster = Toaster::new();
//! let request = ToastRequest::new("Build finished", "All tests passed")
//!     .duration(Some(Duration::from_secs(3)))
//!     .on_click(|| println!("clicked"));
//! toaster.show_toast(request, true);
//! toaster.join();
//! ```

pub mod config;
pub mod error;
pub mod icon;
pub mod request;
pub mod shell;
pub mod telemetry;
pub mod toaster;
pub mod types;

pub use request::ToastRequest;
pub use toaster::{LifecycleReport, Toaster, TraySettings};

pub type Result<T> = std::result::Result<T, error::Error>;
