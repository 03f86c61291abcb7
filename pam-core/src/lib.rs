//! PAM Control Plane
//!
//! Power-state, hardware-enable and data-path sequencing for the PAM
//! packet-acceleration engine shared between the application processor and
//! a companion processor. Once the data path is connected, packets move
//! through shared-memory rings without CPU involvement; this crate only
//! brings that path up and down safely.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │         Resource-dependency manager (external)              │
//! │  request_resource / release_resource / notify_completion    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PamHandle (this crate)                      │
//! │  demand flag + coalescing kick → dedicated power worker     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!         ┌────────────────────┼────────────────────┐
//!         ▼                    ▼                    ▼
//!    pam-hal traits     ConnectionNegotiator   DataPath boundary
//! ```
//!
//! All hardware programming and stage mutation happens on the single power
//! worker; the only cross-context state is the atomic power-demand flag and
//! the mutex-guarded link state that the companion-readiness entry point
//! writes.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod error;
pub mod link;
pub mod power;
pub mod rm;
pub mod trace;

#[cfg(feature = "std")]
mod handle;

pub use config::PamConfig;
pub use error::{PamError, PamResult};
#[cfg(feature = "std")]
pub use handle::PamHandle;
