//! Power orchestration.
//!
//! The suspend/resume state machine and the single deferred work queue that
//! serializes it. Power-demand signals from the resource manager only flip
//! an atomic flag and kick the worker; the worker re-reads the flag when it
//! runs, so a burst of request/release signals coalesces into one execution
//! that realizes the latest demand.
//!
//! Stage ordering is the load-bearing part:
//!
//! ```text
//! suspend:  disconnect data path -> power off -> release domain hold
//! resume:   acquire domain hold  -> power on  -> connect data path
//! ```
//!
//! Resume failures re-arm the worker after a fixed backoff for as long as
//! demand holds; a release arriving in the meantime wins.

mod orchestrator;
mod stages;
#[cfg(feature = "std")]
mod worker;

pub use orchestrator::{PowerOrchestrator, RunOutcome, SharedState};
pub use stages::{PowerState, SuspendStages};
#[cfg(feature = "std")]
pub use worker::PowerWorker;
