//! Resource-manager binding.
//!
//! The engine registers itself as a producer resource with the external
//! resource-dependency manager; the two WWAN consumer resources depend on
//! it. The manager calls back through
//! [`PamHandle::request_resource`](crate::PamHandle::request_resource) /
//! [`release_resource`](crate::PamHandle::release_resource); the orchestrator
//! answers with a single `Granted` completion per successful resume.

use crate::error::{PamError, PamResult};

/// Producer resource name this engine registers under.
pub const RES_PROD_PAM: &str = "pam";

/// Uplink WWAN consumer resource.
pub const RES_CONS_WWAN_UL: &str = "wwan-ul";

/// Downlink WWAN consumer resource.
pub const RES_CONS_WWAN_DL: &str = "wwan-dl";

/// Completion event reported back to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    /// The producer resource is up; pending requests are satisfied.
    Granted,
}

/// Answer to a resource request callback.
///
/// A request is never satisfied synchronously: the caller waits for the
/// `Granted` completion delivered once the resume sequence finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Resume scheduled; completion will be notified.
    Pending,
}

/// The external resource-dependency manager, at its interface boundary.
pub trait ResourceManager: Send {
    /// Register a producer resource.
    fn create_resource(&mut self, producer: &'static str) -> PamResult<()>;

    /// Remove a producer resource.
    fn delete_resource(&mut self, producer: &'static str);

    /// Add a dependency edge from a consumer onto a producer.
    fn add_dependency(&mut self, consumer: &'static str, producer: &'static str) -> PamResult<()>;

    /// Remove a dependency edge.
    fn delete_dependency(&mut self, consumer: &'static str, producer: &'static str);

    /// Deliver a completion event for a producer resource.
    fn notify_completion(&mut self, event: ResourceEvent, producer: &'static str);
}

/// Register the producer and its two consumer dependency edges.
///
/// Partial failure unwinds everything added so far: a failed second edge
/// removes the first edge and the producer; a failed first edge removes the
/// producer.
pub fn register_producer(rm: &mut dyn ResourceManager) -> PamResult<()> {
    rm.create_resource(RES_PROD_PAM)
        .map_err(|_| PamError::ResourceManager)?;

    if rm.add_dependency(RES_CONS_WWAN_UL, RES_PROD_PAM).is_err() {
        rm.delete_resource(RES_PROD_PAM);
        return Err(PamError::ResourceManager);
    }

    if rm.add_dependency(RES_CONS_WWAN_DL, RES_PROD_PAM).is_err() {
        rm.delete_dependency(RES_CONS_WWAN_UL, RES_PROD_PAM);
        rm.delete_resource(RES_PROD_PAM);
        return Err(PamError::ResourceManager);
    }

    Ok(())
}
