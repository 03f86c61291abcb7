//! Boundary traits to the platform's messaging subsystem.
//!
//! The control plane never allocates shared memory, negotiates endpoints or
//! moves packets itself; the platform integration implements these traits
//! over its IPC stack.

use crate::error::PamResult;
use crate::link::params::{ConnectionParams, EndpointInfo};

/// Platform endpoint registry: reports the local ring geometry reserved for
/// this engine's endpoint.
pub trait EndpointRegistry: Send {
    /// Look up the local endpoint's ring depths.
    ///
    /// Fails with [`EndpointUnavailable`](crate::PamError::EndpointUnavailable)
    /// if the endpoint is not provisioned.
    fn endpoint_info(&mut self) -> PamResult<EndpointInfo>;
}

/// Physically-contiguous shared-memory allocator.
///
/// Buffers allocated here are visible to both processors; addresses are
/// bus addresses, not pointers.
pub trait SharedMemPool: Send {
    /// Allocate `len` contiguous bytes. `None` when the pool is exhausted.
    fn alloc(&mut self, len: usize) -> Option<u64>;

    /// Return an allocation to the pool.
    fn free(&mut self, addr: u64, len: usize);
}

/// Phase marker for the two-sided disconnect handshake.
///
/// `Start` is signaled before hardware is reprogrammed, `End` after, so no
/// in-flight packet handoff overlaps inconsistent register state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectPhase {
    /// Quiesce: stop handing packets to the engine.
    Start,
    /// Drained: engine parked, handoff may not resume until reconnect.
    End,
}

/// Data-path connect/disconnect handshake with the messaging subsystem.
pub trait DataPath: Send {
    /// Signal one phase of the disconnect handshake.
    fn disconnect(&mut self, phase: DisconnectPhase);

    /// Connect the data path using negotiated parameters.
    fn connect(&mut self, params: &ConnectionParams) -> PamResult<()>;
}
