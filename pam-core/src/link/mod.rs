//! Data-path link establishment.
//!
//! One-time negotiation of local/remote ring geometry and shared buffer
//! allocation, plus the boundary traits to the platform's endpoint registry,
//! shared-memory allocator and inter-processor messaging subsystem. The
//! negotiator produces a [`ConnectionParams`] value that the power
//! orchestrator hands to the data-path connect handshake and to hardware
//! init.
//!
//! The negotiator is idempotent: the companion processor may restart and
//! signal readiness again; only the first signal allocates.

mod boundary;
mod negotiator;
mod params;

pub use boundary::{DataPath, DisconnectPhase, EndpointRegistry, SharedMemPool};
pub use negotiator::ConnectionNegotiator;
pub use params::{ConnectionParams, EndpointInfo, RemoteRingConfig};
