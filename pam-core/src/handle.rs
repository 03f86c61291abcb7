//! Attach-lifetime handle.
//!
//! One [`PamHandle`] per device attach. It wires the state machine to the
//! worker, registers the producer resource with the dependency manager and
//! exposes the three externally-driven entry points: the two resource
//! callbacks and the companion-readiness signal. Dropping the handle (or
//! calling [`detach`](PamHandle::detach)) stops the worker; no further
//! orchestration can be scheduled afterwards.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pam_hal::{PamHardware, PowerDomain};

use crate::config::PamConfig;
use crate::error::PamResult;
use crate::link::{DataPath, EndpointRegistry, RemoteRingConfig, SharedMemPool};
use crate::power::{PowerOrchestrator, PowerState, PowerWorker, SharedState, SuspendStages};
use crate::rm::{self, RequestStatus, ResourceManager};

/// Owner of everything with attach lifetime: worker, shared state and the
/// negotiation collaborators.
pub struct PamHandle<E, M> {
    shared: Arc<SharedState>,
    worker: PowerWorker,
    // Registry and pool are only touched from the readiness entry point.
    negotiation: Mutex<(E, M)>,
}

impl<E, M> PamHandle<E, M>
where
    E: EndpointRegistry,
    M: SharedMemPool,
{
    /// Attach: register the producer resource, then start the worker.
    ///
    /// The device starts fully suspended; nothing runs until the resource
    /// manager signals demand.
    pub fn attach<H, PD, DP, RM>(
        cfg: PamConfig,
        hardware: H,
        domain: PD,
        data_path: DP,
        mut resource_mgr: RM,
        registry: E,
        pool: M,
    ) -> PamResult<Self>
    where
        H: PamHardware + 'static,
        PD: PowerDomain + 'static,
        DP: DataPath + 'static,
        RM: ResourceManager + 'static,
    {
        rm::register_producer(&mut resource_mgr)?;

        let shared = Arc::new(SharedState::new(cfg));
        let orchestrator = PowerOrchestrator::new(cfg, hardware, domain, data_path, resource_mgr);
        let worker = PowerWorker::spawn(
            orchestrator,
            Arc::clone(&shared),
            Duration::from_millis(cfg.retry_delay_ms),
        );

        Ok(Self {
            shared,
            worker,
            negotiation: Mutex::new((registry, pool)),
        })
    }

    /// Resource-manager request callback: demand up, schedule a pass.
    /// Always pending; the grant arrives via `notify_completion`.
    pub fn request_resource(&self) -> RequestStatus {
        self.shared.set_demand(true);
        self.worker.kick();
        RequestStatus::Pending
    }

    /// Resource-manager release callback: demand down, schedule a pass.
    /// Fire-and-forget.
    pub fn release_resource(&self) {
        self.shared.set_demand(false);
        self.worker.kick();
    }

    /// Companion-readiness entry point, called by the transport once per
    /// companion boot. Idempotent.
    pub fn on_companion_ready(&self, remote: &RemoteRingConfig) -> PamResult<()> {
        let mut guard = self
            .negotiation
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let (registry, pool) = &mut *guard;
        self.shared
            .link()
            .lock()
            .on_companion_ready(remote, registry, pool)
    }

    /// Last published stage snapshot.
    pub fn stages(&self) -> SuspendStages {
        self.shared.stages()
    }

    /// Derived power state of the last published snapshot.
    pub fn power_state(&self) -> PowerState {
        self.shared.power_state()
    }

    /// Whether the connection has been established.
    pub fn connection_established(&self) -> bool {
        self.shared.link().lock().is_established()
    }

    /// Detach: stop the worker, waiting for a pass in flight.
    pub fn detach(mut self) {
        self.worker.shutdown();
    }
}
