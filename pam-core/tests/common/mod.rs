//! Common test utilities: recording mock collaborators.
//!
//! All mocks append to one shared operation log so tests can assert the
//! exact interleaving of hardware, data-path and power-domain calls.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use pam_core::config::PamConfig;
use pam_core::error::PamResult;
use pam_core::link::{
    ConnectionParams, DataPath, DisconnectPhase, EndpointInfo, EndpointRegistry,
    RemoteRingConfig, SharedMemPool,
};
use pam_core::power::{PowerOrchestrator, SharedState};
use pam_core::rm::{ResourceEvent, ResourceManager};
use pam_core::PamError;
use pam_hal::{HalError, HwInitConfig, PamHardware, PowerDomain, RingGeometry};

/// One recorded collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    DisconnectStart,
    DisconnectEnd,
    HwResume(bool),
    Enable(bool),
    Init,
    Connect,
    DomainHold,
    DomainRelease,
}

pub type OpLog = Arc<Mutex<Vec<Op>>>;

fn push(log: &OpLog, op: Op) {
    log.lock().unwrap().push(op);
}

// ----------------------------------------------------------------------
// Hardware
// ----------------------------------------------------------------------

pub struct MockHardware {
    pub log: OpLog,
    /// Start status; set by a successful init, survives a brief suspend.
    pub started: Arc<AtomicBool>,
    pub fail_init: Arc<AtomicBool>,
}

impl PamHardware for MockHardware {
    fn enable(&mut self, on: bool) {
        push(&self.log, Op::Enable(on));
    }

    fn resume(&mut self, hard: bool) {
        push(&self.log, Op::HwResume(hard));
    }

    fn get_start_status(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn init(&mut self, _cfg: &HwInitConfig) -> Result<(), HalError> {
        push(&self.log, Op::Init);
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(HalError::InitFailed);
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Power domain
// ----------------------------------------------------------------------

/// Optional rendezvous: `hold()` reports entry then blocks until released.
pub struct HoldGate {
    pub entered: mpsc::Sender<()>,
    pub go: mpsc::Receiver<()>,
}

pub struct MockPowerDomain {
    pub log: OpLog,
    pub fail_hold: Arc<AtomicBool>,
    pub fail_release: Arc<AtomicBool>,
    pub gate: Option<HoldGate>,
}

impl PowerDomain for MockPowerDomain {
    fn hold(&mut self) -> Result<(), HalError> {
        if let Some(gate) = &self.gate {
            let _ = gate.entered.send(());
            let _ = gate.go.recv();
        }
        push(&self.log, Op::DomainHold);
        if self.fail_hold.load(Ordering::SeqCst) {
            return Err(HalError::PowerDomain);
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), HalError> {
        push(&self.log, Op::DomainRelease);
        if self.fail_release.load(Ordering::SeqCst) {
            return Err(HalError::PowerDomain);
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Data path
// ----------------------------------------------------------------------

pub struct MockDataPath {
    pub log: OpLog,
    pub fail_connect: Arc<AtomicBool>,
    pub last_params: Arc<Mutex<Option<ConnectionParams>>>,
}

impl DataPath for MockDataPath {
    fn disconnect(&mut self, phase: DisconnectPhase) {
        let op = match phase {
            DisconnectPhase::Start => Op::DisconnectStart,
            DisconnectPhase::End => Op::DisconnectEnd,
        };
        push(&self.log, op);
    }

    fn connect(&mut self, params: &ConnectionParams) -> PamResult<()> {
        push(&self.log, Op::Connect);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(PamError::ConnectFailed);
        }
        *self.last_params.lock().unwrap() = Some(*params);
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Endpoint registry and shared-memory pool
// ----------------------------------------------------------------------

pub struct MockRegistry {
    pub info: EndpointInfo,
    pub fail: bool,
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self {
            info: EndpointInfo {
                ul_depth: 64,
                dl_depth: 64,
            },
            fail: false,
        }
    }
}

impl EndpointRegistry for MockRegistry {
    fn endpoint_info(&mut self) -> PamResult<EndpointInfo> {
        if self.fail {
            return Err(PamError::EndpointUnavailable);
        }
        Ok(self.info)
    }
}

pub struct MockPool {
    pub next_addr: u64,
    /// Allocations allowed before the pool reports exhaustion.
    pub remaining: usize,
    pub outstanding: Arc<Mutex<Vec<(u64, usize)>>>,
    pub total_allocs: Arc<AtomicUsize>,
}

impl Default for MockPool {
    fn default() -> Self {
        Self {
            next_addr: 0x1000_0000,
            remaining: usize::MAX,
            outstanding: Arc::new(Mutex::new(Vec::new())),
            total_allocs: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl SharedMemPool for MockPool {
    fn alloc(&mut self, len: usize) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let addr = self.next_addr;
        self.next_addr += len as u64;
        self.outstanding.lock().unwrap().push((addr, len));
        self.total_allocs.fetch_add(1, Ordering::SeqCst);
        Some(addr)
    }

    fn free(&mut self, addr: u64, len: usize) {
        self.outstanding
            .lock()
            .unwrap()
            .retain(|&(a, l)| !(a == addr && l == len));
    }
}

// ----------------------------------------------------------------------
// Resource manager
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct MockResourceManager {
    pub granted: Arc<AtomicUsize>,
    pub created: Arc<Mutex<Vec<&'static str>>>,
    pub deleted: Arc<Mutex<Vec<&'static str>>>,
    pub deps_added: Arc<Mutex<Vec<(&'static str, &'static str)>>>,
    pub deps_deleted: Arc<Mutex<Vec<(&'static str, &'static str)>>>,
    pub fail_create: bool,
    /// Consumer whose dependency edge fails to add.
    pub fail_dep_for: Option<&'static str>,
}

impl ResourceManager for MockResourceManager {
    fn create_resource(&mut self, producer: &'static str) -> PamResult<()> {
        if self.fail_create {
            return Err(PamError::ResourceManager);
        }
        self.created.lock().unwrap().push(producer);
        Ok(())
    }

    fn delete_resource(&mut self, producer: &'static str) {
        self.deleted.lock().unwrap().push(producer);
    }

    fn add_dependency(&mut self, consumer: &'static str, producer: &'static str) -> PamResult<()> {
        if self.fail_dep_for == Some(consumer) {
            return Err(PamError::ResourceManager);
        }
        self.deps_added.lock().unwrap().push((consumer, producer));
        Ok(())
    }

    fn delete_dependency(&mut self, consumer: &'static str, producer: &'static str) {
        self.deps_deleted.lock().unwrap().push((consumer, producer));
    }

    fn notify_completion(&mut self, event: ResourceEvent, _producer: &'static str) {
        assert_eq!(event, ResourceEvent::Granted);
        self.granted.fetch_add(1, Ordering::SeqCst);
    }
}

// ----------------------------------------------------------------------
// Assembled rig for synchronous state-machine tests
// ----------------------------------------------------------------------

/// Orchestrator plus probes into every mock, driven without the worker.
pub struct Rig {
    pub shared: SharedState,
    pub orch: PowerOrchestrator<MockHardware, MockPowerDomain, MockDataPath, MockResourceManager>,
    pub log: OpLog,
    pub granted: Arc<AtomicUsize>,
    pub started: Arc<AtomicBool>,
    pub fail_hold: Arc<AtomicBool>,
    pub fail_release: Arc<AtomicBool>,
    pub fail_connect: Arc<AtomicBool>,
    pub fail_init: Arc<AtomicBool>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(PamConfig::default())
    }

    pub fn with_config(cfg: PamConfig) -> Self {
        let log: OpLog = Arc::new(Mutex::new(Vec::new()));
        let started = Arc::new(AtomicBool::new(false));
        let fail_hold = Arc::new(AtomicBool::new(false));
        let fail_release = Arc::new(AtomicBool::new(false));
        let fail_connect = Arc::new(AtomicBool::new(false));
        let fail_init = Arc::new(AtomicBool::new(false));
        let granted = Arc::new(AtomicUsize::new(0));

        let hardware = MockHardware {
            log: Arc::clone(&log),
            started: Arc::clone(&started),
            fail_init: Arc::clone(&fail_init),
        };
        let domain = MockPowerDomain {
            log: Arc::clone(&log),
            fail_hold: Arc::clone(&fail_hold),
            fail_release: Arc::clone(&fail_release),
            gate: None,
        };
        let data_path = MockDataPath {
            log: Arc::clone(&log),
            fail_connect: Arc::clone(&fail_connect),
            last_params: Arc::new(Mutex::new(None)),
        };
        let rm = MockResourceManager {
            granted: Arc::clone(&granted),
            ..MockResourceManager::default()
        };

        Self {
            shared: SharedState::new(cfg),
            orch: PowerOrchestrator::new(cfg, hardware, domain, data_path, rm),
            log,
            granted,
            started,
            fail_hold,
            fail_release,
            fail_connect,
            fail_init,
        }
    }

    /// Deliver a companion-readiness signal with default geometry.
    pub fn make_ready(&self) {
        let mut registry = MockRegistry::default();
        let mut pool = MockPool::default();
        self.shared
            .link()
            .lock()
            .on_companion_ready(&sample_remote(), &mut registry, &mut pool)
            .expect("readiness signal failed");
    }

    /// Snapshot of the operation log.
    pub fn ops(&self) -> Vec<Op> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn granted_count(&self) -> usize {
        self.granted.load(Ordering::SeqCst)
    }
}

/// Remote geometry a companion would report.
pub fn sample_remote() -> RemoteRingConfig {
    RemoteRingConfig {
        dl: RingGeometry {
            depth: 64,
            buf_size: 1664,
            base_addr: 0x8000_0000,
        },
        ul: RingGeometry {
            depth: 64,
            buf_size: 1664,
            base_addr: 0x8100_0000,
        },
    }
}

/// Poll until `cond` holds or the timeout passes.
pub fn wait_for(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}
