//! Suspend/resume state machine.
//!
//! Runs exclusively on the power worker. Walks the suspend ladder stage by
//! stage, skipping stages already recorded, and the resume ladder in exact
//! reverse. The only state it shares with other contexts is [`SharedState`]:
//! the atomic demand flag, a published stage snapshot, and the mutex-guarded
//! link state written by the companion-readiness entry point.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use pam_hal::{PamHardware, PowerDomain};
use spin::Mutex;

use crate::config::PamConfig;
use crate::error::{PamError, PamResult};
use crate::link::{ConnectionNegotiator, DataPath, DisconnectPhase};
use crate::power::stages::{PowerState, SuspendStages};
use crate::rm::{ResourceEvent, ResourceManager, RES_PROD_PAM};
use crate::trace::{trace_debug, trace_warn, TraceStage};

/// State shared between the worker, the resource callbacks and the
/// companion-readiness entry point.
pub struct SharedState {
    /// True while at least one consumer needs the data path. Written only
    /// by the request/release callbacks, read only by the worker.
    demand: AtomicBool,
    /// Published stage snapshot; written only by the worker.
    stage_bits: AtomicU8,
    /// Link state; written by the readiness entry point, read by the worker.
    link: Mutex<ConnectionNegotiator>,
}

impl SharedState {
    /// Fresh shared state for one attach: fully suspended, no demand.
    pub fn new(cfg: PamConfig) -> Self {
        Self {
            demand: AtomicBool::new(false),
            stage_bits: AtomicU8::new(SuspendStages::attached().to_bits()),
            link: Mutex::new(ConnectionNegotiator::new(cfg)),
        }
    }

    /// Current power demand.
    pub fn demand(&self) -> bool {
        self.demand.load(Ordering::Acquire)
    }

    /// Set power demand (request/release callbacks only).
    pub fn set_demand(&self, on: bool) {
        self.demand.store(on, Ordering::Release);
    }

    /// Last published stage snapshot.
    pub fn stages(&self) -> SuspendStages {
        SuspendStages::from_bits(self.stage_bits.load(Ordering::Acquire))
    }

    /// Derived power state of the last published snapshot.
    pub fn power_state(&self) -> PowerState {
        self.stages().power_state()
    }

    /// The guarded link state.
    pub fn link(&self) -> &Mutex<ConnectionNegotiator> {
        &self.link
    }

    fn publish_stages(&self, stages: SuspendStages) {
        self.stage_bits.store(stages.to_bits(), Ordering::Release);
    }
}

/// Outcome of one serialized orchestration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Demand dropped mid-failure; nothing left to do.
    Idle,
    /// Suspend sequence ran.
    Suspended,
    /// Resume sequence completed; grant was notified.
    Resumed,
    /// Resume failed with demand still up; re-run after the backoff.
    RetryResume,
}

/// The suspend/resume state machine. One instance per attach, owned by the
/// power worker.
pub struct PowerOrchestrator<H, PD, DP, RM> {
    cfg: PamConfig,
    hardware: H,
    domain: PD,
    data_path: DP,
    rm: RM,
    stages: SuspendStages,
}

impl<H, PD, DP, RM> PowerOrchestrator<H, PD, DP, RM>
where
    H: PamHardware,
    PD: PowerDomain,
    DP: DataPath,
    RM: ResourceManager,
{
    /// Create the state machine in the attach state (fully suspended).
    pub fn new(cfg: PamConfig, hardware: H, domain: PD, data_path: DP, rm: RM) -> Self {
        Self {
            cfg,
            hardware,
            domain,
            data_path,
            rm,
            stages: SuspendStages::attached(),
        }
    }

    /// Current stage tracker.
    pub fn stages(&self) -> SuspendStages {
        self.stages
    }

    /// One serialized pass: re-read demand, run the matching sequence.
    pub fn run_once(&mut self, shared: &SharedState) -> RunOutcome {
        if shared.demand() {
            match self.prepare_resume(shared) {
                Ok(()) => RunOutcome::Resumed,
                Err(e) => {
                    if e.is_retryable() {
                        trace_warn(TraceStage::Resume, "resume failed, retrying");
                    } else {
                        trace_warn(TraceStage::Resume, e.description());
                    }
                    // A release that arrived in the meantime wins.
                    if shared.demand() {
                        RunOutcome::RetryResume
                    } else {
                        RunOutcome::Idle
                    }
                }
            }
        } else {
            self.prepare_suspend(shared);
            RunOutcome::Suspended
        }
    }

    /// Staged suspend: park data path, power off, release the domain hold.
    ///
    /// Infallible by design: every stage either succeeds or is recorded as
    /// done anyway (the domain release is best-effort).
    pub fn prepare_suspend(&mut self, shared: &SharedState) {
        if !self.stages.data_path_suspended() {
            // Disconnect-start before touching registers, disconnect-end
            // after: no packet handoff overlaps inconsistent state.
            self.data_path.disconnect(DisconnectPhase::Start);
            self.hardware.resume(false);
            self.record(shared, SuspendStages::mark_data_path_suspended);
            self.data_path.disconnect(DisconnectPhase::End);
            trace_debug(TraceStage::Suspend, "data path parked");
        }

        if !self.stages.power_disabled() {
            self.hardware.enable(false);
            self.record(shared, SuspendStages::mark_power_disabled);
            trace_debug(TraceStage::Suspend, "engine power disabled");
        }

        if !self.stages.force_suspended() {
            if self.domain.release().is_err() {
                // Best-effort: the stage is marked regardless.
                trace_warn(TraceStage::Suspend, "power-domain release failed");
            }
            self.record(shared, SuspendStages::mark_force_suspended);
            trace_debug(TraceStage::Suspend, "power-domain hold released");
        }
    }

    /// Staged resume, mirror order of suspend. Any error leaves the
    /// remaining stages set; the caller schedules the retry.
    pub fn prepare_resume(&mut self, shared: &SharedState) -> PamResult<()> {
        if self.stages.force_suspended() {
            if self.domain.hold().is_err() {
                trace_warn(TraceStage::Resume, "power-domain hold failed");
                return Err(PamError::PowerDomain);
            }
            self.stages.clear_force_suspended()?;
            shared.publish_stages(self.stages);
        }

        if self.stages.power_disabled() {
            self.hardware.enable(true);
            self.stages.clear_power_disabled()?;
            shared.publish_stages(self.stages);
        }

        if self.stages.data_path_suspended() {
            let params = {
                let link = shared.link().lock();
                match link.params() {
                    Some(p) => *p,
                    None => {
                        trace_warn(TraceStage::Resume, "companion not ready");
                        return Err(PamError::NotReady);
                    }
                }
            };

            if !self.hardware.get_start_status() {
                self.data_path.connect(&params)?;
                self.hardware.init(&params.hw_init_config(&self.cfg))?;
                trace_debug(TraceStage::Resume, "cold start: data path connected");
            } else {
                // Warm resume: hardware kept its state, skip full init.
                self.data_path.connect(&params)?;
                self.hardware.resume(true);
                trace_debug(TraceStage::Resume, "warm resume: data path reconnected");
            }

            self.stages.clear_data_path_suspended()?;
            shared.publish_stages(self.stages);
        }

        // Consumers wait on this even when every stage was already clear.
        self.rm
            .notify_completion(ResourceEvent::Granted, RES_PROD_PAM);
        Ok(())
    }

    fn record(
        &mut self,
        shared: &SharedState,
        transition: fn(&mut SuspendStages) -> PamResult<()>,
    ) {
        if transition(&mut self.stages).is_err() {
            trace_warn(TraceStage::Suspend, "stage transition out of order");
        }
        shared.publish_stages(self.stages);
    }
}
