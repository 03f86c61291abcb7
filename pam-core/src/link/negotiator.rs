//! Connection negotiator.
//!
//! Handles the companion-readiness signal: on the first signal it negotiates
//! local ring geometry with the endpoint registry, allocates the two shared
//! buffer pools and derives the flow-control watermarks; later signals only
//! refresh the remote geometry (companion restart). Allocation and
//! negotiation failures surface to the caller; retry is the orchestrator's
//! business, never done here.

use crate::config::PamConfig;
use crate::error::{PamError, PamResult};
use crate::link::boundary::{EndpointRegistry, SharedMemPool};
use crate::link::params::{ConnectionParams, RemoteRingConfig};
use crate::trace::{trace_debug, trace_warn, TraceStage};

/// Negotiates and owns the connection parameters for one attach.
pub struct ConnectionNegotiator {
    cfg: PamConfig,
    established: bool,
    params: ConnectionParams,
}

impl ConnectionNegotiator {
    /// Create a negotiator; nothing is allocated until the companion
    /// signals readiness.
    pub fn new(cfg: PamConfig) -> Self {
        Self {
            cfg,
            established: false,
            params: ConnectionParams::default(),
        }
    }

    /// Whether the connection has been established.
    pub fn is_established(&self) -> bool {
        self.established
    }

    /// Negotiated parameters, once established.
    pub fn params(&self) -> Option<&ConnectionParams> {
        self.established.then_some(&self.params)
    }

    /// Companion-readiness entry point. Idempotent: only the first call
    /// allocates; every call refreshes the remote geometry.
    pub fn on_companion_ready(
        &mut self,
        remote: &RemoteRingConfig,
        registry: &mut dyn EndpointRegistry,
        pool: &mut dyn SharedMemPool,
    ) -> PamResult<()> {
        self.params.remote = *remote;

        if self.established {
            trace_debug(TraceStage::Negotiate, "remote geometry refreshed");
            return Ok(());
        }

        self.connect(registry, pool)
    }

    /// One-time negotiation and buffer allocation.
    fn connect(
        &mut self,
        registry: &mut dyn EndpointRegistry,
        pool: &mut dyn SharedMemPool,
    ) -> PamResult<()> {
        let info = registry.endpoint_info().map_err(|e| {
            trace_warn(TraceStage::Negotiate, "local endpoint lookup failed");
            e
        })?;

        let buf_size = self.cfg.buf_size;
        let dl_len = info.dl_depth as usize * buf_size as usize;
        let ul_len = info.ul_depth as usize * buf_size as usize;

        let dl_base = pool.alloc(dl_len).ok_or_else(|| {
            trace_warn(TraceStage::Negotiate, "downlink pool allocation failed");
            PamError::OutOfMemory
        })?;
        let ul_base = match pool.alloc(ul_len) {
            Some(addr) => addr,
            None => {
                // No partial leak: give the downlink pool back.
                pool.free(dl_base, dl_len);
                trace_warn(TraceStage::Negotiate, "uplink pool allocation failed");
                return Err(PamError::OutOfMemory);
            }
        };

        let p = &mut self.params;
        p.local = info;
        p.dl_base = dl_base;
        p.dl_len = dl_len;
        p.ul_base = ul_base;
        p.ul_len = ul_len;

        // Interrupt moderation comes from configuration.
        p.send.intr_to_ap = self.cfg.dl.intr_to_ap;
        p.send.tx_intr_threshold = self.cfg.dl.intr_threshold;
        p.send.tx_intr_delay_us = self.cfg.dl.intr_delay_us;
        p.recv.intr_to_ap = self.cfg.ul.intr_to_ap;
        p.recv.tx_intr_threshold = self.cfg.ul.intr_threshold;
        p.recv.tx_intr_delay_us = self.cfg.ul.intr_delay_us;

        // Flow control is fixed policy, derived from the uplink depth:
        // assert backpressure at 3/4 occupancy, release at 1/2.
        let depth = info.ul_depth;
        p.send.flow_ctrl_irq_mode = 2;
        p.recv.flow_ctrl_cfg = 1;
        p.recv.tx_enter_flowctrl_watermark = depth - depth / 4;
        p.recv.tx_leave_flowctrl_watermark = depth / 2;
        p.recv.rx_enter_flowctrl_watermark = depth / 2;

        p.send.data_ptr = dl_base;
        p.send.data_ptr_cnt = info.dl_depth;
        p.send.buf_size = buf_size;

        p.recv.data_ptr = ul_base;
        p.recv.data_ptr_cnt = info.ul_depth;
        p.recv.buf_size = buf_size;

        self.established = true;
        trace_debug(TraceStage::Negotiate, "connection established");

        Ok(())
    }
}
