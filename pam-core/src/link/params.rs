//! Negotiated connection parameters.

use pam_hal::{FifoParams, HwInitConfig, RingGeometry};

use crate::config::PamConfig;

/// Local endpoint ring depths reported by the platform registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndpointInfo {
    /// Uplink (companion -> AP) ring depth.
    pub ul_depth: u32,
    /// Downlink (AP -> companion) ring depth.
    pub dl_depth: u32,
}

/// Remote ring geometry supplied by the companion processor at readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteRingConfig {
    /// Companion's downlink ring.
    pub dl: RingGeometry,
    /// Companion's uplink ring.
    pub ul: RingGeometry,
}

/// Everything the data-path connect handshake and hardware init consume.
///
/// Created at most once per attach by the connection negotiator; a repeated
/// companion-readiness signal only refreshes [`remote`](Self::remote).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionParams {
    /// Downlink FIFO programming (buffer pool, watermarks, moderation).
    pub send: FifoParams,
    /// Uplink FIFO programming.
    pub recv: FifoParams,
    /// Downlink buffer pool base address.
    pub dl_base: u64,
    /// Downlink buffer pool length in bytes.
    pub dl_len: usize,
    /// Uplink buffer pool base address.
    pub ul_base: u64,
    /// Uplink buffer pool length in bytes.
    pub ul_len: usize,
    /// Local endpoint ring depths.
    pub local: EndpointInfo,
    /// Remote ring geometry (refreshed on every readiness signal).
    pub remote: RemoteRingConfig,
}

impl ConnectionParams {
    /// Assemble the hardware init configuration.
    pub fn hw_init_config(&self, cfg: &PamConfig) -> HwInitConfig {
        HwInitConfig {
            send: self.send,
            recv: self.recv,
            remote_dl: self.remote.dl,
            remote_ul: self.remote.ul,
            pcie_offset: cfg.pcie_offset,
            pcie_rc_base: cfg.pcie_rc_base,
        }
    }
}
