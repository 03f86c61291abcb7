//! Hardware capability boundary for the PAM packet-acceleration engine.
//!
//! The control plane (`pam-core`) never touches registers itself. Everything
//! hardware-facing goes through the two traits in this crate:
//!
//! - [`PamHardware`] — the acceleration engine proper: clock/power enable
//!   bit, soft/hard resume, start status, one-time register init.
//! - [`PowerDomain`] — the platform power-domain hold that keeps the engine's
//!   domain out of deep sleep while the data path is up.
//!
//! Implementations live with the platform integration (regmap/MMIO code),
//! not here. This crate only carries the plain-data configuration types the
//! init path is programmed from.
//!
//! # Design
//!
//! - Zero dependencies, no_std, no alloc
//! - Traits are `Send` so the orchestration worker can own them
//! - Config types are plain `Copy` data, safe to hand across the boundary

#![no_std]

// ============================================================================
// Errors
// ============================================================================

/// Hardware-layer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// One-time register initialization failed.
    InitFailed,
    /// Power-domain hold/release was rejected by the platform.
    PowerDomain,
}

impl HalError {
    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InitFailed => "PAM register initialization failed",
            Self::PowerDomain => "Power-domain operation rejected",
        }
    }
}

// ============================================================================
// Configuration types
// ============================================================================

/// Geometry of one shared-memory ring endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingGeometry {
    /// Number of ring slots.
    pub depth: u32,
    /// Size of one buffer slot in bytes.
    pub buf_size: u32,
    /// Base address of the ring's buffer pool.
    pub base_addr: u64,
}

/// Per-direction FIFO programming parameters.
///
/// One of these per direction (send = downlink towards the companion,
/// recv = uplink towards the AP). Interrupt moderation fields come from the
/// control plane's configuration; watermarks and buffer pointers are filled
/// in by the connection negotiator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoParams {
    /// Route this direction's interrupts to the AP.
    pub intr_to_ap: u32,
    /// Transfer-count interrupt threshold.
    pub tx_intr_threshold: u32,
    /// Interrupt delay in microseconds.
    pub tx_intr_delay_us: u32,
    /// Flow-control mode selector.
    pub flow_ctrl_cfg: u32,
    /// Flow-control interrupt mode.
    pub flow_ctrl_irq_mode: u32,
    /// Queue occupancy at which flow control is asserted.
    pub tx_enter_flowctrl_watermark: u32,
    /// Queue occupancy at which flow control is released.
    pub tx_leave_flowctrl_watermark: u32,
    /// Receive-side flow-control assert watermark.
    pub rx_enter_flowctrl_watermark: u32,
    /// Base address of this direction's buffer pool.
    pub data_ptr: u64,
    /// Number of buffers in the pool.
    pub data_ptr_cnt: u32,
    /// Size of one buffer in bytes.
    pub buf_size: u32,
}

/// Everything the one-time hardware init sequence is programmed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwInitConfig {
    /// Downlink (AP -> companion) FIFO parameters.
    pub send: FifoParams,
    /// Uplink (companion -> AP) FIFO parameters.
    pub recv: FifoParams,
    /// Remote downlink ring as reported by the companion.
    pub remote_dl: RingGeometry,
    /// Remote uplink ring as reported by the companion.
    pub remote_ul: RingGeometry,
    /// DDR mapping offset for PCIe-visible addresses.
    pub pcie_offset: u64,
    /// PCIe root-complex base address.
    pub pcie_rc_base: u64,
}

// ============================================================================
// Capability traits
// ============================================================================

/// The acceleration engine's control surface.
///
/// Mirrors the register-level operation set: enable bit, resume strobe,
/// start status, one-time init. Implementations wrap the actual regmap;
/// the control plane calls these in a fixed order and never concurrently
/// (single-worker discipline).
pub trait PamHardware: Send {
    /// Toggle the engine's clock/power enable bit.
    fn enable(&mut self, on: bool);

    /// Resume strobe. `hard = false` parks the engine for suspend,
    /// `hard = true` restarts a previously-initialized engine.
    fn resume(&mut self, hard: bool);

    /// Whether the engine has been started since its last reset.
    fn get_start_status(&self) -> bool;

    /// One-time register initialization from negotiated ring geometry.
    fn init(&mut self, cfg: &HwInitConfig) -> Result<(), HalError>;
}

/// Platform power-domain hold for the engine's domain.
///
/// `hold` must be balanced by `release`. The orchestrator treats a failed
/// `hold` as retryable and a failed `release` as best-effort.
pub trait PowerDomain: Send {
    /// Acquire the power-domain hold (blocks deeper system sleep).
    fn hold(&mut self) -> Result<(), HalError>;

    /// Release the power-domain hold.
    fn release(&mut self) -> Result<(), HalError>;
}
