//! Control-plane configuration.
//!
//! Everything the platform integration would normally read from the device
//! tree: per-direction interrupt moderation, buffer sizing, retry pacing and
//! the PCIe address-mapping constants programmed into the engine at init.
//!
//! Flow-control watermarks are NOT configurable — they are derived from the
//! negotiated ring depth by the connection negotiator (enter at 3/4 depth,
//! exit at 1/2 depth).

/// Default size of one shared buffer slot in bytes (MTU plus descriptor
/// headroom).
pub const DEFAULT_BUF_SIZE: u32 = 1664;

/// Default resume retry backoff in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 200;

/// Per-direction interrupt moderation parameters.
#[derive(Debug, Clone, Copy)]
pub struct FifoTuning {
    /// Route this direction's interrupts to the AP.
    pub intr_to_ap: u32,
    /// Transfer-count interrupt threshold.
    pub intr_threshold: u32,
    /// Interrupt delay in microseconds.
    pub intr_delay_us: u32,
}

impl Default for FifoTuning {
    fn default() -> Self {
        Self {
            intr_to_ap: 0,
            intr_threshold: 64,
            intr_delay_us: 200,
        }
    }
}

/// Control-plane configuration.
#[derive(Debug, Clone, Copy)]
pub struct PamConfig {
    /// Size of one shared buffer slot in bytes.
    pub buf_size: u32,
    /// Delay between resume retries in milliseconds.
    pub retry_delay_ms: u64,
    /// Uplink (companion -> AP) interrupt moderation.
    pub ul: FifoTuning,
    /// Downlink (AP -> companion) interrupt moderation.
    pub dl: FifoTuning,
    /// DDR mapping offset for PCIe-visible addresses.
    pub pcie_offset: u64,
    /// PCIe root-complex base address.
    pub pcie_rc_base: u64,
}

impl Default for PamConfig {
    fn default() -> Self {
        Self {
            buf_size: DEFAULT_BUF_SIZE,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            ul: FifoTuning::default(),
            dl: FifoTuning::default(),
            pcie_offset: 0,
            pcie_rc_base: 0,
        }
    }
}

impl PamConfig {
    /// Set the shared buffer slot size.
    pub fn buf_size(mut self, bytes: u32) -> Self {
        self.buf_size = bytes;
        self
    }

    /// Set the resume retry backoff.
    pub fn retry_delay(mut self, ms: u64) -> Self {
        self.retry_delay_ms = ms;
        self
    }

    /// Set uplink interrupt moderation.
    pub fn ul_tuning(mut self, tuning: FifoTuning) -> Self {
        self.ul = tuning;
        self
    }

    /// Set downlink interrupt moderation.
    pub fn dl_tuning(mut self, tuning: FifoTuning) -> Self {
        self.dl = tuning;
        self
    }

    /// Set the PCIe address mapping (DDR offset and root-complex base).
    pub fn pcie_mapping(mut self, offset: u64, rc_base: u64) -> Self {
        self.pcie_offset = offset;
        self.pcie_rc_base = rc_base;
        self
    }
}
