//! Suspend stage tracker.
//!
//! The suspend sequence moves through three independently-recorded stages in
//! a fixed order (data path parked, power disabled, power domain released);
//! resume undoes them most-recently-suspended first. The tracker enforces
//! that ladder: a stage can only be marked when the previous suspend stage is
//! already marked, and only cleared when the deeper resume stages have been
//! cleared. Out-of-order transitions are rejected, not silently applied.
//!
//! At attach time all three stages are set: the device starts fully
//! suspended and uninitialized.

use crate::error::{PamError, PamResult};

/// Derived view of the suspend ladder.
///
/// Resume walks top to bottom; suspend walks bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// All three stages set; deepest sleep, hardware may be unpowered.
    FullySuspended,
    /// Power-domain hold acquired, engine still unpowered.
    DomainHeld,
    /// Engine powered and clocked, data path still parked.
    PowerOn,
    /// Data path connected; packets flow.
    Operational,
}

/// Tracker for the three suspend stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspendStages {
    data_path_suspended: bool,
    power_disabled: bool,
    force_suspended: bool,
}

impl SuspendStages {
    /// State at attach: fully suspended.
    pub const fn attached() -> Self {
        Self {
            data_path_suspended: true,
            power_disabled: true,
            force_suspended: true,
        }
    }

    /// Fully-resumed state (test convenience).
    pub const fn operational() -> Self {
        Self {
            data_path_suspended: false,
            power_disabled: false,
            force_suspended: false,
        }
    }

    /// Data path parked?
    pub fn data_path_suspended(&self) -> bool {
        self.data_path_suspended
    }

    /// Engine power/clock disabled?
    pub fn power_disabled(&self) -> bool {
        self.power_disabled
    }

    /// Power-domain hold released?
    pub fn force_suspended(&self) -> bool {
        self.force_suspended
    }

    /// Derived power state.
    pub fn power_state(&self) -> PowerState {
        if !self.data_path_suspended {
            PowerState::Operational
        } else if !self.power_disabled {
            PowerState::PowerOn
        } else if !self.force_suspended {
            PowerState::DomainHeld
        } else {
            PowerState::FullySuspended
        }
    }

    // ------------------------------------------------------------------
    // Suspend direction: data path -> power -> force
    // ------------------------------------------------------------------

    /// Record the data path as parked. First suspend stage.
    pub fn mark_data_path_suspended(&mut self) -> PamResult<()> {
        if self.data_path_suspended || self.power_disabled || self.force_suspended {
            return Err(PamError::StageOrder);
        }
        self.data_path_suspended = true;
        Ok(())
    }

    /// Record engine power as disabled. Requires the data path parked.
    pub fn mark_power_disabled(&mut self) -> PamResult<()> {
        if self.power_disabled || !self.data_path_suspended || self.force_suspended {
            return Err(PamError::StageOrder);
        }
        self.power_disabled = true;
        Ok(())
    }

    /// Record the power-domain hold as released. Deepest suspend stage.
    pub fn mark_force_suspended(&mut self) -> PamResult<()> {
        if self.force_suspended || !self.power_disabled {
            return Err(PamError::StageOrder);
        }
        self.force_suspended = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Resume direction: force -> power -> data path
    // ------------------------------------------------------------------

    /// Record the power-domain hold as re-acquired. First resume stage.
    pub fn clear_force_suspended(&mut self) -> PamResult<()> {
        if !self.force_suspended {
            return Err(PamError::StageOrder);
        }
        self.force_suspended = false;
        Ok(())
    }

    /// Record engine power as re-enabled. Requires the hold acquired.
    pub fn clear_power_disabled(&mut self) -> PamResult<()> {
        if !self.power_disabled || self.force_suspended {
            return Err(PamError::StageOrder);
        }
        self.power_disabled = false;
        Ok(())
    }

    /// Record the data path as connected. Last resume stage.
    pub fn clear_data_path_suspended(&mut self) -> PamResult<()> {
        if !self.data_path_suspended || self.power_disabled || self.force_suspended {
            return Err(PamError::StageOrder);
        }
        self.data_path_suspended = false;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Snapshot encoding for the published atomic view
    // ------------------------------------------------------------------

    /// Pack into a snapshot byte for atomic publication.
    pub(crate) fn to_bits(self) -> u8 {
        (self.data_path_suspended as u8)
            | (self.power_disabled as u8) << 1
            | (self.force_suspended as u8) << 2
    }

    /// Unpack a published snapshot byte.
    pub(crate) fn from_bits(bits: u8) -> Self {
        Self {
            data_path_suspended: bits & 1 != 0,
            power_disabled: bits & 2 != 0,
            force_suspended: bits & 4 != 0,
        }
    }
}

impl Default for SuspendStages {
    fn default() -> Self {
        Self::attached()
    }
}
