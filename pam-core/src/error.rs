//! Control-plane errors.
//!
//! Single error type for the orchestration layer. Maps hardware-layer
//! errors into a unified type so callers see one taxonomy.

use pam_hal::HalError;

/// Control-plane error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PamError {
    /// Shared-memory buffer allocation failed.
    OutOfMemory,
    /// Local endpoint negotiation with the platform registry failed.
    EndpointUnavailable,
    /// Resume attempted before the companion signaled readiness.
    NotReady,
    /// Power-domain hold could not be acquired.
    PowerDomain,
    /// Data-path connect handshake failed.
    ConnectFailed,
    /// One-time hardware initialization failed.
    HwInit,
    /// Suspend/resume stage transition attempted out of order.
    StageOrder,
    /// Resource-manager registration failed.
    ResourceManager,
}

impl PamError {
    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "Shared-memory buffer allocation failed",
            Self::EndpointUnavailable => "Local endpoint negotiation failed",
            Self::NotReady => "Companion processor not ready",
            Self::PowerDomain => "Power-domain hold acquisition failed",
            Self::ConnectFailed => "Data-path connect handshake failed",
            Self::HwInit => "PAM hardware initialization failed",
            Self::StageOrder => "Stage transition out of order",
            Self::ResourceManager => "Resource-manager registration failed",
        }
    }

    /// Whether the resume loop may recover by retrying after a delay.
    ///
    /// Retryable errors are logged as warnings; the rest as errors.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotReady | Self::PowerDomain | Self::ConnectFailed | Self::HwInit
        )
    }
}

impl From<HalError> for PamError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::InitFailed => Self::HwInit,
            HalError::PowerDomain => Self::PowerDomain,
        }
    }
}

/// Result type for control-plane operations.
pub type PamResult<T> = Result<T, PamError>;
