//! Error types for the STM32 Ethernet driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`DmaError`]: DMA buffer and descriptor issues
//! - [`IoError`]: Runtime TX/RX and management bus failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur during MAC reset, PHY discovery or ring setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver already initialized
    AlreadyInitialized,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// No PHY with the expected identifier answered on the MDIO bus
    PhyNotFound,
    /// Software reset failed or timed out
    ResetFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::PhyNotFound => "PHY not found",
            ConfigError::ResetFailed => "software reset failed",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA buffer and descriptor errors
///
/// These errors relate to descriptor ring management and buffer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No TX descriptor became free within the wait budget
    RingTimeout,
    /// The buffer pool has no free buffers
    PoolExhausted,
    /// Frame too large for the available buffers
    FrameTooLarge,
    /// Invalid frame length (zero fragments, or an empty fragment)
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::RingTimeout => "timed out waiting for a TX descriptor",
            DmaError::PoolExhausted => "buffer pool exhausted",
            DmaError::FrameTooLarge => "frame too large for buffers",
            DmaError::InvalidLength => "invalid frame length",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime TX/RX errors
///
/// These errors occur during frame transfer or management bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// MDIO operation timed out
    Timeout,
    /// Invalid state for operation (e.g., not running)
    InvalidState,
    /// Buffer too small for received frame
    BufferTooSmall,
    /// PHY communication error
    PhyError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::InvalidState => "invalid state for operation",
            IoError::BufferTooSmall => "buffer too small for frame",
            IoError::PhyError => "PHY communication error",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::PhyNotFound)) => { /* ... */ }
///     Err(Error::Dma(DmaError::RingTimeout)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
