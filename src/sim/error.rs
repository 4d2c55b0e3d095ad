//! Error types for the simulation core
//!
//! Neither error ever crosses `Engine::step`; the engine absorbs them.

/// Entity store errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Every slot is active, so the spawn was dropped
    #[error("entity pool exhausted ({capacity} slots active)")]
    ResourceExhausted { capacity: usize },

    /// Slot index outside `[0, capacity)`
    #[error("entity index {index} out of range (capacity {capacity})")]
    InvalidIndex { index: usize, capacity: usize },
}

/// Engine configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Capacity too small for the settings index contract
    #[error("capacity {capacity} is below the minimum of {min}")]
    CapacityTooSmall { capacity: usize, min: usize },

    /// Round length must be a positive number of seconds
    #[error("round length {0} must be positive and finite")]
    InvalidRoundLength(f32),
}
