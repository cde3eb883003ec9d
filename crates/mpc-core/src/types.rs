//! Common type aliases used throughout the calibration pipeline.

/// Search depth.
pub type Depth = u32;

/// Score (signed, in game evaluation units).
pub type Score = i32;

/// Game phase: count of empty squares remaining (0-60).
pub type Phase = u32;

/// Identifier of one self-play game within a calibration run.
pub type GameId = u64;
