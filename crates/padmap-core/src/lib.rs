//! Padmap Core — calibration mapping for pointing-device drivers.
//!
//! This crate turns raw device-space coordinates (integer sensor units)
//! into normalized `[0,1]×[0,1]` unit coordinates through a sparse grid of
//! control points, compensating for non-linear distortion across a tablet's
//! sensing surface. No driver, windowing, or event-pipeline dependencies —
//! the surrounding driver decides *when* calibration runs.

pub mod error;
pub mod format;
pub mod grid;
mod table;

// Re-exports for convenience.
pub use error::GridError;
pub use format::{GridData, MAX_AXIS_POINTS};
pub use grid::{Axis, CalibrationGrid, log_grid};
