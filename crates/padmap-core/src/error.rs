use thiserror::Error;

/// Errors produced while building or mutating a calibration grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// Degenerate construction input (too few control points, negative extent).
    #[error("invalid grid configuration: {0}")]
    Config(&'static str),
    /// Malformed or truncated calibration text.
    #[error("calibration parse error: {0}")]
    Parse(String),
    /// JSON form could not be encoded or decoded.
    #[error("calibration JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// `set_point` index outside the grid; the grid is left unmodified.
    #[error("control point ({i}, {j}) outside {nx}x{ny} grid")]
    PointOutOfRange {
        i: usize,
        j: usize,
        nx: usize,
        ny: usize,
    },
}
