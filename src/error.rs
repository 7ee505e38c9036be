use thiserror::Error;

/// Errors raised at the monitor boundary.
///
/// Only structurally invalid input and display setup fail; per-frame drawing
/// problems are logged and swallowed by [`crate::monitor::Monitor`].
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Rotation block is not a proper rotation (orthonormal, det = +1).
    #[error("invalid pose rotation: |RᵀR - I| = {orthogonality_error:.3e}, det(R) = {determinant:.6}")]
    PoseInvalid {
        orthogonality_error: f64,
        determinant: f64,
    },

    #[error("{what} must be {expected}, got {actual}")]
    Shape {
        what: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("recording stream: {0}")]
    Recording(#[from] rerun::RecordingStreamError),

    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
