//! Error types shared across the engine.
//!
//! All engine failures are synchronous and local: there is no I/O and no
//! retry logic anywhere in the measurement core. Every public operation is
//! atomic with respect to engine state, so an `Err` always means "nothing
//! changed".

use thiserror::Error;

use crate::data::measurement::MeasurementId;

/// Failures of engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Calibration input was non-positive, non-finite, or a prerequisite
    /// (reference line) is missing. Surfaced to the user as a blocking
    /// validation message.
    #[error("invalid calibration input: {0}")]
    InvalidCalibrationInput(&'static str),

    /// A vertex with non-finite coordinates reached the sketch, typically
    /// from an out-of-bounds pointer event. The point is dropped and the
    /// sketch keeps going.
    #[error("invalid vertex: coordinates must be finite")]
    InvalidVertex,

    /// An operation referenced a measurement id that no longer exists.
    #[error("measurement {0} not found")]
    NotFound(MeasurementId),
}

/// Failures of session snapshot load/save.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A snapshot row could not be turned back into a measurement
    /// (unknown kind string, wrong vertex count for its kind, bad color).
    #[error("malformed snapshot row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}
