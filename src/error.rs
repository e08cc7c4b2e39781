//! Fatal playback error kinds.
//!
//! Playback is an offline, deterministic render: every error here is a
//! programming or data error, so the policy is fail-fast. Nothing is retried
//! and there is no partial/degraded playback mode. The kinds stay typed (the
//! crate's `anyhow` results preserve them for `downcast_ref`) so callers and
//! tests can tell an oversized catalog from bad geometry.

use std::fmt;

use crate::catalog::DetectionKind;

#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackError {
    /// A subject needs more slots of a kind than the pool was sized for.
    /// Detected at catalog/pool validation time, before any playback.
    IndexMismatch {
        kind: DetectionKind,
        index: usize,
        capacity: usize,
    },
    /// A detection carries negative or non-finite geometry. Rejected before
    /// its reveal animation is scheduled.
    InvalidGeometry {
        subject: usize,
        kind: DetectionKind,
        index: usize,
        detail: String,
    },
    /// A background reference the asset collaborator cannot resolve.
    MissingAsset { reference: String },
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::IndexMismatch {
                kind,
                index,
                capacity,
            } => write!(
                f,
                "slot index {} out of range for {} slots (pool capacity {})",
                index, kind, capacity
            ),
            PlaybackError::InvalidGeometry {
                subject,
                kind,
                index,
                detail,
            } => write!(
                f,
                "subject {} {} detection {}: {}",
                subject, kind, index, detail
            ),
            PlaybackError::MissingAsset { reference } => {
                write!(f, "background asset {:?} cannot be resolved", reference)
            }
        }
    }
}

impl std::error::Error for PlaybackError {}
