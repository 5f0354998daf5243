//! Error types shared by the viewer

use std::fmt;
use thiserror::Error;

/// Which static asset a load failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Model => write!(f, "model"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XrError {
    #[error("immersive sessions are not supported in this environment")]
    CapabilityUnavailable,
    #[error("session request failed: {0}")]
    SessionRequestFailed(String),
    #[error("failed to load {kind} asset '{path}': {reason}")]
    AssetLoadFailed {
        kind: AssetKind,
        path: String,
        reason: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
}
