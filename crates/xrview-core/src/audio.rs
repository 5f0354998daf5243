//! Ambient sound: one listener, one looping clip, started once

use tracing::{error, info};

use crate::error::{AssetKind, XrError};
use crate::view::AssetStatus;

/// Parameters applied to the audio source when playback starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    pub looped: bool,
    /// Linear volume, 0.0 to 1.0
    pub volume: f32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            looped: true,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AmbientSound {
    path: String,
    params: PlaybackParams,
    status: AssetStatus,
    listener_attached: bool,
    load_issued: bool,
    started: bool,
}

impl AmbientSound {
    pub fn new(path: impl Into<String>, params: PlaybackParams) -> Self {
        Self {
            path: path.into(),
            params,
            status: AssetStatus::Loading,
            listener_attached: false,
            load_issued: false,
            started: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> &AssetStatus {
        &self.status
    }

    pub fn is_playing(&self) -> bool {
        self.started
    }

    /// True exactly once: the caller attaches the single scene listener
    pub fn attach_listener(&mut self) -> bool {
        !std::mem::replace(&mut self.listener_attached, true)
    }

    /// Path to load, returned only on the first call
    pub fn begin_load(&mut self) -> Option<&str> {
        if std::mem::replace(&mut self.load_issued, true) {
            return None;
        }
        Some(&self.path)
    }

    /// Load finished: returns the playback parameters the first time only
    pub fn complete_load(&mut self) -> Option<PlaybackParams> {
        if self.started || self.status.is_failed() {
            return None;
        }
        self.started = true;
        self.status = AssetStatus::Ready;
        info!(
            path = %self.path,
            looped = self.params.looped,
            volume = self.params.volume,
            "Starting ambient sound"
        );
        Some(self.params)
    }

    /// Load rejected: the source never starts
    pub fn fail_load(&mut self, reason: impl Into<String>) -> XrError {
        let reason = reason.into();
        let err = XrError::AssetLoadFailed {
            kind: AssetKind::Audio,
            path: self.path.clone(),
            reason: reason.clone(),
        };
        if !self.started {
            error!(error = %err, "Ambient sound unavailable");
            self.status = AssetStatus::Failed(reason);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_is_issued_once() {
        let mut sound = AmbientSound::new("g_06.mp3", PlaybackParams::default());
        assert_eq!(sound.begin_load(), Some("g_06.mp3"));
        assert_eq!(sound.begin_load(), None);
    }

    #[test]
    fn test_single_listener() {
        let mut sound = AmbientSound::new("g_06.mp3", PlaybackParams::default());
        assert!(sound.attach_listener());
        assert!(!sound.attach_listener());
    }

    #[test]
    fn test_starts_looping_at_half_volume_once() {
        let mut sound = AmbientSound::new("g_06.mp3", PlaybackParams::default());
        sound.begin_load();
        assert!(!sound.is_playing());

        let params = sound.complete_load().unwrap();
        assert!(params.looped);
        assert_eq!(params.volume, 0.5);
        assert!(sound.is_playing());
        assert_eq!(sound.status(), &AssetStatus::Ready);

        // Re-observing the loaded asset does not create a second source
        assert_eq!(sound.complete_load(), None);
    }

    #[test]
    fn test_failed_load_never_starts() {
        let mut sound = AmbientSound::new("missing.mp3", PlaybackParams::default());
        sound.begin_load();

        let err = sound.fail_load("404 Not Found");
        assert!(matches!(err, XrError::AssetLoadFailed { kind: AssetKind::Audio, .. }));
        assert!(sound.status().is_failed());
        assert_eq!(sound.complete_load(), None);
        assert!(!sound.is_playing());
    }
}
