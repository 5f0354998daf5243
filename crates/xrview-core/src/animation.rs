//! Animation binding for the loaded model
//!
//! The renderer owns the actual skeletal/transform sampling. This module only
//! decides which clip plays and where its playhead is; the render loop calls
//! [`AnimationBinding::tick`] once per frame and copies
//! [`AnimationBinding::position`] into the renderer's animation player.

use tracing::{debug, info};

/// Metadata of one animation clip bundled with the model
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub name: Option<String>,
    /// Clip length in seconds
    pub duration: f32,
}

/// Playhead for a single clip, repeating forever
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    clip_index: usize,
    clip_name: Option<String>,
    duration: f32,
    position: f32,
    loops: u32,
}

impl PlaybackController {
    fn start(clip_index: usize, clip: &ClipInfo) -> Self {
        Self {
            clip_index,
            clip_name: clip.name.clone(),
            duration: clip.duration.max(0.0),
            position: 0.0,
            loops: 0,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        if self.duration <= 0.0 {
            return;
        }
        self.position += delta;
        if self.position >= self.duration {
            let wraps = (self.position / self.duration).floor();
            self.loops = self.loops.saturating_add(wraps as u32);
            self.position = self.position.rem_euclid(self.duration);
        }
    }

    pub fn clip_index(&self) -> usize {
        self.clip_index
    }

    pub fn clip_name(&self) -> Option<&str> {
        self.clip_name.as_deref()
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Playhead in seconds, always within `0..duration`
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Number of completed repetitions
    pub fn loops(&self) -> u32 {
        self.loops
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// Same scene and clip list as the current binding
    Unchanged,
    /// A fresh controller was built for this clip
    Bound { clip_index: usize },
    /// No clips; the model renders statically
    Static,
}

/// Associates one loaded scene with at most one playback controller
#[derive(Debug, Clone, Default)]
pub struct AnimationBinding {
    source: Option<u64>,
    controller: Option<PlaybackController>,
}

impl AnimationBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a loaded scene identified by `source`.
    ///
    /// `source` must change whenever the scene or its clip list is replaced
    /// (for example on hot reload); a new key rebuilds the controller from
    /// scratch and does not preserve the playhead.
    pub fn bind(&mut self, source: u64, clips: &[ClipInfo]) -> BindOutcome {
        if self.source == Some(source) {
            return BindOutcome::Unchanged;
        }

        if self.source.is_some() {
            debug!(source, "Model source changed, rebuilding animation controller");
        }
        self.source = Some(source);
        self.controller = clips.first().map(|clip| PlaybackController::start(0, clip));

        match &self.controller {
            Some(controller) => {
                info!(
                    clip = controller.clip_name().unwrap_or("<unnamed>"),
                    duration = controller.duration(),
                    available = clips.len(),
                    "Playing model animation"
                );
                BindOutcome::Bound { clip_index: 0 }
            }
            None => {
                info!("Model has no animation clips, rendering statically");
                BindOutcome::Static
            }
        }
    }

    /// Advance the bound controller; a no-op while nothing is bound
    pub fn tick(&mut self, delta: f32) {
        if !delta.is_finite() || delta < 0.0 {
            return;
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.advance(delta);
        }
    }

    pub fn controller(&self) -> Option<&PlaybackController> {
        self.controller.as_ref()
    }

    pub fn position(&self) -> Option<f32> {
        self.controller.as_ref().map(PlaybackController::position)
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }
}
