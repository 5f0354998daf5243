//! xrview Core - platform-independent view model for the VR scene viewer
//!
//! This crate holds everything that does not need a renderer or a browser:
//! - Immersive session lifecycle driven through an abstract XR host
//! - Animation binding for the loaded model, advanced by explicit ticks
//! - Ambient sound load/playback state
//! - Fixed scene composition (camera, lights, session scope)
//! - Configuration and error types

pub mod animation;
pub mod audio;
pub mod config;
pub mod error;
pub mod scene;
pub mod session;
pub mod view;

pub use animation::{AnimationBinding, BindOutcome, ClipInfo, PlaybackController};
pub use audio::{AmbientSound, PlaybackParams};
pub use config::SceneConfig;
pub use error::{AssetKind, XrError};
pub use scene::{LightSpec, SceneElement, SceneLayout};
pub use session::{
    EndNotifier, SessionContext, SessionController, SessionInit, SessionLabel, SessionMode,
    StartOutcome, XrHost, XrSessionHandle,
};
pub use view::{AssetStatus, ViewModel};
