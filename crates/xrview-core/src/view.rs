//! Mounted view state
//!
//! Groups everything one mounted scene owns. The web frontend keeps a single
//! [`ViewModel`] as a resource; tests drive it directly.

use tracing::error;

use crate::animation::{AnimationBinding, BindOutcome, ClipInfo};
use crate::audio::{AmbientSound, PlaybackParams};
use crate::config::SceneConfig;
use crate::error::{AssetKind, XrError};
use crate::scene::SceneLayout;
use crate::session::{SessionContext, SessionController, SessionLabel, XrHost};

/// Load state of a static asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Loading,
    Ready,
    Failed(String),
}

impl AssetStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetStatus::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssetStatus::Failed(_))
    }
}

#[derive(Debug)]
pub struct ViewModel {
    config: SceneConfig,
    layout: SceneLayout,
    session: SessionContext,
    pub animation: AnimationBinding,
    pub sound: AmbientSound,
    model_status: AssetStatus,
}

impl ViewModel {
    pub fn mount(config: SceneConfig) -> Self {
        let layout = SceneLayout::from_config(&config);
        let sound = AmbientSound::new(
            config.assets.sound.clone(),
            PlaybackParams {
                looped: config.audio.looped,
                volume: config.audio.volume,
            },
        );
        Self {
            config,
            layout,
            session: SessionContext::new(),
            animation: AnimationBinding::new(),
            sound,
            model_status: AssetStatus::Loading,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Controller sharing this view's session context
    pub fn session_controller<H: XrHost>(&self, host: H) -> SessionController<H> {
        SessionController::new(
            host,
            self.session.clone(),
            self.config.session.mode,
            self.config.session_init(),
        )
    }

    pub fn label(&self) -> SessionLabel {
        self.session.label()
    }

    pub fn model_status(&self) -> &AssetStatus {
        &self.model_status
    }

    pub fn model_loaded(&mut self, source: u64, clips: &[ClipInfo]) -> BindOutcome {
        self.model_status = AssetStatus::Ready;
        self.animation.bind(source, clips)
    }

    pub fn model_failed(&mut self, reason: impl Into<String>) -> XrError {
        let reason = reason.into();
        let err = XrError::AssetLoadFailed {
            kind: AssetKind::Model,
            path: self.config.assets.model.clone(),
            reason: reason.clone(),
        };
        error!(error = %err, "Model unavailable");
        self.model_status = AssetStatus::Failed(reason);
        err
    }

    /// Per-frame update, called by the render loop owner
    pub fn tick(&mut self, delta: f32) {
        self.animation.tick(delta);
    }

    /// Short text for the overlay, `None` when there is nothing to report
    pub fn status_line(&self) -> Option<String> {
        if let AssetStatus::Failed(reason) = &self.model_status {
            return Some(format!("Model failed to load: {}", reason));
        }
        if let AssetStatus::Failed(reason) = self.sound.status() {
            return Some(format!("Sound failed to load: {}", reason));
        }
        if self.model_status == AssetStatus::Loading {
            return Some("Loading model...".to_string());
        }
        None
    }

    pub fn unmount(&self) {
        self.session.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::FakeHost;
    use crate::session::StartOutcome;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    #[test]
    fn test_mount_starts_inactive_and_loading() {
        let view = ViewModel::mount(SceneConfig::default());
        assert!(!view.session().is_active());
        assert_eq!(view.label(), SessionLabel::Start);
        assert_eq!(view.model_status(), &AssetStatus::Loading);
        assert_eq!(view.status_line().as_deref(), Some("Loading model..."));
    }

    #[tokio::test]
    async fn test_enter_and_leave_vr() {
        let view = ViewModel::mount(SceneConfig::default());
        let host = FakeHost::granting();
        let controller = view.session_controller(host.clone());

        assert_eq!(view.label().text(), "Enter VR");
        assert_eq!(controller.request_start().await, StartOutcome::Started);
        assert_eq!(view.label(), SessionLabel::InSession);
        assert_eq!(view.label().text(), "VR session active");

        assert!(host.end_session());
        assert_eq!(view.label(), SessionLabel::Start);
    }

    #[tokio::test]
    async fn test_missing_xr_logs_warning() {
        let (logs, _guard) = capture_logs();
        let view = ViewModel::mount(SceneConfig::default());
        let controller = view.session_controller(FakeHost::unsupported());

        assert_eq!(controller.request_start().await, StartOutcome::Unsupported);
        assert_eq!(view.label(), SessionLabel::Start);

        let output = logs.contents();
        assert!(output.contains("WARN"), "unexpected log output: {output}");
        assert!(output.contains("not supported"), "unexpected log output: {output}");
    }

    #[tokio::test]
    async fn test_rejection_logs_error() {
        let (logs, _guard) = capture_logs();
        let view = ViewModel::mount(SceneConfig::default());
        let controller = view.session_controller(FakeHost::rejecting("SecurityError"));

        controller.request_start().await;
        assert_eq!(view.label(), SessionLabel::Start);
        assert!(logs.contents().contains("SecurityError"));
    }

    #[test]
    fn test_model_load_binds_and_ticks() {
        let mut view = ViewModel::mount(SceneConfig::default());
        view.tick(0.1);
        assert_eq!(view.animation.position(), None);

        let clips = [ClipInfo {
            name: Some("Open".to_string()),
            duration: 3.0,
        }];
        assert_eq!(view.model_loaded(1, &clips), BindOutcome::Bound { clip_index: 0 });
        view.tick(0.5);
        view.tick(0.5);

        assert_eq!(view.animation.position(), Some(1.0));
        assert_eq!(view.status_line(), None);
    }

    #[test]
    fn test_asset_failures_are_visible() {
        let mut view = ViewModel::mount(SceneConfig::default());
        view.model_loaded(1, &[]);
        view.sound.fail_load("decode error");
        assert_eq!(
            view.status_line().as_deref(),
            Some("Sound failed to load: decode error")
        );

        view.model_failed("404");
        assert_eq!(view.status_line().as_deref(), Some("Model failed to load: 404"));
    }

    #[tokio::test]
    async fn test_unmount_ignores_late_end() {
        let view = ViewModel::mount(SceneConfig::default());
        let host = FakeHost::granting();
        view.session_controller(host.clone()).request_start().await;

        view.unmount();
        assert!(!host.end_session());
        assert_eq!(view.label(), SessionLabel::Start);
    }
}
