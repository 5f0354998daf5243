//! Immersive session lifecycle
//!
//! The session flag is the only state shared between the UI (the start
//! button) and the host (the session `end` event). It lives in a
//! [`SessionContext`] that is created once at mount and handed to whoever
//! needs it; there is no global store.
//!
//! The host side is abstracted by [`XrHost`] and [`XrSessionHandle`] so the
//! lifecycle can be driven by WebXR in the browser and by a scripted host in
//! tests.

use serde::Deserialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::error::XrError;

/// Kind of session requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    #[default]
    ImmersiveVr,
    ImmersiveAr,
    Inline,
}

impl SessionMode {
    /// Mode string as understood by `XRSystem.requestSession`
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::ImmersiveVr => "immersive-vr",
            SessionMode::ImmersiveAr => "immersive-ar",
            SessionMode::Inline => "inline",
        }
    }
}

/// Session configuration passed alongside the mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionInit {
    pub optional_features: Vec<String>,
}

/// Host environment able to grant immersive sessions
pub trait XrHost {
    type Session: XrSessionHandle;

    /// Presence test for immersive session support
    fn is_supported(&self) -> bool;

    /// Resolves once the host either grants a session or rejects the request
    fn request_session(
        &self,
        mode: SessionMode,
        init: &SessionInit,
    ) -> impl Future<Output = Result<Self::Session, XrError>>;
}

/// A session granted by the host
pub trait XrSessionHandle {
    /// Register the one-shot observer for the host's `end` event
    fn on_end(self, notifier: EndNotifier);

    /// Ask the host to end a session nobody is observing anymore
    fn end(self);
}

/// Text shown on the start button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLabel {
    Start,
    InSession,
}

impl SessionLabel {
    pub fn from_active(active: bool) -> Self {
        if active {
            SessionLabel::InSession
        } else {
            SessionLabel::Start
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            SessionLabel::Start => "Enter VR",
            SessionLabel::InSession => "VR session active",
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    active: bool,
    /// Bumped on every granted session so stale `end` notifications are ignored
    generation: u64,
    torn_down: bool,
}

/// Shared handle to the session flag
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    state: Arc<Mutex<SessionState>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    pub fn label(&self) -> SessionLabel {
        SessionLabel::from_active(self.is_active())
    }

    pub fn is_torn_down(&self) -> bool {
        self.lock().torn_down
    }

    /// Mark a freshly granted session as active.
    ///
    /// Returns `None` once the view has been torn down.
    fn begin_session(&self) -> Option<EndNotifier> {
        let mut state = self.lock();
        if state.torn_down {
            return None;
        }
        state.active = true;
        state.generation += 1;
        Some(EndNotifier {
            context: self.clone(),
            generation: state.generation,
        })
    }

    /// Unregister every outstanding notifier and reset the flag
    pub fn teardown(&self) {
        let mut state = self.lock();
        state.torn_down = true;
        state.active = false;
        debug!("Session context torn down");
    }
}

/// Single-fire notification for the host's session `end` event
#[derive(Debug)]
pub struct EndNotifier {
    context: SessionContext,
    generation: u64,
}

impl EndNotifier {
    /// Returns true if this call cleared the active flag
    pub fn fire(self) -> bool {
        let mut state = self.context.lock();
        if state.torn_down {
            debug!("Session ended after teardown, ignoring");
            return false;
        }
        if state.generation != self.generation || !state.active {
            debug!(
                generation = self.generation,
                current = state.generation,
                "Stale session end notification, ignoring"
            );
            return false;
        }
        state.active = false;
        info!("Immersive session ended");
        true
    }
}

/// Result of a start request, for callers that care
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    Started,
    Unsupported,
    Failed(XrError),
    /// The host granted a session after the view was torn down
    Detached,
}

/// Drives session start requests against a host
#[derive(Debug, Clone)]
pub struct SessionController<H> {
    host: H,
    context: SessionContext,
    mode: SessionMode,
    init: SessionInit,
}

impl<H: XrHost> SessionController<H> {
    pub fn new(host: H, context: SessionContext, mode: SessionMode, init: SessionInit) -> Self {
        Self {
            host,
            context,
            mode,
            init,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Request an immersive session.
    ///
    /// Never returns an error to the caller: an unsupported host and a
    /// rejected request are both logged and reported through the outcome.
    pub async fn request_start(&self) -> StartOutcome {
        if !self.host.is_supported() {
            warn!("{}", XrError::CapabilityUnavailable);
            return StartOutcome::Unsupported;
        }

        info!(
            mode = self.mode.as_str(),
            features = ?self.init.optional_features,
            "Requesting immersive session"
        );

        match self.host.request_session(self.mode, &self.init).await {
            Ok(session) => match self.context.begin_session() {
                Some(notifier) => {
                    session.on_end(notifier);
                    info!("Immersive session started");
                    StartOutcome::Started
                }
                None => {
                    warn!("Session granted after the view was torn down, ending it");
                    session.end();
                    StartOutcome::Detached
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to start immersive session");
                StartOutcome::Failed(e)
            }
        }
    }
}

/// Scripted host used by tests across the crate
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct HostLog {
        pub requests: Vec<(SessionMode, SessionInit)>,
        pub registered: Vec<EndNotifier>,
        pub ended: usize,
    }

    #[derive(Clone)]
    pub struct FakeHost {
        pub supported: bool,
        pub reject: Option<String>,
        pub log: Rc<RefCell<HostLog>>,
    }

    impl FakeHost {
        pub fn granting() -> Self {
            Self {
                supported: true,
                reject: None,
                log: Rc::default(),
            }
        }

        pub fn rejecting(reason: &str) -> Self {
            Self {
                reject: Some(reason.to_string()),
                ..Self::granting()
            }
        }

        pub fn unsupported() -> Self {
            Self {
                supported: false,
                ..Self::granting()
            }
        }

        pub fn request_count(&self) -> usize {
            self.log.borrow().requests.len()
        }

        pub fn listener_count(&self) -> usize {
            self.log.borrow().registered.len()
        }

        /// Fire the `end` event of the oldest live session
        pub fn end_session(&self) -> bool {
            let notifier = {
                let mut log = self.log.borrow_mut();
                if log.registered.is_empty() {
                    return false;
                }
                log.registered.remove(0)
            };
            notifier.fire()
        }
    }

    pub struct FakeSession {
        log: Rc<RefCell<HostLog>>,
    }

    impl XrSessionHandle for FakeSession {
        fn on_end(self, notifier: EndNotifier) {
            self.log.borrow_mut().registered.push(notifier);
        }

        fn end(self) {
            self.log.borrow_mut().ended += 1;
        }
    }

    impl XrHost for FakeHost {
        type Session = FakeSession;

        fn is_supported(&self) -> bool {
            self.supported
        }

        fn request_session(
            &self,
            mode: SessionMode,
            init: &SessionInit,
        ) -> impl Future<Output = Result<FakeSession, XrError>> {
            self.log.borrow_mut().requests.push((mode, init.clone()));
            let result = match &self.reject {
                Some(reason) => Err(XrError::SessionRequestFailed(reason.clone())),
                None => Ok(FakeSession {
                    log: self.log.clone(),
                }),
            };
            std::future::ready(result)
        }
    }

    pub fn controller(host: FakeHost) -> SessionController<FakeHost> {
        SessionController::new(
            host,
            SessionContext::new(),
            SessionMode::ImmersiveVr,
            SessionInit {
                optional_features: vec!["local".to_string(), "bounded-floor".to_string()],
            },
        )
    }
}
