//! WebXR host binding
//!
//! `navigator.xr` is reached through reflection; the typed WebXR bindings in
//! web-sys sit behind `web_sys_unstable_apis`.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, EventTarget};
use xrview_core::{
    EndNotifier, SessionInit, SessionMode, ViewModel, XrError, XrHost, XrSessionHandle,
};

/// The browser's `navigator.xr`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebXrHost;

/// A granted `XRSession`
pub struct WebXrSession {
    target: EventTarget,
}

fn xr_system() -> Option<JsValue> {
    let navigator = web_sys::window()?.navigator();
    let xr = Reflect::get(&navigator, &JsValue::from_str("xr")).ok()?;
    if xr.is_undefined() || xr.is_null() {
        None
    } else {
        Some(xr)
    }
}

/// Human-readable text for a rejected promise or thrown value
fn describe(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(err.name()), String::from(err.message()));
    }
    format!("{:?}", value)
}

fn request_failed(value: JsValue) -> XrError {
    XrError::SessionRequestFailed(describe(&value))
}

impl XrHost for WebXrHost {
    type Session = WebXrSession;

    fn is_supported(&self) -> bool {
        xr_system().is_some()
    }

    async fn request_session(
        &self,
        mode: SessionMode,
        init: &SessionInit,
    ) -> Result<WebXrSession, XrError> {
        let xr = xr_system().ok_or(XrError::CapabilityUnavailable)?;

        let request: Function = Reflect::get(&xr, &JsValue::from_str("requestSession"))
            .map_err(request_failed)?
            .dyn_into()
            .map_err(|_| {
                XrError::SessionRequestFailed("navigator.xr.requestSession is not a function".to_string())
            })?;

        let features: Array = init
            .optional_features
            .iter()
            .map(|feature| JsValue::from_str(feature))
            .collect();
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("optionalFeatures"), &features)
            .map_err(request_failed)?;

        let promise: Promise = request
            .call2(&xr, &JsValue::from_str(mode.as_str()), &options)
            .map_err(request_failed)?
            .dyn_into()
            .map_err(|_| {
                XrError::SessionRequestFailed("requestSession did not return a promise".to_string())
            })?;

        let session = JsFuture::from(promise).await.map_err(request_failed)?;
        Ok(WebXrSession {
            target: session.unchecked_into(),
        })
    }
}

impl XrSessionHandle for WebXrSession {
    fn on_end(self, notifier: EndNotifier) {
        // once_into_js frees the closure after its single call
        let callback = Closure::once_into_js(move || {
            notifier.fire();
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);

        if let Err(e) = self
            .target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "end",
                callback.unchecked_ref(),
                &options,
            )
        {
            tracing::error!("Failed to observe session end: {}", describe(&e));
        }
    }

    fn end(self) {
        let ended = Reflect::get(&self.target, &JsValue::from_str("end"))
            .and_then(|end| end.dyn_into::<Function>())
            .and_then(|end| end.call0(&self.target));
        if let Err(e) = ended {
            tracing::error!("Failed to end orphaned session: {}", describe(&e));
        }
    }
}

/// Kick off a session request without blocking the frame
pub fn start_session(viewer: &ViewModel) {
    let controller = viewer.session_controller(WebXrHost);
    wasm_bindgen_futures::spawn_local(async move {
        controller.request_start().await;
    });
}
