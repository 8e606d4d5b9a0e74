//! Web-specific timer and clipboard support.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use crate::clipboard::{copy_with_fallback, ClipboardBackend, ClipboardError, CopyOutcome};
use crate::{ConfigError, Controls, PhraseLayout, RotatingText, RotatingTextConfig};

/// A `setInterval` registration, cleared when dropped.
pub struct IntervalHandle {
    id: i32,
    period: Duration,
    // Keeps the JS callback alive for as long as the interval exists
    _callback: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    /// Register `callback` to run every `period`.
    pub fn start(period: Duration, callback: impl FnMut() + 'static) -> Result<Self, String> {
        let window = web_sys::window().ok_or("No window available")?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        let timeout = period.as_millis().clamp(1, i32::MAX as u128) as i32;
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )
            .map_err(|_| "Failed to register interval")?;

        tracing::debug!(id, period_ms = timeout, "interval registered");
        Ok(Self {
            id,
            period,
            _callback: callback,
        })
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
            tracing::debug!(id = self.id, "interval cleared");
        }
    }
}

/// A rotating text display driven by a browser interval.
///
/// Clones share the display; only the original owns the interval. The
/// transition-complete callback runs after the shared state is released,
/// so it may read or drive the rotator.
pub struct WebRotator {
    inner: Rc<RefCell<RotatingText>>,
    observer: Rc<RefCell<Option<Box<dyn FnMut(usize)>>>>,
    interval: Option<IntervalHandle>,
}

impl WebRotator {
    /// Build a rotator and register its interval when `config.auto` is set.
    pub fn new(config: RotatingTextConfig) -> Result<Self, ConfigError> {
        let period = config.rotation_interval();
        let enabled = config.auto;

        let mut text = RotatingText::new(config)?;
        text.set_external_clock(true);

        let mut rotator = Self {
            inner: Rc::new(RefCell::new(text)),
            observer: Rc::new(RefCell::new(None)),
            interval: None,
        };
        if let Err(err) = rotator.configure_auto(period, enabled) {
            tracing::warn!(error = %err, "could not start rotation interval");
        }
        Ok(rotator)
    }

    /// Register the transition-complete callback, replacing any previous one.
    pub fn on_next<F>(&self, callback: F)
    where
        F: FnMut(usize) + 'static,
    {
        *self.observer.borrow_mut() = Some(Box::new(callback));
    }

    /// A snapshot of the current layout.
    pub fn layout(&self) -> PhraseLayout {
        self.inner.borrow_mut().layout().clone()
    }

    pub fn current_index(&self) -> usize {
        self.inner.borrow().current_index()
    }

    /// Clear the current interval and register a new one if enabled.
    /// Both settings are recorded in the shared config.
    pub fn configure_auto(&mut self, period: Duration, enabled: bool) -> Result<(), String> {
        self.inner.borrow_mut().set_auto(period, enabled);

        if let Some(interval) = &self.interval {
            if enabled && interval.period() == period {
                return Ok(());
            }
        }
        self.interval = None;

        if enabled && !period.is_zero() {
            let ticker = self.clone();
            self.interval = Some(IntervalHandle::start(period, move || {
                ticker.apply(|text| text.advance());
            })?);
        }
        Ok(())
    }

    /// Clear the interval. Control calls keep working afterwards.
    pub fn shutdown(&mut self) {
        self.interval = None;
    }

    /// Apply a transition, then notify the observer with the display released.
    fn apply(&self, op: impl FnOnce(&mut RotatingText) -> bool) -> bool {
        let (changed, index) = match self.inner.try_borrow_mut() {
            Ok(mut text) => {
                let changed = op(&mut text);
                (changed, text.current_index())
            }
            Err(_) => {
                tracing::warn!("rotator busy, skipping transition");
                return false;
            }
        };
        if changed {
            self.notify(index);
        }
        changed
    }

    fn notify(&self, index: usize) {
        let taken = self.observer.borrow_mut().take();
        if let Some(mut observer) = taken {
            observer(index);
            let mut slot = self.observer.borrow_mut();
            if slot.is_none() {
                *slot = Some(observer);
            }
        }
    }
}

impl Clone for WebRotator {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            observer: Rc::clone(&self.observer),
            interval: None,
        }
    }
}

impl Controls for WebRotator {
    fn advance(&mut self) -> bool {
        self.apply(|text| text.advance())
    }

    fn retreat(&mut self) -> bool {
        self.apply(|text| text.retreat())
    }

    fn jump_to(&mut self, index: usize) -> bool {
        self.apply(|text| text.jump_to(index))
    }
}

/// Browser clipboard: the async Clipboard API result, with
/// `document.execCommand("copy")` as the legacy path.
struct BrowserClipboard {
    primary: Result<(), ClipboardError>,
}

impl ClipboardBackend for BrowserClipboard {
    fn write_primary(&mut self, _text: &str) -> Result<(), ClipboardError> {
        self.primary.clone()
    }

    fn write_fallback(&mut self, text: &str) -> Result<(), ClipboardError> {
        legacy_copy(text).map_err(ClipboardError::Rejected)
    }
}

/// Copy `text` to the system clipboard.
///
/// Tries `navigator.clipboard.writeText` first and falls back to a hidden
/// textarea with `execCommand("copy")`. Failures are logged, not returned.
pub async fn copy_text(text: &str) -> CopyOutcome {
    let primary = write_text(text).await;
    copy_with_fallback(&mut BrowserClipboard { primary }, text)
}

async fn write_text(text: &str) -> Result<(), ClipboardError> {
    let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
    let navigator = window.navigator();
    let clipboard = js_sys::Reflect::get(navigator.as_ref(), &JsValue::from_str("clipboard"))
        .map_err(|_| ClipboardError::Unavailable)?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(ClipboardError::Unavailable);
    }

    let write = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or(ClipboardError::Unavailable)?;
    let promise = write
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| ClipboardError::Rejected(format!("{:?}", e)))?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| ClipboardError::Rejected("writeText did not return a promise".into()))?;

    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| ClipboardError::Rejected(format!("{:?}", e)))
}

fn legacy_copy(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let document = window.document().ok_or("No document available")?;
    let body = document.body().ok_or("No body available")?;

    let textarea = document
        .create_element("textarea")
        .map_err(|_| "Failed to create textarea element")?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| "Failed to cast element to HtmlTextAreaElement")?;
    textarea.set_value(text);
    let style = textarea.style();
    style
        .set_property("position", "fixed")
        .and_then(|_| style.set_property("left", "-9999px"))
        .map_err(|_| "Failed to style textarea")?;

    body.append_child(&textarea)
        .map_err(|_| "Failed to attach textarea")?;
    let _ = textarea.focus();
    textarea.select();

    let copied = document
        .dyn_into::<HtmlDocument>()
        .map_err(|_| "Document is not an HtmlDocument".to_string())
        .and_then(|doc| {
            doc.exec_command("copy")
                .map_err(|_| "execCommand(\"copy\") threw".to_string())
        });
    textarea.remove();

    match copied? {
        true => Ok(()),
        false => Err("execCommand(\"copy\") was refused".into()),
    }
}
