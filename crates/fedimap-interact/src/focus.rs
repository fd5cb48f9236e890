//! Time-boxed focus highlight.
//!
//! Used when a host is focused programmatically (search result, URL deep
//! link) rather than clicked. Orthogonal to selection: both can be active
//! at once.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fedimap_util::ResettableTask;
use tokio::sync::mpsc;
use tracing::debug;

/// How long a focus highlight lasts.
pub const FOCUS_DURATION: Duration = Duration::from_secs(3);

/// Focus side effects toward the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// Apply the focus highlight to a host.
    Applied(String),
    /// Remove the focus highlight from a host.
    Cleared(String),
}

/// Owns the focus highlight and its expiry timer.
///
/// Re-focusing restarts the timer through the single resettable slot, so
/// timers never stack; a second focus before expiry clears the previous
/// host's highlight before applying the new one.
pub struct FocusController {
    duration: Duration,
    focused: Arc<Mutex<Option<String>>>,
    timer: ResettableTask,
    events_tx: mpsc::UnboundedSender<FocusEvent>,
}

impl FocusController {
    /// Create a controller and the channel its effects arrive on.
    pub fn new(duration: Duration) -> (Self, mpsc::UnboundedReceiver<FocusEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = Self {
            duration,
            focused: Arc::new(Mutex::new(None)),
            timer: ResettableTask::new(),
            events_tx,
        };
        (controller, events_rx)
    }

    /// Currently focused host, if the highlight has not expired.
    pub fn focused(&self) -> Option<String> {
        self.focused.lock().expect("focus state poisoned").clone()
    }

    /// Focus a host, restarting the expiry timer.
    pub fn focus(&mut self, host: &str) {
        debug!(host, "focus highlight applied");
        {
            let mut focused = self.focused.lock().expect("focus state poisoned");
            if let Some(previous) = focused.take() {
                let _ = self.events_tx.send(FocusEvent::Cleared(previous));
            }
            *focused = Some(host.to_string());
        }
        let _ = self.events_tx.send(FocusEvent::Applied(host.to_string()));

        let focused = Arc::clone(&self.focused);
        let events_tx = self.events_tx.clone();
        let host = host.to_string();
        self.timer.arm_after(self.duration, async move {
            let mut focused = focused.lock().expect("focus state poisoned");
            // A newer focus owns the timer slot, but guard anyway.
            if focused.as_deref() == Some(host.as_str()) {
                *focused = None;
                let _ = events_tx.send(FocusEvent::Cleared(host));
            }
        });
    }

    /// Drop any active highlight and cancel the timer. The teardown path.
    pub fn clear(&mut self) {
        self.timer.cancel();
        let mut focused = self.focused.lock().expect("focus state poisoned");
        if let Some(previous) = focused.take() {
            let _ = self.events_tx.send(FocusEvent::Cleared(previous));
        }
    }
}

impl Drop for FocusController {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}
