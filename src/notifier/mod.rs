//! The toast notifier.
//!
//! A [`Notifier`] owns at most one tray element and the toasts inside it.
//! Listeners and timers are plain data owned by the notifier; hosts feed it
//! events through [`Notifier::dispatch`] and time through
//! [`Notifier::advance`].
//!
//! Message markup is inserted verbatim. Callers passing untrusted text must
//! sanitize it first.

mod build;
mod listeners;

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::Result;
use crate::config::Settings;
use crate::dom::{Document, ElementId, MemoryDocument};
use crate::options::{ToastConfig, ToastOptions};
use crate::timer::{TimerId, TimerQueue};
use crate::types::{Position, ToastKind};

pub use listeners::Event;
use listeners::{Listener, Listeners};

/// Extra time added to every auto-close delay so the exit transition can run.
pub const ANIMATION_MARGIN: Duration = Duration::from_millis(600);

pub const CONTAINER_CLASS: &str = "toast__container";
pub const TOAST_CLASS: &str = "toast";
pub const ICON_CLASS: &str = "toast__icon";
pub const MESSAGE_CLASS: &str = "toast__message";
pub const CLOSE_BUTTON_CLASS: &str = "toast__close_button";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TimerTask {
    AutoClose(ElementId),
    TransitionEnd(ElementId),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastState {
    Displayed,
    /// Opacity is zero; removal happens at the end of the transition.
    Fading,
}

#[derive(Debug)]
struct Tray {
    element: ElementId,
    position: Position,
}

#[derive(Debug)]
struct ToastEntry {
    kind: ToastKind,
    close_button: Option<ElementId>,
    /// Full auto-close delay, margin included. `None` when auto-close is off.
    auto_close: Option<Duration>,
    timer: Option<TimerId>,
    fading: bool,
}

#[derive(Debug)]
pub struct Notifier<D = MemoryDocument> {
    document: D,
    config: ToastConfig,
    tray: Option<Tray>,
    toasts: HashMap<ElementId, ToastEntry>,
    listeners: Listeners,
    timers: TimerQueue<TimerTask>,
    exit_transition: Option<Duration>,
}

/// One-shot helper: builds a notifier with default settings on `document`
/// and shows a single toast.
///
/// Each call owns a fresh notifier, so two calls on a shared document create
/// two trays.
///
/// # Errors
///
/// Propagates document failures from [`Notifier::notify`].
pub fn show<D: Document>(
    document: D,
    message: &str,
    options: &ToastOptions,
) -> Result<(Notifier<D>, ElementId)> {
    let mut notifier = Notifier::new(document, &ToastOptions::default());
    let toast = notifier.notify(message, options)?;
    Ok((notifier, toast))
}

impl<D: Document> Notifier<D> {
    /// Builds a notifier whose defaults are the built-in ones overridden by
    /// `options`. The document is not touched until the first toast.
    pub fn new(document: D, options: &ToastOptions) -> Self {
        Self::with_config(document, ToastConfig::default().with_overrides(options))
    }

    pub fn with_config(document: D, config: ToastConfig) -> Self {
        Self {
            document,
            config,
            tray: None,
            toasts: HashMap::new(),
            listeners: Listeners::default(),
            timers: TimerQueue::new(),
            exit_transition: Some(Duration::ZERO),
        }
    }

    pub fn from_settings(document: D, settings: &Settings) -> Self {
        Self::new(document, &settings.toast).with_exit_transition(settings.exit_transition)
    }

    /// Sets how long the fade-out lasts before the toast is detached. With
    /// `None` the host must dispatch [`Event::TransitionEnd`] itself.
    #[must_use]
    pub fn with_exit_transition(mut self, exit_transition: Option<Duration>) -> Self {
        self.exit_transition = exit_transition;
        self
    }

    pub const fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub const fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    /// The tray element, if any toast is on screen.
    pub fn tray(&self) -> Option<ElementId> {
        self.tray.as_ref().map(|tray| tray.element)
    }

    pub fn tray_position(&self) -> Option<Position> {
        self.tray.as_ref().map(|tray| tray.position)
    }

    /// Number of toasts not yet removed, fading ones included.
    pub fn active_count(&self) -> usize {
        self.toasts.len()
    }

    pub fn state(&self, toast: ElementId) -> Option<ToastState> {
        self.toasts.get(&toast).map(|entry| {
            if entry.fading {
                ToastState::Fading
            } else {
                ToastState::Displayed
            }
        })
    }

    pub fn kind(&self, toast: ElementId) -> Option<ToastKind> {
        self.toasts.get(&toast).map(|entry| entry.kind)
    }

    pub fn close_button(&self, toast: ElementId) -> Option<ElementId> {
        self.toasts.get(&toast).and_then(|entry| entry.close_button)
    }

    /// Whether an auto-close timer is currently armed for `toast`.
    pub fn has_pending_auto_close(&self, toast: ElementId) -> bool {
        self.toasts
            .get(&toast)
            .and_then(|entry| entry.timer)
            .is_some_and(|timer| self.timers.is_pending(timer))
    }

    /// Virtual time elapsed since the notifier was created.
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Delay until the next timer is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Shows `message` as a toast configured by `options` over the notifier
    /// defaults.
    ///
    /// `message` is inserted as raw markup.
    ///
    /// # Errors
    ///
    /// Returns an error when the document rejects one of the mutations.
    pub fn notify(&mut self, message: &str, options: &ToastOptions) -> Result<ElementId> {
        let resolved = self.config.resolve(options);
        let toast = self.build_notification(message, &resolved)?;
        let tray = self.ensure_tray(resolved.config.position)?;
        self.document.append_child(tray, toast)?;

        if resolved.config.auto_close {
            self.schedule_auto_close(
                toast,
                resolved.config.duration.saturating_add(ANIMATION_MARGIN),
                resolved.config.stop_on_hover,
            );
        }

        info!(
            toast = %toast,
            kind = %resolved.kind,
            position = %resolved.config.position,
            auto_close = resolved.config.auto_close,
            "toast shown"
        );
        Ok(toast)
    }

    /// Starts removing `toast` as if its close button had been clicked.
    ///
    /// # Errors
    ///
    /// Returns an error when the document rejects one of the mutations.
    pub fn dismiss(&mut self, toast: ElementId) -> Result<()> {
        self.cancel_auto_close(toast);
        self.remove_notification(toast)?;
        self.run_due()
    }

    /// Delivers `event` to `target`, bubbling through its ancestors when the
    /// event bubbles. Events on unknown or removed elements are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when the document rejects one of the mutations.
    pub fn dispatch(&mut self, target: ElementId, event: Event) -> Result<()> {
        self.deliver(target, event)?;
        self.run_due()
    }

    /// Moves the clock forward by `by`, firing every timer that falls due.
    ///
    /// # Errors
    ///
    /// Returns an error when the document rejects one of the mutations. Timers
    /// not yet fired stay pending.
    pub fn advance(&mut self, by: Duration) -> Result<()> {
        let until = self.timers.now().saturating_add(by);
        while let Some((id, task)) = self.timers.pop_due(until) {
            self.fire(id, task)?;
        }
        self.timers.advance_to(until);
        Ok(())
    }

    fn run_due(&mut self) -> Result<()> {
        self.advance(Duration::ZERO)
    }

    fn ensure_tray(&mut self, position: Position) -> Result<ElementId> {
        if let Some(tray) = &self.tray {
            if tray.position != position {
                debug!(
                    requested = %position,
                    current = %tray.position,
                    "tray already placed, ignoring requested position"
                );
            }
            return Ok(tray.element);
        }

        let element = self.document.create_element("div");
        self.document.add_class(element, CONTAINER_CLASS)?;
        self.document.add_class(element, position.as_str())?;
        self.document.append_to_body(element)?;
        self.tray = Some(Tray { element, position });
        debug!(tray = %element, %position, "tray created");
        Ok(element)
    }

    fn schedule_auto_close(&mut self, toast: ElementId, delay: Duration, stop_on_hover: bool) {
        let Some(entry) = self.toasts.get_mut(&toast) else {
            return;
        };
        entry.auto_close = Some(delay);
        let close_button = entry.close_button;
        self.arm_auto_close(toast);

        if let Some(button) = close_button {
            self.listeners
                .add(button, Event::Click, Listener::CancelAutoClose(toast));
        }
        if stop_on_hover {
            self.listeners
                .add(toast, Event::MouseEnter, Listener::PauseAutoClose(toast));
            self.listeners
                .add(toast, Event::MouseLeave, Listener::RestartAutoClose(toast));
        }
    }

    /// Arms a fresh full-length timer, replacing any pending one.
    fn arm_auto_close(&mut self, toast: ElementId) {
        let Some(entry) = self.toasts.get_mut(&toast) else {
            return;
        };
        let Some(delay) = entry.auto_close else {
            return;
        };
        if let Some(previous) = entry.timer.take() {
            self.timers.cancel(previous);
        }
        entry.timer = Some(self.timers.schedule(delay, TimerTask::AutoClose(toast)));
        trace!(toast = %toast, delay_ms = delay.as_millis(), "auto-close armed");
    }

    fn cancel_auto_close(&mut self, toast: ElementId) {
        if let Some(timer) = self
            .toasts
            .get_mut(&toast)
            .and_then(|entry| entry.timer.take())
        {
            self.timers.cancel(timer);
            trace!(toast = %toast, "auto-close cancelled");
        }
    }

    /// Fades `toast` out. Calling it again while fading is a no-op.
    fn remove_notification(&mut self, toast: ElementId) -> Result<()> {
        let Some(entry) = self.toasts.get_mut(&toast) else {
            return Ok(());
        };
        if entry.fading {
            return Ok(());
        }
        entry.fading = true;

        self.document.set_style(toast, "opacity", "0")?;
        self.listeners
            .add(toast, Event::TransitionEnd, Listener::FinishRemoval(toast));
        if let Some(delay) = self.exit_transition {
            self.timers.schedule(delay, TimerTask::TransitionEnd(toast));
        }
        debug!(toast = %toast, "toast fading out");
        Ok(())
    }

    /// Detaches a faded toast, and the tray with it once empty.
    fn finish_removal(&mut self, toast: ElementId) -> Result<()> {
        let Some(entry) = self.toasts.remove(&toast) else {
            return Ok(());
        };
        if let Some(timer) = entry.timer {
            self.timers.cancel(timer);
        }
        self.listeners.forget(toast);
        if let Some(button) = entry.close_button {
            self.listeners.forget(button);
        }

        let tray = self.tray();
        match tray {
            Some(tray) if self.document.parent(toast) == Some(tray) => {
                self.document.remove_child(tray, toast)?;
            }
            _ => {
                warn!(toast = %toast, "toast was detached outside the notifier");
                self.document.remove(toast);
            }
        }
        self.document.discard(toast);
        debug!(toast = %toast, kind = %entry.kind, "toast removed");

        if let Some(tray) = tray {
            if self.document.child_count(tray) == 0 {
                self.document.remove(tray);
                self.document.discard(tray);
                self.tray = None;
                debug!(tray = %tray, "tray removed");
            }
        }
        Ok(())
    }

    fn deliver(&mut self, target: ElementId, event: Event) -> Result<()> {
        let mut current = Some(target);
        while let Some(el) = current {
            let mut stop = false;
            for listener in self.listeners.matching(el, event) {
                stop |= self.run_listener(listener)?;
            }
            if stop || !event.bubbles() {
                break;
            }
            current = self.document.parent(el);
        }
        Ok(())
    }

    /// Runs one listener; returns whether propagation stops.
    fn run_listener(&mut self, listener: Listener) -> Result<bool> {
        match listener {
            Listener::Close(toast) => {
                self.remove_notification(toast)?;
                Ok(true)
            }
            Listener::CancelAutoClose(toast) | Listener::PauseAutoClose(toast) => {
                self.cancel_auto_close(toast);
                Ok(false)
            }
            Listener::RestartAutoClose(toast) => {
                if self.state(toast) == Some(ToastState::Displayed) {
                    self.arm_auto_close(toast);
                }
                Ok(false)
            }
            Listener::FinishRemoval(toast) => {
                self.finish_removal(toast)?;
                Ok(false)
            }
            Listener::Callback(toast, callback) => {
                if self.toasts.contains_key(&toast) {
                    callback(toast);
                }
                Ok(false)
            }
        }
    }

    fn fire(&mut self, id: TimerId, task: TimerTask) -> Result<()> {
        match task {
            TimerTask::AutoClose(toast) => {
                if let Some(entry) = self.toasts.get_mut(&toast) {
                    if entry.timer == Some(id) {
                        entry.timer = None;
                    }
                }
                trace!(toast = %toast, "auto-close fired");
                self.remove_notification(toast)
            }
            TimerTask::TransitionEnd(toast) => self.deliver(toast, Event::TransitionEnd),
        }
    }
}
