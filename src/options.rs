//! Toast configuration and its layered resolution.
//!
//! Every toast is configured from three layers, applied key by key with the
//! later layer winning:
//!
//! 1. built-in defaults ([`ToastConfig::default`]);
//! 2. instance overrides given when the notifier is built;
//! 3. call-site overrides given to `notify`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::config::HumantimeDuration;
use crate::dom::ElementId;
use crate::types::{Position, ToastKind};

/// Callback run when a toast is clicked; receives the toast element.
pub type ClickCallback = Arc<dyn Fn(ElementId) + Send + Sync>;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// Fully resolved per-instance defaults.
#[derive(Clone)]
pub struct ToastConfig {
    pub position: Position,
    pub duration: Duration,
    pub auto_close: bool,
    pub use_icons: bool,
    pub close_button: bool,
    pub stop_on_hover: bool,
    pub custom_class: Option<String>,
    pub custom_bg_color: Option<String>,
    pub custom_icon: Option<String>,
    pub on_click: Option<ClickCallback>,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            position: Position::TopRight,
            duration: DEFAULT_DURATION,
            auto_close: true,
            use_icons: false,
            close_button: false,
            stop_on_hover: false,
            custom_class: None,
            custom_bg_color: None,
            custom_icon: None,
            on_click: None,
        }
    }
}

impl fmt::Debug for ToastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastConfig")
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("auto_close", &self.auto_close)
            .field("use_icons", &self.use_icons)
            .field("close_button", &self.close_button)
            .field("stop_on_hover", &self.stop_on_hover)
            .field("custom_class", &self.custom_class)
            .field("custom_bg_color", &self.custom_bg_color)
            .field("custom_icon", &self.custom_icon)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl ToastConfig {
    /// Returns a copy with every key set in `overrides` replaced.
    #[must_use]
    pub fn with_overrides(&self, overrides: &ToastOptions) -> Self {
        Self {
            position: overrides.position.unwrap_or(self.position),
            duration: overrides.duration.unwrap_or(self.duration),
            auto_close: overrides.auto_close.unwrap_or(self.auto_close),
            use_icons: overrides.use_icons.unwrap_or(self.use_icons),
            close_button: overrides.close_button.unwrap_or(self.close_button),
            stop_on_hover: overrides.stop_on_hover.unwrap_or(self.stop_on_hover),
            custom_class: layer_text(
                overrides.custom_class.as_deref(),
                self.custom_class.as_deref(),
            ),
            custom_bg_color: layer_text(
                overrides.custom_bg_color.as_deref(),
                self.custom_bg_color.as_deref(),
            ),
            custom_icon: layer_text(
                overrides.custom_icon.as_deref(),
                self.custom_icon.as_deref(),
            ),
            on_click: overrides
                .on_click
                .clone()
                .or_else(|| self.on_click.clone()),
        }
    }

    /// Resolves the settings of a single toast from this config and the
    /// call-site overrides.
    #[must_use]
    pub fn resolve(&self, call: &ToastOptions) -> ResolvedToast {
        ResolvedToast {
            kind: call.kind.unwrap_or_default(),
            config: self.with_overrides(call),
        }
    }
}

/// Partial configuration: every key is optional.
///
/// Deserializes from the `[toast]` table of the settings file; `kind` and
/// `on_click` can only be set from code.
#[serde_as]
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToastOptions {
    #[serde(skip)]
    pub kind: Option<ToastKind>,
    pub position: Option<Position>,
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub duration: Option<Duration>,
    pub auto_close: Option<bool>,
    pub use_icons: Option<bool>,
    pub close_button: Option<bool>,
    #[serde(alias = "stopOnHover")]
    pub stop_on_hover: Option<bool>,
    pub custom_class: Option<String>,
    pub custom_bg_color: Option<String>,
    pub custom_icon: Option<String>,
    #[serde(skip)]
    pub on_click: Option<ClickCallback>,
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("auto_close", &self.auto_close)
            .field("use_icons", &self.use_icons)
            .field("close_button", &self.close_button)
            .field("stop_on_hover", &self.stop_on_hover)
            .field("custom_class", &self.custom_class)
            .field("custom_bg_color", &self.custom_bg_color)
            .field("custom_icon", &self.custom_icon)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl ToastOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub const fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub const fn auto_close(mut self, enabled: bool) -> Self {
        self.auto_close = Some(enabled);
        self
    }

    #[must_use]
    pub const fn use_icons(mut self, enabled: bool) -> Self {
        self.use_icons = Some(enabled);
        self
    }

    #[must_use]
    pub const fn close_button(mut self, enabled: bool) -> Self {
        self.close_button = Some(enabled);
        self
    }

    #[must_use]
    pub const fn stop_on_hover(mut self, enabled: bool) -> Self {
        self.stop_on_hover = Some(enabled);
        self
    }

    #[must_use]
    pub fn custom_class(mut self, classes: impl Into<String>) -> Self {
        self.custom_class = Some(classes.into());
        self
    }

    #[must_use]
    pub fn custom_bg_color(mut self, color: impl Into<String>) -> Self {
        self.custom_bg_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn custom_icon(mut self, icon_class: impl Into<String>) -> Self {
        self.custom_icon = Some(icon_class.into());
        self
    }

    #[must_use]
    pub fn on_click(mut self, callback: impl Fn(ElementId) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(callback));
        self
    }
}

/// Layers an optional string key. A blank override switches the feature off
/// instead of falling through to `base`.
fn layer_text(over: Option<&str>, base: Option<&str>) -> Option<String> {
    match over {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value.to_string()),
        None => base.map(str::to_string),
    }
}

/// Settings of one toast after all layers are applied.
#[derive(Clone, Debug)]
pub struct ResolvedToast {
    pub kind: ToastKind,
    pub config: ToastConfig,
}
