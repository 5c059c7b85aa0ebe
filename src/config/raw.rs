use std::path::Path;
use std::time::Duration;

use humantime::parse_duration;
use serde::Deserialize;

use crate::Result;
use crate::error::ConfigError;
use crate::options::ToastOptions;
use crate::types::Position;

use super::Settings;
use super::defaults::{default_exit_transition, default_queue_bound};
use super::env::{env_duration, env_flag, env_from_str, env_value};

/// Valeurs de `exit_transition` qui laissent l'hôte signaler la fin du fondu.
const HOST_DRIVEN_TRANSITION: [&str; 3] = ["none", "off", "host"];

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("TOASTBOX")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: ToastOptions,
    #[serde(default)]
    pub(super) host: RawHost,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawHost {
    #[serde(default)]
    pub(super) exit_transition: Option<String>,
    #[serde(default = "default_queue_bound")]
    pub(super) queue_bound: usize,
}

impl Default for RawHost {
    fn default() -> Self {
        Self {
            exit_transition: None,
            queue_bound: default_queue_bound(),
        }
    }
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(position) = env_from_str::<Position>("TOAST_POSITION")? {
            self.toast.position = Some(position);
        }
        if let Some(duration) = env_duration("TOAST_DURATION")? {
            self.toast.duration = Some(duration);
        }
        if let Some(auto_close) = env_flag("TOAST_AUTO_CLOSE")? {
            self.toast.auto_close = Some(auto_close);
        }
        if let Some(use_icons) = env_flag("TOAST_USE_ICONS")? {
            self.toast.use_icons = Some(use_icons);
        }
        if let Some(close_button) = env_flag("TOAST_CLOSE_BUTTON")? {
            self.toast.close_button = Some(close_button);
        }
        if let Some(stop_on_hover) = env_flag("TOAST_STOP_ON_HOVER")? {
            self.toast.stop_on_hover = Some(stop_on_hover);
        }
        if let Some(class) = env_value("TOAST_CLASS")? {
            self.toast.custom_class = Some(class);
        }
        if let Some(color) = env_value("TOAST_BG_COLOR")? {
            self.toast.custom_bg_color = Some(color);
        }
        if let Some(icon) = env_value("TOAST_ICON")? {
            self.toast.custom_icon = Some(icon);
        }
        if let Some(transition) = env_value("TOAST_EXIT_TRANSITION")? {
            self.host.exit_transition = Some(transition);
        }
        if let Some(bound) = env_from_str::<usize>("TOAST_QUEUE_BOUND")? {
            self.host.queue_bound = bound;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Settings> {
        let mut toast = self.toast;

        if toast.duration.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::InvalidField {
                field: "toast.duration",
                message: "duration must be greater than zero".to_string(),
            }
            .into());
        }
        if toast
            .custom_bg_color
            .as_deref()
            .is_some_and(|color| color.trim().is_empty())
        {
            return Err(ConfigError::InvalidField {
                field: "toast.custom_bg_color",
                message: "color cannot be blank".to_string(),
            }
            .into());
        }
        toast.custom_class = non_blank(toast.custom_class);
        toast.custom_icon = non_blank(toast.custom_icon);

        if self.host.queue_bound == 0 {
            return Err(ConfigError::InvalidField {
                field: "host.queue_bound",
                message: "queue bound must be greater than zero".to_string(),
            }
            .into());
        }

        let exit_transition = parse_exit_transition(self.host.exit_transition.as_deref())?;

        Ok(Settings {
            toast,
            exit_transition,
            queue_capacity: self.host.queue_bound,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_exit_transition(
    raw: Option<&str>,
) -> std::result::Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(default_exit_transition());
    };
    if HOST_DRIVEN_TRANSITION.contains(&raw.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    parse_duration(raw)
        .map(Some)
        .map_err(|err| ConfigError::InvalidField {
            field: "host.exit_transition",
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{RawConfig, load};
    use crate::error::{ConfigError, Error};
    use crate::types::Position;
    use std::time::Duration;

    fn parse(toml: &str) -> RawConfig {
        let path = std::env::temp_dir().join(format!(
            "toastbox-raw-{}-{}.toml",
            std::process::id(),
            toml.len()
        ));
        std::fs::write(&path, toml).unwrap();
        let raw = load(&path);
        let _ = std::fs::remove_file(&path);
        raw.unwrap()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let raw = load("/nonexistent/toastbox.toml").unwrap();
        let settings = raw.validate_and_build().unwrap();
        assert_eq!(settings.exit_transition, Some(Duration::ZERO));
        assert_eq!(settings.queue_capacity, 64);
        assert!(settings.toast.position.is_none());
    }

    #[test]
    fn file_values_land_in_the_instance_layer() {
        let raw = parse(
            r#"
[toast]
position = "bottom-center"
duration = "2s"
use_icons = true
custom_class = "brand wide"

[host]
exit_transition = "250ms"
queue_bound = 8
"#,
        );
        let settings = raw.validate_and_build().unwrap();
        assert_eq!(settings.toast.position, Some(Position::BottomCenter));
        assert_eq!(settings.toast.duration, Some(Duration::from_secs(2)));
        assert_eq!(settings.toast.use_icons, Some(true));
        assert_eq!(settings.toast.custom_class.as_deref(), Some("brand wide"));
        assert_eq!(settings.exit_transition, Some(Duration::from_millis(250)));
        assert_eq!(settings.queue_capacity, 8);
    }

    #[test]
    fn host_driven_transition_disables_the_simulated_fade() {
        let mut raw = RawConfig::default();
        raw.host.exit_transition = Some("Host".to_string());
        let settings = raw.validate_and_build().unwrap();
        assert_eq!(settings.exit_transition, None);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut raw = RawConfig::default();
        raw.toast.duration = Some(Duration::ZERO);
        let err = raw.validate_and_build().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidField {
                field: "toast.duration",
                ..
            })
        ));
    }

    #[test]
    fn blank_class_and_icon_are_dropped() {
        let mut raw = RawConfig::default();
        raw.toast.custom_class = Some("   ".to_string());
        raw.toast.custom_icon = Some(String::new());
        let settings = raw.validate_and_build().unwrap();
        assert!(settings.toast.custom_class.is_none());
        assert!(settings.toast.custom_icon.is_none());
    }

    #[test]
    fn zero_queue_bound_is_rejected() {
        let mut raw = RawConfig::default();
        raw.host.queue_bound = 0;
        assert!(raw.validate_and_build().is_err());
    }

    #[test]
    fn bad_exit_transition_names_the_field() {
        let mut raw = RawConfig::default();
        raw.host.exit_transition = Some("soon".to_string());
        let err = raw.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("host.exit_transition"));
    }
}
