use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToastError;
use crate::options::ToastOptions;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

/// Settings loaded from the TOML file and the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Instance layer applied over the built-in toast defaults.
    pub toast: ToastOptions,
    /// Delay between a toast fading out and its removal. `None` waits for the
    /// host to report the end of the transition.
    pub exit_transition: Option<Duration>,
    /// Bound of the service command queue.
    pub queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            toast: ToastOptions::default(),
            exit_transition: defaults::default_exit_transition(),
            queue_capacity: defaults::default_queue_bound(),
        }
    }
}

impl Settings {
    /// Load settings from a file and the environment.
    ///
    /// A missing file is not an error; every key has a default.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when environment
    /// overrides are invalid, or when the resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }
}
