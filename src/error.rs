use thiserror::Error;

use crate::dom::ElementId;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("notification service is no longer running")]
    ServiceClosed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
    #[error("element {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },
    #[error("element {0} is already attached")]
    AlreadyAttached(ElementId),
}
