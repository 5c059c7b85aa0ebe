use std::path::PathBuf;

use toastbox::Result;
use toastbox::config::Settings;
use toastbox::error::{ConfigError, Error as ToastError};
use toastbox::telemetry::init_tracing;
use toastbox::{MemoryDocument, Notifier, Position};
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "toastbox.toml";

pub fn run(cli: &Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let settings = Settings::from_env_and_file(&config_path)?;

    if cli.duration.is_some_and(|d| d.is_zero()) {
        return Err(ToastError::from(ConfigError::InvalidField {
            field: "cli.duration",
            message: "duration must be greater than zero".to_string(),
        }));
    }

    let mut notifier = Notifier::from_settings(MemoryDocument::new(), &settings);
    let toast = notifier.notify(&cli.message, &cli.toast_options())?;
    info!(toast = %toast, config = %config_path.display(), "toast rendered");

    print_snapshot(&notifier, cli.json);
    for step in &cli.advance {
        notifier.advance(*step)?;
        print_snapshot(&notifier, cli.json);
    }
    Ok(())
}

fn print_snapshot(notifier: &Notifier, json: bool) {
    let html = notifier.document().to_html();
    if json {
        let snapshot = serde_json::json!({
            "at_ms": u64::try_from(notifier.now().as_millis()).unwrap_or(u64::MAX),
            "active": notifier.active_count(),
            "tray": notifier.tray_position().map(Position::as_str),
            "html": html,
        });
        println!("{snapshot}");
    } else {
        println!("[{}] {html}", humantime::format_duration(notifier.now()));
    }
}
