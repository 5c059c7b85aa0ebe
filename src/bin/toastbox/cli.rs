use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use toastbox::{Position, ToastKind, ToastOptions};

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Render toast notifications headlessly", long_about = None)]
pub struct Cli {
    /// Message markup shown in the toast (inserted verbatim).
    pub message: String,

    /// Toast kind: info, success, warning or error. Anything else means info.
    #[arg(long, value_name = "KIND")]
    pub kind: Option<String>,

    /// Tray position (ex. "bottom-center").
    #[arg(long)]
    pub position: Option<Position>,

    /// Time before auto-close (ex. "2s").
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Keeps the toast until it is closed.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_auto_close: bool,

    /// Adds the kind glyph before the message.
    #[arg(long, action = ArgAction::SetTrue)]
    pub icons: bool,

    /// Adds a close button.
    #[arg(long, action = ArgAction::SetTrue)]
    pub close_button: bool,

    /// Suspends auto-close while the pointer is over the toast.
    #[arg(long, action = ArgAction::SetTrue)]
    pub stop_on_hover: bool,

    /// Extra classes, separated by spaces.
    #[arg(long = "class", value_name = "CLASSES")]
    pub custom_class: Option<String>,

    /// Inline background color.
    #[arg(long = "bg-color", value_name = "COLOR")]
    pub custom_bg_color: Option<String>,

    /// Icon class string replacing the built-in glyph.
    #[arg(long = "icon", value_name = "CLASSES")]
    pub custom_icon: Option<String>,

    /// Moves the clock forward and prints a snapshot; repeatable.
    #[arg(long = "advance", value_name = "DURATION", value_parser = parse_duration)]
    pub advance: Vec<Duration>,

    /// Prints snapshots as JSON lines instead of bare HTML.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Path of the TOML settings file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Explicit log filter (ex. "toastbox=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Uses a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Call-site options; flags left off defer to the settings file.
    pub fn toast_options(&self) -> ToastOptions {
        ToastOptions {
            kind: Some(
                self.kind
                    .as_deref()
                    .map_or(ToastKind::Info, ToastKind::from_name_lossy),
            ),
            position: self.position,
            duration: self.duration,
            auto_close: self.no_auto_close.then_some(false),
            use_icons: self.icons.then_some(true),
            close_button: self.close_button.then_some(true),
            stop_on_hover: self.stop_on_hover.then_some(true),
            custom_class: self.custom_class.clone(),
            custom_bg_color: self.custom_bg_color.clone(),
            custom_icon: self.custom_icon.clone(),
            on_click: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;
    use toastbox::{Position, ToastKind};

    #[test]
    fn flags_map_to_call_site_options() {
        let cli = Cli::try_parse_from([
            "toastbox",
            "Saved",
            "--kind",
            "success",
            "--position",
            "bottom-left",
            "--duration",
            "1s",
            "--icons",
            "--advance",
            "1600ms",
        ])
        .unwrap();
        let options = cli.toast_options();
        assert_eq!(options.kind, Some(ToastKind::Success));
        assert_eq!(options.position, Some(Position::BottomLeft));
        assert_eq!(options.duration, Some(Duration::from_secs(1)));
        assert_eq!(options.use_icons, Some(true));
        assert_eq!(options.close_button, None);
        assert_eq!(options.auto_close, None);
        assert_eq!(cli.advance, vec![Duration::from_millis(1600)]);
    }

    #[test]
    fn unknown_kind_means_info() {
        let cli = Cli::try_parse_from(["toastbox", "hi", "--kind", "panic"]).unwrap();
        assert_eq!(cli.toast_options().kind, Some(ToastKind::Info));
    }

    #[test]
    fn bad_position_is_rejected() {
        assert!(Cli::try_parse_from(["toastbox", "hi", "--position", "left"]).is_err());
    }
}
