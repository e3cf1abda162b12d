use cc_server::watcher::ServeEvent;
use crossterm::style::Stylize;

use crate::ui::theme::{colors, Icon};

/// Header printed once before the event stream starts
pub fn render_serve_header(
    template: &str,
    output: &str,
    delay_secs: f64,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let title = if supports_color {
        format!("{}", "cc-server".with(colors::INFO).bold())
    } else {
        "cc-server".to_string()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        Icon::Watch.colored(supports_color, supports_unicode),
        title
    ));
    out.push_str(&format!("Template: {}\n", template));
    out.push_str(&format!("Output: {}\n", output));
    out.push_str(&format!("Delay: {}s\n", delay_secs));
    out.push_str("Hint: Press Ctrl+C to stop\n");
    out
}

/// One rendered line per serve event
pub fn render_serve_event(
    timestamp: &str,
    event: &ServeEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = format!("[{}]", timestamp);

    match event {
        ServeEvent::ServeStarted { template, .. } => format!(
            "{} {} Watching: {}\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode),
            template
        ),
        ServeEvent::TemplateReady { output } => format!(
            "{} {} template is ready: {}\n",
            prefix,
            Icon::Success.colored(supports_color, supports_unicode),
            output
        ),
        ServeEvent::ChangeDetected { path } => format!(
            "{} {} Updating: {}\n",
            prefix,
            Icon::Arrow.colored(supports_color, supports_unicode),
            path
        ),
        ServeEvent::SyncStarted => format!(
            "{} {} Syncing...\n",
            prefix,
            Icon::Progress.colored(supports_color, supports_unicode)
        ),
        ServeEvent::SyncComplete {
            written,
            skipped,
            deleted,
            errors,
        } => {
            let icon = if *errors > 0 {
                Icon::Warning
            } else {
                Icon::Success
            }
            .colored(supports_color, supports_unicode);

            if *errors > 0 {
                format!(
                    "{} {} Sync: {} written, {} skipped, {} deleted, {} errors\n",
                    prefix, icon, written, skipped, deleted, errors
                )
            } else {
                format!(
                    "{} {} Sync: {} written, {} skipped, {} deleted\n",
                    prefix, icon, written, skipped, deleted
                )
            }
        }
        ServeEvent::Warning { message } => format!(
            "{} {} Warning: {}\n",
            prefix,
            Icon::Warning.colored(supports_color, supports_unicode),
            message
        ),
        ServeEvent::Error { message } => format!(
            "{} {} Error: {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        ServeEvent::Shutdown => format!(
            "\n{} {} cc-server terminated.\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
    }
}
