use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

pub struct ServeArgs {
    pub template: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub delay: f64,
    pub exclude: Vec<String>,
    pub json: bool,
}

pub fn cmd_serve(args: ServeArgs) -> Result<()> {
    use cc_server::render::TeraRenderer;
    use cc_server::server::{serve, ServeOptions};
    use cc_server::watcher::ServeEvent;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    let ui = crate::ui::context::UiContext::detect();
    let json = args.json;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    if !json {
        print!(
            "{}",
            crate::ui::views::render_serve_header(
                &args.template.display().to_string(),
                &args.output.display().to_string(),
                args.delay,
                ui.color,
                ui.unicode
            )
        );
    }

    let mut options = ServeOptions::new(args.template, args.output);
    options.config_file = args.config;
    options.min_delay = Duration::from_secs_f64(args.delay.max(0.0));
    options.exclude = args.exclude;

    serve(options, TeraRenderer::new(), running, move |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| {
                    let secs = d.as_secs() % 86_400;
                    let h = secs / 3600;
                    let m = (secs % 3600) / 60;
                    let s = secs % 60;
                    format!("{:02}:{:02}:{:02}", h, m, s)
                })
                .unwrap_or_else(|_| "00:00:00".to_string());

            let rendered =
                crate::ui::views::render_serve_event(&timestamp, &event, ui.color, ui.unicode);

            match event {
                ServeEvent::Error { .. } | ServeEvent::Warning { .. } => eprint!("{rendered}"),
                _ => print!("{rendered}"),
            }
        }
    })?;

    Ok(())
}
