//! Server orchestrator
//!
//! Wires settings store, renderer, synchronizer, and watcher together:
//! initial render if the output directory is absent, then a background
//! watch worker while the foreground thread polls the stop flag. The stop
//! flag is the only cross-thread state; shutdown is cooperative with a
//! bounded join so an unresponsive cycle never hangs the process.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::{ServerError, ServerResult};
use crate::render::TemplateRenderer;
use crate::settings;
use crate::watcher::{run_cycle, ChangeEvent, Debounce, ServeEvent, WatchWorker};

/// Default debounce window between render+sync cycles
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(5);

/// Bounded wait for the watch worker during shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Stop-flag poll interval for the foreground loop
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Serve options
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Template source directory
    pub template_dir: PathBuf,
    /// Output directory, fully owned by the server
    pub output_dir: PathBuf,
    /// Explicit settings file; defaults to cookiecutter-server.yml in the template
    pub config_file: Option<PathBuf>,
    /// Debounce window, zero disables debouncing
    pub min_delay: Duration,
    /// Path components protected from the purge
    pub exclude: Vec<String>,
}

impl ServeOptions {
    pub fn new(template_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            template_dir,
            output_dir,
            config_file: None,
            min_delay: DEFAULT_MIN_DELAY,
            exclude: vec![".git".to_string()],
        }
    }
}

/// Serve live previews until the stop flag flips
///
/// Startup failures (bad template path, missing manifest, malformed config,
/// failed first render) are returned; everything after the watcher starts
/// is reported through `on_event` and never aborts the loop.
pub fn serve<R, F>(
    options: ServeOptions,
    renderer: R,
    running: Arc<AtomicBool>,
    on_event: F,
) -> ServerResult<()>
where
    R: TemplateRenderer + Send + 'static,
    F: Fn(ServeEvent) + Send + 'static,
{
    if !options.template_dir.is_dir() {
        return Err(ServerError::TemplateNotFound {
            path: options.template_dir,
        });
    }

    let config_file = settings::init_config(&options.template_dir, options.config_file.clone())?;
    on_event(ServeEvent::ServeStarted {
        template: options.template_dir.display().to_string(),
        output: options.output_dir.display().to_string(),
    });

    // first preview before watching begins; a pre-existing output directory
    // is left alone until the first change
    let cached_settings = settings::load_settings(&config_file);
    if !options.output_dir.is_dir() {
        let report = run_cycle(
            &options.template_dir,
            cached_settings.as_ref(),
            &options.output_dir,
            &options.exclude,
            &renderer,
        )?;
        debug!(written = report.written.len(), "initial render complete");
    }
    on_event(ServeEvent::TemplateReady {
        output: options.output_dir.display().to_string(),
    });

    // canonical roots so paths from the notify backend compare cleanly
    let template_root = options
        .template_dir
        .canonicalize()
        .unwrap_or(options.template_dir);
    let output_root = options.output_dir.canonicalize().unwrap_or(options.output_dir);

    let (tx, rx) = channel();
    let mut fs_watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let kind = event.kind;
                for path in event.paths {
                    let _ = tx.send(ChangeEvent { kind, path });
                }
            }
        },
        Config::default(),
    )
    .map_err(|e| ServerError::Io(std::io::Error::other(e.to_string())))?;

    fs_watcher
        .watch(&template_root, RecursiveMode::Recursive)
        .map_err(|e| ServerError::Io(std::io::Error::other(e.to_string())))?;
    debug!(template = %template_root.display(), "watching for changes");

    let worker = WatchWorker {
        template_dir: template_root,
        output_dir: output_root,
        config_file,
        exclude: options.exclude,
        renderer,
        settings: cached_settings,
        debounce: Debounce::new(options.min_delay, Instant::now()),
        on_event,
    };

    let worker_running = running.clone();
    let handle = thread::spawn(move || {
        // the notify subscription must outlive the event loop
        let _fs_watcher = fs_watcher;
        worker.run(rx, worker_running);
    });

    // foreground wait loop: nothing to do but watch the stop flag
    while running.load(Ordering::SeqCst) {
        thread::sleep(POLL_INTERVAL);
    }

    // cooperative shutdown: an in-flight cycle is allowed to finish, but
    // only within the bounded wait
    let deadline = Instant::now() + SHUTDOWN_TIMEOUT;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
    }
    if handle.is_finished() {
        let _ = handle.join();
    } else {
        warn!(timeout = ?SHUTDOWN_TIMEOUT, "watch worker did not stop in time, exiting anyway");
    }
    Ok(())
}
