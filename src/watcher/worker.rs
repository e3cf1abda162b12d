//! Watch worker
//!
//! One thread owns every piece of mutable watch state: the cached settings
//! mapping, the debounce clock, and the event receiver. All rendering and
//! synchronization runs inline in the event handler, so a second event
//! arriving mid-cycle is only looked at after the current cycle returns.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::debug;

use crate::error::ServerResult;
use crate::render::TemplateRenderer;
use crate::settings::{self, Settings};
use crate::sync::{sync_tree, SyncReport};

use super::debounce::Debounce;
use super::event::{ChangeEvent, ServeEvent};
use super::filter::is_relevant;

/// Channel wait before re-checking the stop flag
const RECV_TIMEOUT: Duration = Duration::from_millis(50);

pub(crate) struct WatchWorker<R, F> {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_file: PathBuf,
    pub exclude: Vec<String>,
    pub renderer: R,
    pub settings: Option<Settings>,
    pub debounce: Debounce,
    pub on_event: F,
}

impl<R, F> WatchWorker<R, F>
where
    R: TemplateRenderer,
    F: Fn(ServeEvent),
{
    /// Consume events until the stop flag flips
    pub fn run(mut self, rx: Receiver<ChangeEvent>, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            match rx.recv_timeout(RECV_TIMEOUT) {
                Ok(event) => self.handle(event),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        (self.on_event)(ServeEvent::Shutdown);
    }

    /// Filter, debounce, and possibly run one cycle for a single raw event
    pub fn handle(&mut self, event: ChangeEvent) {
        if !is_relevant(&event.path, &self.template_dir, &self.output_dir) {
            return;
        }
        debug!(kind = ?event.kind, path = %event.path.display(), "change detected");

        let now = Instant::now();
        if !self.debounce.ready(now) {
            return;
        }

        let shown = event
            .path
            .strip_prefix(&self.template_dir)
            .unwrap_or(&event.path);
        (self.on_event)(ServeEvent::ChangeDetected {
            path: shown.display().to_string(),
        });

        self.cycle();
        self.debounce.mark(now);
    }

    /// Reload settings, then render+sync once
    fn cycle(&mut self) {
        match settings::load_settings(&self.config_file) {
            Some(settings) => self.settings = Some(settings),
            // transient: keep the previous mapping
            None => (self.on_event)(ServeEvent::Warning {
                message: format!(
                    "settings file {} not readable, keeping previous settings",
                    self.config_file.display()
                ),
            }),
        }

        (self.on_event)(ServeEvent::SyncStarted);
        match run_cycle(
            &self.template_dir,
            self.settings.as_ref(),
            &self.output_dir,
            &self.exclude,
            &self.renderer,
        ) {
            Ok(report) => (self.on_event)(ServeEvent::sync_complete(&report)),
            Err(e) => (self.on_event)(ServeEvent::Error {
                message: e.to_string(),
            }),
        }
    }
}

/// Render into a scratch snapshot and reconcile it into the output directory
///
/// The snapshot is removed when it drops, whatever the outcome, so a failed
/// render never touches the output directory.
pub(crate) fn run_cycle(
    template_dir: &Path,
    settings: Option<&Settings>,
    output_dir: &Path,
    exclude: &[String],
    renderer: &impl TemplateRenderer,
) -> ServerResult<SyncReport> {
    let snapshot = TempDir::new()?;
    renderer.render(template_dir, settings, snapshot.path())?;
    sync_tree(snapshot.path(), output_dir, exclude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use std::fs;
    use std::sync::mpsc::channel;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Renderer stand-in that writes a fixed tree and counts invocations
    struct FixedRenderer {
        calls: Arc<Mutex<usize>>,
    }

    impl TemplateRenderer for FixedRenderer {
        fn render(
            &self,
            _template_dir: &Path,
            _settings: Option<&Settings>,
            target_dir: &Path,
        ) -> ServerResult<()> {
            *self.calls.lock().unwrap() += 1;
            let project = target_dir.join("my-project");
            fs::create_dir_all(&project)?;
            fs::write(project.join("README.md"), "rendered")?;
            Ok(())
        }
    }

    struct FailingRenderer;

    impl TemplateRenderer for FailingRenderer {
        fn render(
            &self,
            _template_dir: &Path,
            _settings: Option<&Settings>,
            _target_dir: &Path,
        ) -> ServerResult<()> {
            Err(ServerError::Render {
                path: PathBuf::from("broken.txt"),
                message: "boom".to_string(),
            })
        }
    }

    fn worker_in(
        dir: &Path,
        calls: Arc<Mutex<usize>>,
        events: Arc<Mutex<Vec<String>>>,
    ) -> WatchWorker<FixedRenderer, impl Fn(ServeEvent)> {
        let template_dir = dir.join("template");
        let output_dir = dir.join("serve");
        fs::create_dir_all(&template_dir).unwrap();
        let config_file = template_dir.join("cookiecutter-server.yml");
        fs::write(&config_file, "project_slug: my-project\n").unwrap();

        WatchWorker {
            template_dir,
            output_dir,
            config_file,
            exclude: vec![".git".to_string()],
            renderer: FixedRenderer { calls },
            settings: None,
            debounce: Debounce::new(Duration::ZERO, Instant::now()),
            on_event: move |event: ServeEvent| events.lock().unwrap().push(event.to_json()),
        }
    }

    #[test]
    fn relevant_event_runs_a_cycle() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(0));
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut worker = worker_in(dir.path(), calls.clone(), events.clone());

        let path = worker.template_dir.join("cookiecutter.json");
        worker.handle(ChangeEvent {
            kind: notify::EventKind::Any,
            path,
        });

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(dir.path().join("serve/my-project/README.md").is_file());
        let captured = events.lock().unwrap();
        assert!(captured.iter().any(|e| e.contains("change_detected")));
        assert!(captured.iter().any(|e| e.contains("sync_complete")));
    }

    #[test]
    fn irrelevant_events_never_trigger() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(0));
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut worker = worker_in(dir.path(), calls.clone(), events.clone());

        for path in [
            worker.template_dir.join("notes.txt~"),
            worker.output_dir.join("my-project/README.md"),
            worker.template_dir.join(".git/index.lock"),
        ] {
            worker.handle(ChangeEvent {
                kind: notify::EventKind::Any,
                path,
            });
        }

        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn debounced_events_are_dropped() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(0));
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut worker = worker_in(dir.path(), calls.clone(), events);
        worker.debounce = Debounce::new(Duration::from_secs(3600), Instant::now());

        worker.handle(ChangeEvent {
            kind: notify::EventKind::Any,
            path: worker.template_dir.join("cookiecutter.json"),
        });

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn render_failure_reports_error_and_keeps_going() {
        let dir = tempdir().unwrap();
        let template_dir = dir.path().join("template");
        fs::create_dir_all(&template_dir).unwrap();
        let config_file = template_dir.join("cookiecutter-server.yml");
        fs::write(&config_file, "a: 1\n").unwrap();
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        let mut worker = WatchWorker {
            template_dir: template_dir.clone(),
            output_dir: dir.path().join("serve"),
            config_file,
            exclude: vec![],
            renderer: FailingRenderer,
            settings: None,
            debounce: Debounce::new(Duration::ZERO, Instant::now()),
            on_event: move |event: ServeEvent| {
                events_clone.lock().unwrap().push(event.to_json())
            },
        };

        worker.handle(ChangeEvent {
            kind: notify::EventKind::Any,
            path: template_dir.join("cookiecutter.json"),
        });

        // the cycle is abandoned and nothing was written
        assert!(!dir.path().join("serve").exists());
        let captured = events.lock().unwrap();
        assert!(captured.iter().any(|e| e.contains("\"event\":\"error\"")));
    }

    #[test]
    fn missing_settings_file_keeps_previous_mapping() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(0));
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let mut worker = worker_in(dir.path(), calls.clone(), events.clone());

        let mut previous = Settings::new();
        previous.insert(
            serde_yaml_ng::Value::from("project_slug"),
            serde_yaml_ng::Value::from("kept"),
        );
        worker.settings = Some(previous.clone());
        fs::remove_file(&worker.config_file).unwrap();

        worker.handle(ChangeEvent {
            kind: notify::EventKind::Any,
            path: worker.template_dir.join("cookiecutter.json"),
        });

        assert_eq!(worker.settings, Some(previous));
        assert_eq!(*calls.lock().unwrap(), 1);
        let captured = events.lock().unwrap();
        assert!(captured.iter().any(|e| e.contains("\"event\":\"warning\"")));
    }

    #[test]
    fn stop_mid_cycle_lets_the_cycle_finish() {
        struct SlowRenderer;

        impl TemplateRenderer for SlowRenderer {
            fn render(
                &self,
                _template_dir: &Path,
                _settings: Option<&Settings>,
                target_dir: &Path,
            ) -> ServerResult<()> {
                std::thread::sleep(Duration::from_millis(300));
                fs::create_dir_all(target_dir)?;
                fs::write(target_dir.join("done.txt"), "done")?;
                Ok(())
            }
        }

        let dir = tempdir().unwrap();
        let template_dir = dir.path().join("template");
        fs::create_dir_all(&template_dir).unwrap();
        let config_file = template_dir.join("cookiecutter-server.yml");
        fs::write(&config_file, "a: 1\n").unwrap();
        let output_dir = dir.path().join("serve");
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        let worker = WatchWorker {
            template_dir: template_dir.clone(),
            output_dir: output_dir.clone(),
            config_file,
            exclude: vec![],
            renderer: SlowRenderer,
            settings: None,
            debounce: Debounce::new(Duration::ZERO, Instant::now()),
            on_event: move |event: ServeEvent| {
                events_clone.lock().unwrap().push(event.to_json())
            },
        };

        let (tx, rx) = channel();
        tx.send(ChangeEvent {
            kind: notify::EventKind::Any,
            path: template_dir.join("cookiecutter.json"),
        })
        .unwrap();

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let handle = std::thread::spawn(move || worker.run(rx, running_clone));

        // flip the stop flag while the slow render is in flight
        std::thread::sleep(Duration::from_millis(100));
        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();

        assert!(output_dir.join("done.txt").is_file());
        let captured = events.lock().unwrap();
        assert!(captured.iter().any(|e| e.contains("sync_complete")));
        assert!(captured.last().unwrap().contains("shutdown"));
    }

    #[test]
    fn run_emits_shutdown_when_stopped() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(Mutex::new(0));
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let worker = worker_in(dir.path(), calls, events.clone());

        let (_tx, rx) = channel();
        let running = Arc::new(AtomicBool::new(false));
        worker.run(rx, running);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert!(captured[0].contains("\"event\":\"shutdown\""));
    }
}
