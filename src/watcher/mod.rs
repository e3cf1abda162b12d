//! Change watcher
//!
//! Watches the template directory for changes and turns bursts of raw
//! filesystem events into render+sync cycles:
//! - per-event relevance filter (backup files, output subtree, dot-entries)
//! - leading-edge debounce (default 5s window, no trailing flush)
//! - one worker thread owning all mutable watch state

mod debounce;
mod event;
mod filter;
mod worker;

pub use debounce::Debounce;
pub use event::{ChangeEvent, ServeEvent};
pub use filter::is_relevant;
pub(crate) use worker::{run_cycle, WatchWorker};
