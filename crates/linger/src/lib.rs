//! What is keeping this process alive?
//!
//! Linger keeps a live registry of async operations (timers, spawned tasks,
//! pending promises, I/O handles) that have been created but not yet settled
//! or destroyed. Enable a [`Tracker`], let the program run, then ask it what is
//! still outstanding and where each operation was created:
//!
//! ```rust,no_run
//! let tracker = linger::Tracker::new();
//! tracker.enable(Some("timeout")).expect("TIMEOUT is a built-in type");
//!
//! // ... run the code under investigation ...
//!
//! for record in tracker.get_unresolved(None) {
//!     eprintln!("{} #{} created at\n{}", record.kind, record.id, record.stack_text());
//! }
//! tracker.disable();
//! ```
//!
//! Events come from [`linger_runtime`]: anything that wraps its async work in
//! an [`AsyncResource`](linger_runtime::AsyncResource) is observable. The
//! `linger-tokio` crate does this for Tokio's timers, tasks and channels.
//!
//! Tracking is passive. The tracker never schedules, cancels or delays the
//! operations it observes.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `LINGER_TRACK` | Enables [`global()`] on first use: `all`, `*`, `1`, or a type tag. |
//! | `LINGER_STACK_FRAMES` | Stack lines kept per record (default 10). |
//! | `LINGER_SKIP_FRAMES` | Extra leading frames to drop from each stack (default 0). |

pub(crate) mod catalog;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod global;
pub(crate) mod hooks;
pub(crate) mod registry;
pub(crate) mod report;
pub(crate) mod tracker;

pub use self::catalog::{BUILTIN_TYPES, TypeCatalog};
pub use self::config::*;
pub use self::error::*;
pub use self::global::global;
pub use self::hooks::Filter;
pub use self::tracker::*;

pub use linger_runtime;
pub use linger_types::{
    AsyncId, OperationRecord, RecordSnapshot, ReportSnapshot, ResourceHandle, TypeTag,
};
