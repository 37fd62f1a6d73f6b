//! Task spawning and tracked futures, mirroring [`tokio::task`].
//!
//! | Item | Tokio equivalent | Type tag |
//! |---|---|---|
//! | [`spawn`] | `tokio::task::spawn` | `TASK` |
//! | [`yield_now`] | `tokio::task::yield_now` | `IMMEDIATE` |
//! | [`FutureExt::tracked`] | n/a | `PROMISE` |

use std::future::Future;

use linger_runtime::{AsyncResource, ResourceHandle};

pub use tokio::task::{JoinError, JoinHandle};

use super::scoped::Tracked;

struct TaskInfo {
    name: String,
}

impl std::fmt::Debug for TaskInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task {:?}", self.name)
    }
}

/// Spawns `future` as a `TASK` resource named `name`.
///
/// The spawning context becomes the task's trigger. The task settles when
/// the future completes and is destroyed if it is aborted first.
pub fn spawn<F>(name: impl Into<String>, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let resource = AsyncResource::new(
        "TASK",
        ResourceHandle::new(TaskInfo { name: name.into() }),
    );
    tokio::task::spawn(Tracked::new(future, resource))
}

/// Instrumented equivalent of [`tokio::task::yield_now`]: an `IMMEDIATE`
/// resource that settles once the task is resumed.
pub fn yield_now() -> impl Future<Output = ()> + Send {
    let resource = AsyncResource::new("IMMEDIATE", ResourceHandle::new("yield_now"));
    async move {
        tokio::task::yield_now().await;
        resource.resolve();
    }
}

/// Announces arbitrary futures as async resources.
pub trait FutureExt: Future + Sized {
    /// Wraps `self` as a `PROMISE` that settles when it completes.
    #[track_caller]
    fn tracked(self) -> Tracked<Self> {
        self.tracked_as("PROMISE")
    }

    /// Like [`tracked`](Self::tracked), announcing the future under `kind`.
    /// Use this with types added through `Tracker::register`.
    #[track_caller]
    fn tracked_as(self, kind: &str) -> Tracked<Self> {
        let location = std::panic::Location::caller();
        let resource = AsyncResource::new(kind, ResourceHandle::new(location.to_string()));
        Tracked::new(self, resource)
    }
}

impl<F: Future> FutureExt for F {}
