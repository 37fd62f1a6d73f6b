//! Timers, mirroring [`tokio::time`]. Each timer is a `TIMEOUT` resource.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use linger_runtime::{AsyncResource, ResourceHandle};
use tokio::time::Instant;

pub use tokio::time::error;

const KIND: &str = "TIMEOUT";

struct TimerInfo {
    name: &'static str,
    period: Duration,
}

impl std::fmt::Debug for TimerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.name, self.period)
    }
}

fn timer_resource(name: &'static str, period: Duration) -> AsyncResource {
    AsyncResource::new(KIND, ResourceHandle::new(TimerInfo { name, period }))
}

/// Instrumented equivalent of [`tokio::time::Sleep`]. Settles when it fires.
pub struct Sleep {
    inner: Pin<Box<tokio::time::Sleep>>,
    resource: AsyncResource,
}

/// Instrumented equivalent of [`tokio::time::sleep`].
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        inner: Box::pin(tokio::time::sleep(duration)),
        resource: timer_resource("sleep", duration),
    }
}

impl Sleep {
    pub fn deadline(&self) -> Instant {
        self.inner.deadline()
    }

    pub fn is_elapsed(&self) -> bool {
        self.inner.is_elapsed()
    }

    pub fn resource(&self) -> &AsyncResource {
        &self.resource
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        let poll = this.resource.in_scope(|| this.inner.as_mut().poll(cx));
        if poll.is_ready() {
            this.resource.resolve();
        }
        poll
    }
}

/// Instrumented equivalent of [`tokio::time::Timeout`]. Settles when the
/// inner future completes or the deadline passes, whichever comes first.
pub struct Timeout<F> {
    inner: Pin<Box<tokio::time::Timeout<F>>>,
    resource: AsyncResource,
}

/// Instrumented equivalent of [`tokio::time::timeout`].
pub fn timeout<F: Future>(duration: Duration, future: F) -> Timeout<F> {
    Timeout {
        inner: Box::pin(tokio::time::timeout(duration, future)),
        resource: timer_resource("timeout", duration),
    }
}

impl<F> Timeout<F> {
    pub fn resource(&self) -> &AsyncResource {
        &self.resource
    }
}

impl<F: Future> Future for Timeout<F> {
    type Output = Result<F::Output, error::Elapsed>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let poll = this.resource.in_scope(|| this.inner.as_mut().poll(cx));
        if poll.is_ready() {
            this.resource.resolve();
        }
        poll
    }
}

/// Instrumented equivalent of [`tokio::time::Interval`].
///
/// A repeating timer never settles on its own; it stays outstanding until
/// dropped.
pub struct Interval {
    inner: tokio::time::Interval,
    resource: AsyncResource,
}

/// Instrumented equivalent of [`tokio::time::interval`].
pub fn interval(period: Duration) -> Interval {
    Interval {
        inner: tokio::time::interval(period),
        resource: timer_resource("interval", period),
    }
}

impl Interval {
    /// Waits for the next tick, equivalent to [`tokio::time::Interval::tick`].
    pub async fn tick(&mut self) -> Instant {
        let Self { inner, resource } = self;
        let mut tick = std::pin::pin!(inner.tick());
        std::future::poll_fn(|cx| resource.in_scope(|| tick.as_mut().poll(cx))).await
    }

    pub fn period(&self) -> Duration {
        self.inner.period()
    }

    pub fn resource(&self) -> &AsyncResource {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enabled::test_support::{Live, test_guard};

    #[tokio::test(start_paused = true)]
    async fn sleep_is_outstanding_until_it_fires() {
        let _guard = test_guard();
        let (live, _hook) = Live::start();

        let nap = sleep(Duration::from_millis(10));
        let timers = live.outstanding(KIND);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].resource, "sleep(10ms)");

        nap.await;
        assert!(live.outstanding(KIND).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sleep_is_destroyed() {
        let _guard = test_guard();
        let (live, _hook) = Live::start();

        let nap = sleep(Duration::from_secs(3600));
        assert_eq!(live.outstanding(KIND).len(), 1);
        drop(nap);
        assert!(live.outstanding(KIND).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_settles_on_either_outcome() {
        let _guard = test_guard();
        let (live, _hook) = Live::start();

        let fast = timeout(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(fast.ok(), Some(7));
        assert!(live.outstanding(KIND).is_empty());

        let slow = timeout(Duration::from_millis(5), std::future::pending::<()>()).await;
        assert!(slow.is_err());
        assert!(live.outstanding(KIND).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_stays_outstanding_across_ticks() {
        let _guard = test_guard();
        let (live, _hook) = Live::start();

        let mut every = interval(Duration::from_millis(5));
        every.tick().await;
        every.tick().await;
        assert_eq!(live.outstanding(KIND).len(), 1);
        drop(every);
        assert!(live.outstanding(KIND).is_empty());
    }
}
