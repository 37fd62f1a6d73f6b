//! Single-value channel, mirroring [`tokio::sync::oneshot`].
//!
//! The channel is one `PROMISE` resource shared by both halves. It settles
//! when a value is sent or the sender is dropped, and is destroyed once both
//! halves are gone.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use linger_runtime::{AsyncResource, ResourceHandle};

pub use tokio::sync::oneshot::error;

use crate::enabled::scoped::Tracked;

struct ChannelInfo {
    name: String,
}

impl std::fmt::Debug for ChannelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "oneshot {:?}", self.name)
    }
}

/// Instrumented version of [`tokio::sync::oneshot::Sender`].
pub struct Sender<T> {
    inner: Option<tokio::sync::oneshot::Sender<T>>,
    resource: Arc<AsyncResource>,
}

/// Instrumented version of [`tokio::sync::oneshot::Receiver`].
pub struct Receiver<T> {
    inner: Tracked<tokio::sync::oneshot::Receiver<T>>,
}

/// Creates an instrumented oneshot channel, equivalent to
/// [`tokio::sync::oneshot::channel`].
pub fn channel<T>(name: impl Into<String>) -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let resource = Arc::new(AsyncResource::new(
        "PROMISE",
        ResourceHandle::new(ChannelInfo { name: name.into() }),
    ));
    (
        Sender {
            inner: Some(tx),
            resource: Arc::clone(&resource),
        },
        Receiver {
            inner: Tracked::shared(rx, resource),
        },
    )
}

impl<T> Sender<T> {
    /// Sends a single value, equivalent to [`tokio::sync::oneshot::Sender::send`].
    /// The channel settles whether or not the receiver is still around.
    pub fn send(mut self, value: T) -> Result<(), T> {
        let Some(inner) = self.inner.take() else {
            return Err(value);
        };
        let result = inner.send(value);
        self.resource.resolve();
        result
    }

    pub fn is_closed(&self) -> bool {
        self.inner.as_ref().is_none_or(|inner| inner.is_closed())
    }

    pub fn resource(&self) -> &AsyncResource {
        &self.resource
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if self.inner.take().is_some() {
            self.resource.resolve();
        }
    }
}

impl<T> Receiver<T> {
    pub fn try_recv(&mut self) -> Result<T, error::TryRecvError> {
        self.inner.get_mut().try_recv()
    }

    pub fn close(&mut self) {
        self.inner.get_mut().close();
    }

    pub fn resource(&self) -> &AsyncResource {
        self.inner.resource()
    }
}

impl<T> Future for Receiver<T> {
    type Output = Result<T, error::RecvError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl<T> std::fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl<T> std::fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("resource", self.inner.resource())
            .finish_non_exhaustive()
    }
}
