use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use linger_runtime::{AsyncResource, enter_scope};

/// A future announced as an async resource.
///
/// Every poll runs with the resource as the execution context, so anything
/// the future creates names it as trigger. The resource settles when the
/// future completes and is destroyed when the wrapper drops.
pub struct Tracked<F> {
    inner: F,
    resource: Arc<AsyncResource>,
}

impl<F> Tracked<F> {
    pub(crate) fn new(inner: F, resource: AsyncResource) -> Self {
        Self::shared(inner, Arc::new(resource))
    }

    pub(crate) fn shared(inner: F, resource: Arc<AsyncResource>) -> Self {
        Self { inner, resource }
    }

    pub fn resource(&self) -> &AsyncResource {
        &self.resource
    }

    pub(crate) fn get_mut(&mut self) -> &mut F
    where
        F: Unpin,
    {
        &mut self.inner
    }
}

impl<F: Future> Future for Tracked<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // SAFETY: we only project to `inner` and never move it out; `resource`
        // is not structurally pinned.
        let this = unsafe { self.get_unchecked_mut() };
        let inner = unsafe { Pin::new_unchecked(&mut this.inner) };

        let _scope = enter_scope(this.resource.id());
        let poll = inner.poll(cx);
        if poll.is_ready() {
            this.resource.resolve();
        }
        poll
    }
}

impl<F> std::fmt::Debug for Tracked<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracked")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}
