use std::future::Future;

pub use tokio::task::{JoinError, JoinHandle, yield_now};

pub fn spawn<F>(_name: impl Into<String>, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

pub trait FutureExt: Future + Sized {
    fn tracked(self) -> Self {
        self
    }

    fn tracked_as(self, _kind: &str) -> Self {
        self
    }
}

impl<F: Future> FutureExt for F {}
