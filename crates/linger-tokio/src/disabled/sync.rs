pub mod oneshot {
    pub use tokio::sync::oneshot::{Receiver, Sender, error};

    pub fn channel<T>(_name: impl Into<String>) -> (Sender<T>, Receiver<T>) {
        tokio::sync::oneshot::channel()
    }
}
