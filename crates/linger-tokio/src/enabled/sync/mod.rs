//! Synchronization primitives, mirroring [`tokio::sync`].

pub mod oneshot;
