//! Tokio-backed linger instrumentation surface.
//!
//! With the `diagnostics` feature, the wrappers in this crate announce each
//! timer, task, tracked future and oneshot channel as an async resource, so a
//! `linger::Tracker` can see them. Without it, every item is a plain
//! re-export of (or a zero-cost shim over) the Tokio equivalent.
//!
//! | Wrapper | Type tag |
//! |---|---|
//! | [`time::sleep`], [`time::timeout`], [`time::interval`] | `TIMEOUT` |
//! | [`task::spawn`] | `TASK` |
//! | [`task::yield_now`] | `IMMEDIATE` |
//! | [`FutureExt::tracked`], [`sync::oneshot::channel`] | `PROMISE` |

#[doc(hidden)]
pub use tokio;

#[cfg(not(feature = "diagnostics"))]
mod disabled;
#[cfg(feature = "diagnostics")]
mod enabled;

#[cfg(not(feature = "diagnostics"))]
pub use disabled::*;
#[cfg(feature = "diagnostics")]
pub use enabled::*;
