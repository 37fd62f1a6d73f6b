//! Lifecycle hook channel for async resources.
//!
//! Instrumented primitives announce their async resources through this crate:
//! an [`AsyncResource`] emits a creation event when constructed, a settlement
//! event when [`AsyncResource::resolve`] is first called, and a destruction
//! event when dropped. Observers implement [`AsyncHooks`] and subscribe with
//! [`create_hook`]; a [`Hook`] only receives events while enabled.
//!
//! The hook list is process-wide. Every enabled hook sees every event, so two
//! observers that must not see each other's sessions have to coordinate their
//! enable/disable calls themselves.

pub(crate) mod context;
pub(crate) mod hooks;
pub(crate) mod resource;

pub use self::context::*;
pub use self::hooks::*;
pub use self::resource::*;

pub use linger_types::{AsyncId, ResourceHandle};
