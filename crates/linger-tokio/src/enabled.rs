pub mod sync;
pub mod task;
pub mod time;

pub(crate) mod scoped;

pub use self::task::FutureExt;
pub use self::scoped::Tracked;
pub use linger_runtime::*;

#[cfg(test)]
pub(crate) mod test_support;
