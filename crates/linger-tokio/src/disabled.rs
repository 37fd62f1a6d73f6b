pub mod sync;
pub mod task;

pub mod time {
    pub use tokio::time::{Interval, Sleep, Timeout, error, interval, sleep, timeout};
}

pub use self::task::FutureExt;
