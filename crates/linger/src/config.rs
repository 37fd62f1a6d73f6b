use std::num::NonZeroUsize;

use linger_trace_capture::CaptureOptions;
use tracing::warn;

use crate::ConfigError;

pub const STACK_FRAMES_ENV: &str = "LINGER_STACK_FRAMES";
pub const SKIP_FRAMES_ENV: &str = "LINGER_SKIP_FRAMES";
pub const TRACK_ENV: &str = "LINGER_TRACK";

/// Leading stack frames with these symbol prefixes belong to the hook
/// plumbing, not to the code that created the operation.
pub const PLUMBING_PREFIXES: &[&str] = &["linger_runtime::", "linger::hooks::", "linger_tokio::"];

const DEFAULT_STACK_FRAMES: usize = 10;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Upper bound on captured stack lines per record.
    pub max_stack_frames: NonZeroUsize,
    /// Frames dropped after the plumbing frames.
    pub skip_frames: usize,
    pub skip_prefixes: &'static [&'static str],
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_stack_frames: NonZeroUsize::new(DEFAULT_STACK_FRAMES)
                .expect("invariant violated: default stack frames must be non-zero"),
            skip_frames: 0,
            skip_prefixes: PLUMBING_PREFIXES,
        }
    }
}

impl TrackerConfig {
    /// Reads `LINGER_STACK_FRAMES` and `LINGER_SKIP_FRAMES`, falling back to
    /// defaults (with a warning) when either is malformed.
    pub fn from_env() -> Self {
        match Self::from_lookup(|var| std::env::var(var).ok()) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "ignoring invalid linger configuration");
                Self::default()
            }
        }
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(STACK_FRAMES_ENV) {
            let frames = parse_count(STACK_FRAMES_ENV, &value)?;
            config.max_stack_frames = NonZeroUsize::new(frames).ok_or(ConfigError::ZeroStackFrames {
                var: STACK_FRAMES_ENV,
            })?;
        }
        if let Some(value) = lookup(SKIP_FRAMES_ENV) {
            config.skip_frames = parse_count(SKIP_FRAMES_ENV, &value)?;
        }

        Ok(config)
    }

    pub(crate) fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            max_frames: self.max_stack_frames,
            skip_frames: self.skip_frames,
            skip_prefixes: self.skip_prefixes,
        }
    }
}

fn parse_count(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
