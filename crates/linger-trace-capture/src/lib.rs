//! Synchronous call-stack capture.
//!
//! Walks the current thread's stack, drops the leading frames that belong to
//! the capture machinery or to caller-declared plumbing, and keeps a bounded
//! slice of resolved frames. The result starts at the first frame of the code
//! that caused the capture.

use std::error::Error;
use std::fmt;
use std::num::NonZeroUsize;

/// Frames matching these prefixes are always dropped from the top of the stack.
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "_Unwind_",
    "linger_trace_capture::capture_current",
];

const DEFAULT_MAX_FRAMES: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    pub max_frames: NonZeroUsize,
    /// Extra frames dropped after plumbing frames, for call paths whose
    /// wrappers cannot be recognized by symbol name.
    pub skip_frames: usize,
    /// Symbol prefixes of leading frames that are not the caller's code.
    pub skip_prefixes: &'static [&'static str],
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_frames: NonZeroUsize::new(DEFAULT_MAX_FRAMES)
                .expect("invariant violated: default max_frames must be non-zero"),
            skip_frames: 0,
            skip_prefixes: &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub symbol: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl CapturedFrame {
    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        Self {
            // `{:#}` drops the trailing hash from legacy mangled names.
            symbol: symbol.name().map(|name| format!("{name:#}")),
            file: symbol.filename().map(|path| path.display().to_string()),
            line: symbol.lineno(),
        }
    }

    fn is_plumbing(&self, extra_prefixes: &[&str]) -> bool {
        let Some(symbol) = self.symbol.as_deref() else {
            return true;
        };
        // Trait impls render as `<path::Type as path::Trait>::method`.
        let symbol = symbol.trim_start_matches('<');
        INTERNAL_PREFIXES
            .iter()
            .chain(extra_prefixes)
            .any(|prefix| symbol.starts_with(prefix))
    }
}

impl fmt::Display for CapturedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol.as_deref().unwrap_or("<unknown>");
        write!(f, "    at {symbol}")?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})"),
            (Some(file), None) => write!(f, " ({file})"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedStack {
    pub frames: Vec<CapturedFrame>,
}

impl CapturedStack {
    pub fn lines(&self) -> Vec<String> {
        self.frames.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug)]
pub enum CaptureError {
    EmptyStack { skipped: usize },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStack { skipped } => {
                write!(f, "no caller frames left after skipping {skipped} frames")
            }
        }
    }
}

impl Error for CaptureError {}

pub fn capture_current(options: CaptureOptions) -> Result<CapturedStack, CaptureError> {
    let mut frames = Vec::new();
    let mut in_plumbing = true;
    let mut skip_remaining = options.skip_frames;
    let mut skipped = 0usize;

    backtrace::trace(|frame| {
        let mut resolved = Vec::new();
        backtrace::resolve_frame(frame, |symbol| {
            resolved.push(CapturedFrame::from_symbol(symbol));
        });

        for captured in resolved {
            if in_plumbing && captured.is_plumbing(options.skip_prefixes) {
                skipped += 1;
                continue;
            }
            in_plumbing = false;

            if skip_remaining > 0 {
                skip_remaining -= 1;
                skipped += 1;
                continue;
            }

            frames.push(captured);
            if frames.len() >= options.max_frames.get() {
                return false;
            }
        }
        true
    });

    if frames.is_empty() {
        return Err(CaptureError::EmptyStack { skipped });
    }
    Ok(CapturedStack { frames })
}
