use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::{self, Write};
use std::panic::Location;

/// Render `err` and its chain of sources, without any backtrace.
pub fn render_error_only(err: &(dyn Error + 'static)) -> String {
    let mut out = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\n  caused by: {cause}");
        source = cause.source();
    }
    out
}

/// Render `err`, its chain of sources and the backtrace of where it happened.
///
/// Falls back to [`render_error_only`] when there is no backtrace or it was
/// not actually captured (e.g. `RUST_BACKTRACE` is unset).
pub fn render_error(err: &(dyn Error + 'static), backtrace: Option<&Backtrace>) -> String {
    let mut out = render_error_only(err);
    match backtrace {
        Some(bt) if bt.status() == BacktraceStatus::Captured => {
            let _ = write!(out, "\n\nstack backtrace:\n{bt}");
        }
        _ => (),
    }
    out
}

/// A panic, turned into an error so it can be reported like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicError {
    pub message: String,
    pub location: Option<String>,
    pub thread: Option<String>,
}

impl PanicError {
    pub fn new(
        payload: &(dyn Any + Send),
        location: Option<&Location<'_>>,
        thread: Option<&str>,
    ) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self {
            message,
            location: location.map(ToString::to_string),
            thread: thread.map(ToOwned::to_owned),
        }
    }
}

impl fmt::Display for PanicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "thread '{}' panicked",
            self.thread.as_deref().unwrap_or("<unnamed>")
        )?;
        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl Error for PanicError {}
