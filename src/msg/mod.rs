//! Application-wide logging and user notifications.
//!
//! Every message goes through a [`MessageFacility`]: it is formatted into a
//! single line, written to the process log sink, and optionally mirrored on
//! the widgets registered in its [`UIBindings`] (status bar, tray
//! notifications, progress bar). Widget calls are always marshalled onto the
//! GUI thread through the bindings' [`GuiDispatcher`].
//!
//! Log lines look like:
//!
//! ```text
//! Thu Oct 15 09:12:44 2026 - loader - INFO - M - plugin loaded: saxs
//! ```
//!
//! i.e. `timestamp - channel - LEVEL - thread - text`, where `thread` is `M`
//! for the main thread and a small number for every other thread.

mod console;
mod crash;
mod error;
pub mod fault;
mod level;
mod report;
mod threads;
mod ui;

pub use console::ConsoleProgressBar;
pub use crash::{install_crash_handler, CRASH_CHANNEL};
pub use error::Error;
pub use level::{LogLevel, CRITICAL, DEBUG, ERROR, INFO, WARNING};
pub use report::{render_error, render_error_only, PanicError};
pub use threads::{ThreadLabel, ThreadRegistry};
pub use ui::{
    gui_queue, GuiDispatcher, GuiQueue, GuiTask, Immediate, ProgressBar, QueuedDispatcher,
    StatusBar, TrayIcon, TrayIconFactory, TrayIconKind, UIBindings,
};

use chrono::Local;
use log::{Log, Record};
use std::backtrace::Backtrace;
use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;
use std::time::Duration;

use crate::paths::APP_NAME;

/// Default time a status bar message stays visible, in seconds.
pub const STATUS_TIMEOUT_SECS: u64 = 5;
/// Default time a tray notification stays visible.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_millis(8000);

/// `asctime`-like timestamp layout, e.g. `Thu Oct 15 09:12:44 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Join displayable parts with a single space.
pub fn join_parts<I, T>(parts: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    parts
        .into_iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One message on its way to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    channel: String,
    text: String,
    level: i32,
    timestamp: Option<String>,
}

impl Entry {
    /// A message on `channel` made of `parts` joined by spaces, at `INFO` level.
    pub fn new<I, T>(channel: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        Self {
            channel: channel.to_string(),
            text: join_parts(parts),
            level: INFO,
            timestamp: None,
        }
    }

    /// Set the level. Any integer is accepted, unknown ones are escalated to
    /// `CRITICAL` when logged.
    pub fn level<L: Into<i32>>(mut self, level: L) -> Self {
        self.level = level.into();
        self
    }

    /// Use a fixed timestamp rather than the current local time.
    pub fn timestamp<S: Into<String>>(mut self, timestamp: S) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw_level(&self) -> i32 {
        self.level
    }
}

enum Sink {
    /// Whatever logger is installed through [`log::set_boxed_logger`].
    Global,
    Owned(Box<dyn Log>),
}

/// The process-wide logging and notification surface.
///
/// Usually built once at startup (see [`Bootstrap`](crate::Bootstrap)) and
/// shared as an `Arc`.
pub struct MessageFacility {
    app_name: String,
    bindings: UIBindings,
    tray: OnceLock<Option<Arc<dyn TrayIcon>>>,
    threads: ThreadRegistry,
    sink: Sink,
}

impl MessageFacility {
    /// Create a facility writing to the global logger. The calling thread
    /// becomes the main thread in log lines.
    pub fn new(bindings: UIBindings) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            bindings,
            tray: OnceLock::new(),
            threads: ThreadRegistry::new(),
            sink: Sink::Global,
        }
    }

    /// Name of the application, as shown in error banners.
    pub fn app_name<S: Into<String>>(mut self, name: S) -> Self {
        self.app_name = name.into();
        self
    }

    /// Write to `sink` instead of the global logger.
    pub fn sink(mut self, sink: Box<dyn Log>) -> Self {
        self.sink = Sink::Owned(sink);
        self
    }

    /// Designate another thread as the main thread.
    pub fn main_thread(mut self, id: ThreadId) -> Self {
        self.threads = ThreadRegistry::with_main_thread(id);
        self
    }

    pub fn bindings(&self) -> &UIBindings {
        &self.bindings
    }

    fn logger(&self) -> &dyn Log {
        match &self.sink {
            Sink::Global => log::logger(),
            Sink::Owned(sink) => sink.as_ref(),
        }
    }

    fn emit(&self, channel: &str, level: LogLevel, line: &str) {
        self.logger().log(
            &Record::builder()
                .args(format_args!("{line}"))
                .level(level.to_log_level())
                .target(channel)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    /// Write `entry` to the log.
    ///
    /// An unknown level is reported by an extra `WARNING` line, and the entry
    /// itself is then logged as `CRITICAL`.
    pub fn log(&self, entry: &Entry) {
        let timestamp = entry
            .timestamp
            .clone()
            .unwrap_or_else(|| Local::now().format(TIMESTAMP_FORMAT).to_string());
        let thread = self.threads.current_label();

        let level = match LogLevel::from_i32(entry.level) {
            Some(level) => level,
            None => {
                let warning = format!(
                    "Unrecognized logger level {} for following message...",
                    entry.level
                );
                self.emit(
                    &entry.channel,
                    LogLevel::Warning,
                    &format_line(&timestamp, &entry.channel, LogLevel::Warning, thread, &warning),
                );
                LogLevel::Critical
            }
        };

        self.emit(
            &entry.channel,
            level,
            &format_line(&timestamp, &entry.channel, level, thread, &entry.text),
        );
    }

    /// Shorthand of [`log`](Self::log) for a fresh entry.
    pub fn log_message<I, T, L>(&self, channel: &str, parts: I, level: L)
    where
        I: IntoIterator<Item = T>,
        T: Display,
        L: Into<i32>,
    {
        self.log(&Entry::new(channel, parts).level(level));
    }

    /// Show `entry` on the status bar for `timeout_secs` seconds (`0` keeps it
    /// until replaced), and log it.
    pub fn show_message(&self, entry: &Entry, timeout_secs: u64) {
        if let Some(statusbar) = &self.bindings.statusbar {
            let statusbar = Arc::clone(statusbar);
            let text = entry.text.clone();
            self.bindings.dispatcher.invoke(Box::new(move || {
                statusbar.show_message(&text, Duration::from_secs(timeout_secs));
            }));
        }
        self.log(entry);
    }

    /// Clear the status bar.
    ///
    /// # Errors
    ///
    /// Unlike every other operation, this one requires a bound status bar and
    /// fails with [`Error::NoStatusBar`] otherwise.
    pub fn clear_message(&self) -> Result<(), Error> {
        let statusbar = self
            .bindings
            .statusbar
            .as_ref()
            .map(Arc::clone)
            .ok_or(Error::NoStatusBar)?;
        self.bindings
            .dispatcher
            .invoke(Box::new(move || statusbar.clear_message()));
        Ok(())
    }

    /// The tray icon, created on first use if the bindings know how to.
    /// The factory runs on the calling thread, not through the dispatcher.
    fn tray_icon(&self) -> Option<&Arc<dyn TrayIcon>> {
        self.tray
            .get_or_init(|| self.bindings.tray_factory.as_ref().and_then(|make| make()))
            .as_ref()
    }

    /// Pop up `entry` as a tray notification for `timeout`, then log it.
    ///
    /// A zero `timeout` leaves the notification up. Without a tray icon this
    /// only logs.
    ///
    /// # Errors
    ///
    /// With a tray icon, an unknown level is rejected with
    /// [`Error::InvalidLevel`]: nothing is shown and nothing is logged.
    pub fn notify_message(&self, entry: &Entry, title: &str, timeout: Duration) -> Result<(), Error> {
        if let Some(tray) = self.tray_icon() {
            let icon =
                TrayIconKind::for_level(entry.level).ok_or(Error::InvalidLevel(entry.level))?;
            let dispatcher = &self.bindings.dispatcher;

            let (t, title, text) = (Arc::clone(tray), title.to_string(), entry.text.clone());
            dispatcher.invoke(Box::new(move || {
                t.show();
                t.show_message(&title, &text, icon, timeout);
            }));
            if !timeout.is_zero() {
                let t = Arc::clone(tray);
                dispatcher.invoke_after(timeout, Box::new(move || t.hide()));
            }
        }
        self.log(entry);
        Ok(())
    }

    fn with_progressbar<F>(&self, f: F)
    where
        F: FnOnce(&dyn ProgressBar) + Send + 'static,
    {
        if let Some(bar) = &self.bindings.progressbar {
            let bar = Arc::clone(bar);
            self.bindings.dispatcher.invoke(Box::new(move || f(bar.as_ref())));
        }
    }

    /// Show the progress bar at `value` within `[min, max]`.
    pub fn show_progress(&self, value: i32, min: i32, max: i32) {
        self.with_progressbar(move |bar| {
            bar.show();
            bar.set_range(min, max);
            bar.set_value(value);
        });
    }

    /// Show the progress bar as busy, without measurable progress.
    pub fn show_busy(&self) {
        self.with_progressbar(|bar| {
            bar.show();
            bar.set_range(0, 0);
        });
    }

    /// Hide the progress bar and restore its default `[0, 100]` range.
    pub fn hide_busy(&self) {
        self.with_progressbar(|bar| {
            bar.hide();
            bar.set_range(0, 100);
        });
    }

    /// Same as [`hide_busy`](Self::hide_busy).
    pub fn show_ready(&self) {
        self.hide_busy();
    }

    /// Same as [`hide_busy`](Self::hide_busy).
    pub fn hide_progress(&self) {
        self.hide_busy();
    }

    /// Log `error` at `ERROR` level, preceded by a banner saying it was handled.
    ///
    /// The error is rendered with its sources and `backtrace`, or without a
    /// backtrace if none was captured.
    pub fn log_error(
        &self,
        channel: &str,
        error: &(dyn std::error::Error + 'static),
        backtrace: Option<&Backtrace>,
    ) {
        let banner = format!(
            "The following error was handled safely by {}. It is displayed here for debugging.",
            self.app_name
        );
        self.log(&Entry::new(channel, [banner]).level(ERROR));
        self.log(&Entry::new(channel, [render_error(error, backtrace)]).level(ERROR));
    }
}

impl fmt::Debug for MessageFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFacility")
            .field("app_name", &self.app_name)
            .field("bindings", &self.bindings)
            .field("threads", &self.threads)
            .finish_non_exhaustive()
    }
}

fn format_line(
    timestamp: &str,
    channel: &str,
    level: LogLevel,
    thread: ThreadLabel,
    text: &str,
) -> String {
    format!("{timestamp} - {channel} - {level} - {thread} - {text}")
}
