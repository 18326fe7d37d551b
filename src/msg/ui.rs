//! GUI collaborators the facility can drive, and how calls reach the GUI thread.
//!
//! Widgets are owned by the GUI toolkit. The facility only holds shared
//! handles to them and never calls them directly: every call is wrapped in a
//! [`GuiTask`] and handed to a [`GuiDispatcher`], which is responsible for
//! running it on the GUI thread.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::level::LogLevel;

/// A unit of work to be run on the GUI thread.
pub type GuiTask = Box<dyn FnOnce() + Send + 'static>;

/// A status bar showing one transient line of text.
pub trait StatusBar: Send + Sync {
    /// Show `text` for `duration`. [`Duration::ZERO`] keeps it until replaced.
    fn show_message(&self, text: &str, duration: Duration);
    fn clear_message(&self);
}

/// A progress bar. A `(0, 0)` range means "busy", with no measurable progress.
pub trait ProgressBar: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn set_range(&self, min: i32, max: i32);
    fn set_value(&self, value: i32);
}

/// Icon shown next to a tray notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrayIconKind {
    Information,
    Warning,
    Critical,
}

impl TrayIconKind {
    /// Icon matching a raw message level, `None` for unknown levels.
    pub fn for_level(level: i32) -> Option<Self> {
        LogLevel::from_i32(level).map(|lvl| match lvl {
            LogLevel::Debug | LogLevel::Info => Self::Information,
            LogLevel::Warning => Self::Warning,
            LogLevel::Error | LogLevel::Critical => Self::Critical,
        })
    }
}

/// A system tray icon able to pop up balloon notifications.
pub trait TrayIcon: Send + Sync {
    fn show(&self);
    fn show_message(&self, title: &str, text: &str, icon: TrayIconKind, timeout: Duration);
    fn hide(&self);
}

/// Creates the tray icon. Returns `None` when no GUI application is running,
/// in which case notifications degrade to plain log lines.
///
/// The factory runs at most once, on whichever thread sends the first
/// notification, which is not necessarily the GUI thread. A factory building
/// a toolkit widget must marshal that creation onto the GUI thread itself.
pub type TrayIconFactory = Arc<dyn Fn() -> Option<Arc<dyn TrayIcon>> + Send + Sync>;

/// Runs [`GuiTask`]s on the GUI thread.
pub trait GuiDispatcher: Send + Sync {
    fn invoke(&self, task: GuiTask);
    /// Run `task` on the GUI thread once `delay` has elapsed.
    ///
    /// This is fire-and-forget: the task may never run if the process exits first.
    fn invoke_after(&self, delay: Duration, task: GuiTask);
}

/// Runs every task right away on the calling thread.
///
/// Only suitable when the caller already is the GUI thread, or when the
/// bound widgets are thread safe (e.g. [`ConsoleProgressBar`](super::ConsoleProgressBar)).
/// Delayed tasks run on a short-lived timer thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl GuiDispatcher for Immediate {
    fn invoke(&self, task: GuiTask) {
        task();
    }

    fn invoke_after(&self, delay: Duration, task: GuiTask) {
        thread::spawn(move || {
            thread::sleep(delay);
            task();
        });
    }
}

/// Queues tasks into a channel, to be drained by the GUI event loop through
/// the paired [`GuiQueue`].
#[derive(Debug, Clone)]
pub struct QueuedDispatcher {
    sender: Sender<GuiTask>,
}

/// Receiving half of a [`QueuedDispatcher`], owned by the GUI thread.
#[derive(Debug)]
pub struct GuiQueue {
    receiver: Receiver<GuiTask>,
}

/// Create a connected dispatcher/queue pair.
pub fn gui_queue() -> (QueuedDispatcher, GuiQueue) {
    let (sender, receiver) = mpsc::channel();
    (QueuedDispatcher { sender }, GuiQueue { receiver })
}

impl GuiDispatcher for QueuedDispatcher {
    fn invoke(&self, task: GuiTask) {
        // the GUI is gone, nobody is left to show anything
        let _ = self.sender.send(task);
    }

    fn invoke_after(&self, delay: Duration, task: GuiTask) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = sender.send(task);
        });
    }
}

impl GuiQueue {
    /// Run every task queued so far, without blocking. Returns how many ran.
    ///
    /// Meant to be called periodically from the GUI event loop.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        for task in self.receiver.try_iter() {
            task();
            count += 1;
        }
        count
    }

    /// Wait up to `timeout` for one task and run it. Returns `false` on timeout
    /// or when every dispatcher has been dropped.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

/// The widgets a [`MessageFacility`](super::MessageFacility) may drive.
///
/// Every binding is optional; operations targeting an unbound widget only
/// write to the log (or do nothing, for progress operations).
#[derive(Clone)]
pub struct UIBindings {
    pub(crate) statusbar: Option<Arc<dyn StatusBar>>,
    pub(crate) progressbar: Option<Arc<dyn ProgressBar>>,
    pub(crate) tray_factory: Option<TrayIconFactory>,
    pub(crate) dispatcher: Arc<dyn GuiDispatcher>,
}

impl UIBindings {
    /// No widget at all, tasks run with [`Immediate`].
    pub fn new() -> Self {
        Self {
            statusbar: None,
            progressbar: None,
            tray_factory: None,
            dispatcher: Arc::new(Immediate),
        }
    }

    pub fn statusbar(mut self, statusbar: Arc<dyn StatusBar>) -> Self {
        self.statusbar = Some(statusbar);
        self
    }

    pub fn progressbar(mut self, progressbar: Arc<dyn ProgressBar>) -> Self {
        self.progressbar = Some(progressbar);
        self
    }

    /// Register how to create the tray icon. The factory is called at most
    /// once, on the first notification.
    pub fn tray_icon_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn TrayIcon>> + Send + Sync + 'static,
    {
        self.tray_factory = Some(Arc::new(factory));
        self
    }

    /// Register an already created tray icon.
    pub fn tray_icon(self, icon: Arc<dyn TrayIcon>) -> Self {
        self.tray_icon_factory(move || Some(Arc::clone(&icon)))
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn GuiDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }
}

impl Default for UIBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UIBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UIBindings")
            .field("statusbar", &self.statusbar.is_some())
            .field("progressbar", &self.progressbar.is_some())
            .field("tray_icon", &self.tray_factory.is_some())
            .finish_non_exhaustive()
    }
}
