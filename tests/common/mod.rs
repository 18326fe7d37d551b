//! Recording widgets and a private sink, shared by the integration tests.
#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use xicam_core::msg::{ProgressBar, StatusBar, TrayIcon, TrayIconKind};
use xicam_core::utils::Logger;
use xicam_core::{MessageFacility, UIBindings};

/// Every call made on a recording widget, in order.
#[derive(Debug, Default)]
pub struct Calls(Mutex<Vec<String>>);

impl Calls {
    fn push(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.all().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[derive(Debug, Default)]
pub struct RecordingStatusBar(pub Calls);

impl StatusBar for RecordingStatusBar {
    fn show_message(&self, text: &str, duration: Duration) {
        self.0.push(format!("show_message({text}, {}ms)", duration.as_millis()));
    }

    fn clear_message(&self) {
        self.0.push("clear_message".into());
    }
}

#[derive(Debug, Default)]
pub struct RecordingProgressBar(pub Calls);

impl ProgressBar for RecordingProgressBar {
    fn show(&self) {
        self.0.push("show".into());
    }

    fn hide(&self) {
        self.0.push("hide".into());
    }

    fn set_range(&self, min: i32, max: i32) {
        self.0.push(format!("set_range({min}, {max})"));
    }

    fn set_value(&self, value: i32) {
        self.0.push(format!("set_value({value})"));
    }
}

#[derive(Debug, Default)]
pub struct RecordingTray(pub Calls);

impl TrayIcon for RecordingTray {
    fn show(&self) {
        self.0.push("show".into());
    }

    fn show_message(&self, title: &str, text: &str, icon: TrayIconKind, timeout: Duration) {
        self.0.push(format!(
            "show_message({title}, {text}, {icon:?}, {}ms)",
            timeout.as_millis()
        ));
    }

    fn hide(&self) {
        self.0.push("hide".into());
    }
}

/// A facility logging into a channel instead of the global logger.
pub fn facility_with(bindings: UIBindings) -> (MessageFacility, Receiver<String>) {
    let (tx, rx) = mpsc::channel();
    let (_, sink) = Logger::new()
        .console(false)
        .sender(tx)
        .into_log()
        .expect("a sink without log file cannot fail");
    (MessageFacility::new(bindings).sink(sink), rx)
}

pub fn received(rx: &Receiver<String>) -> Vec<String> {
    rx.try_iter().map(|l| l.trim_end().to_string()).collect()
}

pub fn statusbar() -> Arc<RecordingStatusBar> {
    Arc::new(RecordingStatusBar::default())
}

pub fn progressbar() -> Arc<RecordingProgressBar> {
    Arc::new(RecordingProgressBar::default())
}

pub fn tray() -> Arc<RecordingTray> {
    Arc::new(RecordingTray::default())
}
