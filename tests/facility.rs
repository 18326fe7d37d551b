mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use common::*;
use xicam_core::msg::{self, gui_queue, Error, LogLevel, TrayIcon, TrayIconKind};
use xicam_core::{Entry, UIBindings};

const LINE_FIELDS: usize = 5;

fn fields(line: &str) -> Vec<&str> {
    line.splitn(LINE_FIELDS, " - ").collect()
}

#[test]
fn one_line_per_call() {
    let (facility, rx) = facility_with(UIBindings::new());
    let levels = [msg::DEBUG, msg::INFO, msg::WARNING, msg::ERROR, msg::CRITICAL];

    for (i, level) in levels.iter().cycle().take(23).enumerate() {
        facility.log_message("counter", [format!("message {i}")], *level);
    }

    let lines = received(&rx);
    assert_eq!(lines.len(), 23);
    for (i, line) in lines.iter().enumerate() {
        let f = fields(line);
        assert_eq!(f.len(), LINE_FIELDS, "malformed line: {line}");
        assert_eq!(f[1], "counter");
        assert_eq!(f[2], LogLevel::from_i32(levels[i % 5]).unwrap().as_str());
        assert_eq!(f[3], "M");
        assert_eq!(f[4], format!("message {i}"));
    }
}

#[test]
fn unrecognized_level_gives_two_lines() {
    let (facility, rx) = facility_with(UIBindings::new());
    facility.log_message("odd", ["what", "level?"], 999);

    let lines = received(&rx);
    assert_eq!(lines.len(), 2);
    assert_eq!(fields(&lines[0])[2], "WARNING");
    assert!(lines[0].contains("Unrecognized logger level 999"));
    assert_eq!(fields(&lines[1])[2], "CRITICAL");
    assert_eq!(fields(&lines[1])[4], "what level?");
}

#[test]
fn worker_threads_get_stable_numbers() {
    let (facility, rx) = facility_with(UIBindings::new());
    let facility = Arc::new(facility);
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|name| {
            let facility = Arc::clone(&facility);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                facility.log_message(name, ["first"], msg::INFO);
                facility.log_message(name, ["second"], msg::INFO);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    facility.log_message("main", ["done"], msg::INFO);

    let lines = received(&rx);
    assert_eq!(lines.len(), 5);
    let label_of = |channel: &str| -> Vec<String> {
        lines
            .iter()
            .map(|l| fields(l))
            .filter(|f| f[1] == channel)
            .map(|f| f[3].to_string())
            .collect()
    };

    let a = label_of("a");
    let b = label_of("b");
    assert_eq!(a[0], a[1]);
    assert_eq!(b[0], b[1]);
    let mut numbers = [a[0].clone(), b[0].clone()];
    numbers.sort();
    assert_eq!(numbers, ["1", "2"]);
    assert_eq!(label_of("main"), ["M"]);
}

#[test]
fn show_message_without_statusbar_only_logs() {
    let (facility, rx) = facility_with(UIBindings::new());
    facility.show_message(&Entry::new("status", ["loading", "data"]), msg::STATUS_TIMEOUT_SECS);

    let lines = received(&rx);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" - status - INFO - M - loading data"));
}

#[test]
fn show_message_on_statusbar() {
    let bar = statusbar();
    let (facility, rx) = facility_with(UIBindings::new().statusbar(bar.clone()));

    facility.show_message(&Entry::new("status", ["loading", "data"]), 5);
    facility.show_message(&Entry::new("status", ["sticky"]), 0);

    assert_eq!(
        bar.0.all(),
        ["show_message(loading data, 5000ms)", "show_message(sticky, 0ms)"]
    );
    assert_eq!(received(&rx).len(), 2);
}

#[test]
fn clear_message_requires_statusbar() {
    let (facility, rx) = facility_with(UIBindings::new());
    assert_eq!(facility.clear_message(), Err(Error::NoStatusBar));
    assert!(received(&rx).is_empty());

    let bar = statusbar();
    let (facility, _rx) = facility_with(UIBindings::new().statusbar(bar.clone()));
    facility.clear_message().unwrap();
    assert_eq!(bar.0.all(), ["clear_message"]);
}

#[test]
fn notify_warning_uses_warning_icon() {
    let tray = tray();
    let (facility, rx) = facility_with(UIBindings::new().tray_icon(tray.clone()));

    facility
        .notify_message(
            &Entry::new("notify", ["disk", "almost", "full"]).level(msg::WARNING),
            "Xi-cam",
            Duration::ZERO,
        )
        .unwrap();

    assert_eq!(
        tray.0.all(),
        ["show", "show_message(Xi-cam, disk almost full, Warning, 0ms)"]
    );
    assert_eq!(tray.0.count("show_message"), 1);
    let lines = received(&rx);
    assert_eq!(lines.len(), 1);
    assert_eq!(fields(&lines[0])[2], "WARNING");
}

#[test]
fn notify_icons_per_level() {
    let tray = tray();
    let (facility, _rx) = facility_with(UIBindings::new().tray_icon(tray.clone()));

    for level in [msg::DEBUG, msg::INFO, msg::ERROR, msg::CRITICAL] {
        facility
            .notify_message(&Entry::new("notify", ["x"]).level(level), "", Duration::ZERO)
            .unwrap();
    }

    let icons: Vec<String> = tray
        .0
        .all()
        .into_iter()
        .filter(|c| c.starts_with("show_message"))
        .collect();
    let expected = [
        TrayIconKind::Information,
        TrayIconKind::Information,
        TrayIconKind::Critical,
        TrayIconKind::Critical,
    ];
    for (call, icon) in icons.iter().zip(expected) {
        assert!(call.contains(&format!("{icon:?}")), "unexpected call: {call}");
    }
    assert_eq!(icons.len(), 4);
}

#[test]
fn notify_rejects_unknown_level() {
    let tray = tray();
    let (facility, rx) = facility_with(UIBindings::new().tray_icon(tray.clone()));

    let res = facility.notify_message(&Entry::new("notify", ["?"]).level(33), "", msg::NOTIFY_TIMEOUT);
    assert_eq!(res, Err(Error::InvalidLevel(33)));
    assert!(tray.0.all().is_empty());
    assert!(received(&rx).is_empty());
}

#[test]
fn notify_without_tray_only_logs() {
    let (facility, rx) = facility_with(UIBindings::new());
    facility
        .notify_message(&Entry::new("notify", ["hello"]), "title", msg::NOTIFY_TIMEOUT)
        .unwrap();
    assert_eq!(received(&rx).len(), 1);
}

#[test]
fn notification_hides_after_timeout() {
    let tray = tray();
    let (dispatcher, queue) = gui_queue();
    let (facility, _rx) = facility_with(
        UIBindings::new()
            .tray_icon(tray.clone())
            .dispatcher(Arc::new(dispatcher)),
    );

    facility
        .notify_message(&Entry::new("notify", ["bye"]), "", Duration::from_millis(300))
        .unwrap();
    // nothing reaches the widget before the GUI loop runs
    assert!(tray.0.all().is_empty());

    assert_eq!(queue.run_pending(), 1);
    assert_eq!(tray.0.all().len(), 2);
    assert!(queue.run_next(Duration::from_secs(5)));
    assert_eq!(tray.0.all().last().map(String::as_str), Some("hide"));
}

#[test]
fn tray_factory_runs_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let created_clone = Arc::clone(&created);
    let tray = tray();
    let tray_clone = Arc::clone(&tray);
    let (facility, _rx) = facility_with(UIBindings::new().tray_icon_factory(move || {
        created_clone.fetch_add(1, Ordering::SeqCst);
        Some(Arc::clone(&tray_clone) as Arc<dyn TrayIcon>)
    }));

    for _ in 0..3 {
        facility
            .notify_message(&Entry::new("notify", ["again"]), "", Duration::ZERO)
            .unwrap();
    }
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(tray.0.count("show_message"), 3);
}

#[test]
fn tray_factory_runs_on_first_notifying_thread() {
    let made_on = Arc::new(Mutex::new(Vec::new()));
    let made_on_clone = Arc::clone(&made_on);
    let tray = tray();
    let tray_clone = Arc::clone(&tray);
    let (dispatcher, queue) = gui_queue();
    let (facility, _rx) = facility_with(
        UIBindings::new()
            .tray_icon_factory(move || {
                made_on_clone.lock().unwrap().push(thread::current().id());
                Some(Arc::clone(&tray_clone) as Arc<dyn TrayIcon>)
            })
            .dispatcher(Arc::new(dispatcher)),
    );
    let facility = Arc::new(facility);

    let worker = {
        let facility = Arc::clone(&facility);
        thread::spawn(move || {
            facility
                .notify_message(&Entry::new("notify", ["from", "worker"]), "", Duration::ZERO)
                .unwrap();
            thread::current().id()
        })
    };
    let worker_id = worker.join().unwrap();
    facility
        .notify_message(&Entry::new("notify", ["from", "main"]), "", Duration::ZERO)
        .unwrap();

    // created once, by the worker, while widget calls still wait for the GUI loop
    assert_eq!(*made_on.lock().unwrap(), [worker_id]);
    assert!(tray.0.all().is_empty());
    assert_eq!(queue.run_pending(), 2);
    assert_eq!(tray.0.count("show_message"), 2);
}

#[test]
fn tray_factory_without_gui_context() {
    let asked = Arc::new(AtomicUsize::new(0));
    let asked_clone = Arc::clone(&asked);
    let (facility, rx) = facility_with(UIBindings::new().tray_icon_factory(move || {
        asked_clone.fetch_add(1, Ordering::SeqCst);
        None
    }));

    // without a tray, unknown levels go through the usual escalation
    facility
        .notify_message(&Entry::new("notify", ["x"]).level(7), "", Duration::ZERO)
        .unwrap();
    facility
        .notify_message(&Entry::new("notify", ["y"]), "", Duration::ZERO)
        .unwrap();

    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert_eq!(received(&rx).len(), 3);
}

#[test]
fn progress_operations() {
    let bar = progressbar();
    let (facility, rx) = facility_with(UIBindings::new().progressbar(bar.clone()));

    facility.show_progress(40, 0, 200);
    facility.show_busy();
    facility.hide_busy();
    facility.show_ready();
    facility.hide_progress();

    assert_eq!(
        bar.0.all(),
        [
            "show",
            "set_range(0, 200)",
            "set_value(40)",
            "show",
            "set_range(0, 0)",
            "hide",
            "set_range(0, 100)",
            "hide",
            "set_range(0, 100)",
            "hide",
            "set_range(0, 100)",
        ]
    );
    assert!(received(&rx).is_empty());
}

#[test]
fn progress_without_bar_is_noop() {
    let (facility, rx) = facility_with(UIBindings::new());
    facility.show_progress(1, 0, 2);
    facility.show_busy();
    facility.hide_busy();
    assert!(received(&rx).is_empty());
}

#[test]
fn widget_calls_are_marshalled() {
    let bar = statusbar();
    let progress = progressbar();
    let (dispatcher, queue) = gui_queue();
    let (facility, rx) = facility_with(
        UIBindings::new()
            .statusbar(bar.clone())
            .progressbar(progress.clone())
            .dispatcher(Arc::new(dispatcher)),
    );
    let facility = Arc::new(facility);

    let worker = {
        let facility = Arc::clone(&facility);
        thread::spawn(move || {
            facility.show_message(&Entry::new("worker", ["from", "worker"]), 1);
            facility.show_progress(3, 0, 10);
            facility.clear_message().unwrap();
        })
    };
    worker.join().unwrap();

    // the log line is written right away, widgets wait for the GUI thread
    assert_eq!(received(&rx).len(), 1);
    assert!(bar.0.all().is_empty());
    assert!(progress.0.all().is_empty());

    assert_eq!(queue.run_pending(), 3);
    assert_eq!(bar.0.all(), ["show_message(from worker, 1000ms)", "clear_message"]);
    assert_eq!(progress.0.all().len(), 3);
}
