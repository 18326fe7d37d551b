use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

/// Short, display only name of a thread in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadLabel {
    /// The designated main (GUI) thread, rendered as `M`.
    Main,
    /// Any other thread, numbered from 1 in order of first appearance.
    Worker(usize),
}

impl fmt::Display for ThreadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("M"),
            Self::Worker(n) => write!(f, "{n}"),
        }
    }
}

/// Hands out [`ThreadLabel`]s.
///
/// Numbers are assigned once per thread identity, the first time a thread is
/// seen, and are never reused even after that thread exits.
#[derive(Debug)]
pub struct ThreadRegistry {
    main: ThreadId,
    assigned: Mutex<HashMap<ThreadId, usize>>,
}

impl ThreadRegistry {
    /// Create a registry whose main thread is the calling thread.
    pub fn new() -> Self {
        Self::with_main_thread(thread::current().id())
    }

    pub fn with_main_thread(main: ThreadId) -> Self {
        Self {
            main,
            assigned: Mutex::new(HashMap::new()),
        }
    }

    pub fn main_thread(&self) -> ThreadId {
        self.main
    }

    pub fn label_of(&self, id: ThreadId) -> ThreadLabel {
        if id == self.main {
            return ThreadLabel::Main;
        }
        // a panic while holding this lock cannot leave the map half-updated
        let mut assigned = self.assigned.lock().unwrap_or_else(PoisonError::into_inner);
        let next = assigned.len() + 1;
        ThreadLabel::Worker(*assigned.entry(id).or_insert(next))
    }

    pub fn current_label(&self) -> ThreadLabel {
        self.label_of(thread::current().id())
    }
}

impl Default for ThreadRegistry {
    fn default() -> Self {
        Self::new()
    }
}
