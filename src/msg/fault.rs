//! Last-resort reporting of native crashes.
//!
//! Panics are reported through the panic hook (see
//! [`install_crash_handler`](super::install_crash_handler)), but a segfault or
//! an abort kills the process before any Rust code gets a chance to run. The
//! handlers installed here write a short notice about the fatal signal to
//! stderr, or to a crash log file, then let the signal terminate the process
//! as it normally would.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, thiserror::Error)]
pub enum FaultError {
    #[error("the fault handler is already enabled")]
    AlreadyEnabled,
    #[error("unable to enable the fault handler: {0}")]
    Io(#[from] io::Error),
}

static ENABLED: AtomicBool = AtomicBool::new(false);

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::SeqCst)
}

/// Install the fatal signal handlers, reporting to stderr.
///
/// # Errors
///
/// Returns [`FaultError::AlreadyEnabled`] if the handlers were installed by a
/// previous call, see [`enable_with_file`] in that case.
pub fn enable() -> Result<(), FaultError> {
    if ENABLED.swap(true, Ordering::SeqCst) {
        return Err(FaultError::AlreadyEnabled);
    }
    install_or_reset()
}

/// Report fatal signals into the file at `path` (truncated), installing the
/// handlers first if needed.
pub fn enable_with_file(path: &Path) -> Result<(), FaultError> {
    let file = File::create(path)?;
    imp::redirect(file);
    if ENABLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    install_or_reset()
}

fn install_or_reset() -> Result<(), FaultError> {
    imp::install().map_err(|e| {
        ENABLED.store(false, Ordering::SeqCst);
        FaultError::Io(e)
    })
}

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::{FromRawFd, IntoRawFd};
    use std::sync::atomic::{AtomicI32, Ordering};

    use libc::c_int;

    /// Descriptor the report is written to. Once redirected to a crash log
    /// file, that descriptor stays open until the next redirection.
    static TARGET_FD: AtomicI32 = AtomicI32::new(libc::STDERR_FILENO);

    const FATAL_SIGNALS: [c_int; 5] = [
        libc::SIGSEGV,
        libc::SIGBUS,
        libc::SIGFPE,
        libc::SIGILL,
        libc::SIGABRT,
    ];

    fn describe(signum: c_int) -> &'static [u8] {
        match signum {
            libc::SIGSEGV => b"Segmentation fault",
            libc::SIGBUS => b"Bus error",
            libc::SIGFPE => b"Floating point exception",
            libc::SIGILL => b"Illegal instruction",
            libc::SIGABRT => b"Aborted",
            _ => b"Unknown signal",
        }
    }

    /// Write the crash notice for `signum` into `fd`.
    ///
    /// Must stay async-signal-safe: no allocation, no locking, `write(2)` only.
    pub(super) fn write_report(fd: c_int, signum: c_int) {
        for part in [
            b"Fatal error: ".as_slice(),
            describe(signum),
            b"\n\nThe process was terminated by a fatal signal, \
              the application log holds the last recorded messages.\n"
                .as_slice(),
        ] {
            // SAFETY: `part` is a valid, initialized buffer of `part.len()` bytes.
            unsafe {
                libc::write(fd, part.as_ptr().cast(), part.len());
            }
        }
    }

    extern "C" fn handle_fatal(signum: c_int) {
        write_report(TARGET_FD.load(Ordering::SeqCst), signum);
        // `SA_RESETHAND` restored the default disposition, raising again
        // terminates the process the way it would have without us.
        unsafe {
            libc::raise(signum);
        }
    }

    pub(super) fn install() -> io::Result<()> {
        for signum in FATAL_SIGNALS {
            unsafe {
                let mut action: libc::sigaction = std::mem::zeroed();
                action.sa_sigaction =
                    handle_fatal as extern "C" fn(c_int) as libc::sighandler_t;
                // run on the alternate stack so that stack overflows are reported too
                action.sa_flags = libc::SA_ONSTACK | libc::SA_RESETHAND | libc::SA_NODEFER;
                libc::sigemptyset(&mut action.sa_mask as *mut libc::sigset_t);

                if libc::sigaction(signum, &action, std::ptr::null_mut()) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
        }
        Ok(())
    }

    pub(super) fn redirect(file: File) {
        let previous = TARGET_FD.swap(file.into_raw_fd(), Ordering::SeqCst);
        if previous != libc::STDERR_FILENO {
            // SAFETY: `previous` came from `into_raw_fd` and nothing else owns it.
            drop(unsafe { File::from_raw_fd(previous) });
        }
    }

    #[cfg(test)]
    pub(super) fn target_fd() -> c_int {
        TARGET_FD.load(Ordering::SeqCst)
    }
}

#[cfg(not(unix))]
mod imp {
    use std::fs::File;
    use std::io;
    use std::sync::Mutex;

    static CRASH_FILE: Mutex<Option<File>> = Mutex::new(None);

    // There are no signal handlers to install here, panics are still
    // reported through the panic hook.
    pub(super) fn install() -> io::Result<()> {
        Ok(())
    }

    pub(super) fn redirect(file: File) {
        if let Ok(mut slot) = CRASH_FILE.lock() {
            *slot = Some(file);
        }
    }
}
