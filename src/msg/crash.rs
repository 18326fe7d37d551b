use std::backtrace::Backtrace;
use std::panic;
use std::sync::Arc;
use std::thread;

use super::{MessageFacility, PanicError};

/// Channel receiving every panic that reaches the hook.
pub const CRASH_CHANNEL: &str = "crash_handler";

/// Route every panic of the process into `facility`, with a backtrace.
///
/// This replaces the current panic hook. It only reports: unwinding (or
/// aborting, depending on the build profile) carries on as usual afterwards.
/// Call it once during startup.
pub fn install_crash_handler(facility: Arc<MessageFacility>) {
    panic::set_hook(Box::new(move |info| {
        let current = thread::current();
        let error = PanicError::new(info.payload(), info.location(), current.name());
        let backtrace = Backtrace::force_capture();
        facility.log_error(CRASH_CHANNEL, &error, Some(&backtrace));
    }));
}
