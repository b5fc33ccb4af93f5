//! Process signal handling
//!
//! SIGINT and SIGTERM only raise the shared [`ShutdownToken`]; the tasks
//! observe it at their next suspension point.

use std::io;

use cheerlights_composer::ShutdownToken;

static SHUTDOWN: ShutdownToken = ShutdownToken::new();

extern "C" fn on_signal(_signum: libc::c_int) {
    // Atomic store only, nothing here may allocate or lock
    SHUTDOWN.request();
}

/// Route SIGINT and SIGTERM to the shutdown token
pub fn install_shutdown_handlers() -> io::Result<&'static ShutdownToken> {
    let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    for signum in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: the handler is async-signal-safe
        if unsafe { libc::signal(signum, handler) } == libc::SIG_ERR {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(&SHUTDOWN)
}
