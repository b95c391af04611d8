use libc::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigint(_signal: c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT observer. The handler only records the interrupt; the
/// orchestrator polls [`interrupted`] at the subprocess boundary, so an
/// interrupt delivered mid-encode surfaces once the current child exits.
pub(crate) fn install() {
    let handler = on_sigint as extern "C" fn(c_int) as libc::sighandler_t;
    unsafe {
        libc::signal(libc::SIGINT, handler);
    }
}

pub(crate) fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
