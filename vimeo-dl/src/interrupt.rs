use log::warn;
use std::{
    process::{self, Child},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static CLEANUP_PENDING: AtomicBool = AtomicBool::new(false);
static ACTIVE_CHILD: Mutex<Option<Arc<Mutex<Child>>>> = Mutex::new(None);

/// Installs the Ctrl+C handler.
///
/// Until [`defer_exit`] is called the handler aborts with exit code 1 on the
/// spot. Afterwards it only raises the flag and kills the running backend.
/// Unwinding back to `main` is then left to the caller so that scoped cleanup
/// still runs.
pub fn init() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if exits_immediately() {
            eprintln!("\nAborted.");
            process::exit(1);
        }

        if !INTERRUPTED.swap(true, Ordering::SeqCst) {
            warn!("Ctrl+C received, stopping download.");
        }

        kill_active();
    })
}

/// Called before anything that needs cleanup on the way out is created.
pub fn defer_exit() {
    CLEANUP_PENDING.store(true, Ordering::SeqCst);
}

fn exits_immediately() -> bool {
    !CLEANUP_PENDING.load(Ordering::SeqCst)
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Registers the backend process that an interrupt should terminate.
pub fn track(child: Arc<Mutex<Child>>) {
    if let Ok(mut active) = ACTIVE_CHILD.lock() {
        *active = Some(child);
    }

    if is_interrupted() {
        kill_active();
    }
}

pub fn untrack() {
    if let Ok(mut active) = ACTIVE_CHILD.lock() {
        *active = None;
    }
}

fn kill_active() {
    let child = ACTIVE_CHILD.lock().ok().and_then(|x| x.clone());

    if let Some(child) = child
        && let Ok(mut child) = child.lock()
    {
        // Already exited children report an error here, nothing to do then.
        let _ = child.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_is_deferred_once_cleanup_is_pending() {
        assert!(exits_immediately());
        defer_exit();
        assert!(!exits_immediately());
        assert!(!is_interrupted());
    }
}
