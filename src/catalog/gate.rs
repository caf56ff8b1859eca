//! Startup gate held open while the store runs its first load.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// A one-shot hold/release pair around the first catalog load.
pub trait StartupGate: Send + Sync {
    fn hold(&self);
    fn release(&self);
}

/// Gate that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGate;

impl StartupGate for NoopGate {
    fn hold(&self) {}

    fn release(&self) {}
}

/// Gate that shows a loading line on stderr while held.
#[derive(Debug, Default)]
pub struct TerminalGate {
    held: AtomicBool,
}

impl TerminalGate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StartupGate for TerminalGate {
    fn hold(&self) {
        if !self.held.swap(true, Ordering::SeqCst) {
            eprint!("Loading catalog...");
            std::io::stderr().flush().ok();
        }
    }

    fn release(&self) {
        if self.held.swap(false, Ordering::SeqCst) {
            eprint!("\r\x1b[2K");
            std::io::stderr().flush().ok();
        }
    }
}
