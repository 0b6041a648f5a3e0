//! Ctrl+C handling.
//!
//! The handler raises a shared [`AtomicBool`] that the duplicate finder
//! checks between files while hashing, so an interrupted scan stops before
//! any plan is built. Execution does not consult the flag: once the operator
//! has confirmed, the batch runs to the end (a hard kill simply leaves the
//! remaining files in place, and the next run plans from scratch).
//!
//! ```rust,no_run
//! use pdfdupe::duplicates::FinderConfig;
//! use pdfdupe::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption: 128 + SIGINT.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the flag for the finder.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse the one already installed.
///
/// Reuse resets the flag, so repeated `run_app` calls in one process (tests)
/// each start clean.
///
/// # Errors
///
/// Returns [`SignalError`] if the OS handler cannot be registered and no
/// handler was installed before.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Stopping scan...");
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    })
    .or_else(|e| match e {
        // Registered by someone else in this process: fall back to a manual-only flag.
        ctrlc::Error::MultipleHandlers => {
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
            Ok(())
        }
        other => Err(other),
    })?;

    Ok(GLOBAL_HANDLER.get_or_init(|| handler).clone())
}
