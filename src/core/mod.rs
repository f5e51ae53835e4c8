//! Core infrastructure module for gbm-control.
//!
//! - [`types`]: numeric aliases, objective classification and hook types
//! - [`constants`]: parameter names, prefixes and limits
//! - [`error`]: error taxonomy
//! - [`traits`]: the external boosting engine contract

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{GbmError, Result};
pub use traits::*;
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Set up logging. Safe to call more than once.
pub fn initialize_core() -> Result<()> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    // Another logger may already be installed by the host application.
    let _ = env_logger::try_init();

    log::debug!("gbm-control {} initialized", GBM_CONTROL_VERSION);
    Ok(())
}

/// Check whether [`initialize_core`] has run.
pub fn is_core_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
