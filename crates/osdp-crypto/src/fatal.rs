//! Unrecoverable crypto failures.
//!
//! A cipher library that rejects valid parameters, or an entropy source that
//! stops producing bytes, leaves no safe way to keep a secure channel up. The
//! only response is a diagnostic followed by process abort.

use std::fmt::Debug;

/// Log `what` failed with `cause`, then abort the process.
pub(crate) fn abort(what: &str, cause: &dyn Debug) -> ! {
    tracing::error!(target: "osdp", ?cause, "{what} failed, aborting");
    std::process::abort()
}
