//! Tokio Runtime Bridge
//!
//! The engines are driven from a single UI event loop that is not necessarily
//! async. Calls into the dashboard API (reqwest) need tokio, so this module
//! owns one lazily created runtime and a blocking entry point into it.

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

use crate::error::Result;

static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = TOKIO_RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Runtime::new()?;
    Ok(TOKIO_RUNTIME.get_or_init(|| runtime))
}

/// Block on a future synchronously
///
/// **Warning**: This blocks the current thread. Never call it from inside
/// an async task.
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: Future<Output = T>,
{
    Ok(get_runtime()?.block_on(future))
}
