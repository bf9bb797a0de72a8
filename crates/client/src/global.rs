use std::sync::{Arc, OnceLock};

use crate::Client;

/// Process-wide client handle. The CLI's `run`
/// subcommand sets this once at startup so that handlers registered via
/// free functions can reach the same client that's dispatching them.
static GLOBAL_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

/// Returns the process-wide client, if one has been set.
pub fn global_client() -> Option<Arc<Client>> {
    GLOBAL_CLIENT.get().cloned()
}

/// Sets the process-wide client. Returns the passed-in `Arc` back as `Err`
/// if one was already set — this can only be called once per process.
pub fn set_global_client(client: Arc<Client>) -> Result<(), Arc<Client>> {
    GLOBAL_CLIENT.set(client)
}
