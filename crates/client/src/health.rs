use crate::state::ClientState;
use crate::Client;

impl Client {
    /// Whether the client is in its steady-running state. Used by the CLI's `inspect` subcommand and by
    /// orchestrators polling readiness.
    pub fn is_healthy(&self) -> bool {
        self.state() == ClientState::Running
    }
}
