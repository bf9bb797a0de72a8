use std::sync::atomic::{AtomicU8, Ordering};

use lightbus_core::BusError;

/// Lifecycle states a [`crate::Client`] moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl ClientState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Stopping,
            _ => Self::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Starting => 1,
            Self::Running => 2,
            Self::Stopping => 3,
            Self::Stopped => 4,
        }
    }
}

/// Atomic holder with the one legal transition each lifecycle method needs.
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(ClientState::Created.as_u8()))
    }

    pub fn get(&self) -> ClientState {
        ClientState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Move from `from` to `to`, or fail with `LifecycleError` describing
    /// the state actually observed.
    pub fn transition(&self, from: ClientState, to: ClientState) -> Result<(), BusError> {
        self.0
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|actual| {
                BusError::LifecycleError(format!(
                    "expected client to be {from:?} but it was {:?}",
                    ClientState::from_u8(actual)
                ))
            })
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
