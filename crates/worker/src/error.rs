use thiserror::Error;

/// Dispatcher-layer failures, folded into `lightbus_core::BusError` at the
/// client façade boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transport(#[from] lightbus_transport::TransportError),
    #[error(transparent)]
    Registry(#[from] lightbus_registry::RegistryError),
}

impl From<DispatchError> for lightbus_core::BusError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Transport(e) => e.into(),
            DispatchError::Registry(e) => e.into(),
        }
    }
}
