use thiserror::Error;

/// Registry-layer failures, folded into `lightbus_core::BusError` at the
/// client façade boundary.
#[derive(Debug, Error, Clone)]
pub enum RegistryError {
    #[error("no such api: {0}")]
    NoSuchApi(String),
    #[error("no such member: {api_name}.{member_name}")]
    NoSuchMember { api_name: String, member_name: String },
    #[error("registry is frozen after start(); cannot register {0}")]
    Frozen(String),
    #[error("schema conflict for {api_name}: {message}")]
    SchemaConflict { api_name: String, message: String },
    #[error("listener {listener_name:?} already registered for {address}")]
    DuplicateListener { listener_name: String, address: String },
}

impl From<RegistryError> for lightbus_core::BusError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NoSuchApi(name) => lightbus_core::BusError::NoSuchApi(name),
            RegistryError::NoSuchMember { api_name, member_name } => {
                lightbus_core::BusError::NoSuchMember { api_name, member_name }
            }
            RegistryError::Frozen(msg) => lightbus_core::BusError::LifecycleError(msg),
            RegistryError::SchemaConflict { api_name, message } => {
                lightbus_core::BusError::SchemaConflict { api_name, message }
            }
            RegistryError::DuplicateListener { listener_name, address } => {
                lightbus_core::BusError::DuplicateListener { listener_name, address }
            }
        }
    }
}
