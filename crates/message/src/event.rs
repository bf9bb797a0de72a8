use serde::{Deserialize, Serialize};

use lightbus_core::{ApiName, MemberName, MessageId};

use crate::{Kwargs, Metadata};

/// A fired event, fanned out to every listener group subscribed at the time
/// of publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    id: MessageId,
    api_name: ApiName,
    event_name: MemberName,
    kwargs: Kwargs,
    metadata: Metadata,
    /// Broker-assigned stream position, when the transport provides one
    /// (e.g. a Redis Streams entry ID). `None` for transports, or for
    /// messages, that never touched a broker (in-memory tests).
    native_id: Option<String>,
}

impl EventMessage {
    pub fn new(api_name: ApiName, event_name: MemberName, kwargs: Kwargs, metadata: Metadata) -> Self {
        Self {
            id: MessageId::new(),
            api_name,
            event_name,
            kwargs,
            metadata,
            native_id: None,
        }
    }

    pub fn with_native_id(mut self, native_id: impl Into<String>) -> Self {
        self.native_id = Some(native_id.into());
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn api_name(&self) -> &ApiName {
        &self.api_name
    }

    pub fn event_name(&self) -> &MemberName {
        &self.event_name
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn native_id(&self) -> Option<&str> {
        self.native_id.as_deref()
    }
}
