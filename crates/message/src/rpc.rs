use serde::{Deserialize, Serialize};

use lightbus_core::{ApiName, MemberName, MessageId};

use crate::{Kwargs, Metadata};

/// Opaque, transport-specific address a result must be delivered to. The
/// Redis realisation embeds the caller's ephemeral
/// reply identifier; other transports may use a connection handle or queue
/// name instead, so this stays an opaque string rather than a Redis key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnPath(String);

impl ReturnPath {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ReturnPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An RPC call in flight. Created by the caller, serialized,
/// consumed by exactly one responder, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMessage {
    id: MessageId,
    api_name: ApiName,
    procedure_name: MemberName,
    kwargs: Kwargs,
    return_path: ReturnPath,
    metadata: Metadata,
}

impl RpcMessage {
    pub fn new(
        api_name: ApiName,
        procedure_name: MemberName,
        kwargs: Kwargs,
        return_path: ReturnPath,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: MessageId::new(),
            api_name,
            procedure_name,
            kwargs,
            return_path,
            metadata,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn api_name(&self) -> &ApiName {
        &self.api_name
    }

    pub fn procedure_name(&self) -> &MemberName {
        &self.procedure_name
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn return_path(&self) -> &ReturnPath {
        &self.return_path
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_messages_get_distinct_ids() {
        let a = RpcMessage::new(
            ApiName::new("auth"),
            MemberName::new("login"),
            Kwargs::new(),
            ReturnPath::new("reply:1"),
            Metadata::new(),
        );
        let b = RpcMessage::new(
            ApiName::new("auth"),
            MemberName::new("login"),
            Kwargs::new(),
            ReturnPath::new("reply:1"),
            Metadata::new(),
        );
        assert_ne!(a.id(), b.id());
    }
}
