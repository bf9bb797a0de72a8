use serde::{Deserialize, Serialize};
use serde_json::Value;

use lightbus_core::{MessageId, RemoteErrorKind};

use crate::Metadata;

/// Either the handler's return value, or an error taxonomy entry — mutually
/// exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResultOutcome {
    Success(Value),
    Error { kind: RemoteErrorKind, message: String },
}

impl ResultOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Produced exactly once per dispatched `RpcMessage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    id: MessageId,
    rpc_message_id: MessageId,
    outcome: ResultOutcome,
    trace: Option<String>,
    metadata: Metadata,
}

impl ResultMessage {
    pub fn success(rpc_message_id: MessageId, value: Value, metadata: Metadata) -> Self {
        Self {
            id: MessageId::new(),
            rpc_message_id,
            outcome: ResultOutcome::Success(value),
            trace: None,
            metadata,
        }
    }

    pub fn error(
        rpc_message_id: MessageId,
        kind: RemoteErrorKind,
        message: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: MessageId::new(),
            rpc_message_id,
            outcome: ResultOutcome::Error { kind, message: message.into() },
            trace: None,
            metadata,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn rpc_message_id(&self) -> MessageId {
        self.rpc_message_id
    }

    pub fn outcome(&self) -> &ResultOutcome {
        &self.outcome
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlates_to_its_rpc_message() {
        let rpc_id = MessageId::new();
        let result = ResultMessage::success(rpc_id, Value::Bool(true), Metadata::new());
        assert_eq!(result.rpc_message_id(), rpc_id);
        assert!(result.outcome().is_success());
    }
}
