use std::time::Duration;

use async_trait::async_trait;

use lightbus_message::{ResultMessage, ReturnPath, RpcMessage};

use crate::TransportError;

/// Reply path for RPC results.
#[async_trait]
pub trait ResultTransport: Send + Sync {
    async fn open(&self) -> Result<(), TransportError>;
    async fn close(&self) -> Result<(), TransportError>;

    /// Write a single result to the caller's return address.
    async fn send_result(
        &self,
        rpc_message: &RpcMessage,
        result_message: ResultMessage,
        return_path: &ReturnPath,
    ) -> Result<(), TransportError>;

    /// Block cooperatively until the result for `rpc_message` arrives at
    /// `return_path` or `timeout` elapses, in which case `Err(TransportError::Timeout)`.
    async fn receive_result(
        &self,
        rpc_message: &RpcMessage,
        return_path: &ReturnPath,
        timeout: Duration,
    ) -> Result<ResultMessage, TransportError>;
}
