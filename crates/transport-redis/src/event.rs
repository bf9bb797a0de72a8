use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use redis::streams::{StreamClaimOptions, StreamClaimReply, StreamPendingReply, StreamRangeReply, StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, warn};

use lightbus_codec::{Codec, JsonCodec};
use lightbus_core::{ApiName, MemberName, ReplaySince};
use lightbus_message::EventMessage;
use lightbus_transport::{Delivery, EventConsumer, EventSendOptions, EventTransport, Lease, LeaseAck, ListenerSpec, TransportError};

use crate::conn::RedisConn;
use crate::error::RedisTransportError;

fn stream_key(api_name: &str, event_name: &str) -> String {
    format!("lightbus:events:{api_name}:{event_name}")
}

fn dlq_key(api_name: &str, event_name: &str) -> String {
    format!("lightbus:events:{api_name}:{event_name}:dlq")
}

struct StreamAck {
    conn: redis::aio::ConnectionManager,
    stream_key: String,
    group: String,
    entry_id: String,
}

#[async_trait]
impl LeaseAck for StreamAck {
    async fn acknowledge(self: Box<Self>) -> Result<(), TransportError> {
        let mut conn = self.conn;
        conn.xack::<_, _, _, i64>(&self.stream_key, &self.group, &[self.entry_id])
            .await
            .map_err(RedisTransportError::from)?;
        Ok(())
    }
}

/// Streams-backed fan-out with native consumer groups: one stream per `(api_name, event_name)`, one consumer
/// group per `listener_name`. Replicas sharing a `listener_name` register
/// distinct consumer names within that group and Redis partitions
/// deliveries between them natively — no application-level round robin
/// needed, unlike [`lightbus_transport::inmemory`].
pub struct RedisEventTransport {
    conn: RedisConn,
    codec: JsonCodec,
    consumer_id: String,
    /// `listener_name` -> stream keys it is subscribed to, recorded by
    /// `consume()` so `reclaim()` knows where to look.
    listener_streams: DashMap<String, Vec<String>>,
    /// `listener_name` -> the sender `consume()` handed its dispatch loop,
    /// so `reclaim()` can push redelivered entries onto the same channel
    /// instead of just counting them.
    listener_senders: DashMap<String, mpsc::Sender<Delivery<EventMessage>>>,
}

impl RedisEventTransport {
    pub fn new(conn: RedisConn) -> Self {
        Self {
            conn,
            codec: JsonCodec,
            consumer_id: format!("consumer-{}", uuid::Uuid::now_v7()),
            listener_streams: DashMap::new(),
            listener_senders: DashMap::new(),
        }
    }

    async fn ensure_group(&self, stream_key: &str, group: &str) {
        let mut conn = self.conn.handle();
        let created: redis::RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(stream_key)
            .arg(group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;
        if let Err(err) = created {
            // BUSYGROUP means it already exists; anything else is worth logging.
            if !err.to_string().contains("BUSYGROUP") {
                warn!(stream = %stream_key, group, error = %err, "failed to create consumer group");
            }
        }
    }

    fn decode_entry(&self, stream: &str, id: &str, map: &std::collections::HashMap<String, redis::Value>) -> Option<EventMessage> {
        let payload = map.get("payload")?;
        let bytes: Vec<u8> = redis::from_redis_value(payload).ok()?;
        match self.codec.decode_event(&bytes) {
            Ok(message) => Some(message.with_native_id(id.to_string())),
            Err(err) => {
                error!(stream, error = %err, "failed to decode event payload");
                None
            }
        }
    }
}

#[async_trait]
impl EventTransport for RedisEventTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_event(&self, message: EventMessage, _options: EventSendOptions) -> Result<(), TransportError> {
        let bytes = self.codec.encode_event(&message).map_err(RedisTransportError::from)?;
        let key = stream_key(message.api_name().as_str(), message.event_name().as_str());
        let mut conn = self.conn.handle();
        conn.xadd::<_, _, _, _, String>(&key, "*", &[("payload", bytes)])
            .await
            .map_err(RedisTransportError::from)?;
        Ok(())
    }

    async fn consume(&self, listeners: &[ListenerSpec]) -> Result<EventConsumer, TransportError> {
        let (tx, rx) = mpsc::channel(256);

        for listener in listeners {
            let streams: Vec<String> = listener
                .addresses
                .iter()
                .map(|(api, event)| stream_key(api.as_str(), event.as_str()))
                .collect();
            if streams.is_empty() {
                continue;
            }
            for key in &streams {
                self.ensure_group(key, &listener.listener_name).await;
            }
            self.listener_streams.insert(listener.listener_name.clone(), streams.clone());
            self.listener_senders.insert(listener.listener_name.clone(), tx.clone());

            let conn = self.conn.handle();
            let codec = self.codec;
            let group = listener.listener_name.clone();
            let consumer_id = self.consumer_id.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let mut conn = conn;
                let ids = vec![">"; streams.len()];
                let opts = StreamReadOptions::default().group(&group, &consumer_id).count(10).block(1000);

                loop {
                    let reply: redis::RedisResult<StreamReadReply> =
                        conn.xread_options(&streams, &ids, &opts).await;

                    match reply {
                        Ok(reply) => {
                            for stream_key in reply.keys {
                                for entry in stream_key.ids {
                                    let payload = entry.map.get("payload").cloned();
                                    let Some(payload) = payload else { continue };
                                    let bytes: Result<Vec<u8>, _> = redis::from_redis_value(&payload);
                                    let Ok(bytes) = bytes else { continue };
                                    match codec.decode_event(&bytes) {
                                        Ok(message) => {
                                            let message = message.with_native_id(entry.id.clone());
                                            let ack = StreamAck {
                                                conn: conn.clone(),
                                                stream_key: stream_key.key.clone(),
                                                group: group.clone(),
                                                entry_id: entry.id,
                                            };
                                            let lease = Lease::new(1, Box::new(ack));
                                            if tx.send(Delivery::new(message, lease)).await.is_err() {
                                                return;
                                            }
                                        }
                                        Err(err) => error!(error = %err, "failed to decode event payload"),
                                    }
                                }
                            }
                        }
                        Err(err) => {
                            if !err.is_timeout() {
                                warn!(group = %group, error = %err, "xreadgroup failed; retrying");
                                tokio::time::sleep(Duration::from_millis(250)).await;
                            }
                        }
                    }
                }
            });
        }

        Ok(EventConsumer::new(Arc::new(Mutex::new(rx))))
    }

    async fn history(
        &self,
        api_name: &ApiName,
        event_name: &MemberName,
        since: ReplaySince,
        until: Option<ReplaySince>,
    ) -> Result<Vec<EventMessage>, TransportError> {
        let start = match &since {
            ReplaySince::Explicit(id) => id.clone(),
            ReplaySince::New | ReplaySince::Tail => {
                return Err(TransportError::Unsupported(
                    "history requires an explicit stream position".to_string(),
                ))
            }
        };
        let end = match until {
            Some(ReplaySince::Explicit(id)) => id,
            _ => "+".to_string(),
        };

        let key = stream_key(api_name.as_str(), event_name.as_str());
        let mut conn = self.conn.handle();
        let reply: StreamRangeReply = conn.xrange(&key, &start, &end).await.map_err(RedisTransportError::from)?;

        let messages = reply
            .ids
            .iter()
            .filter_map(|entry| self.decode_entry(&key, &entry.id, &entry.map))
            .collect();
        Ok(messages)
    }

    async fn reclaim(&self, listener_name: &str, older_than: Duration) -> Result<usize, TransportError> {
        let Some(streams) = self.listener_streams.get(listener_name).map(|v| v.clone()) else {
            return Ok(0);
        };
        let Some(tx) = self.listener_senders.get(listener_name).map(|v| v.clone()) else {
            return Ok(0);
        };
        let mut conn = self.conn.handle();
        let mut reclaimed = 0usize;

        for key in streams {
            let pending: redis::RedisResult<StreamPendingReply> =
                conn.xpending(&key, listener_name).await;
            let delivery_counts: std::collections::HashMap<String, u32> = match pending {
                Ok(StreamPendingReply::Data(data)) => {
                    data.ids.into_iter().map(|p| (p.id, p.times_delivered as u32)).collect()
                }
                Ok(StreamPendingReply::Empty) => continue,
                Err(err) => {
                    warn!(stream = %key, group = %listener_name, error = %err, "xpending failed");
                    continue;
                }
            };
            if delivery_counts.is_empty() {
                continue;
            }
            let ids: Vec<String> = delivery_counts.keys().cloned().collect();

            let opts = StreamClaimOptions::default();
            let claimed: redis::RedisResult<StreamClaimReply> = conn
                .xclaim_options(&key, listener_name, &self.consumer_id, older_than.as_millis() as usize, &ids, opts)
                .await;
            match claimed {
                Ok(reply) => {
                    for entry in reply.ids {
                        let Some(message) = self.decode_entry(&key, &entry.id, &entry.map) else { continue };
                        let delivery_count = delivery_counts.get(&entry.id).copied().unwrap_or(0) + 1;
                        let ack = StreamAck {
                            conn: conn.clone(),
                            stream_key: key.clone(),
                            group: listener_name.to_string(),
                            entry_id: entry.id.clone(),
                        };
                        let lease = Lease::new(delivery_count, Box::new(ack));
                        if tx.send(Delivery::new(message, lease)).await.is_err() {
                            warn!(listener = %listener_name, "reclaim consumer channel closed");
                            break;
                        }
                        reclaimed += 1;
                    }
                }
                Err(err) => warn!(stream = %key, group = %listener_name, error = %err, "xclaim failed"),
            }
        }

        if reclaimed > 0 {
            debug!(listener = %listener_name, count = reclaimed, "reclaimed stale pending entries");
        }
        Ok(reclaimed)
    }

    async fn dead_letter(&self, message: &EventMessage, delivery_count: u32) -> Result<(), TransportError> {
        let bytes = self.codec.encode_event(message).map_err(RedisTransportError::from)?;
        let key = dlq_key(message.api_name().as_str(), message.event_name().as_str());
        let mut conn = self.conn.handle();
        conn.xadd::<_, _, _, _, String>(
            &key,
            "*",
            &[("payload", bytes), ("delivery_count", delivery_count.to_string().into_bytes())],
        )
        .await
        .map_err(RedisTransportError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_key_is_namespaced_by_api_and_event() {
        assert_eq!(stream_key("auth", "user_registered"), "lightbus:events:auth:user_registered");
        assert_eq!(dlq_key("auth", "user_registered"), "lightbus:events:auth:user_registered:dlq");
    }
}
