use lightbus_core::{ApiName, MemberName, ReplaySince};

/// One consumer-group subscription request passed to
/// `EventTransport::consume`.
#[derive(Debug, Clone)]
pub struct ListenerSpec {
    pub listener_name: String,
    pub addresses: Vec<(ApiName, MemberName)>,
    pub since: ReplaySince,
}

impl ListenerSpec {
    pub fn new(listener_name: impl Into<String>) -> Self {
        Self {
            listener_name: listener_name.into(),
            addresses: Vec::new(),
            since: ReplaySince::New,
        }
    }

    pub fn with_address(mut self, api_name: ApiName, event_name: MemberName) -> Self {
        self.addresses.push((api_name, event_name));
        self
    }

    pub fn with_since(mut self, since: ReplaySince) -> Self {
        self.since = since;
        self
    }
}
