use anyhow::Result;
use reqwest::Client;

use crate::api::dispatcher::{DispatchConfig, Dispatcher};

const USER_AGENT: &str = concat!("chatpost/", env!("CARGO_PKG_VERSION"));

/// One connection pool per process; both delivery attempts share it.
#[derive(Clone)]
pub struct HttpClient {
    pub client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(2)
            .build()?;
        Ok(Self { client })
    }

    pub fn into_dispatcher(self, config: DispatchConfig) -> Dispatcher {
        Dispatcher::new(self.client, config)
    }
}
